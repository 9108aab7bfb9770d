//! Interest catalog table operations.

use rusqlite::{params, Connection};

use super::Result;
use crate::identity::UserId;
use crate::interest::{Interest, InterestItem};

/// Loads a user's catalog with categories and items in stored order.
pub(crate) fn get_interests(conn: &Connection, user_id: UserId) -> Result<Vec<Interest>> {
    let mut stmt = conn.prepare(
        r"
        SELECT i.id, i.category, it.name, it.rating
        FROM interests i
        LEFT JOIN interest_items it ON it.interest_id = i.id
        WHERE i.user_id = ?1
        ORDER BY i.position, it.position
        ",
    )?;

    let rows = stmt
        .query_map(params![user_id.0], |row| {
            let interest_id: i64 = row.get(0)?;
            let category: String = row.get(1)?;
            let item_name: Option<String> = row.get(2)?;
            let rating: Option<u8> = row.get(3)?;
            Ok((interest_id, category, item_name, rating))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut interests: Vec<Interest> = Vec::new();
    let mut current_id = None;

    for (interest_id, category, item_name, rating) in rows {
        if current_id != Some(interest_id) {
            interests.push(Interest::new(category));
            current_id = Some(interest_id);
        }

        if let (Some(name), Some(rating), Some(interest)) =
            (item_name, rating, interests.last_mut())
        {
            interest.items.push(InterestItem { name, rating });
        }
    }

    Ok(interests)
}

/// Replaces a user's whole catalog.
pub(crate) fn replace_interests(
    conn: &Connection,
    user_id: UserId,
    interests: &[Interest],
) -> Result<()> {
    conn.execute(
        "DELETE FROM interest_items WHERE interest_id IN (SELECT id FROM interests WHERE user_id = ?1)",
        params![user_id.0],
    )?;
    conn.execute("DELETE FROM interests WHERE user_id = ?1", params![user_id.0])?;

    let mut insert_interest = conn.prepare(
        "INSERT INTO interests (user_id, category, position) VALUES (?1, ?2, ?3)",
    )?;
    let mut insert_item = conn.prepare(
        "INSERT INTO interest_items (interest_id, name, rating, position) VALUES (?1, ?2, ?3, ?4)",
    )?;

    for (position, interest) in interests.iter().enumerate() {
        insert_interest.execute(params![user_id.0, interest.category.trim(), position])?;
        let interest_id = conn.last_insert_rowid();

        for (item_position, item) in interest.items.iter().enumerate() {
            insert_item.execute(params![
                interest_id,
                item.name.trim(),
                item.rating,
                item_position
            ])?;
        }
    }

    Ok(())
}
