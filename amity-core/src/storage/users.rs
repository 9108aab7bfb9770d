//! User table operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{map_write_error, Result, StorageError};
use crate::identity::{User, UserId};

/// Columns read by [`user_from_row`], in order.
pub(crate) const USER_COLUMNS: &str = "id, name, username, avatar, bio, created_at";

/// Maps a row selected with [`USER_COLUMNS`] (at `offset`) to a [`User`].
pub(crate) fn user_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId(row.get(offset)?),
        name: row.get(offset + 1)?,
        username: row.get(offset + 2)?,
        avatar: row.get(offset + 3)?,
        bio: row.get(offset + 4)?,
        created_at: row.get(offset + 5)?,
    })
}

/// Fields written when a user registers.
pub(crate) struct UserRecord<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub password_hash: &'a str,
    pub created_at: i64,
}

/// Inserts a user and returns the stored record.
///
/// A duplicate username surfaces as [`StorageError::Conflict`].
pub(crate) fn insert_user(conn: &Connection, record: &UserRecord<'_>) -> Result<User> {
    conn.execute(
        r"
        INSERT INTO users (name, username, email, password_hash, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        ",
        params![
            record.name,
            record.username,
            record.email,
            record.password_hash,
            record.created_at,
        ],
    )
    .map_err(|e| map_write_error(e, "users.username"))?;

    Ok(User {
        id: UserId(conn.last_insert_rowid()),
        name: record.name.to_string(),
        username: record.username.to_string(),
        avatar: None,
        bio: None,
        created_at: record.created_at,
    })
}

pub(crate) fn get_user(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id.0],
            |row| user_from_row(row, 0),
        )
        .optional()?;
    Ok(user)
}

pub(crate) fn user_exists(conn: &Connection, id: UserId) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        params![id.0],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub(crate) fn get_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            |row| user_from_row(row, 0),
        )
        .optional()?;
    Ok(user)
}

/// Returns the user and stored password hash for a username.
pub(crate) fn get_credentials(conn: &Connection, username: &str) -> Result<Option<(User, String)>> {
    let result = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = ?1"),
            params![username],
            |row| Ok((user_from_row(row, 0)?, row.get::<_, String>(6)?)),
        )
        .optional()?;
    Ok(result)
}

/// Writes the editable profile fields of `user`.
pub(crate) fn update_profile(conn: &Connection, user: &User, updated_at: i64) -> Result<()> {
    let rows = conn.execute(
        r"
        UPDATE users
        SET name = ?1, avatar = ?2, bio = ?3, updated_at = ?4
        WHERE id = ?5
        ",
        params![&user.name, &user.avatar, &user.bio, updated_at, user.id.0],
    )?;

    if rows == 0 {
        return Err(StorageError::InvalidData(format!(
            "User vanished during update: {}",
            user.id
        )));
    }

    Ok(())
}

/// Finds users whose name or username contains `query`, case-insensitively.
pub(crate) fn search_users(
    conn: &Connection,
    query: &str,
    exclude: Option<UserId>,
    limit: usize,
) -> Result<Vec<User>> {
    let pattern = format!("%{}%", escape_like(query));
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let mut stmt = conn.prepare(&format!(
        r"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE (name LIKE ?1 ESCAPE '\' OR username LIKE ?1 ESCAPE '\')
          AND (?2 IS NULL OR id <> ?2)
        ORDER BY username COLLATE NOCASE
        LIMIT ?3
        "
    ))?;

    let users = stmt
        .query_map(params![pattern, exclude.map(|id| id.0), limit], |row| {
            user_from_row(row, 0)
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(users)
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
