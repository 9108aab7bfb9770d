//! Friend request and friendship table operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::users::user_from_row;
use super::{map_write_error, Result, StorageError};
use crate::friends::{
    FriendRequest, FriendshipEdge, IncomingRequest, RequestId, RequestStatus, UserPair,
};
use crate::identity::{User, UserId};

const REQUEST_COLUMNS: &str = "id, sender_id, recipient_id, status, created_at, responded_at";

type RawRequest = (i64, i64, i64, String, i64, Option<i64>);

fn raw_request(row: &Row<'_>, offset: usize) -> rusqlite::Result<RawRequest> {
    Ok((
        row.get(offset)?,
        row.get(offset + 1)?,
        row.get(offset + 2)?,
        row.get(offset + 3)?,
        row.get(offset + 4)?,
        row.get(offset + 5)?,
    ))
}

fn parse_request(raw: RawRequest) -> Result<FriendRequest> {
    let (id, sender_id, recipient_id, status_str, created_at, responded_at) = raw;
    let status = RequestStatus::parse(&status_str).ok_or_else(|| {
        StorageError::InvalidData(format!("Unknown request status: {status_str}"))
    })?;

    Ok(FriendRequest {
        id: RequestId(id),
        sender_id: UserId(sender_id),
        recipient_id: UserId(recipient_id),
        status,
        created_at,
        responded_at,
    })
}

/// Inserts a pending request.
///
/// A second pending request for the same pair surfaces as
/// [`StorageError::Conflict`] through the partial unique index.
pub(crate) fn insert_request(
    conn: &Connection,
    sender_id: UserId,
    recipient_id: UserId,
    pair: UserPair,
    created_at: i64,
) -> Result<FriendRequest> {
    conn.execute(
        r"
        INSERT INTO friend_requests
            (sender_id, recipient_id, user_low, user_high, status, created_at)
        VALUES (?1, ?2, ?3, ?4, 'pending', ?5)
        ",
        params![sender_id.0, recipient_id.0, pair.low().0, pair.high().0, created_at],
    )
    .map_err(|e| map_write_error(e, "friend_requests pending pair"))?;

    Ok(FriendRequest {
        id: RequestId(conn.last_insert_rowid()),
        sender_id,
        recipient_id,
        status: RequestStatus::Pending,
        created_at,
        responded_at: None,
    })
}

pub(crate) fn get_request(conn: &Connection, id: RequestId) -> Result<Option<FriendRequest>> {
    let raw = conn
        .query_row(
            &format!("SELECT {REQUEST_COLUMNS} FROM friend_requests WHERE id = ?1"),
            params![id.0],
            |row| raw_request(row, 0),
        )
        .optional()?;

    raw.map(parse_request).transpose()
}

/// Returns the pending request for a pair, whichever direction it runs.
pub(crate) fn pending_between(conn: &Connection, pair: UserPair) -> Result<Option<FriendRequest>> {
    let raw = conn
        .query_row(
            &format!(
                "SELECT {REQUEST_COLUMNS} FROM friend_requests
                 WHERE user_low = ?1 AND user_high = ?2 AND status = 'pending'"
            ),
            params![pair.low().0, pair.high().0],
            |row| raw_request(row, 0),
        )
        .optional()?;

    raw.map(parse_request).transpose()
}

/// Moves a pending request to a terminal status.
///
/// Returns `false` if the request was no longer pending.
pub(crate) fn resolve_request(
    conn: &Connection,
    id: RequestId,
    status: RequestStatus,
    responded_at: i64,
) -> Result<bool> {
    let rows = conn.execute(
        r"
        UPDATE friend_requests
        SET status = ?1, responded_at = ?2
        WHERE id = ?3 AND status = 'pending'
        ",
        params![status.as_str(), responded_at, id.0],
    )?;
    Ok(rows == 1)
}

/// Pending requests addressed to `user_id`, newest first.
pub(crate) fn pending_received(conn: &Connection, user_id: UserId) -> Result<Vec<FriendRequest>> {
    pending_where(conn, "recipient_id", user_id)
}

/// Pending requests sent by `user_id`, newest first.
pub(crate) fn pending_sent(conn: &Connection, user_id: UserId) -> Result<Vec<FriendRequest>> {
    pending_where(conn, "sender_id", user_id)
}

fn pending_where(conn: &Connection, column: &str, user_id: UserId) -> Result<Vec<FriendRequest>> {
    let mut stmt = conn.prepare(&format!(
        r"
        SELECT {REQUEST_COLUMNS}
        FROM friend_requests
        WHERE {column} = ?1 AND status = 'pending'
        ORDER BY created_at DESC, id DESC
        "
    ))?;

    let raws = stmt
        .query_map(params![user_id.0], |row| raw_request(row, 0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    raws.into_iter().map(parse_request).collect()
}

/// Pending requests addressed to `user_id` with each sender's record.
pub(crate) fn incoming_with_senders(
    conn: &Connection,
    user_id: UserId,
) -> Result<Vec<IncomingRequest>> {
    let mut stmt = conn.prepare(
        r"
        SELECT r.id, r.sender_id, r.recipient_id, r.status, r.created_at, r.responded_at,
               u.id, u.name, u.username, u.avatar, u.bio, u.created_at
        FROM friend_requests r
        JOIN users u ON u.id = r.sender_id
        WHERE r.recipient_id = ?1 AND r.status = 'pending'
        ORDER BY r.created_at DESC, r.id DESC
        ",
    )?;

    let rows = stmt
        .query_map(params![user_id.0], |row| {
            Ok((raw_request(row, 0)?, user_from_row(row, 6)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(raw, sender)| {
            Ok(IncomingRequest {
                request: parse_request(raw)?,
                sender,
            })
        })
        .collect()
}

/// Creates the friendship edge for a pair.
///
/// Returns `false` if the edge already existed.
pub(crate) fn insert_friendship(
    conn: &Connection,
    pair: UserPair,
    request_id: RequestId,
    since: i64,
) -> Result<bool> {
    let rows = conn
        .execute(
            r"
            INSERT INTO friendships (user_low, user_high, request_id, since)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (user_low, user_high) DO NOTHING
            ",
            params![pair.low().0, pair.high().0, request_id.0, since],
        )
        .map_err(|e| map_write_error(e, "friendships"))?;
    Ok(rows == 1)
}

pub(crate) fn get_friendship(conn: &Connection, pair: UserPair) -> Result<Option<FriendshipEdge>> {
    let edge = conn
        .query_row(
            r"
            SELECT user_low, user_high, request_id, since
            FROM friendships
            WHERE user_low = ?1 AND user_high = ?2
            ",
            params![pair.low().0, pair.high().0],
            |row| {
                Ok(FriendshipEdge {
                    user_a: UserId(row.get(0)?),
                    user_b: UserId(row.get(1)?),
                    request_id: RequestId(row.get(2)?),
                    since: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(edge)
}

pub(crate) fn friendship_exists(conn: &Connection, pair: UserPair) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM friendships WHERE user_low = ?1 AND user_high = ?2)",
        params![pair.low().0, pair.high().0],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Removes the friendship edge for a pair.
///
/// Returns `false` if there was none.
pub(crate) fn delete_friendship(conn: &Connection, pair: UserPair) -> Result<bool> {
    let rows = conn.execute(
        "DELETE FROM friendships WHERE user_low = ?1 AND user_high = ?2",
        params![pair.low().0, pair.high().0],
    )?;
    Ok(rows == 1)
}

/// Users with an edge to `user_id`, ordered by name then id.
pub(crate) fn list_friends(conn: &Connection, user_id: UserId) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(
        r"
        SELECT u.id, u.name, u.username, u.avatar, u.bio, u.created_at
        FROM friendships f
        JOIN users u
          ON u.id = CASE WHEN f.user_low = ?1 THEN f.user_high ELSE f.user_low END
        WHERE f.user_low = ?1 OR f.user_high = ?1
        ORDER BY u.name, u.id
        ",
    )?;

    let friends = stmt
        .query_map(params![user_id.0], |row| user_from_row(row, 0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(friends)
}
