//! Notification inbox table operations.

use rusqlite::{params, Connection};

use super::{Result, StorageError};
use crate::friends::RequestId;
use crate::identity::UserId;
use crate::notify::{Notification, NotificationEvent, NotificationId, NotificationKind};

pub(crate) fn insert_notification(
    conn: &Connection,
    event: &NotificationEvent,
    created_at: i64,
) -> Result<NotificationId> {
    conn.execute(
        r"
        INSERT INTO notifications (recipient_id, sender_id, kind, request_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ",
        params![
            event.recipient_id.0,
            event.sender_id.0,
            event.kind.as_str(),
            event.request_id.0,
            created_at,
        ],
    )?;
    Ok(NotificationId(conn.last_insert_rowid()))
}

/// A user's notifications, newest first.
pub(crate) fn list_notifications(
    conn: &Connection,
    user_id: UserId,
    unread_only: bool,
) -> Result<Vec<Notification>> {
    let mut stmt = conn.prepare(
        r"
        SELECT id, recipient_id, sender_id, kind, request_id, created_at, read_at
        FROM notifications
        WHERE recipient_id = ?1 AND (?2 = 0 OR read_at IS NULL)
        ORDER BY created_at DESC, id DESC
        ",
    )?;

    let rows = stmt
        .query_map(params![user_id.0, unread_only], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, Option<i64>>(6)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(
            |(id, recipient_id, sender_id, kind_str, request_id, created_at, read_at)| {
                let kind = NotificationKind::parse(&kind_str).ok_or_else(|| {
                    StorageError::InvalidData(format!("Unknown notification kind: {kind_str}"))
                })?;
                Ok(Notification {
                    id: NotificationId(id),
                    event: NotificationEvent {
                        kind,
                        recipient_id: UserId(recipient_id),
                        sender_id: UserId(sender_id),
                        request_id: RequestId(request_id),
                    },
                    created_at,
                    read_at,
                })
            },
        )
        .collect()
}

pub(crate) fn notification_belongs_to(
    conn: &Connection,
    id: NotificationId,
    user_id: UserId,
) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM notifications WHERE id = ?1 AND recipient_id = ?2)",
        params![id.0, user_id.0],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Marks one notification read, keeping the first read time.
pub(crate) fn mark_read(
    conn: &Connection,
    id: NotificationId,
    user_id: UserId,
    read_at: i64,
) -> Result<()> {
    conn.execute(
        r"
        UPDATE notifications
        SET read_at = COALESCE(read_at, ?1)
        WHERE id = ?2 AND recipient_id = ?3
        ",
        params![read_at, id.0, user_id.0],
    )?;
    Ok(())
}

/// Marks every unread notification read and returns how many changed.
pub(crate) fn mark_all_read(conn: &Connection, user_id: UserId, read_at: i64) -> Result<usize> {
    let rows = conn.execute(
        "UPDATE notifications SET read_at = ?1 WHERE recipient_id = ?2 AND read_at IS NULL",
        params![read_at, user_id.0],
    )?;
    Ok(rows)
}

pub(crate) fn unread_count(conn: &Connection, user_id: UserId) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM notifications WHERE recipient_id = ?1 AND read_at IS NULL",
        params![user_id.0],
        |row| row.get(0),
    )?;
    u64::try_from(count).map_err(|e| StorageError::InvalidData(e.to_string()))
}
