//! Notification history operations

use rusqlite::params;
use tracing::debug;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{validate_owner, NotificationKind, NotificationLog};

impl Database {
    /// Log a notification and prune entries older than the retention window
    pub fn record_notification(
        &self,
        owner: &str,
        kind: NotificationKind,
        subscription_name: &str,
        title: &str,
        message: &str,
        retention_days: i64,
    ) -> Result<i64> {
        validate_owner(owner)?;
        if retention_days <= 0 {
            return Err(Error::Validation(format!(
                "retention must be positive, got {} days",
                retention_days
            )));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO notifications (owner, subscription_name, title, message, kind)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![owner, subscription_name, title, message, kind.as_str()],
        )?;
        let id = tx.last_insert_rowid();

        let pruned = tx.execute(
            "DELETE FROM notifications WHERE owner = ? AND created_at < datetime('now', ?)",
            params![owner, format!("-{} days", retention_days)],
        )?;
        tx.commit()?;

        if pruned > 0 {
            debug!("Pruned {} expired notifications for {}", pruned, owner);
        }
        Ok(id)
    }

    /// Notification history, newest first
    pub fn list_notifications(&self, owner: &str) -> Result<Vec<NotificationLog>> {
        validate_owner(owner)?;
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, subscription_name, title, message, kind, created_at
            FROM notifications
            WHERE owner = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )?;

        let rows = stmt
            .query_map(params![owner], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, subscription_name, title, message, kind, created_at)| {
                Ok(NotificationLog {
                    id,
                    subscription_name,
                    title,
                    message,
                    kind: kind.parse().map_err(Error::Validation)?,
                    created_at: parse_datetime(&created_at),
                })
            })
            .collect()
    }
}
