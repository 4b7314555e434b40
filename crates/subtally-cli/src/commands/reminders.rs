//! Reminder and notification history commands

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use subtally_core::models::{ActivityFilter, NotificationKind};
use subtally_core::reminders;
use tracing::debug;

use super::{print_json, Session};

/// List reminders still to fire, optionally logging each to the history
pub fn cmd_reminders(session: &Session, today: Option<NaiveDate>, log: bool) -> Result<()> {
    let subs = session
        .db
        .list_subscriptions(&session.owner, ActivityFilter::Active)?;
    let today = today.unwrap_or_else(|| Utc::now().date_naive());

    let pending =
        reminders::upcoming_reminders(&subs, today, session.config.reminder_lead_days);

    if log {
        for reminder in &pending {
            session.db.record_notification(
                &session.owner,
                NotificationKind::Reminder,
                &reminder.subscription_name,
                reminder.title(),
                &reminder.message(),
                session.config.notification_retention_days,
            )?;
        }
        debug!("Logged {} reminders", pending.len());
    }

    if session.json {
        return print_json(&pending);
    }

    println!();
    println!("🔔 Reminders");
    println!("   ─────────────────────────────────────────────");

    if pending.is_empty() {
        println!("   No reminders pending.");
        return Ok(());
    }

    for reminder in &pending {
        println!("   {} │ {}", reminder.remind_on, reminder.message());
    }

    Ok(())
}

pub fn cmd_notifications(session: &Session) -> Result<()> {
    let logs = session.db.list_notifications(&session.owner)?;

    if session.json {
        return print_json(&logs);
    }

    if logs.is_empty() {
        println!("No notifications in the last {} days.", session.config.notification_retention_days);
        return Ok(());
    }

    println!();
    println!("📬 Notification History");
    println!("   ─────────────────────────────────────────────");
    for entry in &logs {
        let icon = match entry.kind {
            NotificationKind::Reminder => "🔔",
            NotificationKind::Success => "✅",
            NotificationKind::Failure => "❌",
        };
        println!(
            "   {} {} │ {} │ {}",
            icon,
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.title,
            entry.message
        );
    }

    Ok(())
}
