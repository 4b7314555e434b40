//! Subscription command implementations

use anyhow::{Context, Result};
use subtally_core::models::{
    ActivityFilter, NewSubscription, NotificationKind, Subscription, SubscriptionUpdate,
};
use tracing::warn;

use super::{print_json, truncate, Session};

fn print_subscription_row(sub: &Subscription) {
    let status_icon = match (sub.is_active, sub.is_paid) {
        (false, _) => "❌",
        (true, true) => "✅",
        (true, false) => "⏳",
    };

    println!(
        "   {} {:>4} │ {:20} │ {:>9.2}/{:<10} │ {:10} │ next {}",
        status_icon,
        sub.id,
        truncate(&sub.name, 20),
        sub.value,
        sub.recurrence.as_str(),
        sub.category.label(),
        sub.next_charge_date
    );
}

fn print_subscription_detail(sub: &Subscription) {
    println!();
    println!("📋 {} (ID: {})", sub.name, sub.id);
    println!("   ─────────────────────────────");
    println!("   Value:        {:.2} ({})", sub.value, sub.recurrence);
    println!("   Category:     {}", sub.category.label());
    println!("   First charge: {}", sub.first_charge_date);
    println!("   Next charge:  {}", sub.next_charge_date);
    println!(
        "   Status:       {}{}",
        if sub.is_active { "active" } else { "inactive" },
        if sub.is_paid { ", paid" } else { "" }
    );
    if let Some(method) = &sub.payment_method {
        println!("   Payment:      {}", method);
    }
    if let Some(notes) = &sub.notes {
        println!("   Notes:        {}", notes);
    }
}

pub fn cmd_add(session: &Session, new: NewSubscription) -> Result<()> {
    let sub = session
        .db
        .create_subscription(&session.owner, &new)
        .context("Failed to add subscription")?;

    if session.json {
        return print_json(&sub);
    }

    println!(
        "✅ Added {} (ID: {}), first charge on {}",
        sub.name, sub.id, sub.next_charge_date
    );
    Ok(())
}

pub fn cmd_list(session: &Session, filter: ActivityFilter) -> Result<()> {
    let subscriptions = session.db.list_subscriptions(&session.owner, filter)?;

    if session.json {
        return print_json(&subscriptions);
    }

    if subscriptions.is_empty() {
        println!("No subscriptions found. Add one with:");
        println!("  subtally add <name> --value <amount> --first-charge <YYYY-MM-DD>");
        return Ok(());
    }

    println!();
    println!("📋 Subscriptions");
    println!("   ─────────────────────────────────────────────────────────────");

    for sub in &subscriptions {
        print_subscription_row(sub);
    }

    Ok(())
}

pub fn cmd_show(session: &Session, id: i64) -> Result<()> {
    let sub = session.db.get_subscription(id, &session.owner)?;

    if session.json {
        return print_json(&sub);
    }

    print_subscription_detail(&sub);
    Ok(())
}

pub fn cmd_edit(session: &Session, id: i64, update: &SubscriptionUpdate) -> Result<()> {
    if update.is_empty() {
        anyhow::bail!("Nothing to change. Pass at least one field, e.g. --value 19.90");
    }

    let sub = session
        .db
        .update_subscription(id, &session.owner, update)
        .with_context(|| format!("Failed to update subscription {}", id))?;

    if session.json {
        return print_json(&sub);
    }

    println!("✅ Updated {} (ID: {})", sub.name, sub.id);
    Ok(())
}

/// Register a payment and log the outcome to the notification history
pub fn cmd_pay(session: &Session, id: i64) -> Result<()> {
    let sub = session.db.get_subscription(id, &session.owner)?;
    let retention = session.config.notification_retention_days;

    match session.db.register_payment(id, &session.owner) {
        Ok(paid) => {
            let message = format!(
                "{} paid. Next charge on {}",
                paid.name, paid.next_charge_date
            );
            if let Err(e) = session.db.record_notification(
                &session.owner,
                NotificationKind::Success,
                &paid.name,
                "Payment registered",
                &message,
                retention,
            ) {
                warn!("Failed to record notification: {}", e);
            }

            if session.json {
                return print_json(&paid);
            }

            println!(
                "✅ Payment registered for {} ({:.2}). Next charge on {}",
                paid.name, sub.value, paid.next_charge_date
            );
            Ok(())
        }
        Err(e) => {
            if let Err(log_err) = session.db.record_notification(
                &session.owner,
                NotificationKind::Failure,
                &sub.name,
                "Payment failed",
                e.user_message(),
                retention,
            ) {
                warn!("Failed to record notification: {}", log_err);
            }
            Err(e).with_context(|| format!("Failed to register payment for {}", sub.name))
        }
    }
}

pub fn cmd_deactivate(session: &Session, id: i64) -> Result<()> {
    session.db.deactivate_subscription(id, &session.owner)?;
    println!("✅ Subscription {} deactivated", id);
    println!("   It no longer counts in reports. Undo with: subtally reactivate {}", id);
    Ok(())
}

pub fn cmd_reactivate(session: &Session, id: i64) -> Result<()> {
    session.db.reactivate_subscription(id, &session.owner)?;
    println!("✅ Subscription {} reactivated", id);
    Ok(())
}

pub fn cmd_delete(session: &Session, id: i64) -> Result<()> {
    session
        .db
        .delete_subscription(id, &session.owner)
        .with_context(|| format!("Failed to delete subscription {}", id))?;
    println!("🗑️  Subscription {} and its payment history deleted", id);
    Ok(())
}

pub fn cmd_payments(session: &Session, id: i64) -> Result<()> {
    let payments = session.db.list_payments(id, &session.owner)?;

    if session.json {
        return print_json(&payments);
    }

    if payments.is_empty() {
        println!("No payments registered for subscription {}.", id);
        return Ok(());
    }

    println!();
    println!("💳 Payment History (subscription {})", id);
    println!("   ─────────────────────────────────────────────");
    for payment in &payments {
        println!(
            "   {} │ {:>9.2} │ next {} │ paid {}",
            payment.charge_date,
            payment.amount,
            payment.next_charge_date,
            payment.paid_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}
