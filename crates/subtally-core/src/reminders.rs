//! Payment reminders
//!
//! Builds the `{name, next charge date, value}` tuples the notification
//! side consumes. Delivery and scheduling happen elsewhere.

use chrono::{Duration, NaiveDate};

use crate::models::{Reminder, Subscription};

/// Days before a charge that a reminder fires
pub const DEFAULT_LEAD_DAYS: i64 = 3;

/// Reminders still to fire after `today`, earliest first
///
/// A reminder fires `lead_days` before the subscription's next charge. Ones
/// whose firing day is today or already past are dropped.
pub fn upcoming_reminders(
    subscriptions: &[Subscription],
    today: NaiveDate,
    lead_days: i64,
) -> Vec<Reminder> {
    let lead = Duration::days(lead_days.max(0));

    let mut reminders: Vec<Reminder> = subscriptions
        .iter()
        .filter(|s| s.is_active)
        .filter_map(|s| {
            let remind_on = s.next_charge_date.checked_sub_signed(lead)?;
            if remind_on <= today {
                return None;
            }
            Some(Reminder {
                subscription_id: s.id,
                subscription_name: s.name.clone(),
                next_charge_date: s.next_charge_date,
                value: s.value,
                remind_on,
                days_until: (s.next_charge_date - remind_on).num_days(),
            })
        })
        .collect();

    reminders.sort_by_key(|r| (r.remind_on, r.subscription_id));
    reminders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Recurrence};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sub(id: i64, name: &str, next: NaiveDate, active: bool) -> Subscription {
        let now = Utc::now();
        Subscription {
            id,
            owner: "alice".to_string(),
            name: name.to_string(),
            value: Decimal::new(3990, 2),
            recurrence: Recurrence::Monthly,
            first_charge_date: next,
            next_charge_date: next,
            category: Category::Streaming,
            payment_method: None,
            notes: None,
            is_active: active,
            is_paid: false,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_reminders_fire_lead_days_before_charge() {
        let subs = vec![
            sub(1, "Netflix", date(2024, 5, 20), true),
            sub(2, "Spotify", date(2024, 5, 10), true),
        ];
        let reminders = upcoming_reminders(&subs, date(2024, 5, 1), DEFAULT_LEAD_DAYS);

        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].subscription_name, "Spotify");
        assert_eq!(reminders[0].remind_on, date(2024, 5, 7));
        assert_eq!(reminders[0].days_until, 3);
        assert_eq!(reminders[1].remind_on, date(2024, 5, 17));
    }

    #[test]
    fn test_reminders_skip_past_and_inactive() {
        let subs = vec![
            // Reminder day is today
            sub(1, "Due soon", date(2024, 5, 4), true),
            // Reminder day already passed
            sub(2, "Overdue", date(2024, 4, 30), true),
            sub(3, "Cancelled", date(2024, 6, 1), false),
            sub(4, "Later", date(2024, 5, 5), true),
        ];
        let reminders = upcoming_reminders(&subs, date(2024, 5, 1), 3);
        let ids: Vec<i64> = reminders.iter().map(|r| r.subscription_id).collect();
        assert_eq!(ids, vec![4]);
    }

    #[test]
    fn test_reminders_empty_input() {
        assert!(upcoming_reminders(&[], date(2024, 5, 1), 3).is_empty());
    }
}
