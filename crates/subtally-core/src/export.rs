//! CSV export of subscriptions

use std::io::Write;

use crate::error::Result;
use crate::models::Subscription;

const HEADER: [&str; 11] = [
    "id",
    "name",
    "value",
    "recurrence",
    "category",
    "first_charge_date",
    "next_charge_date",
    "active",
    "paid",
    "payment_method",
    "notes",
];

/// Write subscriptions as CSV, one row each, in the order given
pub fn export_subscriptions_csv<W: Write>(subscriptions: &[Subscription], writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(HEADER)?;

    for sub in subscriptions {
        out.write_record([
            sub.id.to_string(),
            sub.name.clone(),
            sub.value.to_string(),
            sub.recurrence.as_str().to_string(),
            sub.category.as_str().to_string(),
            sub.first_charge_date.to_string(),
            sub.next_charge_date.to_string(),
            sub.is_active.to_string(),
            sub.is_paid.to_string(),
            sub.payment_method.clone().unwrap_or_default(),
            sub.notes.clone().unwrap_or_default(),
        ])?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Recurrence};
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn sub(id: i64, name: &str, notes: Option<&str>) -> Subscription {
        let now = Utc::now();
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        Subscription {
            id,
            owner: "alice".to_string(),
            name: name.to_string(),
            value: Decimal::new(5590, 2),
            recurrence: Recurrence::Monthly,
            first_charge_date: date,
            next_charge_date: date,
            category: Category::Streaming,
            payment_method: None,
            notes: notes.map(String::from),
            is_active: true,
            is_paid: false,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_export_subscriptions_csv() {
        let subs = vec![
            sub(1, "Netflix", None),
            sub(2, "Disney, Plus", Some("shared \"family\" plan")),
        ];

        let mut buf = Vec::new();
        export_subscriptions_csv(&subs, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "id,name,value,recurrence,category,first_charge_date,next_charge_date,active,paid,payment_method,notes"
        );
        assert_eq!(
            lines[1],
            "1,Netflix,55.90,monthly,streaming,2024-03-10,2024-03-10,true,false,,"
        );
        // Fields with commas and quotes are escaped
        assert!(lines[2].contains("\"Disney, Plus\""));
        assert!(lines[2].contains("\"shared \"\"family\"\" plan\""));
    }

    #[test]
    fn test_export_empty_writes_header_only() {
        let mut buf = Vec::new();
        export_subscriptions_csv(&[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
    }
}
