//! Subscription operations

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use super::{parse_date, parse_datetime, parse_decimal, Database};
use crate::error::{Error, Result};
use crate::models::{
    validate_owner, validate_value, ActivityFilter, NewSubscription, Payment, Subscription,
    SubscriptionUpdate,
};
use crate::recurrence;

const SUBSCRIPTION_COLUMNS: &str = r#"
    id, owner, name, value, recurrence, first_charge_date, next_charge_date, category,
    payment_method, notes, is_active, is_paid, version, created_at, updated_at
"#;

/// Raw column values, converted to a `Subscription` outside the row closure
/// so malformed enum or amount values surface as validation errors
struct SubscriptionRow {
    id: i64,
    owner: String,
    name: String,
    value: String,
    recurrence: String,
    first_charge_date: String,
    next_charge_date: String,
    category: String,
    payment_method: Option<String>,
    notes: Option<String>,
    is_active: bool,
    is_paid: bool,
    version: i64,
    created_at: String,
    updated_at: String,
}

impl SubscriptionRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner: row.get(1)?,
            name: row.get(2)?,
            value: row.get(3)?,
            recurrence: row.get(4)?,
            first_charge_date: row.get(5)?,
            next_charge_date: row.get(6)?,
            category: row.get(7)?,
            payment_method: row.get(8)?,
            notes: row.get(9)?,
            is_active: row.get(10)?,
            is_paid: row.get(11)?,
            version: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        })
    }
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = Error;

    fn try_from(row: SubscriptionRow) -> Result<Self> {
        let value = parse_decimal(&row.value)?;
        validate_value(value)?;

        Ok(Subscription {
            id: row.id,
            owner: row.owner,
            name: row.name,
            value,
            recurrence: row.recurrence.parse().map_err(Error::Validation)?,
            first_charge_date: parse_date(&row.first_charge_date)?,
            next_charge_date: parse_date(&row.next_charge_date)?,
            category: row.category.parse().map_err(Error::Validation)?,
            payment_method: row.payment_method,
            notes: row.notes,
            is_active: row.is_active,
            is_paid: row.is_paid,
            version: row.version,
            created_at: parse_datetime(&row.created_at),
            updated_at: parse_datetime(&row.updated_at),
        })
    }
}

fn fetch_subscription(conn: &Connection, id: i64, owner: &str) -> Result<Subscription> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {} FROM subscriptions WHERE id = ? AND owner = ?",
                SUBSCRIPTION_COLUMNS
            ),
            params![id, owner],
            SubscriptionRow::from_row,
        )
        .optional()?;

    match row {
        Some(row) => row.try_into(),
        None => Err(Error::NotFound(format!("subscription {}", id))),
    }
}

fn not_found_unless_changed(changed: usize, id: i64) -> Result<()> {
    if changed == 0 {
        return Err(Error::NotFound(format!("subscription {}", id)));
    }
    Ok(())
}

impl Database {
    /// Create a subscription for an owner
    ///
    /// New subscriptions start active and unpaid, with the next charge on the
    /// first charge date.
    pub fn create_subscription(&self, owner: &str, new: &NewSubscription) -> Result<Subscription> {
        validate_owner(owner)?;
        new.validate()?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO subscriptions (
                owner, name, value, recurrence, first_charge_date, next_charge_date,
                category, payment_method, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                owner,
                new.name.trim(),
                new.value.to_string(),
                new.recurrence.as_str(),
                new.first_charge_date.to_string(),
                new.first_charge_date.to_string(),
                new.category.as_str(),
                new.payment_method,
                new.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Created subscription {} ({})", id, new.name.trim());
        fetch_subscription(&conn, id, owner)
    }

    /// List an owner's subscriptions, soonest charge first
    pub fn list_subscriptions(
        &self,
        owner: &str,
        filter: ActivityFilter,
    ) -> Result<Vec<Subscription>> {
        validate_owner(owner)?;
        let conn = self.conn()?;

        let condition = match filter {
            ActivityFilter::Active => "AND is_active = 1",
            ActivityFilter::Inactive => "AND is_active = 0",
            ActivityFilter::All => "",
        };

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM subscriptions WHERE owner = ? {} ORDER BY next_charge_date ASC, id ASC",
            SUBSCRIPTION_COLUMNS, condition
        ))?;

        let rows = stmt
            .query_map(params![owner], SubscriptionRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    /// Get one of an owner's subscriptions
    ///
    /// Returns `NotFound` if the id does not exist or belongs to another owner.
    pub fn get_subscription(&self, id: i64, owner: &str) -> Result<Subscription> {
        validate_owner(owner)?;
        let conn = self.conn()?;
        fetch_subscription(&conn, id, owner)
    }

    /// Apply a user edit to a subscription
    pub fn update_subscription(
        &self,
        id: i64,
        owner: &str,
        update: &SubscriptionUpdate,
    ) -> Result<Subscription> {
        validate_owner(owner)?;
        let conn = self.conn()?;

        let mut sub = fetch_subscription(&conn, id, owner)?;
        if update.is_empty() {
            return Ok(sub);
        }
        update.apply_to(&mut sub)?;

        let changed = conn.execute(
            r#"
            UPDATE subscriptions
            SET name = ?, value = ?, recurrence = ?, first_charge_date = ?, next_charge_date = ?,
                category = ?, payment_method = ?, notes = ?, is_paid = ?,
                version = version + 1, updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND owner = ? AND version = ?
            "#,
            params![
                sub.name,
                sub.value.to_string(),
                sub.recurrence.as_str(),
                sub.first_charge_date.to_string(),
                sub.next_charge_date.to_string(),
                sub.category.as_str(),
                sub.payment_method,
                sub.notes,
                sub.is_paid,
                id,
                owner,
                sub.version,
            ],
        )?;

        if changed == 0 {
            return Err(Error::ConcurrencyConflict(format!(
                "subscription {} was modified during the edit",
                id
            )));
        }

        fetch_subscription(&conn, id, owner)
    }

    /// Register a payment: advance the next charge by one cycle and mark it paid
    ///
    /// The advance is a conditional update on the row version, so two
    /// concurrent payments cannot both advance from the same date. A lost
    /// race is retried once before `ConcurrencyConflict` is returned.
    pub fn register_payment(&self, id: i64, owner: &str) -> Result<Subscription> {
        self.register_payment_with(id, owner, |_| {})
    }

    /// `register_payment` with a hook run between reading the row and the
    /// version-checked write of each attempt
    pub(crate) fn register_payment_with<F>(
        &self,
        id: i64,
        owner: &str,
        mut after_read: F,
    ) -> Result<Subscription>
    where
        F: FnMut(&Subscription),
    {
        validate_owner(owner)?;

        let mut attempt = 0;
        loop {
            let current = self.get_subscription(id, owner)?;
            after_read(&current);
            match self.advance_payment(&current) {
                Err(Error::ConcurrencyConflict(msg)) if attempt == 0 => {
                    warn!("Payment for subscription {} raced: {}; retrying", id, msg);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Advance a subscription from the state in `current`
    ///
    /// Fails with `ConcurrencyConflict` when the stored row no longer has
    /// `current.version`.
    pub(crate) fn advance_payment(&self, current: &Subscription) -> Result<Subscription> {
        if !current.is_active {
            return Err(Error::Validation(format!(
                "subscription {} is inactive",
                current.id
            )));
        }

        let next = recurrence::advance(current.next_charge_date, current.recurrence)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let changed = tx.execute(
            r#"
            UPDATE subscriptions
            SET next_charge_date = ?, is_paid = 1, version = version + 1,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND owner = ? AND version = ?
            "#,
            params![
                next.to_string(),
                current.id,
                current.owner,
                current.version
            ],
        )?;

        if changed == 0 {
            return Err(Error::ConcurrencyConflict(format!(
                "subscription {} changed since version {}",
                current.id, current.version
            )));
        }

        tx.execute(
            r#"
            INSERT INTO payments (subscription_id, owner, charge_date, amount, next_charge_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                current.id,
                current.owner,
                current.next_charge_date.to_string(),
                current.value.to_string(),
                next.to_string(),
            ],
        )?;

        let updated = fetch_subscription(&tx, current.id, &current.owner)?;
        tx.commit()?;

        info!(
            "Payment registered for subscription {}: {} -> {}",
            current.id, current.next_charge_date, next
        );
        Ok(updated)
    }

    /// Soft delete: exclude from aggregation but keep the record and its history
    pub fn deactivate_subscription(&self, id: i64, owner: &str) -> Result<()> {
        self.set_active(id, owner, false)
    }

    /// Bring a deactivated subscription back into aggregation
    pub fn reactivate_subscription(&self, id: i64, owner: &str) -> Result<()> {
        self.set_active(id, owner, true)
    }

    fn set_active(&self, id: i64, owner: &str, active: bool) -> Result<()> {
        validate_owner(owner)?;
        let conn = self.conn()?;
        let changed = conn.execute(
            r#"
            UPDATE subscriptions
            SET is_active = ?, version = version + 1, updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND owner = ?
            "#,
            params![active, id, owner],
        )?;
        not_found_unless_changed(changed, id)?;

        debug!("Subscription {} active = {}", id, active);
        Ok(())
    }

    /// Permanently remove an inactive subscription and its payment history
    ///
    /// Active subscriptions must be deactivated first.
    pub fn delete_subscription(&self, id: i64, owner: &str) -> Result<()> {
        validate_owner(owner)?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let sub = fetch_subscription(&tx, id, owner)?;
        if sub.is_active {
            return Err(Error::Validation(format!(
                "subscription {} is active; deactivate it before deleting",
                id
            )));
        }

        tx.execute(
            "DELETE FROM payments WHERE subscription_id = ? AND owner = ?",
            params![id, owner],
        )?;
        let changed = tx.execute(
            "DELETE FROM subscriptions WHERE id = ? AND owner = ?",
            params![id, owner],
        )?;
        not_found_unless_changed(changed, id)?;
        tx.commit()?;

        info!("Deleted subscription {} ({})", id, sub.name);
        Ok(())
    }

    /// Payment history of a subscription, most recent first
    pub fn list_payments(&self, subscription_id: i64, owner: &str) -> Result<Vec<Payment>> {
        validate_owner(owner)?;
        let conn = self.conn()?;
        // Ownership check doubles as the existence check
        fetch_subscription(&conn, subscription_id, owner)?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, subscription_id, charge_date, amount, next_charge_date, paid_at
            FROM payments
            WHERE subscription_id = ? AND owner = ?
            ORDER BY charge_date DESC, id DESC
            "#,
        )?;

        let rows = stmt
            .query_map(params![subscription_id, owner], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, subscription_id, charge_date, amount, next, paid_at)| {
                Ok(Payment {
                    id,
                    subscription_id,
                    charge_date: parse_date(&charge_date)?,
                    amount: parse_decimal(&amount)?,
                    next_charge_date: parse_date(&next)?,
                    paid_at: parse_datetime(&paid_at),
                })
            })
            .collect()
    }
}
