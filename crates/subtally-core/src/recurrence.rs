//! Recurrence engine
//!
//! Calendar arithmetic for billing cycles and period normalization:
//! - `advance` moves a charge date forward by one billing cycle
//! - `monthly_equivalent` / `annual_equivalent` normalize a periodic value
//! - `charges_between` walks a charge schedule across a date window
//!
//! Month overflow policy: when the target month is shorter than the source
//! day, the date is clamped to the last day of the target month
//! (Jan 31 + 1 month = Feb 28/29). Clamping happens per step, so a chain of
//! advances keeps the clamped day (Jan 31 -> Feb 29 -> Mar 29).

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Error, Result};
use crate::models::Recurrence;

/// Digits kept after the decimal point for reported money figures
pub const MINOR_UNIT_DIGITS: u32 = 2;

/// Next charge date after `current` for the given billing period
///
/// Always strictly later than `current`. Fails only when the result would
/// fall outside the supported calendar range.
pub fn advance(current: NaiveDate, recurrence: Recurrence) -> Result<NaiveDate> {
    current
        .checked_add_months(Months::new(recurrence.months()))
        .ok_or_else(|| {
            Error::Validation(format!(
                "cannot advance {} by one {} cycle",
                current, recurrence
            ))
        })
}

/// Periodic value normalized to a monthly rate (exact, unrounded)
pub fn monthly_equivalent(value: Decimal, recurrence: Recurrence) -> Decimal {
    match recurrence {
        Recurrence::Monthly => value,
        other => value / Decimal::from(other.months()),
    }
}

/// Periodic value normalized to a yearly rate, saturating at `Decimal::MAX`
pub fn annual_equivalent(value: Decimal, recurrence: Recurrence) -> Decimal {
    value.saturating_mul(Decimal::from(12 / recurrence.months()))
}

/// Round to the currency's minor unit, halves away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MINOR_UNIT_DIGITS, RoundingStrategy::MidpointAwayFromZero)
}

/// Charge dates of the schedule starting at `anchor` that fall in `[from, to]`
///
/// The schedule is built by repeated `advance`, so it follows the same
/// clamping as registered payments.
pub fn charges_between(
    anchor: NaiveDate,
    recurrence: Recurrence,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = anchor;

    while current <= to {
        if current >= from {
            dates.push(current);
        }
        match advance(current, recurrence) {
            Ok(next) => current = next,
            Err(_) => break,
        }
    }

    dates
}
