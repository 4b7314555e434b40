//! Spend aggregation over a set of subscriptions
//!
//! Every function here folds only the active subscriptions of its input and
//! never fails: empty input yields zero totals and empty lists.
//!
//! Raw totals (`summarize_by_category`) add values of different periods
//! together as-is. Normalized figures (`monthly_projection`,
//! `annual_projection`) convert each value to a common period first. The two
//! are different numbers and are reported separately.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{
    Category, CategorySummary, CategoryTotal, GoalBasis, GoalState, GoalStatus, MonthTotal,
    SpendingGoal, Subscription, YearlyReport,
};
use crate::recurrence::{annual_equivalent, charges_between, monthly_equivalent, round_money};

/// Progress ratio from which a category is reported as near its limit (0.8)
pub const WARNING_THRESHOLD: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

/// Default number of entries returned by `upcoming_payments`
pub const DEFAULT_UPCOMING_COUNT: usize = 3;

fn active(subscriptions: &[Subscription]) -> impl Iterator<Item = &Subscription> {
    subscriptions.iter().filter(|s| s.is_active)
}

/// Sum that stops at `Decimal::MAX` instead of overflowing
fn sum_money(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Raw spend per category plus the grand total
pub fn summarize_by_category(subscriptions: &[Subscription]) -> CategorySummary {
    let mut groups: BTreeMap<Category, (Decimal, i64)> = BTreeMap::new();

    for sub in active(subscriptions) {
        let entry = groups.entry(sub.category).or_insert((Decimal::ZERO, 0));
        entry.0 = entry.0.saturating_add(sub.value);
        entry.1 += 1;
    }

    let by_category: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, (total_value, count))| CategoryTotal {
            category,
            total_value,
            count,
        })
        .collect();

    let total_general = sum_money(by_category.iter().map(|c| c.total_value));

    CategorySummary {
        total_general,
        by_category,
    }
}

/// Expected monthly spend: sum of monthly equivalents, rounded to minor units
pub fn monthly_projection(subscriptions: &[Subscription]) -> Decimal {
    let total = sum_money(
        active(subscriptions).map(|s| monthly_equivalent(s.value, s.recurrence)),
    );
    round_money(total)
}

/// Expected yearly spend: sum of annual equivalents
pub fn annual_projection(subscriptions: &[Subscription]) -> Decimal {
    let total = sum_money(
        active(subscriptions).map(|s| annual_equivalent(s.value, s.recurrence)),
    );
    round_money(total)
}

/// Goal-vs-actual status per category
///
/// A category is reported when it has a non-zero goal or a non-zero expense.
/// Results follow category order. Only an expense strictly above the limit is
/// `Exceeded`; an expense equal to the limit is `NearLimit`. With `GoalBasis::Raw` the expense is the
/// sum of raw values, so an annual charge counts in full against a monthly
/// goal; `GoalBasis::MonthlyEquivalent` normalizes it first.
pub fn goal_progress(
    subscriptions: &[Subscription],
    goals: &[SpendingGoal],
    basis: GoalBasis,
) -> Vec<GoalStatus> {
    let mut expenses: HashMap<Category, Decimal> = HashMap::new();
    for sub in active(subscriptions) {
        let amount = match basis {
            GoalBasis::Raw => sub.value,
            GoalBasis::MonthlyEquivalent => monthly_equivalent(sub.value, sub.recurrence),
        };
        let expense = expenses.entry(sub.category).or_insert(Decimal::ZERO);
        *expense = expense.saturating_add(amount);
    }

    let limits: HashMap<Category, Decimal> = goals
        .iter()
        .map(|g| (g.category, g.monthly_limit))
        .collect();

    Category::ALL
        .iter()
        .filter_map(|&category| {
            let expense = round_money(expenses.get(&category).copied().unwrap_or_default());
            let limit = limits.get(&category).copied().unwrap_or_default();

            if limit.is_zero() && expense.is_zero() {
                return None;
            }

            let progress = if limit.is_zero() {
                Decimal::ZERO
            } else {
                expense
                    .checked_div(limit)
                    .map(|ratio| ratio.round_dp(4))
                    .unwrap_or(Decimal::MAX)
            };

            Some(GoalStatus {
                category,
                expense,
                monthly_limit: limit,
                progress,
                status: classify(expense, limit),
            })
        })
        .collect()
}

fn classify(expense: Decimal, limit: Decimal) -> GoalState {
    if limit.is_zero() {
        if expense > Decimal::ZERO {
            GoalState::GoalNotSet
        } else {
            GoalState::WithinGoal
        }
    } else if expense > limit {
        GoalState::Exceeded
    } else if expense >= limit.saturating_mul(WARNING_THRESHOLD) {
        GoalState::NearLimit
    } else {
        GoalState::WithinGoal
    }
}

/// Next charges due from `window_start`, earliest first, at most `max_count`
///
/// Dates from the day before `window_start` are kept so a charge due "today"
/// is not lost when the window start carries a later time of day.
pub fn upcoming_payments(
    subscriptions: &[Subscription],
    window_start: NaiveDate,
    max_count: usize,
) -> Vec<Subscription> {
    let cutoff = window_start.pred_opt().unwrap_or(window_start);

    let mut upcoming: Vec<Subscription> = active(subscriptions)
        .filter(|s| s.next_charge_date >= cutoff)
        .cloned()
        .collect();

    upcoming.sort_by_key(|s| (s.next_charge_date, s.id));
    upcoming.truncate(max_count);
    upcoming
}

/// Projected charges per calendar month of `year`
///
/// Each subscription's schedule is anchored at its first charge date.
pub fn yearly_breakdown(subscriptions: &[Subscription], year: i32) -> YearlyReport {
    let mut totals = [Decimal::ZERO; 12];
    let mut counts = [0i64; 12];

    if let (Some(from), Some(to)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) {
        for sub in active(subscriptions) {
            for charge in charges_between(sub.first_charge_date, sub.recurrence, from, to) {
                let idx = charge.month0() as usize;
                totals[idx] = totals[idx].saturating_add(sub.value);
                counts[idx] += 1;
            }
        }
    }

    let months: Vec<MonthTotal> = totals
        .iter()
        .zip(counts.iter())
        .enumerate()
        .map(|(i, (total, count))| MonthTotal {
            month: i as u32 + 1,
            total: round_money(*total),
            charge_count: *count,
        })
        .collect();

    let total = sum_money(months.iter().map(|m| m.total));

    YearlyReport {
        year,
        months,
        total,
    }
}
