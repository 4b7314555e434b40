//! Report command implementations

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use subtally_core::aggregation;
use subtally_core::models::ActivityFilter;

use super::{print_json, truncate, Session};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Normalized spend in both periods
#[derive(Debug, Serialize)]
pub struct ProjectionReport {
    pub monthly: rust_decimal::Decimal,
    pub annual: rust_decimal::Decimal,
    pub active_count: usize,
}

pub fn cmd_summary(session: &Session) -> Result<()> {
    let subs = session
        .db
        .list_subscriptions(&session.owner, ActivityFilter::Active)?;
    let summary = aggregation::summarize_by_category(&subs);

    if session.json {
        return print_json(&summary);
    }

    println!();
    println!("📊 Spending by Category");
    println!("   ─────────────────────────────────────────────");

    if summary.by_category.is_empty() {
        println!("   No active subscriptions.");
        return Ok(());
    }

    println!("   {:15} │ {:>10} │ {:>5}", "Category", "Amount", "Count");
    println!("   ────────────────┼────────────┼───────");
    for row in &summary.by_category {
        println!(
            "   {:15} │ {:>10.2} │ {:>5}",
            row.category.label(),
            row.total_value,
            row.count
        );
    }
    println!("   ────────────────┼────────────┼───────");
    println!("   {:15} │ {:>10.2} │", "Total", summary.total_general);
    println!();
    println!("   Values are summed as charged; see 'subtally projection' for monthly figures.");

    Ok(())
}

pub fn cmd_projection(session: &Session) -> Result<()> {
    let subs = session
        .db
        .list_subscriptions(&session.owner, ActivityFilter::Active)?;

    let report = ProjectionReport {
        monthly: aggregation::monthly_projection(&subs),
        annual: aggregation::annual_projection(&subs),
        active_count: subs.len(),
    };

    if session.json {
        return print_json(&report);
    }

    println!();
    println!("📈 Spending Projection");
    println!("   ─────────────────────────────");
    println!("   Active subscriptions: {}", report.active_count);
    println!("   Monthly:              {:.2}", report.monthly);
    println!("   Annual:               {:.2}", report.annual);

    Ok(())
}

pub fn cmd_upcoming(
    session: &Session,
    from: Option<NaiveDate>,
    limit: Option<usize>,
) -> Result<()> {
    let subs = session
        .db
        .list_subscriptions(&session.owner, ActivityFilter::Active)?;
    let window_start = from.unwrap_or_else(|| Utc::now().date_naive());
    let limit = limit.unwrap_or(session.config.upcoming_count);

    let upcoming = aggregation::upcoming_payments(&subs, window_start, limit);

    if session.json {
        return print_json(&upcoming);
    }

    println!();
    println!("📅 Upcoming Payments (from {})", window_start);
    println!("   ─────────────────────────────────────────────");

    if upcoming.is_empty() {
        println!("   Nothing due.");
        return Ok(());
    }

    for sub in &upcoming {
        println!(
            "   {} │ {:20} │ {:>9.2} │ {}",
            sub.next_charge_date,
            truncate(&sub.name, 20),
            sub.value,
            sub.category.label()
        );
    }

    Ok(())
}

pub fn cmd_report_year(session: &Session, year: Option<i32>) -> Result<()> {
    let subs = session
        .db
        .list_subscriptions(&session.owner, ActivityFilter::Active)?;
    let year = year.unwrap_or_else(|| Utc::now().year());

    let report = aggregation::yearly_breakdown(&subs, year);

    if session.json {
        return print_json(&report);
    }

    println!();
    println!("🗓️  Projected Charges for {}", year);
    println!("   ─────────────────────────────");
    for (month, name) in report.months.iter().zip(MONTH_NAMES.iter()) {
        println!(
            "   {} │ {:>10.2} │ {:>3} charges",
            name, month.total, month.charge_count
        );
    }
    println!("   ─────────────────────────────");
    println!("   Total {:>10.2}", report.total);

    Ok(())
}
