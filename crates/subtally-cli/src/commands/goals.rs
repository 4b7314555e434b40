//! Spending goal command implementations

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use subtally_core::aggregation;
use subtally_core::models::{ActivityFilter, Category, GoalBasis, GoalState, SpendingGoal};

use super::{print_json, Session};

pub fn cmd_goals_list(session: &Session) -> Result<()> {
    let goals = session.db.list_goals(&session.owner)?;

    if session.json {
        return print_json(&goals);
    }

    println!();
    println!("🎯 Monthly Goals");
    println!("   ─────────────────────────────");
    for goal in &goals {
        if goal.monthly_limit.is_zero() {
            println!("   {:15} │ {:>10}", goal.category.label(), "-");
        } else {
            println!("   {:15} │ {:>10.2}", goal.category.label(), goal.monthly_limit);
        }
    }

    Ok(())
}

pub fn cmd_goals_set(session: &Session, category: Category, limit: Decimal) -> Result<()> {
    let goal = SpendingGoal::new(category, limit).context("Invalid goal")?;
    session.db.set_goal(&session.owner, goal)?;

    if limit.is_zero() {
        println!("✅ Goal for {} removed", category.label());
    } else {
        println!("✅ Goal for {} set to {:.2}/month", category.label(), limit);
    }
    Ok(())
}

pub fn cmd_goals_reset(session: &Session) -> Result<()> {
    let removed = session.db.reset_goals(&session.owner)?;
    println!("✅ Removed {} goals", removed);
    Ok(())
}

pub fn cmd_progress(session: &Session) -> Result<()> {
    let subs = session
        .db
        .list_subscriptions(&session.owner, ActivityFilter::Active)?;
    let goals = session.db.list_goals(&session.owner)?;
    let basis = session.config.goal_basis;

    let statuses = aggregation::goal_progress(&subs, &goals, basis);

    if session.json {
        return print_json(&statuses);
    }

    println!();
    println!("🎯 Goal Progress");
    if basis == GoalBasis::MonthlyEquivalent {
        println!("   (expenses normalized to monthly)");
    }
    println!("   ─────────────────────────────────────────────────────────────");

    if statuses.is_empty() {
        println!("   No goals or spending yet. Set one with: subtally goals set <category> <limit>");
        return Ok(());
    }

    for status in &statuses {
        let icon = match status.status {
            GoalState::WithinGoal => "✅",
            GoalState::NearLimit => "⚠️ ",
            GoalState::Exceeded => "🚨",
            GoalState::GoalNotSet => "➖",
        };
        let percent = status.progress * Decimal::ONE_HUNDRED;
        println!(
            "   {} {:15} │ {:>9.2} / {:>9.2} │ {:>6.1}% │ {}",
            icon,
            status.category.label(),
            status.expense,
            status.monthly_limit,
            percent,
            status.status
        );
    }

    Ok(())
}
