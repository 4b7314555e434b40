//! Spending goal operations

use std::collections::HashMap;

use rusqlite::params;
use rust_decimal::Decimal;
use tracing::debug;

use super::{parse_decimal, Database};
use crate::error::{Error, Result};
use crate::models::{validate_owner, Category, SpendingGoal};

impl Database {
    /// Goals for every category in display order
    ///
    /// Categories without a stored goal come back with a zero limit.
    pub fn list_goals(&self, owner: &str) -> Result<Vec<SpendingGoal>> {
        validate_owner(owner)?;
        let conn = self.conn()?;

        let mut stmt =
            conn.prepare("SELECT category, monthly_limit FROM spending_goals WHERE owner = ?")?;
        let rows = stmt
            .query_map(params![owner], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut stored = HashMap::new();
        for (category, limit) in rows {
            let category: Category = category.parse().map_err(Error::Validation)?;
            stored.insert(category, parse_decimal(&limit)?);
        }

        Ok(Category::ALL
            .iter()
            .map(|&category| SpendingGoal {
                category,
                monthly_limit: stored.get(&category).copied().unwrap_or(Decimal::ZERO),
            })
            .collect())
    }

    /// Replace the owner's whole goal set
    pub fn save_goals(&self, owner: &str, goals: &[SpendingGoal]) -> Result<()> {
        validate_owner(owner)?;
        for goal in goals {
            SpendingGoal::new(goal.category, goal.monthly_limit)?;
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM spending_goals WHERE owner = ?", params![owner])?;
        for goal in goals {
            tx.execute(
                "INSERT OR REPLACE INTO spending_goals (owner, category, monthly_limit) VALUES (?, ?, ?)",
                params![owner, goal.category.as_str(), goal.monthly_limit.to_string()],
            )?;
        }
        tx.commit()?;

        debug!("Saved {} goals for {}", goals.len(), owner);
        Ok(())
    }

    /// Set the goal of a single category, leaving the others untouched
    pub fn set_goal(&self, owner: &str, goal: SpendingGoal) -> Result<()> {
        validate_owner(owner)?;
        SpendingGoal::new(goal.category, goal.monthly_limit)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO spending_goals (owner, category, monthly_limit) VALUES (?, ?, ?)
            ON CONFLICT(owner, category) DO UPDATE SET
                monthly_limit = excluded.monthly_limit,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![owner, goal.category.as_str(), goal.monthly_limit.to_string()],
        )?;
        Ok(())
    }

    /// Remove every goal of the owner
    pub fn reset_goals(&self, owner: &str) -> Result<usize> {
        validate_owner(owner)?;
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM spending_goals WHERE owner = ?", params![owner])?;
        debug!("Reset {} goals for {}", removed, owner);
        Ok(removed)
    }
}
