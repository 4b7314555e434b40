//! Subtally Core Library
//!
//! Shared functionality for the Subtally subscription tracker:
//! - Domain models (subscriptions, goals, payments, notifications)
//! - Recurrence engine for billing-cycle calendar arithmetic
//! - Aggregation engine for category summaries, projections and goal tracking
//! - Payment reminders
//! - Database access and migrations
//! - CSV export

pub mod aggregation;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod recurrence;
pub mod reminders;

pub use aggregation::{
    annual_projection, goal_progress, monthly_projection, summarize_by_category,
    upcoming_payments, yearly_breakdown,
};
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use export::export_subscriptions_csv;
pub use recurrence::{advance, annual_equivalent, monthly_equivalent, round_money};
pub use reminders::upcoming_reminders;
