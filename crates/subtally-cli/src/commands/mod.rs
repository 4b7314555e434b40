//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init command and shared utilities (open_db)
//! - `export` - CSV export
//! - `goals` - Spending goal commands (list, set, reset, progress)
//! - `reminders` - Reminder and notification history commands
//! - `reports` - Summary, projection, upcoming and yearly reports
//! - `subscriptions` - Subscription management and payment commands

pub mod core;
pub mod export;
pub mod goals;
pub mod reminders;
pub mod reports;
pub mod subscriptions;

// Re-export command functions for main.rs
pub use core::*;
pub use export::*;
pub use goals::*;
pub use reminders::*;
pub use reports::*;
pub use subscriptions::*;

use anyhow::Result;
use serde::Serialize;
use subtally_core::config::Config;
use subtally_core::db::Database;

/// Everything a command needs besides its own arguments
pub struct Session {
    pub db: Database,
    pub owner: String,
    pub config: Config,
    /// Print JSON instead of tables
    pub json: bool,
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
