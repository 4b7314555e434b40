//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use subtally_core::models::{Category, Recurrence};

/// Subtally - Track what your subscriptions really cost
#[derive(Parser)]
#[command(name = "subtally")]
#[command(about = "Subscription expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "subtally.db", global = true)]
    pub db: PathBuf,

    /// Owner whose subscriptions are read and written
    #[arg(long, default_value = "default", global = true)]
    pub owner: String,

    /// Config file (defaults to the platform data dir, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SUBTALLY_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Add a subscription
    Add {
        /// Display name
        name: String,

        /// Charge per billing cycle
        #[arg(long)]
        value: Decimal,

        /// Billing period: monthly, quarterly, semiannual, annual
        #[arg(short, long, default_value = "monthly")]
        recurrence: Recurrence,

        /// First charge date (YYYY-MM-DD)
        #[arg(long)]
        first_charge: NaiveDate,

        /// Category: streaming, music, software, education, other
        #[arg(short, long, default_value = "other")]
        category: Category,

        /// Payment method (e.g. "credit card")
        #[arg(long)]
        payment_method: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// List subscriptions (active only by default)
    List {
        /// Show only deactivated subscriptions
        #[arg(long, conflicts_with = "all")]
        inactive: bool,

        /// Show active and deactivated subscriptions
        #[arg(long)]
        all: bool,
    },

    /// Show one subscription
    Show {
        /// Subscription ID
        id: i64,
    },

    /// Edit a subscription
    Edit {
        /// Subscription ID
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        value: Option<Decimal>,

        #[arg(short, long)]
        recurrence: Option<Recurrence>,

        #[arg(short, long)]
        category: Option<Category>,

        #[arg(long)]
        first_charge: Option<NaiveDate>,

        /// Override the next charge date
        #[arg(long)]
        next_charge: Option<NaiveDate>,

        #[arg(long, conflicts_with = "clear_payment_method")]
        payment_method: Option<String>,

        #[arg(long)]
        clear_payment_method: bool,

        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,

        #[arg(long)]
        clear_notes: bool,

        /// Set the paid flag (true/false)
        #[arg(long)]
        paid: Option<bool>,
    },

    /// Register a payment and advance the next charge date by one cycle
    Pay {
        /// Subscription ID
        id: i64,
    },

    /// Deactivate a subscription (kept, but excluded from reports)
    Deactivate {
        /// Subscription ID
        id: i64,
    },

    /// Reactivate a deactivated subscription
    Reactivate {
        /// Subscription ID
        id: i64,
    },

    /// Permanently delete a deactivated subscription and its payment history
    Delete {
        /// Subscription ID
        id: i64,
    },

    /// Show the payment history of a subscription
    Payments {
        /// Subscription ID
        id: i64,
    },

    /// Raw spend per category
    Summary,

    /// Normalized monthly and annual spend
    Projection,

    /// Next charges due
    Upcoming {
        /// Window start (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Maximum entries (defaults to config reports.upcoming_count)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show or manage monthly spending goals
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Goal progress per category
    Progress,

    /// Generate reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Reminders still to fire
    Reminders {
        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Record each reminder in the notification history
        #[arg(long)]
        log: bool,
    },

    /// Show the notification history
    Notifications,

    /// Export subscriptions to CSV
    Export {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// Set the monthly limit of a category (0 removes it)
    Set {
        /// Category: streaming, music, software, education, other
        category: Category,

        /// Monthly limit
        limit: Decimal,
    },

    /// Remove all goals
    Reset,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Projected charges per month of a calendar year
    Year {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },
}
