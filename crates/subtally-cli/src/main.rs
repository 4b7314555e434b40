//! Subtally CLI - Subscription expense tracker
//!
//! Usage:
//!   subtally init                                  Initialize database
//!   subtally add Netflix --value 55.90 --first-charge 2024-03-10 -c streaming
//!   subtally pay 1                                 Register a payment
//!   subtally summary | projection | progress       Reports

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use subtally_core::config::Config;
use subtally_core::models::{ActivityFilter, SubscriptionUpdate};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::Session;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    if let Commands::Init = cli.command {
        return commands::cmd_init(&cli.db, cli.no_encrypt);
    }

    let config = Config::load(cli.config.as_deref())?;
    let db = commands::open_db(&cli.db, cli.no_encrypt)?;
    let session = Session {
        db,
        owner: cli.owner,
        config,
        json: cli.json,
    };

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Add {
            name,
            value,
            recurrence,
            first_charge,
            category,
            payment_method,
            notes,
        } => commands::cmd_add(
            &session,
            subtally_core::models::NewSubscription {
                name,
                value,
                recurrence,
                first_charge_date: first_charge,
                category,
                payment_method,
                notes,
            },
        ),
        Commands::List { inactive, all } => {
            let filter = if all {
                ActivityFilter::All
            } else if inactive {
                ActivityFilter::Inactive
            } else {
                ActivityFilter::Active
            };
            commands::cmd_list(&session, filter)
        }
        Commands::Show { id } => commands::cmd_show(&session, id),
        Commands::Edit {
            id,
            name,
            value,
            recurrence,
            category,
            first_charge,
            next_charge,
            payment_method,
            clear_payment_method,
            notes,
            clear_notes,
            paid,
        } => {
            let update = SubscriptionUpdate {
                name,
                value,
                recurrence,
                first_charge_date: first_charge,
                next_charge_date: next_charge,
                category,
                payment_method: if clear_payment_method {
                    Some(None)
                } else {
                    payment_method.map(Some)
                },
                notes: if clear_notes {
                    Some(None)
                } else {
                    notes.map(Some)
                },
                is_paid: paid,
            };
            commands::cmd_edit(&session, id, &update)
        }
        Commands::Pay { id } => commands::cmd_pay(&session, id),
        Commands::Deactivate { id } => commands::cmd_deactivate(&session, id),
        Commands::Reactivate { id } => commands::cmd_reactivate(&session, id),
        Commands::Delete { id } => commands::cmd_delete(&session, id),
        Commands::Payments { id } => commands::cmd_payments(&session, id),
        Commands::Summary => commands::cmd_summary(&session),
        Commands::Projection => commands::cmd_projection(&session),
        Commands::Upcoming { from, limit } => commands::cmd_upcoming(&session, from, limit),
        Commands::Goals { action } => match action {
            None => commands::cmd_goals_list(&session),
            Some(GoalsAction::Set { category, limit }) => {
                commands::cmd_goals_set(&session, category, limit)
            }
            Some(GoalsAction::Reset) => commands::cmd_goals_reset(&session),
        },
        Commands::Progress => commands::cmd_progress(&session),
        Commands::Report { report_type } => match report_type {
            ReportType::Year { year } => commands::cmd_report_year(&session, year),
        },
        Commands::Reminders { today, log } => commands::cmd_reminders(&session, today, log),
        Commands::Notifications => commands::cmd_notifications(&session),
        Commands::Export { output } => commands::cmd_export(&session, &output),
    }
}
