//! Export command implementations

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use subtally_core::export::export_subscriptions_csv;
use subtally_core::models::ActivityFilter;

use super::Session;

/// Export all of the owner's subscriptions, active and inactive, to CSV
pub fn cmd_export(session: &Session, output: &Path) -> Result<()> {
    let subs = session
        .db
        .list_subscriptions(&session.owner, ActivityFilter::All)?;

    let file = File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    export_subscriptions_csv(&subs, BufWriter::new(file)).context("Failed to write CSV")?;

    println!(
        "✅ Exported {} subscriptions to {}",
        subs.len(),
        output.display()
    );
    Ok(())
}
