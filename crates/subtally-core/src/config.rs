//! Configuration for reports, reminders and goal tracking
//!
//! Config is loaded from TOML. Lookup order:
//! 1. Explicit path (`--config`)
//! 2. `~/.local/share/subtally/config.toml` (platform data dir)
//! 3. Built-in defaults
//!
//! Example:
//! ```toml
//! [reports]
//! upcoming_count = 3
//!
//! [reminders]
//! lead_days = 3
//! retention_days = 5
//!
//! [goals]
//! basis = "raw"   # or "monthly_equivalent"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::aggregation::DEFAULT_UPCOMING_COUNT;
use crate::error::{Error, Result};
use crate::models::GoalBasis;
use crate::reminders::DEFAULT_LEAD_DAYS;

/// Days a logged notification is kept
pub const DEFAULT_RETENTION_DAYS: i64 = 5;

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Entries shown by the upcoming-payments report
    pub upcoming_count: usize,
    /// Days before a charge that a reminder fires
    pub reminder_lead_days: i64,
    /// Days notification history is retained
    pub notification_retention_days: i64,
    /// How category expense is compared against monthly goals
    pub goal_basis: GoalBasis,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upcoming_count: DEFAULT_UPCOMING_COUNT,
            reminder_lead_days: DEFAULT_LEAD_DAYS,
            notification_retention_days: DEFAULT_RETENTION_DAYS,
            goal_basis: GoalBasis::Raw,
        }
    }
}

impl Config {
    /// Load config from an explicit path, the default location, or defaults
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(default_path) if default_path.exists() => Self::from_file(&default_path),
            _ => Ok(Self::default()),
        }
    }

    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        debug!("Loaded config from {}", path.display());
        Self::parse(&content)
    }

    /// Parse config from TOML content, filling unset keys with defaults
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(reports) = raw.reports {
            if let Some(count) = reports.upcoming_count {
                config.upcoming_count = count;
            }
        }

        if let Some(reminders) = raw.reminders {
            if let Some(lead) = reminders.lead_days {
                if lead < 0 {
                    return Err(Error::Config(format!(
                        "reminders.lead_days must not be negative, got {}",
                        lead
                    )));
                }
                config.reminder_lead_days = lead;
            }
            if let Some(days) = reminders.retention_days {
                if days <= 0 {
                    return Err(Error::Config(format!(
                        "reminders.retention_days must be positive, got {}",
                        days
                    )));
                }
                config.notification_retention_days = days;
            }
        }

        if let Some(goals) = raw.goals {
            if let Some(basis) = goals.basis {
                config.goal_basis = basis;
            }
        }

        Ok(config)
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("subtally").join("config.toml"))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    reports: Option<RawReports>,
    reminders: Option<RawReminders>,
    goals: Option<RawGoals>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReports {
    upcoming_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReminders {
    lead_days: Option<i64>,
    retention_days: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGoals {
    basis: Option<GoalBasis>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.upcoming_count, 3);
        assert_eq!(config.reminder_lead_days, 3);
        assert_eq!(config.notification_retention_days, 5);
        assert_eq!(config.goal_basis, GoalBasis::Raw);
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            [reports]
            upcoming_count = 5

            [reminders]
            lead_days = 7
            retention_days = 10

            [goals]
            basis = "monthly_equivalent"
            "#,
        )
        .unwrap();

        assert_eq!(config.upcoming_count, 5);
        assert_eq!(config.reminder_lead_days, 7);
        assert_eq!(config.notification_retention_days, 10);
        assert_eq!(config.goal_basis, GoalBasis::MonthlyEquivalent);
    }

    #[test]
    fn test_parse_partial_config() {
        let config = Config::parse("[goals]\nbasis = \"raw\"\n").unwrap();
        assert_eq!(config.upcoming_count, DEFAULT_UPCOMING_COUNT);
        assert_eq!(config.goal_basis, GoalBasis::Raw);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(matches!(
            Config::parse("[goals]\nbasis = \"weekly\"\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::parse("[reminders]\nlead_days = -1\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::parse("[reminders]\nretention_days = 0\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::parse("[unknown]\nkey = 1\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(Config::parse("not toml ["), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[reports]\nupcoming_count = 8").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.upcoming_count, 8);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(Error::Config(_))
        ));
    }
}
