//! Configuration types.

use std::path::PathBuf;

use crate::client::http::SessionTokens;
use crate::error::ConfigError;
use crate::triage::model::{Filter, MAX_DAY_WINDOW};

/// Phrases used when `BLUEPRINT_SUBJECT_PHRASES` is unset.
pub const DEFAULT_SUBJECT_PHRASES: &[&str] = &["Action Required", "Action Requested"];

const DEFAULT_DAY_WINDOW: u32 = 7;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for a daily-rolling log file, if any.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Assign panel configuration.
#[derive(Debug, Clone)]
pub struct AssignConfig {
    /// Dashboard server root, e.g. `https://blueprint.example.com`.
    pub base_url: String,
    /// Session cookies from sign-in.
    pub tokens: SessionTokens,
    /// Initial triage filter.
    pub filter: Filter,
    pub logging: LoggingConfig,
}

impl AssignConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("BLUEPRINT_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("BLUEPRINT_BASE_URL".into()))?;

        let tokens = SessionTokens::new(
            lookup("BLUEPRINT_ID_TOKEN").unwrap_or_default(),
            lookup("BLUEPRINT_ACCESS_TOKEN").unwrap_or_default(),
        );

        let phrases: Vec<String> = match lookup("BLUEPRINT_SUBJECT_PHRASES") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_SUBJECT_PHRASES.iter().map(|s| s.to_string()).collect(),
        };

        let unread_only = match lookup("BLUEPRINT_UNREAD_ONLY") {
            Some(raw) => raw.trim().parse::<bool>().map_err(|_| ConfigError::InvalidValue {
                key: "BLUEPRINT_UNREAD_ONLY".into(),
                message: format!("expected true or false, got {raw:?}"),
            })?,
            None => false,
        };

        let day_window = match lookup("BLUEPRINT_N_DAYS") {
            Some(raw) => parse_day_window(&raw)?,
            None => DEFAULT_DAY_WINDOW,
        };

        let filter = Filter::new(phrases, unread_only, day_window)?;

        let logging = LoggingConfig {
            level: lookup("BLUEPRINT_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_dir: lookup("BLUEPRINT_LOG_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        };

        Ok(Self {
            base_url: base_url.trim().to_string(),
            tokens,
            filter,
            logging,
        })
    }
}

fn parse_day_window(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: "BLUEPRINT_N_DAYS".into(),
        message,
    };
    let days: u32 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(format!("expected a whole number, got {raw:?}")))?;
    if !(1..=MAX_DAY_WINDOW).contains(&days) {
        return Err(invalid(format!("must be between 1 and {MAX_DAY_WINDOW}")));
    }
    Ok(days)
}
