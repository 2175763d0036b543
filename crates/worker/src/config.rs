//! Worker configuration loaded from environment variables.

use std::time::Duration;

use agence_core::seo::{
    DEFAULT_DATA_LAG_DAYS, DEFAULT_IMPORT_MAX_PER_RUN, DEFAULT_IMPORT_MIN_IMPRESSIONS,
    DEFAULT_KEYWORD_STALE_DAYS, DEFAULT_LOOKBACK_DAYS, DEFAULT_POSITION_RETENTION_DAYS,
    DEFAULT_ROW_LIMIT,
};
use agence_core::sync::DEFAULT_MAX_AGE_HOURS;
use agence_google::GoogleConfig;

use crate::error::WorkerError;

/// Default pause between two scheduler passes.
pub const DEFAULT_INTERVAL_SECS: u64 = 3600;

/// Log output format, from `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Tuning of the SEO and review syncs.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSettings {
    /// A sync younger than this is skipped unless forced.
    pub max_age: chrono::Duration,
    pub lookback_days: u64,
    pub data_lag_days: u64,
    pub row_limit: u32,
    pub import_min_impressions: u32,
    pub import_max_per_run: usize,
    pub position_retention_days: u64,
    pub keyword_stale_days: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            max_age: chrono::Duration::hours(DEFAULT_MAX_AGE_HOURS),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            data_lag_days: DEFAULT_DATA_LAG_DAYS,
            row_limit: DEFAULT_ROW_LIMIT,
            import_min_impressions: DEFAULT_IMPORT_MIN_IMPRESSIONS,
            import_max_per_run: DEFAULT_IMPORT_MAX_PER_RUN,
            position_retention_days: DEFAULT_POSITION_RETENTION_DAYS,
            keyword_stale_days: DEFAULT_KEYWORD_STALE_DAYS,
        }
    }
}

/// Everything the worker binary needs.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    /// Pause between scheduler passes.
    pub interval: Duration,
    pub log_format: LogFormat,
    pub sync: SyncSettings,
    pub google: GoogleConfig,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default |
    /// |-------------------------------|---------|
    /// | `DATABASE_URL`                | required |
    /// | `WORKER_INTERVAL_SECS`        | `3600`  |
    /// | `LOG_FORMAT`                  | `text`  |
    /// | `SEO_SYNC_MAX_AGE_HOURS`      | `12`    |
    /// | `GSC_LOOKBACK_DAYS`           | `28`    |
    /// | `GSC_DATA_LAG_DAYS`           | `3`     |
    /// | `GSC_ROW_LIMIT`               | `1000`  |
    /// | `SEO_IMPORT_MIN_IMPRESSIONS`  | `10`    |
    /// | `SEO_IMPORT_MAX_PER_RUN`      | `20`    |
    /// | `SEO_POSITION_RETENTION_DAYS` | `365`   |
    /// | `SEO_KEYWORD_STALE_DAYS`      | `90`    |
    ///
    /// Google settings are read by [`GoogleConfig::from_env`].
    pub fn from_env() -> Result<Self, WorkerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, WorkerError> {
        let vars = Vars(&lookup);

        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| WorkerError::Config("DATABASE_URL must be set".to_string()))?;

        let log_format = match vars.get("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(WorkerError::Config(format!(
                    "LOG_FORMAT must be 'text' or 'json' (got '{other}')"
                )))
            }
        };

        let defaults = SyncSettings::default();
        let max_age_hours: i64 = vars.parse_or("SEO_SYNC_MAX_AGE_HOURS", DEFAULT_MAX_AGE_HOURS)?;
        let sync = SyncSettings {
            max_age: chrono::Duration::hours(max_age_hours),
            lookback_days: vars.parse_or("GSC_LOOKBACK_DAYS", defaults.lookback_days)?,
            data_lag_days: vars.parse_or("GSC_DATA_LAG_DAYS", defaults.data_lag_days)?,
            row_limit: vars.parse_or("GSC_ROW_LIMIT", defaults.row_limit)?,
            import_min_impressions: vars
                .parse_or("SEO_IMPORT_MIN_IMPRESSIONS", defaults.import_min_impressions)?,
            import_max_per_run: vars
                .parse_or("SEO_IMPORT_MAX_PER_RUN", defaults.import_max_per_run)?,
            position_retention_days: vars
                .parse_or("SEO_POSITION_RETENTION_DAYS", defaults.position_retention_days)?,
            keyword_stale_days: vars
                .parse_or("SEO_KEYWORD_STALE_DAYS", defaults.keyword_stale_days)?,
        };
        if sync.lookback_days == 0 {
            return Err(WorkerError::Config(
                "GSC_LOOKBACK_DAYS must be at least 1".to_string(),
            ));
        }

        let interval_secs: u64 = vars.parse_or("WORKER_INTERVAL_SECS", DEFAULT_INTERVAL_SECS)?;
        if interval_secs == 0 {
            return Err(WorkerError::Config(
                "WORKER_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            interval: Duration::from_secs(interval_secs),
            log_format,
            sync,
            google: GoogleConfig::from_lookup(&lookup),
        })
    }
}

/// Blank-aware variable access.
struct Vars<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_or<T: std::str::FromStr>(&self, name: &str, default: T) -> Result<T, WorkerError> {
        match self.get(name) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| {
                WorkerError::Config(format!("{name} must be a valid number (got '{raw}')"))
            }),
        }
    }
}
