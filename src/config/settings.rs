use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::models::RetentionPolicy;

pub const DEFAULT_KEEP_RUNS: usize = 5;
pub const DEFAULT_KEEP_DAYS: u64 = 30;
pub const DEFAULT_SNIPPET_LIMIT: usize = 3;
// 2 MiB
pub const DEFAULT_MAX_FILE_BYTES: u64 = 2 * 1024 * 1024;

pub const ENV_KEEP_RUNS: &str = "KEEP_RUNS";
pub const ENV_KEEP_DAYS: &str = "KEEP_DAYS";
pub const ENV_SNIPPET_LIMIT: &str = "RESEARCH_SNIPPET_LIMIT";
pub const ENV_MAX_FILE_BYTES: &str = "RESEARCH_MAX_FILE_BYTES";

/// Thresholds shared by all commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub keep_runs: usize,
    pub keep_days: u64,
    pub snippet_limit: usize,
    pub max_file_bytes: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keep_runs: DEFAULT_KEEP_RUNS,
            keep_days: DEFAULT_KEEP_DAYS,
            snippet_limit: DEFAULT_SNIPPET_LIMIT,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub keep_runs: Option<usize>,
    pub keep_days: Option<u64>,
    pub snippet_limit: Option<usize>,
}

impl Settings {
    /// Resolve settings against the process environment
    pub fn from_env(overrides: SettingsOverrides) -> Self {
        Self::resolve(overrides, |key| env::var(key).ok())
    }

    /// Resolve each key as flag > environment variable > built-in default
    ///
    /// Environment values that do not parse (or are zero where zero makes no
    /// sense) are logged and ignored.
    pub fn resolve<F>(overrides: SettingsOverrides, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            keep_runs: overrides.keep_runs.unwrap_or_else(|| {
                env_value(&lookup, ENV_KEEP_RUNS, defaults.keep_runs, |_| true)
            }),
            keep_days: overrides.keep_days.unwrap_or_else(|| {
                env_value(&lookup, ENV_KEEP_DAYS, defaults.keep_days, |_| true)
            }),
            snippet_limit: overrides.snippet_limit.unwrap_or_else(|| {
                env_value(&lookup, ENV_SNIPPET_LIMIT, defaults.snippet_limit, |v| *v > 0)
            }),
            max_file_bytes: env_value(&lookup, ENV_MAX_FILE_BYTES, defaults.max_file_bytes, |v| {
                *v > 0
            }),
        }
    }

    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy { keep_count: self.keep_runs, keep_days: self.keep_days }
    }
}

fn env_value<T, F>(lookup: &F, key: &str, default: T, accept: fn(&T) -> bool) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return default;
    }

    match raw.parse::<T>() {
        Ok(value) if accept(&value) => value,
        _ => {
            warn!("Ignoring invalid {}={:?}, using the default", key, raw);
            default
        }
    }
}
