use std::{env, time::Duration};

use crate::location::WriteMode;

/// Sync layer configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Quiet period before a search edit is committed (default: 2000)
    pub search_debounce_ms: u64,
    /// Age after which cached data is refetched (default: 180)
    pub stale_after_secs: u64,
    /// Idle time after which an unobserved entry is collected (default: 300)
    pub gc_idle_secs: u64,
    /// Automatic retries after a failed fetch (default: 1)
    pub retry_count: u32,
    /// Period of the background sweeper (default: 60)
    pub sweep_interval_secs: u64,
    /// History mode for filter writes (default: push)
    pub write_mode: WriteMode,
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SUSHI_SEARCH_DEBOUNCE_MS` - Search debounce in milliseconds (default: 2000)
    /// - `SUSHI_STALE_AFTER_SECS` - Staleness window in seconds (default: 180)
    /// - `SUSHI_GC_IDLE_SECS` - Idle collection window in seconds (default: 300)
    /// - `SUSHI_RETRY_COUNT` - Retries after a failed fetch (default: 1)
    /// - `SUSHI_SWEEP_INTERVAL_SECS` - Sweeper period in seconds (default: 60)
    /// - `SUSHI_HISTORY_MODE` - `push` or `replace` (default: push)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |name: &str| lookup(name).and_then(|v| v.trim().parse().ok());

        Self {
            search_debounce_ms: parsed("SUSHI_SEARCH_DEBOUNCE_MS")
                .unwrap_or(defaults.search_debounce_ms),
            stale_after_secs: parsed("SUSHI_STALE_AFTER_SECS").unwrap_or(defaults.stale_after_secs),
            gc_idle_secs: parsed("SUSHI_GC_IDLE_SECS").unwrap_or(defaults.gc_idle_secs),
            retry_count: lookup("SUSHI_RETRY_COUNT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.retry_count),
            sweep_interval_secs: parsed("SUSHI_SWEEP_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.sweep_interval_secs),
            write_mode: lookup("SUSHI_HISTORY_MODE")
                .and_then(|v| WriteMode::from_name(v.trim()))
                .unwrap_or(defaults.write_mode),
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    pub fn gc_idle(&self) -> Duration {
        Duration::from_secs(self.gc_idle_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 2_000,
            stale_after_secs: 180,
            gc_idle_secs: 300,
            retry_count: 1,
            sweep_interval_secs: 60,
            write_mode: WriteMode::Push,
        }
    }
}
