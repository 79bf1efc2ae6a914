//! Configuration for the sync session.

use std::time::Duration;
use syncbridge_protocol::RecordCategory;

/// Configuration for a sync session.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Protocol api version reported to the bridge.
    pub api_version: String,
    /// Sync server URL.
    pub server_url: String,
    /// Whether the bridge runs in debug mode.
    pub debug: bool,
    /// Interval between periodic fetches once ready.
    pub fetch_interval: Duration,
    /// Categories fetched by default.
    pub fetch_categories: Vec<RecordCategory>,
    /// How many times a deferred outbound call checks for readiness.
    pub ready_attempts: u32,
    /// Delay between readiness checks.
    pub ready_retry_delay: Duration,
}

impl SyncConfig {
    /// Creates a configuration for the given server.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            api_version: "0".into(),
            server_url: server_url.into(),
            debug: false,
            fetch_interval: Duration::from_secs(20),
            fetch_categories: vec![RecordCategory::Bookmarks],
            ready_attempts: 15,
            ready_retry_delay: Duration::from_secs(3),
        }
    }

    /// Sets the reported api version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Enables or disables bridge debug mode.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the periodic fetch interval.
    pub fn with_fetch_interval(mut self, interval: Duration) -> Self {
        self.fetch_interval = interval;
        self
    }

    /// Sets the categories fetched by default.
    pub fn with_fetch_categories(mut self, categories: Vec<RecordCategory>) -> Self {
        self.fetch_categories = categories;
        self
    }

    /// Sets the readiness retry budget.
    pub fn with_ready_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.ready_attempts = attempts;
        self.ready_retry_delay = delay;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new("")
    }
}
