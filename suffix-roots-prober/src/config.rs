use crate::error::{ProbeError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 3;
pub const DEFAULT_MAX_WORKERS: usize = 16;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

/// Tunables for a probe run.
///
/// Every field has a default, so a config file only needs the keys it
/// wants to override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Deadline applied to each individual HTTP request.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Number of domains probed concurrently.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_workers: default_max_workers(),
            user_agent: default_user_agent(),
        }
    }
}

impl ProbeConfig {
    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(ProbeError::InvalidConfig(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.max_workers == 0 {
            return Err(ProbeError::InvalidConfig(
                "max_workers must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
