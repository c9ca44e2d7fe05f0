use anyhow::Result;

use super::{process_monitor, report, Command};
use crate::config::DeployConfig;
use crate::deployment::normalize_url;

pub struct WaitCommand {
    pub url: String,
    pub timeout_seconds: u64,
    pub poll_interval_seconds: u64,
    config: DeployConfig,
}

impl WaitCommand {
    pub fn new(url: &str, config: DeployConfig) -> Self {
        Self {
            url: normalize_url(url),
            timeout_seconds: config.polling.timeout_seconds,
            poll_interval_seconds: config.polling.interval_seconds,
            config,
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds.unwrap_or(self.timeout_seconds);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Option<u64>) -> Self {
        self.poll_interval_seconds = poll_interval.unwrap_or(self.poll_interval_seconds);
        self
    }
}

impl Command for WaitCommand {
    async fn execute(&self) -> Result<bool> {
        let result = process_monitor(&self.config)
            .wait_for_deployment(&self.url, self.timeout_seconds, self.poll_interval_seconds)
            .await;
        report(&result)
    }
}
