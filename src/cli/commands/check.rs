use anyhow::Result;

use super::{process_monitor, report, Command};
use crate::config::DeployConfig;

pub struct CheckCommand {
    pub branch: String,
    pub timeout_seconds: u64,
    config: DeployConfig,
}

impl CheckCommand {
    pub fn new(branch: String, config: DeployConfig) -> Self {
        Self {
            branch,
            timeout_seconds: config.polling.timeout_seconds,
            config,
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        if let Some(timeout_seconds) = timeout_seconds {
            self.timeout_seconds = timeout_seconds;
        }
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Option<u64>) -> Self {
        if let Some(poll_interval) = poll_interval {
            self.config.polling.interval_seconds = poll_interval;
        }
        self
    }
}

impl Command for CheckCommand {
    async fn execute(&self) -> Result<bool> {
        let result = process_monitor(&self.config)
            .check_deployment_for_branch(&self.branch, self.timeout_seconds)
            .await;
        report(&result)
    }
}
