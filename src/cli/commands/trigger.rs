use anyhow::Result;

use super::{process_monitor, report, Command};
use crate::config::DeployConfig;

pub struct TriggerCommand {
    config: DeployConfig,
}

impl TriggerCommand {
    pub fn new(config: DeployConfig) -> Self {
        Self { config }
    }
}

impl Command for TriggerCommand {
    async fn execute(&self) -> Result<bool> {
        let result = process_monitor(&self.config).trigger_deployment().await;
        report(&result)
    }
}
