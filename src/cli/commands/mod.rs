use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

use crate::config::DeployConfig;
use crate::deployment::{DeploymentMonitor, DeploymentResult};
use crate::external::ProcessCommandExecutor;

pub mod check;
pub mod project;
pub mod trigger;
pub mod wait;

pub use check::CheckCommand;
pub use project::ProjectCommand;
pub use trigger::TriggerCommand;
pub use wait::WaitCommand;

/// A CLI command; `Ok(true)` means the process should exit successfully.
#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<bool>;
}

/// Monitor backed by real `vercel` processes.
pub fn process_monitor(config: &DeployConfig) -> DeploymentMonitor {
    DeploymentMonitor::new(Arc::new(ProcessCommandExecutor), config)
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn report(result: &DeploymentResult) -> Result<bool> {
    print_json(result)?;
    Ok(result.success())
}
