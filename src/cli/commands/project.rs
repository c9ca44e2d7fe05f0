use anyhow::Result;

use super::{print_json, Command};
use crate::config::DeployConfig;
use crate::deployment::ProjectResolver;

pub struct ProjectCommand {
    resolver: ProjectResolver,
}

impl ProjectCommand {
    pub fn new(config: &DeployConfig) -> Self {
        Self {
            resolver: ProjectResolver::new(config.vercel.project_root.clone()),
        }
    }
}

impl Command for ProjectCommand {
    async fn execute(&self) -> Result<bool> {
        let info = self.resolver.resolve();
        print_json(&info)?;
        Ok(info.is_configured())
    }
}
