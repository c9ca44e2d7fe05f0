use tracing::{debug, info, warn};

use super::errors::DeploymentError;
use super::types::DeploymentRecord;
use crate::external::{VercelCli, VercelError};

/// Picks a deployment out of the most recent `vercel list` page
///
/// Matching is exact-or-nothing: when a branch has no deployment the locator
/// returns `None` and leaves any fallback to the caller.
#[derive(Clone)]
pub struct DeploymentLocator {
    cli: VercelCli,
}

impl DeploymentLocator {
    pub fn new(cli: VercelCli) -> Self {
        Self { cli }
    }

    /// Recent deployments, newest first.
    pub async fn fetch_recent(&self) -> Result<Vec<DeploymentRecord>, VercelError> {
        self.cli.list_deployments().await
    }

    pub async fn find_latest(
        &self,
        project_id: &str,
        branch: Option<&str>,
    ) -> Option<DeploymentRecord> {
        let deployments = match self.fetch_recent().await {
            Ok(deployments) => deployments,
            Err(e) => {
                let failure = DeploymentError::LocatorFailure {
                    reason: e.to_string(),
                };
                warn!(
                    project.id = project_id,
                    failure.kind = e.kind(),
                    error = %failure,
                    "Could not list deployments"
                );
                return None;
            }
        };

        debug!(
            project.id = project_id,
            count = deployments.len(),
            "Fetched recent deployments"
        );

        let found = select_deployment(deployments, branch);
        match (&found, branch) {
            (None, Some(branch)) => {
                info!(project.id = project_id, branch = branch, "No deployment matches branch")
            }
            (None, None) => info!(project.id = project_id, "Project has no deployments"),
            (Some(record), _) => debug!(
                project.id = project_id,
                deployment.uid = record.uid.as_deref(),
                "Located deployment"
            ),
        }
        found
    }
}

/// First record whose git ref equals `branch`, or the newest when unfiltered.
pub fn select_deployment(
    deployments: Vec<DeploymentRecord>,
    branch: Option<&str>,
) -> Option<DeploymentRecord> {
    match branch {
        Some(branch) => deployments
            .into_iter()
            .find(|record| record.branch() == Some(branch)),
        None => deployments.into_iter().next(),
    }
}
