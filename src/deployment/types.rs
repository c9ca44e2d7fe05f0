use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Normalized deployment status
///
/// `Pending` is never reported by the platform; it marks a poll loop that hit
/// its deadline. `Unknown` marks a response that could not be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Building,
    Ready,
    Error,
    Canceled,
    Pending,
    Unknown,
}

impl DeploymentStatus {
    /// Statuses that end a poll loop.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DeploymentStatus::Ready | DeploymentStatus::Error | DeploymentStatus::Canceled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentStatus::Building => "building",
            DeploymentStatus::Ready => "ready",
            DeploymentStatus::Error => "error",
            DeploymentStatus::Canceled => "canceled",
            DeploymentStatus::Pending => "pending",
            DeploymentStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a deployment operation
///
/// Fields are private: the constructors are the only way to build one, which
/// keeps `success` tied to `DeploymentStatus::Ready`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentResult {
    success: bool,
    deployment_id: Option<String>,
    deployment_url: Option<String>,
    deployment_status: DeploymentStatus,
    error_message: Option<String>,
    branch: Option<String>,
    commit_sha: Option<String>,
}

impl DeploymentResult {
    /// A deployment observed in the ready state.
    pub fn ready(deployment_url: Option<String>, deployment_id: Option<String>) -> Self {
        Self {
            success: true,
            deployment_id,
            deployment_url,
            deployment_status: DeploymentStatus::Ready,
            error_message: None,
            branch: None,
            commit_sha: None,
        }
    }

    /// A successful trigger whose output carried no usable URL.
    pub fn ready_with_warning(deployment_id: Option<String>, warning: impl Into<String>) -> Self {
        Self {
            error_message: Some(warning.into()),
            ..Self::ready(None, deployment_id)
        }
    }

    /// Any non-successful outcome.
    ///
    /// A `Ready` status here would break the success invariant, so it is
    /// downgraded to `Error`.
    pub fn failed(
        status: DeploymentStatus,
        deployment_url: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        let status = match status {
            DeploymentStatus::Ready => DeploymentStatus::Error,
            other => other,
        };
        Self {
            success: false,
            deployment_id: None,
            deployment_url,
            deployment_status: status,
            error_message: Some(message.into()),
            branch: None,
            commit_sha: None,
        }
    }

    /// Copy of this result carrying the provenance of the located deployment.
    pub fn with_provenance(
        self,
        deployment_id: Option<String>,
        branch: Option<String>,
        commit_sha: Option<String>,
    ) -> Self {
        Self {
            deployment_id: deployment_id.or(self.deployment_id),
            branch,
            commit_sha,
            ..self
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn deployment_id(&self) -> Option<&str> {
        self.deployment_id.as_deref()
    }

    pub fn deployment_url(&self) -> Option<&str> {
        self.deployment_url.as_deref()
    }

    pub fn deployment_status(&self) -> DeploymentStatus {
        self.deployment_status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn commit_sha(&self) -> Option<&str> {
        self.commit_sha.as_deref()
    }
}

/// Source-control metadata Vercel attaches to git-triggered deployments
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentMeta {
    #[serde(default)]
    pub github_commit_ref: Option<String>,
    #[serde(default)]
    pub github_commit_sha: Option<String>,
}

/// One entry of `vercel list --json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub inspector_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alias: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: DeploymentMeta,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub ready_state: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
}

/// Vercel prints `null` for absent collections on some deployments.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl DeploymentRecord {
    pub fn branch(&self) -> Option<&str> {
        self.meta.github_commit_ref.as_deref()
    }

    pub fn commit_sha(&self) -> Option<&str> {
        self.meta.github_commit_sha.as_deref()
    }

    /// First usable address: direct URL, then inspector URL, then first alias.
    pub fn preferred_url(&self) -> Option<&str> {
        [self.url.as_deref(), self.inspector_url.as_deref()]
            .into_iter()
            .flatten()
            .chain(self.alias.first().map(String::as_str))
            .find(|candidate| !candidate.trim().is_empty())
    }
}

/// Identifiers linking the working tree to a Vercel project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    pub project_id: Option<String>,
    pub org_id: Option<String>,
}

impl ProjectInfo {
    pub fn is_configured(&self) -> bool {
        self.project_id.is_some()
    }
}
