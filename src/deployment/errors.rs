use thiserror::Error;

/// Failure kinds surfaced in `DeploymentResult::error_message`
///
/// The `Display` text is the user-visible message; lower-level detail such as
/// the exact CLI failure stays in the logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeploymentError {
    #[error("Vercel project not configured (.vercel/project.json missing)")]
    ConfigurationMissing,
    #[error("Failed to list deployments: {reason}")]
    LocatorFailure { reason: String },
    #[error("No deployments found for this project")]
    NoDeploymentFound,
    #[error("Could not determine deployment URL")]
    UnresolvableUrl,
    #[error("Failed to inspect deployment: {reason}")]
    InspectionFailure { reason: String },
    #[error("Deployment failed")]
    BuildFailed,
    #[error("Deployment was canceled")]
    Canceled,
    #[error("Deployment timed out after {seconds} seconds")]
    Timeout { seconds: u64 },
    #[error("{message}")]
    TriggerFailure { message: String },
}
