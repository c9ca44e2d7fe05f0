// Deployment tracking - project lookup, deployment location and status polling

pub mod errors;
pub mod locator;
pub mod monitor;
pub mod project;
pub mod status;
pub mod types;

pub use errors::DeploymentError;
pub use locator::DeploymentLocator;
pub use monitor::{DeploymentMonitor, MISSING_URL_WARNING};
pub use project::ProjectResolver;
pub use status::{normalize_status, normalize_url};
pub use types::{DeploymentMeta, DeploymentRecord, DeploymentResult, DeploymentStatus, ProjectInfo};
