// adw-vercel Library - Vercel deployment tracking for ADW workflows
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod deployment;
pub mod external;
pub mod observability;
pub mod telemetry;

// Re-export key types for easy access
pub use config::DeployConfig;
pub use deployment::{
    DeploymentError, DeploymentLocator, DeploymentMonitor, DeploymentRecord, DeploymentResult,
    DeploymentStatus, ProjectInfo, ProjectResolver,
};
pub use external::{CommandExecutor, ProcessCommandExecutor, VercelCli, VercelError};
pub use observability::{OperationTimer, PollMetrics};
pub use telemetry::{create_deployment_span, generate_correlation_id, init_telemetry};
