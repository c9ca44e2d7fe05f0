//! Deployment status state machine
//!
//! `wait_for_deployment` polls `vercel inspect` until the deployment reaches a
//! terminal status or the caller's budget runs out. Per-call CLI timeouts are
//! independent of that budget: a slow or failing inspect is one more
//! `unknown` poll, and the overall deadline still bounds the total wait.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn, Instrument};

use super::errors::DeploymentError;
use super::locator::DeploymentLocator;
use super::project::ProjectResolver;
use super::status::normalize_url;
use super::types::{DeploymentResult, DeploymentStatus};
use crate::config::DeployConfig;
use crate::external::{CommandExecutor, VercelCli, VercelError};
use crate::observability::{OperationTimer, PollMetrics};
use crate::telemetry::{create_deployment_span, generate_correlation_id};

/// Warning attached to a successful trigger whose output had no URL.
pub const MISSING_URL_WARNING: &str = "Deployment succeeded but could not parse URL";

/// Floor for the sleep between inspect calls.
const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Watches and triggers Vercel deployments for one caller
#[derive(Clone)]
pub struct DeploymentMonitor {
    cli: VercelCli,
    resolver: ProjectResolver,
    locator: DeploymentLocator,
    poll_interval: Duration,
    metrics: Arc<PollMetrics>,
    correlation_id: String,
}

impl DeploymentMonitor {
    pub fn new(executor: Arc<dyn CommandExecutor>, config: &DeployConfig) -> Self {
        let cli = VercelCli::new(executor, config);
        Self {
            resolver: ProjectResolver::new(config.vercel.project_root.clone()),
            locator: DeploymentLocator::new(cli.clone()),
            cli,
            poll_interval: Duration::from_secs(config.polling.interval_seconds),
            metrics: Arc::new(PollMetrics::new()),
            correlation_id: generate_correlation_id(),
        }
    }

    /// Tag every span this monitor opens with the caller's correlation id.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<PollMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn metrics(&self) -> &Arc<PollMetrics> {
        &self.metrics
    }

    /// Poll `deployment_url` until it is ready, failed, canceled, or the
    /// timeout elapses.
    pub async fn wait_for_deployment(
        &self,
        deployment_url: &str,
        timeout_seconds: u64,
        poll_interval_seconds: u64,
    ) -> DeploymentResult {
        let span = create_deployment_span("wait_for_deployment", None, &self.correlation_id);
        self.poll_until_terminal(
            deployment_url,
            Duration::from_secs(timeout_seconds),
            Duration::from_secs(poll_interval_seconds),
        )
        .instrument(span)
        .await
    }

    async fn poll_until_terminal(
        &self,
        deployment_url: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> DeploymentResult {
        let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        let start = Instant::now();
        let mut last_status: Option<DeploymentStatus> = None;

        info!(deployment.url = deployment_url, "Waiting for deployment");

        while start.elapsed() < timeout {
            let status = self.observe_status(deployment_url).await;

            if last_status != Some(status) {
                info!(
                    deployment.url = deployment_url,
                    from = last_status.map(DeploymentStatus::as_str),
                    to = status.as_str(),
                    "Deployment status changed"
                );
                self.metrics.record_transition(last_status, status);
                last_status = Some(status);
            }

            match status {
                DeploymentStatus::Ready => {
                    info!(deployment.url = deployment_url, "Deployment ready");
                    self.metrics.log_stats();
                    return DeploymentResult::ready(Some(deployment_url.to_string()), None);
                }
                DeploymentStatus::Error => {
                    error!(deployment.url = deployment_url, "Deployment failed");
                    self.metrics.log_stats();
                    return DeploymentResult::failed(
                        status,
                        Some(deployment_url.to_string()),
                        DeploymentError::BuildFailed.to_string(),
                    );
                }
                DeploymentStatus::Canceled => {
                    warn!(deployment.url = deployment_url, "Deployment canceled");
                    self.metrics.log_stats();
                    return DeploymentResult::failed(
                        status,
                        Some(deployment_url.to_string()),
                        DeploymentError::Canceled.to_string(),
                    );
                }
                DeploymentStatus::Building
                | DeploymentStatus::Pending
                | DeploymentStatus::Unknown => {}
            }

            tokio::time::sleep(poll_interval).await;
        }

        let timeout_error = DeploymentError::Timeout {
            seconds: timeout.as_secs(),
        };
        error!(
            deployment.url = deployment_url,
            last_status = last_status.map(DeploymentStatus::as_str),
            "{timeout_error}"
        );
        self.metrics.log_stats();
        DeploymentResult::failed(
            DeploymentStatus::Pending,
            Some(deployment_url.to_string()),
            timeout_error.to_string(),
        )
    }

    /// One inspect call; failures degrade to `Unknown`.
    async fn observe_status(&self, deployment_url: &str) -> DeploymentStatus {
        self.metrics.record_poll();
        match self.cli.inspect_status(deployment_url).await {
            Ok(status) => status,
            Err(e) => {
                self.metrics.record_inspect_failure();
                let failure = DeploymentError::InspectionFailure {
                    reason: e.to_string(),
                };
                match e {
                    VercelError::Timeout { .. } => {
                        error!(failure.kind = e.kind(), error = %failure, "Inspect call timed out")
                    }
                    _ => warn!(failure.kind = e.kind(), error = %failure, "Inspect call failed"),
                }
                DeploymentStatus::Unknown
            }
        }
    }

    /// Start a production deployment and report what the CLI returned.
    ///
    /// Does not poll. A deploy whose output carries no URL is still a success,
    /// flagged with [`MISSING_URL_WARNING`].
    pub async fn trigger_deployment(&self) -> DeploymentResult {
        let span = create_deployment_span("trigger_deployment", None, &self.correlation_id);
        async {
            let timer = OperationTimer::new("trigger_deployment");
            info!("Triggering Vercel production deployment");

            let result = match self.cli.deploy_production().await {
                Ok(outcome) => match outcome.url {
                    Some(url) => {
                        info!(deployment.url = %url, deployment.id = outcome.id.as_deref(), "Deployment triggered");
                        DeploymentResult::ready(Some(url), outcome.id)
                    }
                    None => {
                        warn!(deployment.id = outcome.id.as_deref(), "{MISSING_URL_WARNING}");
                        DeploymentResult::ready_with_warning(outcome.id, MISSING_URL_WARNING)
                    }
                },
                Err(e) => {
                    error!(failure.kind = e.kind(), error = %e, "Deployment trigger failed");
                    DeploymentResult::failed(DeploymentStatus::Error, None, trigger_failure(e).to_string())
                }
            };

            timer.finish();
            result
        }
        .instrument(span)
        .await
    }

    /// Locate the deployment for `branch`, wait for it, and attach provenance.
    pub async fn check_deployment_for_branch(
        &self,
        branch: &str,
        timeout_seconds: u64,
    ) -> DeploymentResult {
        let span =
            create_deployment_span("check_deployment_for_branch", Some(branch), &self.correlation_id);
        async {
            let timer = OperationTimer::new("check_deployment_for_branch");
            let result = self.check_branch(branch, timeout_seconds).await;
            timer.finish();
            result
        }
        .instrument(span)
        .await
    }

    async fn check_branch(&self, branch: &str, timeout_seconds: u64) -> DeploymentResult {
        let project = self.resolver.resolve();
        let Some(project_id) = project.project_id else {
            let e = DeploymentError::ConfigurationMissing;
            error!(path = %self.resolver.project_file().display(), "{e}");
            return DeploymentResult::failed(DeploymentStatus::Error, None, e.to_string());
        };

        let deployment = match self.locator.find_latest(&project_id, Some(branch)).await {
            Some(deployment) => Some(deployment),
            None => {
                info!(branch = branch, "No deployment found for branch, checking latest");
                self.locator.find_latest(&project_id, None).await
            }
        };

        let Some(deployment) = deployment else {
            let e = DeploymentError::NoDeploymentFound;
            error!(project.id = %project_id, "{e}");
            return DeploymentResult::failed(DeploymentStatus::Error, None, e.to_string());
        };

        let Some(raw_url) = deployment.preferred_url() else {
            let e = DeploymentError::UnresolvableUrl;
            error!(deployment.uid = deployment.uid.as_deref(), "{e}");
            return DeploymentResult::failed(DeploymentStatus::Error, None, e.to_string());
        };
        let deployment_url = normalize_url(raw_url);

        let result = self
            .poll_until_terminal(
                &deployment_url,
                Duration::from_secs(timeout_seconds),
                self.poll_interval,
            )
            .await;

        result.with_provenance(
            deployment.uid.clone(),
            Some(branch.to_string()),
            deployment.commit_sha().map(str::to_string),
        )
    }
}

fn trigger_failure(e: VercelError) -> DeploymentError {
    let message = match e {
        VercelError::NonZeroExit { stderr, .. } => stderr,
        VercelError::Timeout { .. } => "Deployment timed out".to_string(),
        VercelError::Command { source, .. } => source.to_string(),
        VercelError::Parse { message, .. } => message,
    };
    DeploymentError::TriggerFailure { message }
}
