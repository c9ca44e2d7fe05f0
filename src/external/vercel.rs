//! Vercel CLI abstraction
//!
//! Wraps the three `vercel` invocations the crate needs behind one helper that
//! runs the command with a bounded timeout, parses its stdout as JSON and, when
//! that fails, hands the raw text to an operation-specific fallback.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::command::{CommandError, CommandExecutor};
use crate::config::DeployConfig;
use crate::deployment::status::{extract_url_from_output, normalize_status, normalize_url};
use crate::deployment::types::{DeploymentRecord, DeploymentStatus};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VercelError {
    #[error("vercel {operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: &'static str,
        timeout_secs: u64,
    },
    #[error("vercel {operation} exited with status {status_code}: {stderr}")]
    NonZeroExit {
        operation: &'static str,
        status_code: i32,
        stderr: String,
    },
    #[error("failed to parse vercel {operation} output: {message}")]
    Parse {
        operation: &'static str,
        message: String,
    },
    #[error("vercel {operation} could not run: {source}")]
    Command {
        operation: &'static str,
        source: CommandError,
    },
}

impl VercelError {
    /// Short tag used in log fields to tell failure kinds apart.
    pub fn kind(&self) -> &'static str {
        match self {
            VercelError::Timeout { .. } => "timeout",
            VercelError::NonZeroExit { .. } => "non_zero_exit",
            VercelError::Parse { .. } => "parse_error",
            VercelError::Command { .. } => "spawn_failure",
        }
    }
}

/// Payload of `vercel --prod --json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeployPayload {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Result of a production deploy once its output has been interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub url: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListPayload {
    Bare(Vec<serde_json::Value>),
    Wrapped { deployments: Vec<serde_json::Value> },
}

impl ListPayload {
    /// Convert entries one by one so a single odd record cannot hide the rest.
    fn into_records(self) -> Vec<DeploymentRecord> {
        let entries = match self {
            ListPayload::Bare(entries) => entries,
            ListPayload::Wrapped { deployments } => deployments,
        };
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                serde_json::from_value::<DeploymentRecord>(entry)
                    .map_err(|e| {
                        warn!(index = index, error = %e, "Skipping unreadable deployment record")
                    })
                    .ok()
            })
            .collect()
    }
}

/// Runs `vercel` subcommands through an injected executor
#[derive(Clone)]
pub struct VercelCli {
    executor: Arc<dyn CommandExecutor>,
    binary: String,
    project_root: PathBuf,
    list_limit: u32,
    list_timeout: Duration,
    inspect_timeout: Duration,
    deploy_timeout: Duration,
    token_present: bool,
}

impl VercelCli {
    pub fn new(executor: Arc<dyn CommandExecutor>, config: &DeployConfig) -> Self {
        Self {
            executor,
            binary: config.vercel.binary.clone(),
            project_root: config.vercel.project_root.clone(),
            list_limit: config.vercel.list_limit,
            list_timeout: config.timeouts.list(),
            inspect_timeout: config.timeouts.inspect(),
            deploy_timeout: config.timeouts.deploy(),
            token_present: config.vercel.token.is_some(),
        }
    }

    pub fn token_present(&self) -> bool {
        self.token_present
    }

    fn warn_if_token_missing(&self, operation: &'static str) {
        if !self.token_present {
            warn!(
                operation = operation,
                "VERCEL_TOKEN is not set; relying on the CLI's stored credentials"
            );
        }
    }

    /// Run a subcommand and interpret its stdout.
    ///
    /// `structured` maps a successfully parsed JSON payload; `fallback` gets the
    /// raw stdout when JSON parsing fails and returns `None` if it cannot help
    /// either, which becomes `VercelError::Parse`.
    pub async fn invoke_parsed<P, T, S, F>(
        &self,
        operation: &'static str,
        args: &[&str],
        timeout: Duration,
        structured: S,
        fallback: F,
    ) -> Result<T, VercelError>
    where
        P: DeserializeOwned,
        S: FnOnce(P) -> T,
        F: FnOnce(&str) -> Option<T>,
    {
        debug!(
            program = %self.binary,
            args = ?args,
            timeout_secs = timeout.as_secs(),
            "Running vercel command"
        );

        let output = self
            .executor
            .execute(&self.binary, args, Some(self.project_root.as_path()), timeout)
            .await
            .map_err(|source| match source {
                CommandError::Timeout { .. } => VercelError::Timeout {
                    operation,
                    timeout_secs: timeout.as_secs(),
                },
                source => VercelError::Command { operation, source },
            })?;

        if !output.success() {
            return Err(VercelError::NonZeroExit {
                operation,
                status_code: output.status_code,
                stderr: output.stderr,
            });
        }

        match serde_json::from_str::<P>(&output.stdout) {
            Ok(payload) => Ok(structured(payload)),
            Err(parse_error) => {
                debug!(
                    operation = operation,
                    error = %parse_error,
                    "vercel output is not structured, trying text fallback"
                );
                fallback(&output.stdout).ok_or_else(|| VercelError::Parse {
                    operation,
                    message: parse_error.to_string(),
                })
            }
        }
    }

    /// `vercel list --json --limit N`, newest first.
    pub async fn list_deployments(&self) -> Result<Vec<DeploymentRecord>, VercelError> {
        self.warn_if_token_missing("list");
        let limit = self.list_limit.to_string();
        self.invoke_parsed(
            "list",
            &["list", "--json", "--limit", limit.as_str()],
            self.list_timeout,
            ListPayload::into_records,
            |_| None,
        )
        .await
    }

    /// `vercel inspect <url> --json`, normalized to a status.
    pub async fn inspect_status(&self, deployment_url: &str) -> Result<DeploymentStatus, VercelError> {
        self.invoke_parsed(
            "inspect",
            &["inspect", deployment_url, "--json"],
            self.inspect_timeout,
            |payload: serde_json::Value| normalize_status(&payload.to_string()),
            |raw| Some(normalize_status(raw)),
        )
        .await
    }

    /// `vercel --prod --json` from the project root.
    ///
    /// A deploy that succeeded but printed nothing recognizable yields an
    /// outcome with no URL rather than an error.
    pub async fn deploy_production(&self) -> Result<DeployOutcome, VercelError> {
        self.warn_if_token_missing("deploy");
        self.invoke_parsed(
            "deploy",
            &["--prod", "--json"],
            self.deploy_timeout,
            |payload: DeployPayload| DeployOutcome {
                url: payload
                    .url
                    .filter(|url| !url.trim().is_empty())
                    .map(|url| normalize_url(&url)),
                id: payload.id,
            },
            |raw| {
                Some(DeployOutcome {
                    url: extract_url_from_output(raw),
                    id: None,
                })
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::command::CommandOutput;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// Replays one canned response and records what was run
    struct CannedExecutor {
        response: Result<CommandOutput, CommandError>,
        calls: Mutex<Vec<(String, Vec<String>, Option<PathBuf>, Duration)>>,
    }

    impl CannedExecutor {
        fn stdout(stdout: &str) -> Arc<Self> {
            Self::with(Ok(CommandOutput {
                status_code: 0,
                stdout: stdout.to_string(),
                stderr: String::new(),
            }))
        }

        fn with(response: Result<CommandOutput, CommandError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CommandExecutor for CannedExecutor {
        async fn execute(
            &self,
            program: &str,
            args: &[&str],
            cwd: Option<&Path>,
            timeout: Duration,
        ) -> Result<CommandOutput, CommandError> {
            self.calls.lock().unwrap().push((
                program.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
                cwd.map(Path::to_path_buf),
                timeout,
            ));
            self.response.clone()
        }
    }

    fn cli(executor: Arc<CannedExecutor>) -> VercelCli {
        let config = DeployConfig::default().with_project_root("/srv/app");
        VercelCli::new(executor, &config)
    }

    #[tokio::test]
    async fn test_list_runs_with_limit_timeout_and_project_root() {
        let executor = CannedExecutor::stdout(r#"[{"uid": "dpl_1", "url": "a.vercel.app"}]"#);
        let records = cli(executor.clone()).list_deployments().await.unwrap();

        assert_eq!(records.len(), 1);
        let calls = executor.calls.lock().unwrap();
        let (program, args, cwd, timeout) = &calls[0];
        assert_eq!(program, "vercel");
        assert_eq!(args, &["list", "--json", "--limit", "5"]);
        assert_eq!(cwd.as_deref(), Some(Path::new("/srv/app")));
        assert_eq!(*timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_list_accepts_wrapped_payload() {
        let executor = CannedExecutor::stdout(
            r#"{"deployments": [{"uid": "dpl_1"}, {"uid": "dpl_2"}], "pagination": {}}"#,
        );
        let records = cli(executor).list_deployments().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].uid.as_deref(), Some("dpl_2"));
    }

    #[tokio::test]
    async fn test_list_skips_unreadable_entries() {
        let executor = CannedExecutor::stdout(
            r#"[{"uid": "dpl_1", "alias": null}, {"uid": 42, "meta": "broken"}, {"uid": "dpl_3"}]"#,
        );
        let records = cli(executor).list_deployments().await.unwrap();

        let uids: Vec<_> = records.iter().map(|r| r.uid.as_deref()).collect();
        assert_eq!(uids, vec![Some("dpl_1"), Some("dpl_3")]);
    }

    #[tokio::test]
    async fn test_list_malformed_output_is_parse_error() {
        let executor = CannedExecutor::stdout("Vercel CLI 33.0.0\n> No deployments");
        let err = cli(executor).list_deployments().await.unwrap_err();
        assert_eq!(err.kind(), "parse_error");
    }

    #[tokio::test]
    async fn test_timeout_is_reported_with_call_budget() {
        let executor = CannedExecutor::with(Err(CommandError::Timeout { timeout_ms: 30_000 }));
        let err = cli(executor).inspect_status("https://a.vercel.app").await.unwrap_err();
        assert_eq!(
            err,
            VercelError::Timeout {
                operation: "inspect",
                timeout_secs: 30
            }
        );
    }

    #[tokio::test]
    async fn test_inspect_uses_text_fallback() {
        let executor = CannedExecutor::stdout("status\t● Ready\nstate READY");
        let status = cli(executor).inspect_status("https://a.vercel.app").await.unwrap();
        assert_eq!(status, DeploymentStatus::Ready);
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr() {
        let executor = CannedExecutor::with(Ok(CommandOutput {
            status_code: 1,
            stdout: String::new(),
            stderr: "Error: The specified token is not valid".to_string(),
        }));
        let err = cli(executor).deploy_production().await.unwrap_err();
        assert_eq!(
            err,
            VercelError::NonZeroExit {
                operation: "deploy",
                status_code: 1,
                stderr: "Error: The specified token is not valid".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_deploy_normalizes_structured_url() {
        let executor = CannedExecutor::stdout(r#"{"id": "dpl_9", "url": "app-9.vercel.app"}"#);
        let outcome = cli(executor.clone()).deploy_production().await.unwrap();
        assert_eq!(outcome.url.as_deref(), Some("https://app-9.vercel.app"));
        assert_eq!(outcome.id.as_deref(), Some("dpl_9"));

        let calls = executor.calls.lock().unwrap();
        assert_eq!(calls[0].1, vec!["--prod", "--json"]);
        assert_eq!(calls[0].3, Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_deploy_without_recognizable_output_has_no_url() {
        let executor = CannedExecutor::stdout("Deployment complete");
        let outcome = cli(executor).deploy_production().await.unwrap();
        assert_eq!(outcome, DeployOutcome { url: None, id: None });
    }
}
