//! Shared test fixtures for deployment integration tests
//!
//! `ScriptedVercel` stands in for the `vercel` binary: responses are queued
//! per subcommand (`list`, `inspect`, `deploy`) and every invocation is
//! recorded so tests can assert what was, or was not, run.

#![allow(dead_code)]

use adw_vercel::external::{CommandError, CommandExecutor, CommandOutput};
use adw_vercel::DeployConfig;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Duration,
}

impl RecordedCall {
    pub fn subcommand(&self) -> &'static str {
        subcommand_of(&self.args)
    }
}

fn subcommand_of<S: AsRef<str>>(args: &[S]) -> &'static str {
    match args.first().map(|a| a.as_ref()) {
        Some("list") => "list",
        Some("inspect") => "inspect",
        _ => "deploy",
    }
}

/// Scripted `vercel` CLI; the last queued response for a subcommand repeats
#[derive(Default)]
pub struct ScriptedVercel {
    queues: Mutex<HashMap<&'static str, VecDeque<Result<CommandOutput, CommandError>>>>,
    sticky: Mutex<HashMap<&'static str, Result<CommandOutput, CommandError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedVercel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, subcommand: &'static str, response: Result<CommandOutput, CommandError>) {
        self.queues
            .lock()
            .unwrap()
            .entry(subcommand)
            .or_default()
            .push_back(response);
    }

    pub fn push_stdout(&self, subcommand: &'static str, stdout: &str) {
        self.push(subcommand, Ok(ok_output(stdout)));
    }

    pub fn push_json(&self, subcommand: &'static str, value: Value) {
        self.push_stdout(subcommand, &value.to_string());
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, subcommand: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.subcommand() == subcommand)
            .collect()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedVercel {
    async fn execute(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(RecordedCall {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.map(Path::to_path_buf),
            timeout,
        });

        let key = subcommand_of(args);
        let queued = self
            .queues
            .lock()
            .unwrap()
            .get_mut(key)
            .and_then(VecDeque::pop_front);
        let mut sticky = self.sticky.lock().unwrap();
        if let Some(response) = queued {
            sticky.insert(key, response);
        }
        sticky.get(key).cloned().unwrap_or_else(|| {
            Err(CommandError::ExecutionFailed {
                message: format!("no scripted response for vercel {key}"),
            })
        })
    }
}

pub fn ok_output(stdout: &str) -> CommandOutput {
    CommandOutput {
        status_code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn failed_output(status_code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        status_code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// A `vercel list` entry as the CLI prints it.
pub fn deployment_json(uid: &str, url: Option<&str>, branch: &str, sha: &str) -> Value {
    json!({
        "uid": uid,
        "name": "myapp",
        "url": url,
        "created": 1_700_000_000_000i64,
        "state": "READY",
        "meta": {
            "githubCommitRef": branch,
            "githubCommitSha": sha,
            "githubCommitMessage": "update"
        }
    })
}

/// Temporary project root, optionally linked to a Vercel project.
pub struct ProjectDir {
    pub dir: TempDir,
}

impl ProjectDir {
    pub fn unlinked() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn linked(project_id: &str) -> Self {
        let project = Self::unlinked();
        std::fs::create_dir_all(project.dir.path().join(".vercel")).unwrap();
        std::fs::write(
            project.dir.path().join(".vercel/project.json"),
            json!({"projectId": project_id, "orgId": "team_test"}).to_string(),
        )
        .unwrap();
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> DeployConfig {
        let mut config = DeployConfig::default().with_project_root(self.path());
        config.polling.interval_seconds = 5;
        config.vercel.token = Some("test-token".to_string());
        config
    }
}
