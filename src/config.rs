use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for adw-vercel
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeployConfig {
    /// Vercel CLI settings
    pub vercel: VercelConfig,
    /// Per-call timeouts for the external CLI
    pub timeouts: TimeoutConfig,
    /// Status polling settings
    pub polling: PollingConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VercelConfig {
    /// Program name or path of the Vercel CLI
    pub binary: String,
    /// Directory containing `.vercel/project.json`; CLI calls run here
    pub project_root: PathBuf,
    /// Page size requested from `vercel list`
    pub list_limit: u32,
    /// Access token (can be set via VERCEL_TOKEN); only checked for presence
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
    pub list_seconds: u64,
    pub inspect_seconds: u64,
    pub deploy_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingConfig {
    /// Overall budget for waiting on a deployment
    pub timeout_seconds: u64,
    /// Sleep between status checks
    pub interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON log lines instead of compact text
    pub json_logs: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            vercel: VercelConfig {
                binary: "vercel".to_string(),
                project_root: PathBuf::from("."),
                list_limit: 5,
                token: None, // Will be read from VERCEL_TOKEN
            },
            timeouts: TimeoutConfig {
                list_seconds: 30,
                inspect_seconds: 30,
                deploy_seconds: 600, // Production builds can take minutes
            },
            polling: PollingConfig {
                timeout_seconds: 300, // 5 minutes
                interval_seconds: 10,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
            },
        }
    }
}

impl TimeoutConfig {
    pub fn list(&self) -> Duration {
        Duration::from_secs(self.list_seconds)
    }

    pub fn inspect(&self) -> Duration {
        Duration::from_secs(self.inspect_seconds)
    }

    pub fn deploy(&self) -> Duration {
        Duration::from_secs(self.deploy_seconds)
    }
}

impl DeployConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (adw-vercel.toml)
    /// 3. Environment variables (prefixed with ADW_VERCEL__)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("adw-vercel.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        // Double underscore so field names like `project_root` survive the split
        builder = builder.add_source(
            Environment::with_prefix("ADW_VERCEL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut deploy_config: DeployConfig = config.try_deserialize()?;

        if deploy_config.vercel.token.is_none() {
            if let Ok(token) = std::env::var("VERCEL_TOKEN") {
                if !token.trim().is_empty() {
                    deploy_config.vercel.token = Some(token);
                }
            }
        }

        Ok(deploy_config)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }

    pub fn with_project_root(mut self, project_root: impl Into<PathBuf>) -> Self {
        self.vercel.project_root = project_root.into();
        self
    }
}
