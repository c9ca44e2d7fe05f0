use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use adw_vercel::cli::commands::{CheckCommand, Command, ProjectCommand, TriggerCommand, WaitCommand};
use adw_vercel::cli::{Cli, Commands};
use adw_vercel::{init_telemetry, DeployConfig};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load .env before configuration so VERCEL_TOKEN and ADW_VERCEL__* apply
    let _ = DeployConfig::load_env_file();
    let mut config = DeployConfig::load()?;
    if let Some(project_root) = cli.project_root {
        config = config.with_project_root(project_root);
    }
    if cli.json_logs {
        config.observability.json_logs = true;
    }
    init_telemetry(&config.observability)?;

    let succeeded = tokio::runtime::Runtime::new()?.block_on(async {
        match cli.command {
            Commands::Check {
                branch,
                timeout,
                poll_interval,
            } => {
                CheckCommand::new(branch, config)
                    .with_timeout(timeout)
                    .with_poll_interval(poll_interval)
                    .execute()
                    .await
            }
            Commands::Wait {
                url,
                timeout,
                poll_interval,
            } => {
                WaitCommand::new(&url, config)
                    .with_timeout(timeout)
                    .with_poll_interval(poll_interval)
                    .execute()
                    .await
            }
            Commands::Trigger => TriggerCommand::new(config).execute().await,
            Commands::Project => ProjectCommand::new(&config).execute().await,
        }
    })?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
