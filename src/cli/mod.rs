use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "adw-vercel")]
#[command(about = "Check and trigger Vercel deployments for ADW workflows")]
#[command(long_about = "adw-vercel locates the Vercel deployment for a git branch, waits for it to \
                       finish building and prints a JSON result for the calling workflow. \
                       Exit status is 0 only when the deployment is ready.")]
pub struct Cli {
    /// Directory containing .vercel/project.json (overrides configuration)
    #[arg(long, global = true, help = "Project root linked with `vercel link`")]
    pub project_root: Option<PathBuf>,

    /// Emit JSON log lines on stderr
    #[arg(long, global = true, help = "Emit structured JSON logs on stderr")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Wait for the deployment of a branch and report its outcome
    Check {
        /// Git branch whose deployment should be checked
        #[arg(long, short = 'b', help = "Branch name recorded by Vercel (githubCommitRef)")]
        branch: String,
        /// Maximum time to wait in seconds
        #[arg(long, help = "Overall wait budget in seconds (default from config: 300)")]
        timeout: Option<u64>,
        /// Seconds between status checks
        #[arg(
            long,
            value_parser = clap::value_parser!(u64).range(1..),
            help = "Seconds to sleep between status checks (default from config: 10)"
        )]
        poll_interval: Option<u64>,
    },
    /// Wait for a specific deployment URL to finish
    Wait {
        /// Deployment URL or hostname
        url: String,
        /// Maximum time to wait in seconds
        #[arg(long, help = "Overall wait budget in seconds (default from config: 300)")]
        timeout: Option<u64>,
        /// Seconds between status checks
        #[arg(
            long,
            value_parser = clap::value_parser!(u64).range(1..),
            help = "Seconds to sleep between status checks (default from config: 10)"
        )]
        poll_interval: Option<u64>,
    },
    /// Trigger a new production deployment
    Trigger,
    /// Show the linked Vercel project
    Project,
}
