//! External tool abstractions
//!
//! Trait-based access to the `vercel` CLI so the deployment logic can be tested
//! against scripted executors instead of a real binary. Pure decision making
//! (status and URL normalization) lives in `crate::deployment::status`; this
//! module only owns process execution.

pub mod command;
pub mod vercel;

pub use command::{CommandError, CommandExecutor, CommandOutput, ProcessCommandExecutor};
pub use vercel::{DeployOutcome, VercelCli, VercelError};
