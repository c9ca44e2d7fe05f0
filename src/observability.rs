use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;
use tracing::info;

use crate::deployment::DeploymentStatus;

/// A status change seen between two consecutive polls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: Option<DeploymentStatus>,
    pub to: DeploymentStatus,
    pub observed_at: DateTime<Utc>,
}

/// Poll-loop metrics for one monitor
///
/// Held behind an `Arc`: clones of a monitor accumulate into the same
/// counters. Give each concurrent check its own `PollMetrics` through
/// `DeploymentMonitor::with_metrics` to keep their numbers apart.
#[derive(Debug, Default)]
pub struct PollMetrics {
    polls: AtomicU64,
    inspect_failures: AtomicU64,
    transitions: Mutex<Vec<StatusTransition>>,
}

impl PollMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_poll(&self) {
        self.polls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_inspect_failure(&self) {
        self.inspect_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transition(&self, from: Option<DeploymentStatus>, to: DeploymentStatus) {
        let transition = StatusTransition {
            from,
            to,
            observed_at: Utc::now(),
        };
        if let Ok(mut transitions) = self.transitions.lock() {
            transitions.push(transition);
        }
    }

    pub fn get_stats(&self) -> PollStats {
        PollStats {
            polls: self.polls.load(Ordering::Relaxed),
            inspect_failures: self.inspect_failures.load(Ordering::Relaxed),
            transitions: self.transitions().len() as u64,
        }
    }

    pub fn transitions(&self) -> Vec<StatusTransition> {
        self.transitions
            .lock()
            .map(|transitions| transitions.clone())
            .unwrap_or_default()
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            polls = stats.polls,
            inspect_failures = stats.inspect_failures,
            transitions = stats.transitions,
            "Deployment poll metrics"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollStats {
    pub polls: u64,
    pub inspect_failures: u64,
    pub transitions: u64,
}

/// Time an operation and log its duration when finished
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis() as u64,
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_polls_and_transitions() {
        let metrics = PollMetrics::new();
        metrics.record_poll();
        metrics.record_poll();
        metrics.record_inspect_failure();
        metrics.record_transition(None, DeploymentStatus::Building);
        metrics.record_transition(Some(DeploymentStatus::Building), DeploymentStatus::Ready);

        assert_eq!(
            metrics.get_stats(),
            PollStats {
                polls: 2,
                inspect_failures: 1,
                transitions: 2
            }
        );
        let transitions = metrics.transitions();
        assert_eq!(transitions[1].from, Some(DeploymentStatus::Building));
        assert_eq!(transitions[1].to, DeploymentStatus::Ready);
    }
}
