//! Pure normalization helpers for `vercel` CLI output
//!
//! Nothing here spawns processes; the functions take the raw text a command
//! produced and turn it into the crate's types.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use super::types::DeploymentStatus;

/// Raw-text markers checked when output is not JSON, highest priority first.
const TEXT_MARKERS: [(&str, DeploymentStatus); 3] = [
    ("READY", DeploymentStatus::Ready),
    ("ERROR", DeploymentStatus::Error),
    ("BUILDING", DeploymentStatus::Building),
];

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("valid url regex"));

static VERCEL_HOST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9][A-Za-z0-9.-]*\.vercel\.app[^\s]*").expect("valid host regex")
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InspectPayload {
    #[serde(default)]
    ready_state: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

/// Map a platform ready-state string onto the normalized status set.
pub fn status_from_platform(state: &str) -> DeploymentStatus {
    match state.trim().to_ascii_lowercase().as_str() {
        "ready" => DeploymentStatus::Ready,
        "error" => DeploymentStatus::Error,
        "canceled" | "cancelled" => DeploymentStatus::Canceled,
        "building" | "queued" | "initializing" => DeploymentStatus::Building,
        _ => DeploymentStatus::Unknown,
    }
}

/// Normalize `vercel inspect` output.
///
/// JSON with a `readyState` (or `state`) field wins; otherwise the raw text is
/// scanned for `READY`, `ERROR`, `BUILDING` in that order.
pub fn normalize_status(raw: &str) -> DeploymentStatus {
    match serde_json::from_str::<InspectPayload>(raw) {
        Ok(payload) => payload
            .ready_state
            .filter(|state| !state.trim().is_empty())
            .or(payload.state.filter(|state| !state.trim().is_empty()))
            .map(|state| status_from_platform(&state))
            .unwrap_or(DeploymentStatus::Unknown),
        Err(_) => scan_status_markers(raw),
    }
}

/// Text fallback used when inspect output is not structured.
pub fn scan_status_markers(raw: &str) -> DeploymentStatus {
    TEXT_MARKERS
        .iter()
        .find(|(marker, _)| raw.contains(marker))
        .map(|(_, status)| *status)
        .unwrap_or(DeploymentStatus::Unknown)
}

/// Ensure a deployment address carries a protocol. Idempotent.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Recover a deployment URL from unstructured `vercel --prod` output.
pub fn extract_url_from_output(raw: &str) -> Option<String> {
    raw.lines().find_map(|line| {
        URL_PATTERN
            .find(line)
            .or_else(|| VERCEL_HOST_PATTERN.find(line))
            .map(|found| normalize_url(found.as_str()))
    })
}
