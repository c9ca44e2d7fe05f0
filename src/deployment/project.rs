use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use super::types::ProjectInfo;

/// Location of the project link written by `vercel link`, relative to the root.
pub const PROJECT_FILE: &str = ".vercel/project.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectLink {
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    org_id: Option<String>,
}

/// Reads the Vercel project link of a working tree
#[derive(Debug, Clone)]
pub struct ProjectResolver {
    project_root: PathBuf,
}

impl ProjectResolver {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    pub fn project_file(&self) -> PathBuf {
        self.project_root.join(PROJECT_FILE)
    }

    /// Look up project and org ids.
    ///
    /// A missing file is the normal "not linked" state. An unreadable or
    /// malformed file is logged and treated the same way.
    pub fn resolve(&self) -> ProjectInfo {
        let path = self.project_file();
        if !path.exists() {
            debug!(path = %path.display(), "No Vercel project link found");
            return ProjectInfo::default();
        }

        match read_project_link(&path) {
            Ok(link) => ProjectInfo {
                project_id: non_empty(link.project_id),
                org_id: non_empty(link.org_id),
            },
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read Vercel project link");
                ProjectInfo::default()
            }
        }
    }
}

fn read_project_link(path: &Path) -> anyhow::Result<ProjectLink> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
