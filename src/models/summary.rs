// file: src/models/summary.rs
// description: per-repository result aggregated into the final report

use crate::models::{CommitInfo, TagInfo};
use serde::{Deserialize, Serialize};

/// Result of processing one repository. Failed repos carry an error marker
/// instead of commits; the report renders every summary either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSummary {
    pub url: String,
    /// Short name derived from the URL (e.g. owner/repo).
    pub name: String,
    pub branch: String,
    pub commits: Vec<CommitInfo>,
    pub tags: Vec<TagInfo>,
    /// Set when the commit list is a delta against a stored cursor.
    pub since_last_run: bool,
    /// Newest commit id observed this run; advances the cursor.
    pub head_commit: Option<String>,
    pub error: Option<String>,
}

impl RepoSummary {
    pub fn new(url: &str, branch: &str) -> Self {
        Self {
            url: url.to_string(),
            name: repo_name_from_url(url),
            branch: branch.to_string(),
            commits: Vec::new(),
            tags: Vec::new(),
            since_last_run: false,
            head_commit: None,
            error: None,
        }
    }

    pub fn failed(url: &str, branch: &str, error: String) -> Self {
        let mut summary = Self::new(url, branch);
        summary.error = Some(error);
        summary
    }

    /// Human-readable repo name for report headers.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.url
        } else {
            &self.name
        }
    }
}

/// Derive a short name from a repo URL (e.g. owner/repo).
pub fn repo_name_from_url(url: &str) -> String {
    let mut trimmed = url.trim_end_matches('/');
    if trimmed.to_ascii_lowercase().ends_with(".git") {
        trimmed = &trimmed[..trimmed.len() - 4];
    }
    let normalized = trimmed.replace('\\', "/");
    let parts: Vec<&str> = normalized.split('/').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [] => url.to_string(),
        [single] => (*single).to_string(),
        [.., owner, repo] => format!("{}/{}", owner, repo),
    }
}
