// file: src/config.rs
// description: application configuration management with yaml support
// reference: https://docs.rs/config

use crate::error::{DigestError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Env var names for overrides (env overrides YAML, CLI flags override env).
pub const ENV_OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";
pub const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";
pub const ENV_OLLAMA_TIMEOUT: &str = "OLLAMA_TIMEOUT";
pub const ENV_CACHE_DIR: &str = "GIT_DIGEST_CACHE_DIR";
pub const ENV_DEFAULT_TITLE: &str = "GIT_DIGEST_DEFAULT_TITLE";

pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "gemma3n";
pub const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_COMMITS: usize = 10;
pub const DEFAULT_TITLE: &str = "Git updates summary";

/// Config file search order (used by CLI and MCP when no path is given).
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("repos.yaml"), PathBuf::from("repos.yml")];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("git-digest").join("repos.yaml"));
    }
    paths
}

/// Load `.env` from the first existing well-known path. Existing env wins.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    if let Some(config_dir) = dirs::config_dir() {
        let _ = dotenvy::from_path(config_dir.join("git-digest").join(".env"));
    }
}

/// Configuration for a single repository.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepoConfig {
    #[serde(alias = "repo")]
    pub url: String,
    /// Branch to report on; `None` means the remote HEAD.
    #[serde(default)]
    pub branch: Option<String>,
    /// Per-repo override; wins over the global `max_commits`.
    #[serde(default)]
    pub max_commits: Option<usize>,
    #[serde(default = "default_true")]
    pub include_tags: bool,
}

impl RepoConfig {
    pub fn from_url(url: &str) -> Self {
        Self {
            url: url.trim().to_string(),
            branch: None,
            max_commits: None,
            include_tags: true,
        }
    }

    /// Label shown in the report for the branch column.
    pub fn branch_label(&self) -> &str {
        self.branch.as_deref().unwrap_or("HEAD")
    }
}

/// A `repos:` entry is either a bare URL string or a full mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RepoEntry {
    Url(String),
    Full(RepoConfig),
}

/// Raw shape of the YAML file before normalization.
#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    repos: Vec<RepoEntry>,
    #[serde(default)]
    cache_dir: Option<PathBuf>,
    #[serde(default)]
    max_commits: Option<usize>,
    #[serde(default)]
    default_title: Option<String>,
    #[serde(default, alias = "ollama_base_url")]
    ollama_url: Option<String>,
    #[serde(default)]
    ollama_model: Option<String>,
    #[serde(default)]
    ollama_timeout: Option<u64>,
}

/// Top-level configuration (repos + app defaults from YAML; env can override).
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub repos: Vec<RepoConfig>,
    pub cache_dir: PathBuf,
    pub max_commits: usize,
    pub default_title: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub ollama_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            cache_dir: default_cache_dir(),
            max_commits: DEFAULT_MAX_COMMITS,
            default_title: DEFAULT_TITLE.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            ollama_timeout: DEFAULT_OLLAMA_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DigestError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .map_err(|e| DigestError::Config(e.to_string()))?;

        let raw: FileConfig = settings
            .try_deserialize()
            .map_err(|e| DigestError::Config(e.to_string()))?;

        let defaults = Config::default();
        let config = Config {
            repos: raw
                .repos
                .into_iter()
                .map(|entry| match entry {
                    RepoEntry::Url(url) => RepoConfig::from_url(&url),
                    RepoEntry::Full(repo) => repo,
                })
                .collect(),
            cache_dir: raw
                .cache_dir
                .map(expand_tilde)
                .unwrap_or(defaults.cache_dir),
            max_commits: raw.max_commits.unwrap_or(defaults.max_commits),
            default_title: raw.default_title.unwrap_or(defaults.default_title),
            ollama_url: raw
                .ollama_url
                .map(|u| u.trim().to_string())
                .unwrap_or(defaults.ollama_url),
            ollama_model: raw.ollama_model.unwrap_or(defaults.ollama_model),
            ollama_timeout: raw.ollama_timeout.unwrap_or(defaults.ollama_timeout),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load repos from plain text files (one URL per line, `#` comments).
    pub fn from_repo_lists(paths: &[PathBuf]) -> Result<Self> {
        let mut repos = Vec::new();
        for path in paths {
            if !path.exists() {
                continue;
            }
            let contents = std::fs::read_to_string(path)?;
            for line in contents.lines() {
                let line = line.trim();
                if !line.is_empty() && !line.starts_with('#') {
                    repos.push(RepoConfig::from_url(line));
                }
            }
        }
        Ok(Self {
            repos,
            ..Config::default()
        })
    }

    /// Return a new Config with env vars applied (env overrides YAML).
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(cache) = non_empty_env(ENV_CACHE_DIR) {
            self.cache_dir = expand_tilde(PathBuf::from(cache));
        }
        if let Some(title) = non_empty_env(ENV_DEFAULT_TITLE) {
            self.default_title = title;
        }
        if let Some(model) = non_empty_env(ENV_OLLAMA_MODEL) {
            self.ollama_model = model;
        }
        if let Some(url) = non_empty_env(ENV_OLLAMA_BASE_URL) {
            self.ollama_url = url;
        }
        if let Some(timeout) = non_empty_env(ENV_OLLAMA_TIMEOUT) {
            if let Ok(secs) = timeout.parse::<u64>() {
                self.ollama_timeout = secs;
            }
        }
        self
    }

    /// Effective commit limit for one repo; the per-repo override wins.
    pub fn max_commits_for(&self, repo: &RepoConfig) -> usize {
        repo.max_commits.unwrap_or(self.max_commits)
    }

    fn validate(&self) -> Result<()> {
        if self.max_commits == 0 {
            return Err(DigestError::Config(
                "max_commits must be greater than 0".to_string(),
            ));
        }
        if self.ollama_timeout == 0 {
            return Err(DigestError::Config(
                "ollama_timeout must be greater than 0".to_string(),
            ));
        }
        for repo in &self.repos {
            if repo.url.is_empty() {
                return Err(DigestError::Config(
                    "Repository config must have 'url' or 'repo'".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Expand a leading `~` to the user's home directory. Other paths pass
/// through untouched.
pub fn expand_tilde(path: PathBuf) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("git-digest")
}

fn default_true() -> bool {
    true
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
