// file: src/repository/cache.rs
// description: clone-once, fetch-thereafter cache of remote repositories
// reference: https://docs.rs/git2

use crate::config::RepoConfig;
use crate::error::{DigestError, Result};
use crate::models::summary::repo_name_from_url;
use git2::{FetchOptions, RemoteCallbacks, Repository};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::PathBuf;
use tracing::{debug, info};

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^\w.-]").expect("valid regex");
}

/// Safe directory name for caching (no slashes or colons). Deterministic per
/// URL so repeated runs reuse the same clone.
pub fn safe_dir_name(url: &str) -> String {
    let name = repo_name_from_url(url).replace(['/', ':'], "_");
    UNSAFE_CHARS.replace_all(&name, "_").into_owned()
}

/// Location of one cached clone.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub url: String,
    pub path: PathBuf,
}

/// Maps repository URLs to on-disk clones under `cache_dir/repos/`.
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(cache_dir: &std::path::Path) -> Self {
        Self {
            root: cache_dir.join("repos"),
        }
    }

    fn clone_path(&self, url: &str) -> PathBuf {
        self.root.join(safe_dir_name(url))
    }

    /// Ensure a clone exists for the repo and is up to date: clone on first
    /// sight, fetch `origin` on every later run. Failures are per-repo and
    /// reported as `DigestError::Clone`.
    pub fn ensure(&self, repo: &RepoConfig) -> Result<CacheEntry> {
        let path = self.clone_path(&repo.url);

        if path.join(".git").exists() {
            debug!("Clone exists for {}, fetching", repo.url);
            self.fetch(&path, repo)?;
        } else {
            info!("Cloning {} into {}", repo.url, path.display());
            std::fs::create_dir_all(&self.root)?;
            self.clone(&path, repo)?;
        }

        Ok(CacheEntry {
            url: repo.url.clone(),
            path,
        })
    }

    fn clone(&self, path: &std::path::Path, repo: &RepoConfig) -> Result<()> {
        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(transfer_callbacks());

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fetch_options);
        if let Some(branch) = &repo.branch {
            builder.branch(branch);
        }

        builder
            .clone(&repo.url, path)
            .map_err(|e| DigestError::Clone(format!("{}: {}", repo.url, e.message())))?;

        info!("Cloned {}", repo.url);
        Ok(())
    }

    fn fetch(&self, path: &std::path::Path, repo: &RepoConfig) -> Result<()> {
        let git_repo = Repository::open(path)
            .map_err(|e| DigestError::Clone(format!("Failed to open clone: {}", e.message())))?;

        let mut remote = git_repo
            .find_remote("origin")
            .map_err(|e| DigestError::Clone(format!("Failed to find remote: {}", e.message())))?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(transfer_callbacks());

        // Empty refspec list fetches the remote's configured refspecs.
        let refspecs: Vec<String> = match &repo.branch {
            Some(branch) => vec![branch.clone()],
            None => Vec::new(),
        };
        let refspec_refs: Vec<&str> = refspecs.iter().map(String::as_str).collect();

        remote
            .fetch(&refspec_refs, Some(&mut fetch_options), None)
            .map_err(|e| DigestError::Clone(format!("{}: fetch failed: {}", repo.url, e.message())))?;

        debug!("Fetched {}", repo.url);
        Ok(())
    }
}

fn transfer_callbacks() -> RemoteCallbacks<'static> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.transfer_progress(|stats| {
        if stats.received_objects() == stats.total_objects() {
            debug!(
                "Resolving deltas {}/{}",
                stats.indexed_deltas(),
                stats.total_deltas()
            );
        } else if stats.total_objects() > 0 {
            debug!(
                "Received {}/{} objects",
                stats.received_objects(),
                stats.total_objects()
            );
        }
        true
    });
    callbacks
}
