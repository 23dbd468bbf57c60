// file: src/cursor.rs
// description: per-repo cursor persistence for changes-only runs
// reference: https://docs.rs/serde_json

use crate::error::{DigestError, Result};
use crate::repository::cache::safe_dir_name;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Pointer to the newest commit observed for a repository as of the last
/// successful changes-only run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub last_seen_commit: String,
    pub last_run: DateTime<Utc>,
}

impl Cursor {
    pub fn new(last_seen_commit: String) -> Self {
        Self {
            last_seen_commit,
            last_run: Utc::now(),
        }
    }
}

/// One JSON file per repository under `cache_dir/cursors/`, keyed by the same
/// safe name used for the clone directory. Corrupt or missing files read as
/// "no prior run".
pub struct CursorStore {
    dir: PathBuf,
}

impl CursorStore {
    pub fn new(cache_dir: &std::path::Path) -> Self {
        Self {
            dir: cache_dir.join("cursors"),
        }
    }

    fn path_for(&self, repo_url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", safe_dir_name(repo_url)))
    }

    /// Read the stored cursor for a repo. Never fails: unreadable or
    /// unparsable state is logged and treated as absent.
    pub fn load(&self, repo_url: &str) -> Option<Cursor> {
        let path = self.path_for(repo_url);
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Unreadable cursor file {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(cursor) => Some(cursor),
            Err(e) => {
                warn!(
                    "Corrupt cursor file {}, treating as first run: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }

    pub fn save(&self, repo_url: &str, cursor: &Cursor) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| DigestError::Cursor(format!("Cannot create cursor dir: {e}")))?;
        let path = self.path_for(repo_url);
        let contents = serde_json::to_string_pretty(cursor)
            .map_err(|e| DigestError::Cursor(e.to_string()))?;
        std::fs::write(&path, contents)
            .map_err(|e| DigestError::Cursor(format!("Cannot write {}: {e}", path.display())))?;
        debug!(
            "Saved cursor {} for {}",
            &cursor.last_seen_commit[..cursor.last_seen_commit.len().min(12)],
            repo_url
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const URL: &str = "https://github.com/test/repo.git";

    #[test]
    fn test_round_trip_survives_new_store_instance() {
        let dir = TempDir::new().unwrap();
        let cursor = Cursor::new("abc123def456".to_string());

        {
            let store = CursorStore::new(dir.path());
            store.save(URL, &cursor).unwrap();
        }

        let store = CursorStore::new(dir.path());
        let loaded = store.load(URL).unwrap();
        assert_eq!(loaded.last_seen_commit, "abc123def456");
        assert_eq!(loaded, cursor);
    }

    #[test]
    fn test_missing_cursor_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = CursorStore::new(dir.path());
        assert!(store.load(URL).is_none());
    }

    #[test]
    fn test_corrupt_cursor_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = CursorStore::new(dir.path());
        store.save(URL, &Cursor::new("abc".to_string())).unwrap();

        let path = store.path_for(URL);
        std::fs::write(&path, "not json{{{").unwrap();
        assert!(store.load(URL).is_none());
    }

    #[test]
    fn test_cursors_are_isolated_per_repo() {
        let dir = TempDir::new().unwrap();
        let store = CursorStore::new(dir.path());
        store
            .save("https://github.com/a/one", &Cursor::new("aaa".to_string()))
            .unwrap();
        store
            .save("https://github.com/b/two", &Cursor::new("bbb".to_string()))
            .unwrap();

        assert_eq!(
            store.load("https://github.com/a/one").unwrap().last_seen_commit,
            "aaa"
        );
        assert_eq!(
            store.load("https://github.com/b/two").unwrap().last_seen_commit,
            "bbb"
        );
    }
}
