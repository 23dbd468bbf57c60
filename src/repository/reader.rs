// file: src/repository/reader.rs
// description: commit and tag listing over a cached clone
// reference: https://docs.rs/git2

use crate::error::{DigestError, Result};
use crate::models::{CommitInfo, TagInfo};
use git2::{ObjectType, Repository};
use std::path::Path;
use tracing::debug;

/// Reads commit and tag metadata from an already-synced clone. All failures
/// map to `DigestError::Read`, which the pipeline treats as "no data for this
/// repo" rather than aborting the whole report.
pub struct CommitReader {
    repo: Repository,
}

impl CommitReader {
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path)
            .map_err(|e| DigestError::Read(format!("Failed to open clone: {}", e.message())))?;
        Ok(Self { repo })
    }

    /// List commits newest-first from the resolved target ref, in the
    /// traversal order git reports. With `since`, only commits strictly newer
    /// than that id (full or prefix match) are returned; if the id is not
    /// found within `2 * limit` commits the bounded full list comes back,
    /// which covers rewritten history after a force-push.
    pub fn list_commits(
        &self,
        branch: Option<&str>,
        limit: usize,
        since: Option<&str>,
    ) -> Result<Vec<CommitInfo>> {
        let target = self.resolve_target(branch)?;

        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| DigestError::Read(e.message().to_string()))?;
        revwalk
            .push(target)
            .map_err(|e| DigestError::Read(e.message().to_string()))?;

        let walk_bound = if since.is_some() { limit * 2 } else { limit };
        let mut commits = Vec::new();

        for oid in revwalk.take(walk_bound) {
            let oid = oid.map_err(|e| DigestError::Read(e.message().to_string()))?;
            if let Some(since_id) = since {
                if oid.to_string().starts_with(since_id) {
                    break;
                }
            }
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| DigestError::Read(e.message().to_string()))?;
            commits.push(CommitInfo::new(
                oid.to_string(),
                format_time(commit.time()),
                commit.author().name().unwrap_or("").to_string(),
                commit.message().unwrap_or(""),
            ));
            if commits.len() >= limit {
                break;
            }
        }

        debug!("Read {} commits from {:?}", commits.len(), branch);
        Ok(commits)
    }

    /// List tags sorted by target commit date, newest first. Lightweight tags
    /// get an empty message.
    pub fn list_tags(&self, limit: usize) -> Result<Vec<TagInfo>> {
        let names = self
            .repo
            .tag_names(None)
            .map_err(|e| DigestError::Read(e.message().to_string()))?;

        let mut dated: Vec<(i64, TagInfo)> = Vec::new();
        for name in names.iter().flatten() {
            let Ok(reference) = self.repo.find_reference(&format!("refs/tags/{name}")) else {
                continue;
            };
            let Ok(target) = reference.peel(ObjectType::Commit) else {
                continue;
            };
            let Some(commit) = target.as_commit() else {
                continue;
            };

            let message = reference
                .peel(ObjectType::Tag)
                .ok()
                .and_then(|obj| obj.into_tag().ok())
                .and_then(|tag| tag.message().map(str::to_string))
                .unwrap_or_default();

            dated.push((
                commit.time().seconds(),
                TagInfo::new(
                    name.to_string(),
                    &commit.id().to_string(),
                    format_time(commit.time()),
                    &message,
                ),
            ));
        }

        dated.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(dated.into_iter().take(limit).map(|(_, tag)| tag).collect())
    }

    /// Resolve the ref to walk from: the remote-tracking branch when one is
    /// configured (fresh after fetch), the local branch as fallback, remote
    /// HEAD otherwise.
    fn resolve_target(&self, branch: Option<&str>) -> Result<git2::Oid> {
        if let Some(branch) = branch {
            let candidates = [
                format!("refs/remotes/origin/{branch}"),
                format!("refs/heads/{branch}"),
            ];
            for name in &candidates {
                if let Some(oid) = self.ref_target(name) {
                    return Ok(oid);
                }
            }
            return Err(DigestError::Read(format!("Branch '{branch}' not found")));
        }

        if let Some(oid) = self.ref_target("refs/remotes/origin/HEAD") {
            return Ok(oid);
        }

        let head = self
            .repo
            .head()
            .map_err(|e| DigestError::Read(format!("No HEAD: {}", e.message())))?;

        // A fetch updates remote-tracking refs but not the checked-out HEAD,
        // so prefer the tracking ref of the current branch when it exists.
        if let Some(shorthand) = head.shorthand() {
            if let Some(oid) = self.ref_target(&format!("refs/remotes/origin/{shorthand}")) {
                return Ok(oid);
            }
        }

        head.resolve()
            .ok()
            .and_then(|r| r.target())
            .ok_or_else(|| DigestError::Read("HEAD points at no commit".to_string()))
    }

    fn ref_target(&self, name: &str) -> Option<git2::Oid> {
        self.repo
            .find_reference(name)
            .ok()
            .and_then(|r| r.resolve().ok())
            .and_then(|r| r.target())
    }
}

/// Format a git timestamp as `%Y-%m-%d %H:%M` in the committer's offset.
fn format_time(time: git2::Time) -> String {
    let shifted = time.seconds() + i64::from(time.offset_minutes()) * 60;
    chrono::DateTime::from_timestamp(shifted, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn init_repo(dir: &Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "tester").unwrap();
            config.set_str("user.email", "tester@example.com").unwrap();
        }
        repo
    }

    fn commit_at(repo: &Repository, message: &str, epoch_secs: i64) -> git2::Oid {
        let sig = Signature::new("tester", "tester@example.com", &git2::Time::new(epoch_secs, 0))
            .unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    fn three_commit_repo() -> (TempDir, Vec<git2::Oid>) {
        let dir = TempDir::new().unwrap();
        let repo = init_repo(dir.path());
        let c1 = commit_at(&repo, "first commit", 1_700_000_000);
        let c2 = commit_at(&repo, "second commit", 1_700_000_100);
        let c3 = commit_at(&repo, "third commit", 1_700_000_200);
        (dir, vec![c1, c2, c3])
    }

    #[test]
    fn test_list_commits_newest_first() {
        let (dir, oids) = three_commit_repo();
        let reader = CommitReader::open(dir.path()).unwrap();

        let commits = reader.list_commits(None, 10, None).unwrap();
        assert_eq!(commits.len(), 3);
        assert_eq!(commits[0].id, oids[2].to_string());
        assert_eq!(commits[0].subject, "third commit");
        assert_eq!(commits[2].subject, "first commit");
        assert_eq!(commits[0].author, "tester");
    }

    #[test]
    fn test_list_commits_respects_limit() {
        let (dir, _) = three_commit_repo();
        let reader = CommitReader::open(dir.path()).unwrap();
        let commits = reader.list_commits(None, 2, None).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].subject, "third commit");
    }

    #[test]
    fn test_list_commits_since_returns_strict_delta() {
        let (dir, oids) = three_commit_repo();
        let reader = CommitReader::open(dir.path()).unwrap();

        let delta = reader
            .list_commits(None, 10, Some(&oids[0].to_string()))
            .unwrap();
        assert_eq!(delta.len(), 2);
        assert_eq!(delta[0].id, oids[2].to_string());
        assert_eq!(delta[1].id, oids[1].to_string());
    }

    #[test]
    fn test_list_commits_since_accepts_short_id() {
        let (dir, oids) = three_commit_repo();
        let reader = CommitReader::open(dir.path()).unwrap();
        let full = oids[1].to_string();

        let delta = reader.list_commits(None, 10, Some(&full[..7])).unwrap();
        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].id, oids[2].to_string());
    }

    #[test]
    fn test_list_commits_since_head_is_empty() {
        let (dir, oids) = three_commit_repo();
        let reader = CommitReader::open(dir.path()).unwrap();

        let delta = reader
            .list_commits(None, 10, Some(&oids[2].to_string()))
            .unwrap();
        assert!(delta.is_empty());
    }

    #[test]
    fn test_list_commits_unknown_since_falls_back_to_full_list() {
        // Simulates a rewritten history: the stored id no longer exists.
        let (dir, _) = three_commit_repo();
        let reader = CommitReader::open(dir.path()).unwrap();

        let commits = reader
            .list_commits(None, 10, Some("ffffffffffffffffffffffffffffffffffffffff"))
            .unwrap();
        assert_eq!(commits.len(), 3);
    }

    #[test]
    fn test_list_commits_on_named_branch() {
        let (dir, oids) = three_commit_repo();
        let reader = CommitReader::open(dir.path()).unwrap();

        let branch = {
            let repo = Repository::open(dir.path()).unwrap();
            repo.head().unwrap().shorthand().unwrap().to_string()
        };
        let commits = reader.list_commits(Some(&branch), 10, None).unwrap();
        assert_eq!(commits[0].id, oids[2].to_string());
    }

    #[test]
    fn test_list_commits_unknown_branch_is_read_error() {
        let (dir, _) = three_commit_repo();
        let reader = CommitReader::open(dir.path()).unwrap();
        let err = reader.list_commits(Some("no-such-branch"), 10, None).unwrap_err();
        assert!(matches!(err, DigestError::Read(_)));
    }

    #[test]
    fn test_list_tags_newest_first_with_messages() {
        let dir = TempDir::new().unwrap();
        let repo = init_repo(dir.path());
        let c1 = commit_at(&repo, "first", 1_700_000_000);
        let c2 = commit_at(&repo, "second", 1_700_000_100);

        let sig = repo.signature().unwrap();
        let obj1 = repo.find_object(c1, None).unwrap();
        repo.tag("v0.1.0", &obj1, &sig, "release v0.1.0\n\nnotes", false)
            .unwrap();
        let obj2 = repo.find_object(c2, None).unwrap();
        repo.tag_lightweight("v0.2.0", &obj2, false).unwrap();

        let reader = CommitReader::open(dir.path()).unwrap();
        let tags = reader.list_tags(10).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "v0.2.0");
        assert_eq!(tags[0].message, "");
        assert_eq!(tags[1].name, "v0.1.0");
        assert_eq!(tags[1].message, "release v0.1.0");
        assert_eq!(tags[1].short_id, c1.to_string()[..7]);
    }

    #[test]
    fn test_open_missing_path_is_read_error() {
        assert!(matches!(
            CommitReader::open(Path::new("/nonexistent/clone")),
            Err(DigestError::Read(_))
        ));
    }
}
