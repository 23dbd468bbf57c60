// file: src/pipeline/processor.rs
// description: build one RepoSummary: sync clone, list commits and tags, apply cursor

use crate::config::{Config, RepoConfig};
use crate::cursor::Cursor;
use crate::error::Result;
use crate::models::RepoSummary;
use crate::repository::{CacheStore, CommitReader};
use tracing::debug;

/// Fetch latest commits and optional tags for one repo. Never returns an
/// error: any failure lands in the summary's error marker so one bad repo
/// cannot unwind the run.
pub fn process_repo(
    config: &Config,
    repo: &RepoConfig,
    cache: &CacheStore,
    cursor: Option<&Cursor>,
) -> RepoSummary {
    let mut summary = RepoSummary::new(&repo.url, repo.branch_label());

    if let Err(e) = fill_summary(config, repo, cache, cursor, &mut summary) {
        debug!("Repo {} failed: {}", repo.url, e);
        summary.error = Some(e.first_line());
    }
    summary
}

fn fill_summary(
    config: &Config,
    repo: &RepoConfig,
    cache: &CacheStore,
    cursor: Option<&Cursor>,
    summary: &mut RepoSummary,
) -> Result<()> {
    let entry = cache.ensure(repo)?;
    let reader = CommitReader::open(&entry.path)?;
    let limit = config.max_commits_for(repo);
    let branch = repo.branch.as_deref();

    match cursor {
        Some(cursor) => {
            summary.since_last_run = true;
            let delta = reader.list_commits(branch, limit, Some(&cursor.last_seen_commit))?;
            summary.head_commit = match delta.first() {
                Some(newest) => Some(newest.id.clone()),
                // No new commits: keep pointing at the current tip, which is
                // the stored id unless history moved underneath us.
                None => reader
                    .list_commits(branch, 1, None)?
                    .first()
                    .map(|c| c.id.clone())
                    .or_else(|| Some(cursor.last_seen_commit.clone())),
            };
            summary.commits = delta;
        }
        None => {
            let commits = reader.list_commits(branch, limit, None)?;
            summary.head_commit = commits.first().map(|c| c.id.clone());
            summary.commits = commits;
        }
    }

    if repo.include_tags {
        summary.tags = reader.list_tags(10)?;
    }

    Ok(())
}
