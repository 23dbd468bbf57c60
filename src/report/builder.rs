// file: src/report/builder.rs
// description: pure text formatting of per-repo summaries into one report

use crate::models::RepoSummary;
use chrono::Local;

/// Tags shown per repo block; the reader fetches more for diagnostics.
const TAGS_SHOWN: usize = 5;

/// Format summaries as a plain-text report suitable for cron output
/// (stdout or email). Pure formatting, no network or disk access.
pub fn build_report(summaries: &[RepoSummary], title: &str) -> String {
    let mut lines = header_lines(title);

    for summary in summaries {
        push_repo_block(&mut lines, summary, true);
    }

    lines.join("\n")
}

/// Build the raw context block handed to the AI summarizer: same per-repo
/// content, no title or timestamp.
pub fn raw_context(summaries: &[RepoSummary]) -> String {
    let mut lines = Vec::new();
    for summary in summaries {
        push_repo_block(&mut lines, summary, false);
    }
    lines.join("\n")
}

pub fn header_lines(title: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if !title.is_empty() {
        lines.push(title.to_string());
        lines.push("=".repeat(title.chars().count().min(60)));
        lines.push(String::new());
    }
    lines.push(format!(
        "Generated: {}",
        Local::now().format("%Y-%m-%d %H:%M")
    ));
    lines.push(String::new());
    lines
}

fn push_repo_block(lines: &mut Vec<String>, summary: &RepoSummary, with_url: bool) {
    if with_url {
        lines.push(format!("## {}", summary.display_name()));
        lines.push(format!("  URL: {}", summary.url));
    } else {
        lines.push(format!("## {} ({})", summary.display_name(), summary.url));
    }
    lines.push(format!("  Branch: {}", summary.branch));

    if let Some(error) = &summary.error {
        lines.push(format!("  Error: {error}"));
        lines.push(String::new());
        return;
    }

    if !summary.commits.is_empty() {
        let header = if summary.since_last_run {
            "New commits since last run:"
        } else {
            "Recent commits:"
        };
        lines.push(format!("  {header}"));
        for commit in &summary.commits {
            lines.push(format!(
                "    - {}  {}  {}: {}",
                commit.date, commit.short_id, commit.author, commit.subject
            ));
        }
    } else if summary.since_last_run {
        lines.push("  No new commits since last run.".to_string());
    }

    if !summary.tags.is_empty() {
        lines.push("  Recent tags/releases:".to_string());
        for tag in summary.tags.iter().take(TAGS_SHOWN) {
            let msg_part = if tag.message.is_empty() {
                String::new()
            } else {
                format!("  — {}", tag.message)
            };
            lines.push(format!(
                "    - {}  {} ({}){}",
                tag.date, tag.name, tag.short_id, msg_part
            ));
        }
    }

    lines.push(String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommitInfo, TagInfo};

    fn populated_summary() -> RepoSummary {
        let mut summary = RepoSummary::new("https://github.com/a/b.git", "main");
        summary.commits = vec![CommitInfo::new(
            "0123456789abcdef0123456789abcdef01234567".to_string(),
            "2026-08-01 12:00".to_string(),
            "alice".to_string(),
            "fix the widget",
        )];
        summary.tags = vec![TagInfo::new(
            "v1.0.0".to_string(),
            "deadbeefcafe",
            "2026-07-30 09:00".to_string(),
            "first stable release",
        )];
        summary
    }

    #[test]
    fn test_report_contains_title_and_repo_block() {
        let report = build_report(&[populated_summary()], "Weekly digest");
        assert!(report.starts_with("Weekly digest\n=============\n"));
        assert!(report.contains("Generated: "));
        assert!(report.contains("## a/b"));
        assert!(report.contains("  URL: https://github.com/a/b.git"));
        assert!(report.contains("  Branch: main"));
        assert!(report.contains("  Recent commits:"));
        assert!(report.contains("    - 2026-08-01 12:00  0123456  alice: fix the widget"));
        assert!(report.contains("    - 2026-07-30 09:00  v1.0.0 (deadbee)  — first stable release"));
    }

    #[test]
    fn test_changes_only_headers() {
        let mut summary = populated_summary();
        summary.since_last_run = true;
        let report = build_report(&[summary], "t");
        assert!(report.contains("  New commits since last run:"));

        let mut empty = RepoSummary::new("https://github.com/a/b", "HEAD");
        empty.since_last_run = true;
        let report = build_report(&[empty], "t");
        assert!(report.contains("  No new commits since last run."));
    }

    #[test]
    fn test_error_marker_replaces_commit_list() {
        let summary = RepoSummary::failed(
            "https://github.com/a/gone",
            "HEAD",
            "Repository clone failed: remote unreachable".to_string(),
        );
        let report = build_report(&[summary], "t");
        assert!(report.contains("  Error: Repository clone failed: remote unreachable"));
        assert!(!report.contains("Recent commits:"));
    }

    #[test]
    fn test_failed_and_populated_repos_both_render() {
        let ok = populated_summary();
        let bad = RepoSummary::failed("https://github.com/a/gone", "HEAD", "boom".to_string());
        let report = build_report(&[ok, bad], "t");
        assert!(report.contains("## a/b"));
        assert!(report.contains("## a/gone"));
        assert!(report.contains("  Error: boom"));
    }

    #[test]
    fn test_tags_capped_at_five() {
        let mut summary = RepoSummary::new("https://github.com/a/b", "HEAD");
        for i in 0..8 {
            summary.tags.push(TagInfo::new(
                format!("v0.{i}.0"),
                "abcdef012345",
                "2026-08-01 12:00".to_string(),
                "",
            ));
        }
        let report = build_report(&[summary], "t");
        assert_eq!(report.matches("    - 2026-08-01").count(), 5);
    }

    #[test]
    fn test_raw_context_has_no_title_or_timestamp() {
        let context = raw_context(&[populated_summary()]);
        assert!(!context.contains("Generated:"));
        assert!(context.starts_with("## a/b (https://github.com/a/b.git)"));
    }

    #[test]
    fn test_no_new_commits_runs_are_identical() {
        // Two consecutive changes-only runs with no upstream movement must
        // produce the same section text (timestamp excluded via raw_context).
        let mut summary = RepoSummary::new("https://github.com/a/b", "HEAD");
        summary.since_last_run = true;
        let first = raw_context(std::slice::from_ref(&summary));
        let second = raw_context(std::slice::from_ref(&summary));
        assert_eq!(first, second);
        assert!(first.contains("No new commits since last run."));
    }
}
