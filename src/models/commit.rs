// file: src/models/commit.rs
// description: read-only commit and tag records sourced from the git reader

use serde::{Deserialize, Serialize};

pub const SHORT_ID_LEN: usize = 7;
pub const SUBJECT_MAX_LEN: usize = 80;
pub const TAG_MESSAGE_MAX_LEN: usize = 60;

/// Summary of a single commit, newest-first order as read from the repo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Full object id; the cursor stores this.
    pub id: String,
    pub short_id: String,
    /// Commit date formatted as `%Y-%m-%d %H:%M`.
    pub date: String,
    pub author: String,
    pub subject: String,
}

impl CommitInfo {
    pub fn new(id: String, date: String, author: String, subject: &str) -> Self {
        let short_id = id.chars().take(SHORT_ID_LEN).collect();
        Self {
            id,
            short_id,
            date,
            author,
            subject: first_line_capped(subject, SUBJECT_MAX_LEN),
        }
    }
}

/// Summary of a tag (release). Tags are always listed in full, never
/// delta-filtered by the cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    pub name: String,
    pub short_id: String,
    pub date: String,
    pub message: String,
}

impl TagInfo {
    pub fn new(name: String, target_id: &str, date: String, message: &str) -> Self {
        Self {
            name,
            short_id: target_id.chars().take(SHORT_ID_LEN).collect(),
            date,
            message: first_line_capped(message, TAG_MESSAGE_MAX_LEN),
        }
    }
}

fn first_line_capped(text: &str, max_len: usize) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    line.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_commit_short_id_and_subject_cap() {
        let subject = "x".repeat(120);
        let c = CommitInfo::new(
            "0123456789abcdef0123456789abcdef01234567".to_string(),
            "2026-08-01 12:00".to_string(),
            "alice".to_string(),
            &subject,
        );
        assert_eq!(c.short_id, "0123456");
        assert_eq!(c.subject.chars().count(), SUBJECT_MAX_LEN);
    }

    #[test]
    fn test_multiline_message_keeps_first_line_only() {
        let t = TagInfo::new(
            "v1.2.0".to_string(),
            "deadbeefcafe",
            "2026-08-01 12:00".to_string(),
            "release v1.2.0\n\nlong body text",
        );
        assert_eq!(t.short_id, "deadbee");
        assert_eq!(t.message, "release v1.2.0");
    }
}
