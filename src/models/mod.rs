// file: src/models/mod.rs
// description: data models for commits, tags, and per-repo summaries

pub mod commit;
pub mod summary;

pub use commit::{CommitInfo, TagInfo};
pub use summary::RepoSummary;
