// file: src/lib.rs
// description: library entry point and public api exports
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod cursor;
pub mod error;
pub mod mcp;
pub mod models;
pub mod ollama;
pub mod pipeline;
pub mod report;
pub mod repository;
pub mod utils;

pub use config::{Config, RepoConfig};
pub use cursor::{Cursor, CursorStore};
pub use error::{DigestError, Result};
pub use mcp::GitDigestMcp;
pub use models::{CommitInfo, RepoSummary, TagInfo};
pub use ollama::OllamaClient;
pub use pipeline::{DigestPipeline, RunOptions};
pub use report::{Summarizer, build_report};
pub use repository::{CacheEntry, CacheStore, CommitReader};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _config = Config::default();
        let _options = RunOptions::default();
    }
}
