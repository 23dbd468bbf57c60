// file: src/repository/mod.rs
// description: cached clone management and commit/tag reading
// reference: https://docs.rs/git2

pub mod cache;
pub mod reader;

pub use cache::{CacheEntry, CacheStore, safe_dir_name};
pub use reader::CommitReader;
