// file: src/pipeline/mod.rs
// description: per-repo processing and whole-run orchestration

pub mod orchestrator;
pub mod processor;

pub use orchestrator::{DigestPipeline, RunOptions};
pub use processor::process_repo;
