// file: src/report/mod.rs
// description: plain-text report assembly and optional AI digest

pub mod builder;
pub mod summarizer;

pub use builder::{build_report, raw_context};
pub use summarizer::Summarizer;
