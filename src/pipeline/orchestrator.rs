// file: src/pipeline/orchestrator.rs
// description: run the fetch -> cursor -> report -> summarize pipeline once

use crate::config::Config;
use crate::cursor::{Cursor, CursorStore};
use crate::error::{DigestError, Result};
use crate::models::RepoSummary;
use crate::ollama::OllamaClient;
use crate::pipeline::process_repo;
use crate::report::{Summarizer, build_report};
use crate::repository::CacheStore;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub changes_only: bool,
    pub ai_summary: bool,
}

/// One synchronous pass over the configured repos. Repos are processed one at
/// a time; only configuration-level failures abort the run, everything else
/// degrades to an error marker in the report.
pub struct DigestPipeline {
    config: Config,
}

impl DigestPipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(&self, options: &RunOptions) -> Result<String> {
        std::fs::create_dir_all(&self.config.cache_dir).map_err(|e| {
            DigestError::Config(format!(
                "Cannot create cache dir {}: {}",
                self.config.cache_dir.display(),
                e
            ))
        })?;

        let summaries = self.collect_summaries(options.changes_only);

        let report = if options.ai_summary {
            match OllamaClient::new(
                &self.config.ollama_url,
                &self.config.ollama_model,
                self.config.ollama_timeout,
            ) {
                Ok(client) => {
                    Summarizer::new(client)
                        .summarize(&summaries, &self.config.default_title)
                        .await
                }
                Err(e) => {
                    warn!("Summarizer unavailable ({}). Using plain report.", e);
                    build_report(&summaries, &self.config.default_title)
                }
            }
        } else {
            build_report(&summaries, &self.config.default_title)
        };

        Ok(report)
    }

    fn collect_summaries(&self, changes_only: bool) -> Vec<RepoSummary> {
        let cache = CacheStore::new(&self.config.cache_dir);
        let cursors = CursorStore::new(&self.config.cache_dir);
        let mut summaries = Vec::with_capacity(self.config.repos.len());

        for repo in &self.config.repos {
            info!("Fetching {} ...", repo.url);
            let cursor = if changes_only {
                cursors.load(&repo.url)
            } else {
                None
            };

            let summary = process_repo(&self.config, repo, &cache, cursor.as_ref());

            // Advance the cursor only after a successful read that observed a
            // commit, never speculatively.
            if changes_only && summary.error.is_none() {
                if let Some(head) = &summary.head_commit {
                    if let Err(e) = cursors.save(&repo.url, &Cursor::new(head.clone())) {
                        warn!("Failed to persist cursor for {}: {}", repo.url, e);
                    }
                }
            }

            summaries.push(summary);
        }

        summaries
    }
}
