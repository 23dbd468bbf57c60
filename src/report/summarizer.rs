// file: src/report/summarizer.rs
// description: optional AI digest with unconditional fallback to the raw report

use crate::error::DigestError;
use crate::models::RepoSummary;
use crate::ollama::OllamaClient;
use crate::report::builder::{build_report, header_lines, raw_context};
use tracing::warn;

const SYSTEM_PROMPT: &str = "You are a concise technical summarizer. Given raw git update data \
(commits and tags per repo), write a short digest: what changed, notable commits or releases, \
and any highlights. Keep it scannable and under 300 words. Use plain text, no markdown headers. \
If there are no new commits for a repo, say so briefly.";

/// Sends the assembled update data to Ollama for a short digest. Any failure
/// along the way selects the plain report instead; summarization is never
/// fatal and never surfaces an error.
pub struct Summarizer {
    client: OllamaClient,
}

impl Summarizer {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }

    pub async fn summarize(&self, summaries: &[RepoSummary], title: &str) -> String {
        let plain = build_report(summaries, title);
        let context = raw_context(summaries);
        if context.trim().is_empty() {
            return plain;
        }

        let prompt = format!("Summarize these git updates into a short digest.\n\n{context}");
        let outcome = self.client.generate(&prompt, Some(SYSTEM_PROMPT)).await;

        // Explicit two-step selection: attempt, then pick the raw report on
        // anything but a non-empty success.
        match outcome {
            Ok(digest) if !digest.is_empty() => {
                let mut lines = header_lines(title);
                lines.push(digest);
                lines.push(String::new());
                lines.join("\n")
            }
            Ok(_) => {
                warn!("Ollama returned an empty digest. Using plain report.");
                plain
            }
            Err(e) => {
                self.log_failure(&e).await;
                plain
            }
        }
    }

    /// On a missing model, list what is installed so the operator can pick a
    /// valid `--ollama-model`.
    async fn log_failure(&self, error: &DigestError) {
        let message = error.to_string();
        if message.contains("HTTP 404") || message.contains("not found") {
            let available = self.client.list_models().await;
            if !available.is_empty() {
                warn!(
                    "Ollama summarization failed ({}). Model '{}' not found. Available: {}. \
                     Use --ollama-model <name>. Using plain report.",
                    message,
                    self.client.model(),
                    available.join(", ")
                );
                return;
            }
        }
        warn!("Ollama summarization failed ({}). Using plain report.", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommitInfo, RepoSummary};

    fn summaries() -> Vec<RepoSummary> {
        let mut summary = RepoSummary::new("https://github.com/a/b", "main");
        summary.commits = vec![CommitInfo::new(
            "0123456789abcdef".to_string(),
            "2026-08-01 12:00".to_string(),
            "alice".to_string(),
            "add feature",
        )];
        vec![summary]
    }

    #[tokio::test]
    async fn test_failing_endpoint_falls_back_to_plain_report() {
        // Connection refused on 127.0.0.1:1, so generate() always fails.
        let client = OllamaClient::new("http://127.0.0.1:1", "gemma3n", 2).unwrap();
        let summarizer = Summarizer::new(client);

        let report = summarizer.summarize(&summaries(), "Digest").await;
        assert!(report.contains("## a/b"));
        assert!(report.contains("alice: add feature"));
    }

    #[tokio::test]
    async fn test_empty_context_skips_the_backend_entirely() {
        let client = OllamaClient::new("http://127.0.0.1:1", "gemma3n", 2).unwrap();
        let summarizer = Summarizer::new(client);

        let report = summarizer.summarize(&[], "Digest").await;
        assert!(report.starts_with("Digest\n======\n"));
    }
}
