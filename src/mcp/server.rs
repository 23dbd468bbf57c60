// file: src/mcp/server.rs
// description: MCP server exposing git-digest as agent-callable tools
// reference: https://docs.rs/rmcp

use crate::config::{Config, default_config_paths, load_dotenv};
use crate::error::DigestError;
use crate::pipeline::{DigestPipeline, RunOptions};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetGitUpdatesParams {
    /// Optional path to repos.yaml. If omitted, uses the default locations.
    pub config_path: Option<String>,
    /// Only show commits new since last run (persists cursor state in the cache dir).
    pub changes_only: Option<bool>,
    /// Use Ollama to generate a short AI digest instead of the raw commit list.
    pub use_ai_summary: Option<bool>,
    /// Ollama model name when use_ai_summary is true (default: from config or OLLAMA_MODEL).
    pub ollama_model: Option<String>,
    /// Report title (default: from config or GIT_DIGEST_DEFAULT_TITLE).
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListTrackedReposParams {
    /// Optional path to repos.yaml. If omitted, uses the default locations.
    pub config_path: Option<String>,
}

/// Each tool call re-resolves configuration and cursors from disk, so calls
/// are independent and serialized by the stdio transport.
#[derive(Clone)]
pub struct GitDigestMcp {
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl GitDigestMcp {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Fetch latest git updates (commits, tags) from configured repos and return a plain-text summary report. Optionally restrict to changes since the last run, or produce an AI digest via a local Ollama server."
    )]
    async fn get_git_updates(
        &self,
        Parameters(params): Parameters<GetGitUpdatesParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("MCP: get_git_updates (changes_only: {:?})", params.changes_only);

        let mut config = load_config(params.config_path.as_deref()).map_err(to_mcp_err)?;
        if let Some(title) = params.title {
            config.default_title = title;
        }
        if let Some(model) = params.ollama_model {
            config.ollama_model = model;
        }

        let options = RunOptions {
            changes_only: params.changes_only.unwrap_or(false),
            ai_summary: params.use_ai_summary.unwrap_or(false),
        };

        let report = DigestPipeline::new(config)
            .run(&options)
            .await
            .map_err(to_mcp_err)?;

        Ok(CallToolResult::success(vec![Content::text(report)]))
    }

    #[tool(description = "List repository URLs currently tracked by the git-digest config.")]
    async fn list_tracked_repos(
        &self,
        Parameters(params): Parameters<ListTrackedReposParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("MCP: list_tracked_repos");

        let config = load_config(params.config_path.as_deref()).map_err(to_mcp_err)?;
        let text = if config.repos.is_empty() {
            "No repos configured.".to_string()
        } else {
            config
                .repos
                .iter()
                .map(|r| r.url.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

impl Default for GitDigestMcp {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
impl ServerHandler for GitDigestMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Fetch latest git updates from configured repos and generate summaries.".into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Load config from the given path or the default locations, with env
/// overrides applied. Same precedence as the CLI.
fn load_config(config_path: Option<&str>) -> crate::error::Result<Config> {
    load_dotenv();
    if let Some(path) = config_path {
        let path = PathBuf::from(path);
        return Ok(Config::from_yaml(&path)?.with_env_overrides());
    }
    for candidate in default_config_paths() {
        if candidate.exists() {
            return Ok(Config::from_yaml(&candidate)?.with_env_overrides());
        }
    }
    Err(DigestError::Config(format!(
        "No config found. Create one of: {}",
        default_config_paths()
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )))
}

fn to_mcp_err(e: DigestError) -> McpError {
    McpError::internal_error(e.to_string(), None)
}

/// Start the MCP server on stdio transport.
pub async fn serve() -> anyhow::Result<()> {
    let server = GitDigestMcp::new();
    info!("MCP server ready on stdio");
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_info_advertises_tools() {
        let server = GitDigestMcp::new();
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_load_config_missing_explicit_path_errors() {
        let err = load_config(Some("/nonexistent/repos.yaml")).unwrap_err();
        assert!(matches!(err, DigestError::Config(_)));
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("repos.yaml");
        std::fs::write(&path, "repos:\n  - https://github.com/a/b.git\n").unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.repos.len(), 1);
    }
}
