// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use git_digest::config::{Config, default_config_paths, expand_tilde, load_dotenv};
use git_digest::pipeline::{DigestPipeline, RunOptions};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "git-digest")]
#[command(version = "0.1.0")]
#[command(
    about = "Fetch latest git updates (commits, releases) from configured repos and print a summary",
    long_about = None
)]
struct Cli {
    /// Path to YAML config file (repos list and options)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to a text file with one repo URL per line (can be repeated)
    #[arg(short, long, value_name = "FILE", action = ArgAction::Append)]
    repos: Vec<PathBuf>,

    /// Directory to cache cloned repos (default: ~/.cache/git-digest)
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Write summary to file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Title for the report (default: from config or GIT_DIGEST_DEFAULT_TITLE)
    #[arg(short, long, value_name = "TITLE")]
    title: Option<String>,

    /// Log progress to stderr
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Only show commits new since last run (persists last-seen commit per repo)
    #[arg(long, action = ArgAction::SetTrue)]
    changes_only: bool,

    /// Use Ollama (local) to generate a short AI digest instead of raw commit list
    #[arg(long, action = ArgAction::SetTrue)]
    ai_summary: bool,

    /// Ollama model name (default: from config or OLLAMA_MODEL)
    #[arg(long, value_name = "MODEL")]
    ollama_model: Option<String>,

    /// Ollama base URL (default: from config or OLLAMA_BASE_URL)
    #[arg(long, value_name = "URL")]
    ollama_url: Option<String>,

    /// Ollama request timeout in seconds (default: from config or OLLAMA_TIMEOUT)
    #[arg(long, value_name = "SECS")]
    ollama_timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP (Model Context Protocol) server for agentic tool integration
    Mcp {
        #[arg(long, default_value = "stdio")]
        transport: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let cli = Cli::parse();
    git_digest::utils::logging::init_logger(cli.verbose);

    if let Some(Commands::Mcp { transport }) = &cli.command {
        if transport != "stdio" {
            bail!("Unsupported transport: {transport} (only stdio is supported)");
        }
        return git_digest::mcp::server::serve().await;
    }

    let config = resolve_config(&cli)?;
    let pipeline = DigestPipeline::new(config);
    let options = RunOptions {
        changes_only: cli.changes_only,
        ai_summary: cli.ai_summary,
    };

    let report = pipeline.run(&options).await?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &report)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Wrote report to {}", path.display());
        }
        None => println!("{report}"),
    }

    Ok(())
}

/// Resolve configuration with the documented precedence:
/// flags > environment > YAML file > built-in defaults.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(path) = &cli.config {
        Config::from_yaml(path).context("Invalid config")?
    } else if !cli.repos.is_empty() {
        let config = Config::from_repo_lists(&cli.repos)?;
        if config.repos.is_empty() {
            bail!("No repos found in given files.");
        }
        config
    } else {
        let candidates = default_config_paths();
        let found = candidates.iter().find(|p| p.exists());
        match found {
            Some(path) => Config::from_yaml(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => bail!(
                "No config found. Use --config FILE or --repos FILE, or create one of: {}",
                candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    };

    config = config.with_env_overrides();

    if let Some(cache_dir) = &cli.cache_dir {
        config.cache_dir = expand_tilde(cache_dir.clone());
    }
    if let Some(title) = &cli.title {
        config.default_title = title.clone();
    }
    if let Some(model) = &cli.ollama_model {
        config.ollama_model = model.clone();
    }
    if let Some(url) = &cli.ollama_url {
        config.ollama_url = url.clone();
    }
    if let Some(timeout) = cli.ollama_timeout {
        config.ollama_timeout = timeout;
    }

    Ok(config)
}
