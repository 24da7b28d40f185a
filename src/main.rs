use anyhow::Result;
use clap::Parser;
use mcp_github_review::server;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

/// MCP server for GitHub pull request reviews — lets LLMs fetch reviews,
/// inspect review threads, reply to comments, and resolve threads
#[derive(Parser)]
#[command(name = "mcp-github-review", version, about)]
struct Cli {
    /// GitHub personal access token.
    /// Can also be set via GITHUB_TOKEN environment variable.
    #[arg(long)]
    token: Option<String>,

    /// Read GitHub token from an environment variable.
    /// Default: GITHUB_TOKEN
    #[arg(long = "token-env")]
    token_env: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Resolve token: --token > --token-env > GITHUB_TOKEN
    let token = if let Some(t) = cli.token {
        Some(t)
    } else {
        let env_name = cli.token_env.as_deref().unwrap_or("GITHUB_TOKEN");
        match std::env::var(env_name) {
            Ok(t) if !t.is_empty() => {
                tracing::info!(env = env_name, "Read GitHub token from environment variable");
                Some(t)
            }
            _ => None,
        }
    };

    // Resolving threads and posting replies are useless unauthenticated, so
    // a missing token is fatal rather than a degraded mode.
    let Some(token) = token else {
        anyhow::bail!(
            "A GitHub token is required. Pass --token or set the GITHUB_TOKEN environment variable."
        );
    };

    let github = octocrab::OctocrabBuilder::new()
        .personal_token(token)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create GitHub client: {}", e))?;

    tracing::info!("Starting mcp-github-review server");

    let service = server::GithubReviewServer::new(github);
    let running = service.serve(stdio()).await?;
    running.waiting().await?;

    Ok(())
}
