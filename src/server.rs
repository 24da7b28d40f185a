use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{schemars, tool, tool_handler, tool_router, ServerHandler};
use serde::Deserialize;

use crate::error::GitHubError;
use crate::github::{comments, lookup, resolve, reviews, threads};

#[derive(Clone)]
pub struct GithubReviewServer {
    github: Arc<octocrab::Octocrab>,
    tool_router: ToolRouter<Self>,
}

// -- Tool parameter types --

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReviewParams {
    #[schemars(description = "Repository owner (username or organization)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Pull request number")]
    pub pull_number: u64,

    #[schemars(description = "The unique identifier of the review")]
    pub review_id: u64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PullRequestParams {
    #[schemars(description = "Repository owner (username or organization)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Pull request number")]
    pub pull_number: u64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ResolveThreadParams {
    #[schemars(description = "Repository owner (username or organization)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Pull request number")]
    pub pull_number: u64,

    #[schemars(description = "The GraphQL node ID of the review thread to resolve")]
    pub thread_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ThreadParams {
    #[schemars(description = "The GraphQL node ID of the review thread")]
    pub thread_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FetchThreadsBatchParams {
    #[schemars(description = "Array of GraphQL node IDs of the review threads to fetch")]
    pub thread_ids: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ResolveThreadsBatchParams {
    #[schemars(description = "Array of GraphQL node IDs of the review threads to resolve")]
    pub thread_ids: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CommentParams {
    #[schemars(description = "Repository owner (username or organization)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "The ID of the pull request review comment to fetch")]
    pub comment_id: u64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReplyParams {
    #[schemars(description = "Repository owner (username or organization)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Pull request number")]
    pub pull_number: u64,

    #[schemars(description = "The ID of the comment to reply to")]
    pub comment_id: u64,

    #[schemars(description = "The text content of the reply")]
    pub body: String,
}

impl GithubReviewServer {
    pub fn new(github: octocrab::Octocrab) -> Self {
        Self {
            github: Arc::new(github),
            tool_router: Self::tool_router(),
        }
    }

    fn err(&self, e: GitHubError) -> ErrorData {
        e.to_mcp_error()
    }
}

/// Render a result payload as pretty-printed JSON text content.
fn to_result<T: serde::Serialize>(value: &T) -> CallToolResult {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    CallToolResult::success(vec![Content::text(text)])
}

// -- MCP tool handlers (thin wrappers calling the github module) --

#[tool_router]
impl GithubReviewServer {
    #[tool(
        name = "get_pull_request_review",
        description = "Get a specific pull request review"
    )]
    async fn get_pull_request_review(
        &self,
        Parameters(params): Parameters<ReviewParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let review = reviews::get_review(
            &self.github,
            &params.owner,
            &params.repo,
            params.pull_number,
            params.review_id,
        )
        .await
        .map_err(|e| self.err(e))?;
        Ok(to_result(&review))
    }

    #[tool(
        name = "get_pull_request_threads",
        description = "Get all review threads for a pull request in a single call"
    )]
    async fn get_pull_request_threads(
        &self,
        Parameters(params): Parameters<PullRequestParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let listing = threads::list_threads(
            &self.github,
            &params.owner,
            &params.repo,
            params.pull_number,
        )
        .await;
        Ok(to_result(&listing))
    }

    #[tool(
        name = "get_pull_request_review_threads",
        description = "Get the threads in a specific pull request review"
    )]
    async fn get_pull_request_review_threads(
        &self,
        Parameters(params): Parameters<ReviewParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let listing = threads::list_review_threads(
            &self.github,
            &params.owner,
            &params.repo,
            params.pull_number,
            params.review_id,
        )
        .await;
        Ok(to_result(&listing))
    }

    #[tool(
        name = "check_pull_request_review_resolution",
        description = "Check if all threads in a pull request review are resolved"
    )]
    async fn check_pull_request_review_resolution(
        &self,
        Parameters(params): Parameters<ReviewParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let report = threads::check_review_resolution(
            &self.github,
            &params.owner,
            &params.repo,
            params.pull_number,
            params.review_id,
        )
        .await;
        Ok(to_result(&report))
    }

    #[tool(
        name = "resolve_pull_request_review_thread",
        description = "Mark a pull request review thread as resolved"
    )]
    async fn resolve_pull_request_review_thread(
        &self,
        Parameters(params): Parameters<ResolveThreadParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = resolve::resolve_thread(&self.github, &params.thread_id).await;
        Ok(to_result(&outcome))
    }

    #[tool(
        name = "resolve_pull_request_review_threads_batch",
        description = "Resolve multiple pull request review threads in a single call"
    )]
    async fn resolve_pull_request_review_threads_batch(
        &self,
        Parameters(params): Parameters<ResolveThreadsBatchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let report = resolve::resolve_threads_batch(&self.github, &params.thread_ids).await;
        Ok(to_result(&report))
    }

    #[tool(
        name = "get_pull_request_thread",
        description = "Get a single pull request review thread with complete comment details"
    )]
    async fn get_pull_request_thread(
        &self,
        Parameters(params): Parameters<ThreadParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = lookup::get_thread(&self.github, &params.thread_id).await;
        Ok(to_result(&result))
    }

    #[tool(
        name = "get_pull_request_threads_batch",
        description = "Get multiple pull request review threads with complete comment details in a single call"
    )]
    async fn get_pull_request_threads_batch(
        &self,
        Parameters(params): Parameters<FetchThreadsBatchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = lookup::get_threads_batch(&self.github, &params.thread_ids).await;
        Ok(to_result(&result))
    }

    #[tool(
        name = "get_pull_request_comment",
        description = "Get a specific pull request review comment"
    )]
    async fn get_pull_request_comment(
        &self,
        Parameters(params): Parameters<CommentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let comment = comments::get_comment(
            &self.github,
            &params.owner,
            &params.repo,
            params.comment_id,
        )
        .await
        .map_err(|e| self.err(e))?;
        Ok(to_result(&comment))
    }

    #[tool(
        name = "reply_to_pull_request_comment",
        description = "Add a reply to a specific pull request review comment"
    )]
    async fn reply_to_pull_request_comment(
        &self,
        Parameters(params): Parameters<ReplyParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let reply = comments::reply_to_comment(
            &self.github,
            &params.owner,
            &params.repo,
            params.pull_number,
            params.comment_id,
            &params.body,
        )
        .await
        .map_err(|e| self.err(e))?;
        Ok(to_result(&reply))
    }
}

#[tool_handler]
impl ServerHandler for GithubReviewServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mcp-github-review".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "GitHub pull request review server. Use get_pull_request_review for a review, \
                 get_pull_request_threads to list every thread on a PR, \
                 get_pull_request_review_threads for the threads of one review, \
                 check_pull_request_review_resolution to see if a review is fully resolved, \
                 resolve_pull_request_review_thread (or the _batch variant) to resolve threads, \
                 get_pull_request_thread (or the _batch variant) for full thread details, \
                 and get_pull_request_comment/reply_to_pull_request_comment for review comments."
                    .to_string(),
            ),
        }
    }
}
