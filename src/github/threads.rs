//! Pull-request-level thread listing, review correlation, and the
//! resolution-completeness check.
//!
//! A thread's association to a review is derived, not stored: the thread
//! belongs to a review when any comment in its loaded page references the
//! review's database ID. Comments beyond the loaded page are invisible to
//! that correlation (see `LIST_COMMENT_PAGE`).

use octocrab::Octocrab;
use serde::Deserialize;

use super::graphql::{
    error_summary, GraphQlResponse, LIST_COMMENT_PAGE, PULL_REQUEST_THREADS_QUERY, THREAD_PAGE,
};
use super::types::{ResolutionReport, ThreadListing, ThreadSummary, UnresolvedThread};
use crate::error::GitHubError;

/// Characters of the first comment reported by the listing tools.
const FIRST_COMMENT_EXCERPT: usize = 100;

#[derive(Debug, Default, Deserialize)]
struct ThreadsData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    pull_request: Option<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    review_threads: Option<ThreadConnection>,
}

#[derive(Debug, Deserialize)]
struct ThreadConnection {
    nodes: Option<Vec<ThreadNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadNode {
    id: String,
    is_resolved: bool,
    comments: Option<CommentConnection>,
}

#[derive(Debug, Deserialize)]
struct CommentConnection {
    nodes: Option<Vec<CommentNode>>,
}

// The query also asks for each comment's author; listing only consumes the
// review back-reference and the body, so the decode skips the rest.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentNode {
    pull_request_review: Option<ReviewRef>,
    body_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRef {
    database_id: Option<u64>,
}

impl ThreadsData {
    fn into_nodes(self) -> Option<Vec<ThreadNode>> {
        self.repository?.pull_request?.review_threads?.nodes
    }
}

impl ThreadNode {
    fn comment_nodes(&self) -> &[CommentNode] {
        self.comments
            .as_ref()
            .and_then(|c| c.nodes.as_deref())
            .unwrap_or(&[])
    }

    fn mentions_review(&self, review_id: u64) -> bool {
        self.comment_nodes().iter().any(|comment| {
            comment
                .pull_request_review
                .as_ref()
                .and_then(|r| r.database_id)
                == Some(review_id)
        })
    }

    fn first_comment_review_id(&self) -> Option<u64> {
        self.comment_nodes()
            .first()?
            .pull_request_review
            .as_ref()?
            .database_id
    }

    fn first_comment_excerpt(&self) -> Option<String> {
        self.comment_nodes()
            .first()?
            .body_text
            .as_deref()
            .map(|body| truncate(body, FIRST_COMMENT_EXCERPT))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Fetch one page of review threads for a pull request.
///
/// Raises on transport failures and on GraphQL-level errors; callers in this
/// module fold those into their result payloads.
async fn fetch_pull_request_threads(
    github: &Octocrab,
    owner: &str,
    repo: &str,
    pull_number: u64,
) -> Result<ThreadsData, GitHubError> {
    tracing::debug!(owner, repo, pull_number, "fetching review threads");

    let payload = serde_json::json!({
        "query": PULL_REQUEST_THREADS_QUERY,
        "variables": {
            "owner": owner,
            "repo": repo,
            "pullNumber": pull_number,
            "threadPage": THREAD_PAGE,
            "commentPage": LIST_COMMENT_PAGE,
        },
    });

    let response: GraphQlResponse<ThreadsData> =
        github.graphql(&payload).await.map_err(GitHubError::from)?;

    if let Some(errors) = response.errors.as_deref().filter(|e| !e.is_empty()) {
        let summary = error_summary(errors);
        let details = if summary.is_empty() {
            "Unknown error".to_string()
        } else {
            summary
        };
        return Err(GitHubError::Graphql(format!(
            "GraphQL error while fetching review threads: {details}"
        )));
    }

    Ok(response.data.unwrap_or_default())
}

/// List every review thread on a pull request, with the review ID and an
/// excerpt of each thread's first comment.
pub async fn list_threads(
    github: &Octocrab,
    owner: &str,
    repo: &str,
    pull_number: u64,
) -> ThreadListing {
    match fetch_pull_request_threads(github, owner, repo, pull_number).await {
        Ok(data) => {
            let Some(nodes) = data.into_nodes() else {
                return ThreadListing {
                    threads: vec![],
                    success: true,
                    error: None,
                };
            };
            let threads = nodes
                .into_iter()
                .map(|thread| ThreadSummary {
                    review_id: thread.first_comment_review_id(),
                    first_comment: thread.first_comment_excerpt(),
                    is_resolved: thread.is_resolved,
                    id: thread.id,
                })
                .collect();
            ThreadListing {
                threads,
                success: true,
                error: None,
            }
        }
        Err(err) => ThreadListing {
            threads: vec![],
            success: false,
            error: Some(err.to_string()),
        },
    }
}

/// List the threads that belong to one review.
pub async fn list_review_threads(
    github: &Octocrab,
    owner: &str,
    repo: &str,
    pull_number: u64,
    review_id: u64,
) -> ThreadListing {
    match fetch_pull_request_threads(github, owner, repo, pull_number).await {
        Ok(data) => {
            let Some(nodes) = data.into_nodes() else {
                return ThreadListing {
                    threads: vec![],
                    success: true,
                    error: None,
                };
            };
            let threads = nodes
                .into_iter()
                .filter(|thread| thread.mentions_review(review_id))
                .map(|thread| ThreadSummary {
                    review_id: None,
                    first_comment: thread.first_comment_excerpt(),
                    is_resolved: thread.is_resolved,
                    id: thread.id,
                })
                .collect();
            ThreadListing {
                threads,
                success: true,
                error: None,
            }
        }
        Err(err) => ThreadListing {
            threads: vec![],
            success: false,
            error: Some(err.to_string()),
        },
    }
}

/// Answer "are all threads under this review resolved?".
///
/// A review with no correlated threads reports `all_resolved: true`; there
/// is nothing left to resolve.
pub async fn check_review_resolution(
    github: &Octocrab,
    owner: &str,
    repo: &str,
    pull_number: u64,
    review_id: u64,
) -> ResolutionReport {
    match fetch_pull_request_threads(github, owner, repo, pull_number).await {
        Ok(data) => {
            let Some(nodes) = data.into_nodes() else {
                return ResolutionReport {
                    all_resolved: true,
                    total_threads: 0,
                    resolved_threads: 0,
                    unresolved_threads: vec![],
                    success: true,
                    error: None,
                };
            };
            let correlated: Vec<ThreadNode> = nodes
                .into_iter()
                .filter(|thread| thread.mentions_review(review_id))
                .collect();
            let resolved_threads = correlated.iter().filter(|t| t.is_resolved).count();
            let unresolved_threads: Vec<UnresolvedThread> = correlated
                .iter()
                .filter(|t| !t.is_resolved)
                .map(|t| UnresolvedThread {
                    id: t.id.clone(),
                    first_comment: t.first_comment_excerpt(),
                })
                .collect();

            ResolutionReport {
                all_resolved: unresolved_threads.is_empty(),
                total_threads: correlated.len(),
                resolved_threads,
                unresolved_threads,
                success: true,
                error: None,
            }
        }
        Err(err) => ResolutionReport {
            all_resolved: false,
            total_threads: 0,
            resolved_threads: 0,
            unresolved_threads: vec![],
            success: false,
            error: Some(err.to_string()),
        },
    }
}
