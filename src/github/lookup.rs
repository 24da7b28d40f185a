//! By-node-ID thread fetches: one thread, or a batch of threads in a single
//! aliased request.
//!
//! Callers must already hold the opaque thread node ID (usually from a prior
//! listing call); numeric review and comment IDs live in a different ID
//! space and cannot be converted here.

use std::collections::HashMap;

use octocrab::Octocrab;
use serde::Deserialize;

use super::graphql::{
    batch_thread_query, error_summary, joined_messages, GraphQlErrorEntry, GraphQlResponse,
    DETAIL_COMMENT_PAGE, REVIEW_THREAD_QUERY,
};
use super::types::{BatchThreadError, ThreadBatch, ThreadComment, ThreadDetail, ThreadLookup};
use crate::error::GitHubError;

#[derive(Debug, Deserialize)]
struct NodeData {
    node: Option<ThreadNode>,
}

/// A `node(id:)` result. The inline fragment yields an empty object for a
/// node that exists but is not a review thread, so `id` is optional and its
/// absence means "not a thread".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadNode {
    id: Option<String>,
    is_resolved: Option<bool>,
    comments: Option<CommentConnection>,
}

#[derive(Debug, Deserialize)]
struct CommentConnection {
    nodes: Option<Vec<CommentNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentNode {
    id: Option<String>,
    database_id: Option<u64>,
    body_text: Option<String>,
    created_at: Option<String>,
    author: Option<AuthorNode>,
    pull_request_review: Option<ReviewRef>,
}

#[derive(Debug, Deserialize)]
struct AuthorNode {
    login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRef {
    database_id: Option<u64>,
}

impl ThreadNode {
    fn into_detail(self) -> Option<ThreadDetail> {
        let id = self.id?;
        let comments = self
            .comments
            .and_then(|connection| connection.nodes)
            .unwrap_or_default()
            .into_iter()
            .map(CommentNode::into_comment)
            .collect();
        Some(ThreadDetail {
            id,
            is_resolved: self.is_resolved.unwrap_or(false),
            comments,
        })
    }
}

impl CommentNode {
    fn into_comment(self) -> ThreadComment {
        ThreadComment {
            id: self.id.unwrap_or_default(),
            database_id: self.database_id,
            body: self.body_text.unwrap_or_default(),
            author: self.author.map(|a| a.login),
            created_at: self.created_at.unwrap_or_default(),
            review_id: self.pull_request_review.and_then(|r| r.database_id),
        }
    }
}

/// Fetch a single review thread by its node ID, with up to 50 comments.
pub async fn get_thread(github: &Octocrab, thread_id: &str) -> ThreadLookup {
    let payload = serde_json::json!({
        "query": REVIEW_THREAD_QUERY,
        "variables": {
            "threadId": thread_id,
            "commentPage": DETAIL_COMMENT_PAGE,
        },
    });

    let response: GraphQlResponse<NodeData> = match github.graphql(&payload).await {
        Ok(response) => response,
        Err(err) => {
            return ThreadLookup {
                thread: None,
                success: false,
                message: format!("Failed to fetch thread: {}", GitHubError::from(err)),
            };
        }
    };

    if let Some(errors) = response.errors {
        let message = if errors.iter().any(GraphQlErrorEntry::is_not_found) {
            "Thread ID not found or invalid".to_string()
        } else {
            format!("GraphQL error: {}", joined_messages(&errors))
        };
        return ThreadLookup {
            thread: None,
            success: false,
            message,
        };
    }

    match response
        .data
        .and_then(|data| data.node)
        .and_then(ThreadNode::into_detail)
    {
        Some(thread) => ThreadLookup {
            thread: Some(thread),
            success: true,
            message: "Thread retrieved successfully".to_string(),
        },
        None => ThreadLookup {
            thread: None,
            success: false,
            message: "Thread not found".to_string(),
        },
    }
}

/// Fetch many threads in one round trip.
///
/// A top-level GraphQL error fails the whole batch; otherwise each aliased
/// lookup is resolved on its own, and missing threads become per-item
/// errors instead of sinking the rest.
pub async fn get_threads_batch(github: &Octocrab, thread_ids: &[String]) -> ThreadBatch {
    if thread_ids.is_empty() {
        return ThreadBatch {
            threads: vec![],
            errors: vec![],
            success: true,
        };
    }

    let mut variables = serde_json::Map::new();
    for (index, thread_id) in thread_ids.iter().enumerate() {
        variables.insert(format!("id{index}"), serde_json::json!(thread_id));
    }
    variables.insert(
        "commentPage".to_string(),
        serde_json::json!(DETAIL_COMMENT_PAGE),
    );
    let payload = serde_json::json!({
        "query": batch_thread_query(thread_ids.len()),
        "variables": variables,
    });

    let response: GraphQlResponse<HashMap<String, Option<ThreadNode>>> =
        match github.graphql(&payload).await {
            Ok(response) => response,
            Err(err) => {
                return ThreadBatch {
                    threads: vec![],
                    errors: vec![BatchThreadError {
                        thread_id: "batch".to_string(),
                        message: GitHubError::from(err).to_string(),
                    }],
                    success: false,
                };
            }
        };

    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        return ThreadBatch {
            threads: vec![],
            errors: vec![BatchThreadError {
                thread_id: "batch".to_string(),
                message: format!("GraphQL error: {}", error_summary(&errors)),
            }],
            success: false,
        };
    }

    let mut data = response.data.unwrap_or_default();
    let mut threads = Vec::new();
    let mut errors = Vec::new();
    for (index, thread_id) in thread_ids.iter().enumerate() {
        let node = data.remove(&format!("thread{index}")).flatten();
        match node.and_then(ThreadNode::into_detail) {
            Some(detail) => threads.push(detail),
            None => errors.push(BatchThreadError {
                thread_id: thread_id.clone(),
                message: "Thread not found".to_string(),
            }),
        }
    }

    let success = errors.is_empty();
    ThreadBatch {
        threads,
        errors,
        success,
    }
}
