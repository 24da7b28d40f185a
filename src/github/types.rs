//! Entity and result-payload types for the review tools.
//!
//! REST entities keep GitHub's snake_case field names; everything computed
//! by this crate serializes in camelCase with absent optionals omitted,
//! matching the wire shapes the tools advertise.

use serde::{Deserialize, Serialize};

// -- REST entities --

/// The user object GitHub attaches to reviews and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub login: String,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
}

/// A pull request review as returned by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub node_id: String,
    pub user: Account,
    pub body: Option<String>,
    pub state: ReviewState,
    pub html_url: String,
    pub pull_request_url: String,
    pub commit_id: String,
    /// Null while the review is still pending.
    pub submitted_at: Option<String>,
    pub author_association: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRef {
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentLinks {
    #[serde(rename = "self")]
    pub self_link: LinkRef,
    pub html: LinkRef,
    pub pull_request: LinkRef,
}

/// A review comment anchored to a diff location, as returned by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewComment {
    pub url: String,
    pub id: u64,
    pub node_id: String,
    /// Null for general PR comments that are not tied to a review. A reply's
    /// review may differ from its parent's.
    pub pull_request_review_id: Option<u64>,
    pub diff_hunk: String,
    pub path: Option<String>,
    pub position: Option<u64>,
    pub original_position: Option<u64>,
    pub commit_id: String,
    pub original_commit_id: String,
    pub user: Account,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
    pub html_url: String,
    pub pull_request_url: String,
    pub author_association: String,
    #[serde(rename = "_links")]
    pub links: CommentLinks,
}

// -- GraphQL projections --

/// One comment of a review thread, flattened from the GraphQL node shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadComment {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_id: Option<u64>,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub created_at: String,
    /// Database ID of the owning review, when the comment belongs to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_id: Option<u64>,
}

/// A review thread with its full loaded comment page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadDetail {
    pub id: String,
    pub is_resolved: bool,
    pub comments: Vec<ThreadComment>,
}

/// A review thread as reported by the listing tools.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub id: String,
    pub is_resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_id: Option<u64>,
    /// First 100 characters of the thread's first comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_comment: Option<String>,
}

// -- Result payloads --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadListing {
    pub threads: Vec<ThreadSummary>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedThread {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_comment: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionReport {
    pub all_resolved: bool,
    pub total_threads: usize,
    pub resolved_threads: usize,
    pub unresolved_threads: Vec<UnresolvedThread>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveBatchEntry {
    pub thread_id: String,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveBatchReport {
    pub results: Vec<ResolveBatchEntry>,
    pub all_succeeded: bool,
    pub success_count: usize,
    pub failure_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadLookup {
    pub thread: Option<ThreadDetail>,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchThreadError {
    pub thread_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadBatch {
    pub threads: Vec<ThreadDetail>,
    pub errors: Vec<BatchThreadError>,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_state_round_trip() {
        let state: ReviewState = serde_json::from_str(r#""CHANGES_REQUESTED""#).unwrap();
        assert_eq!(state, ReviewState::ChangesRequested);
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            r#""CHANGES_REQUESTED""#
        );
    }

    #[test]
    fn test_thread_summary_omits_absent_optionals() {
        let summary = ThreadSummary {
            id: "PRRT_1".to_string(),
            is_resolved: false,
            review_id: None,
            first_comment: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "PRRT_1", "isResolved": false})
        );
    }

    #[test]
    fn test_resolution_report_field_names() {
        let report = ResolutionReport {
            all_resolved: true,
            total_threads: 0,
            resolved_threads: 0,
            unresolved_threads: vec![],
            success: true,
            error: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "allResolved": true,
                "totalThreads": 0,
                "resolvedThreads": 0,
                "unresolvedThreads": [],
                "success": true
            })
        );
    }

    #[test]
    fn test_review_comment_links_field() {
        let json = serde_json::json!({
            "url": "https://api.github.com/repos/o/r/pulls/comments/1",
            "id": 1,
            "node_id": "PRRC_1",
            "pull_request_review_id": 42,
            "diff_hunk": "@@ -1 +1 @@",
            "path": "src/lib.rs",
            "position": 3,
            "original_position": 3,
            "commit_id": "abc",
            "original_commit_id": "abc",
            "user": {"login": "octocat", "id": 1},
            "body": "nit",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "html_url": "https://github.com/o/r/pull/1#discussion_r1",
            "pull_request_url": "https://api.github.com/repos/o/r/pulls/1",
            "author_association": "MEMBER",
            "_links": {
                "self": {"href": "a"},
                "html": {"href": "b"},
                "pull_request": {"href": "c"}
            }
        });
        let comment: ReviewComment = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(comment.links.self_link.href, "a");
        assert_eq!(comment.pull_request_review_id, Some(42));

        let back = serde_json::to_value(&comment).unwrap();
        assert_eq!(back.get("_links"), json.get("_links"));
    }
}
