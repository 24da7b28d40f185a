//! The thread-resolution mutation and its concurrent batch form.
//!
//! Every failure mode here is folded into the returned payload; these
//! functions never return `Err`. Re-invoking after a transient failure is
//! safe: resolving an already-resolved thread reports success again.

use chrono::Utc;
use futures::future;
use octocrab::Octocrab;
use serde::Deserialize;

use super::graphql::{joined_messages, GraphQlErrorEntry, GraphQlResponse, RESOLVE_THREAD_MUTATION};
use super::types::{ResolveBatchEntry, ResolveBatchReport, ResolveOutcome};
use crate::error::GitHubError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveData {
    resolve_review_thread: Option<ResolvePayload>,
}

#[derive(Debug, Deserialize)]
struct ResolvePayload {
    thread: Option<ResolvedThread>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolvedThread {
    is_resolved: bool,
}

/// Mark one review thread as resolved.
///
/// The mutation carries a fresh time-derived client mutation ID on every
/// call; retries are not deduplicated against GitHub's own mutation
/// semantics.
pub async fn resolve_thread(github: &Octocrab, thread_id: &str) -> ResolveOutcome {
    let payload = serde_json::json!({
        "query": RESOLVE_THREAD_MUTATION,
        "variables": {
            "input": {
                "threadId": thread_id,
                "clientMutationId": format!("resolve_thread_{}", Utc::now().timestamp_millis()),
            }
        },
    });

    let response: GraphQlResponse<ResolveData> = match github.graphql(&payload).await {
        Ok(response) => response,
        Err(err) => {
            return ResolveOutcome {
                success: false,
                message: format!(
                    "Failed to resolve review thread: {}",
                    GitHubError::from(err)
                ),
            };
        }
    };

    if let Some(errors) = response.errors {
        tracing::warn!(thread_id, count = errors.len(), "resolve mutation returned errors");
        if errors.iter().any(GraphQlErrorEntry::is_forbidden) {
            return ResolveOutcome {
                success: false,
                message: "Permission denied: You don't have permission to resolve this thread"
                    .to_string(),
            };
        }
        if errors.iter().any(GraphQlErrorEntry::is_not_found) {
            return ResolveOutcome {
                success: false,
                message: "Thread ID not found or invalid".to_string(),
            };
        }
        return ResolveOutcome {
            success: false,
            message: format!("GraphQL error: {}", joined_messages(&errors)),
        };
    }

    let resolved = response
        .data
        .and_then(|data| data.resolve_review_thread)
        .and_then(|payload| payload.thread)
        .is_some_and(|thread| thread.is_resolved);

    ResolveOutcome {
        success: resolved,
        message: if resolved {
            "Review thread resolved successfully".to_string()
        } else {
            "Failed to resolve thread".to_string()
        },
    }
}

/// Resolve many threads at once: every mutation is launched up front and the
/// report is assembled after all of them settle. One thread's failure never
/// aborts or skips the others, and results keep the input order.
pub async fn resolve_threads_batch(github: &Octocrab, thread_ids: &[String]) -> ResolveBatchReport {
    if thread_ids.is_empty() {
        return ResolveBatchReport {
            results: vec![],
            all_succeeded: true,
            success_count: 0,
            failure_count: 0,
        };
    }

    tracing::debug!(count = thread_ids.len(), "resolving review threads in batch");

    let outcomes =
        future::join_all(thread_ids.iter().map(|id| resolve_thread(github, id))).await;

    let results: Vec<ResolveBatchEntry> = thread_ids
        .iter()
        .zip(outcomes)
        .map(|(thread_id, outcome)| ResolveBatchEntry {
            thread_id: thread_id.clone(),
            success: outcome.success,
            message: outcome.message,
        })
        .collect();

    let success_count = results.iter().filter(|entry| entry.success).count();
    let failure_count = results.len() - success_count;

    ResolveBatchReport {
        all_succeeded: failure_count == 0,
        results,
        success_count,
        failure_count,
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{github_for, mount_graphql};
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolved_response(id: &str, resolved: bool) -> serde_json::Value {
        json!({
            "data": {
                "resolveReviewThread": {
                    "thread": {"id": id, "isResolved": resolved}
                }
            }
        })
    }

    #[tokio::test]
    async fn test_resolve_thread_success() {
        let server = MockServer::start().await;
        mount_graphql(&server, resolved_response("PRRT_1", true)).await;
        let github = github_for(&server).await;

        let outcome = resolve_thread(&github, "PRRT_1").await;

        assert!(outcome.success);
        assert_eq!(outcome.message, "Review thread resolved successfully");
    }

    #[tokio::test]
    async fn test_resolve_thread_reports_unresolved_result() {
        let server = MockServer::start().await;
        mount_graphql(&server, resolved_response("PRRT_1", false)).await;
        let github = github_for(&server).await;

        let outcome = resolve_thread(&github, "PRRT_1").await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Failed to resolve thread");
    }

    #[tokio::test]
    async fn test_resolve_thread_permission_denied() {
        let server = MockServer::start().await;
        mount_graphql(
            &server,
            json!({"errors": [{"type": "FORBIDDEN", "message": "Resource not accessible by integration"}]}),
        )
        .await;
        let github = github_for(&server).await;

        let outcome = resolve_thread(&github, "PRRT_1").await;

        assert!(!outcome.success);
        assert!(outcome.message.contains("Permission denied"));
    }

    #[tokio::test]
    async fn test_resolve_thread_permission_denied_by_message_only() {
        let server = MockServer::start().await;
        mount_graphql(
            &server,
            json!({"errors": [{"message": "Resource not accessible by personal access token"}]}),
        )
        .await;
        let github = github_for(&server).await;

        let outcome = resolve_thread(&github, "PRRT_1").await;

        assert!(outcome.message.contains("Permission denied"));
    }

    #[tokio::test]
    async fn test_resolve_thread_not_found() {
        let server = MockServer::start().await;
        mount_graphql(
            &server,
            json!({"errors": [{"type": "NOT_FOUND", "message": "Could not resolve to a node"}]}),
        )
        .await;
        let github = github_for(&server).await;

        let outcome = resolve_thread(&github, "PRRT_bogus").await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Thread ID not found or invalid");
    }

    #[tokio::test]
    async fn test_resolve_thread_other_graphql_errors_joined() {
        let server = MockServer::start().await;
        mount_graphql(
            &server,
            json!({"errors": [{"message": "first failure"}, {"message": "second failure"}]}),
        )
        .await;
        let github = github_for(&server).await;

        let outcome = resolve_thread(&github, "PRRT_1").await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "GraphQL error: first failure, second failure");
    }

    #[tokio::test]
    async fn test_resolve_thread_transport_failure_is_captured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"message": "server exploded"})),
            )
            .mount(&server)
            .await;
        let github = github_for(&server).await;

        let outcome = resolve_thread(&github, "PRRT_1").await;

        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Failed to resolve review thread:"));
        assert!(outcome.message.contains("server exploded"));
    }

    #[tokio::test]
    async fn test_batch_empty_input_short_circuits() {
        let server = MockServer::start().await;
        // No mock mounted: an outbound request would fail the test.
        let github = github_for(&server).await;

        let report = resolve_threads_batch(&github, &[]).await;

        assert!(report.all_succeeded);
        assert_eq!(report.success_count, 0);
        assert_eq!(report.failure_count, 0);
        assert!(report.results.is_empty());
    }

    #[tokio::test]
    async fn test_batch_mixed_outcomes_keep_input_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("PRRT_ok"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(resolved_response("PRRT_ok", true)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("PRRT_missing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"errors": [{"type": "NOT_FOUND", "message": "Could not resolve"}]}),
            ))
            .mount(&server)
            .await;
        let github = github_for(&server).await;

        let ids = vec!["PRRT_ok".to_string(), "PRRT_missing".to_string()];
        let report = resolve_threads_batch(&github, &ids).await;

        assert!(!report.all_succeeded);
        assert_eq!(report.success_count, 1);
        assert_eq!(report.failure_count, 1);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].thread_id, "PRRT_ok");
        assert!(report.results[0].success);
        assert_eq!(report.results[1].thread_id, "PRRT_missing");
        assert!(!report.results[1].success);
        assert_eq!(report.results[1].message, "Thread ID not found or invalid");
    }

    #[tokio::test]
    async fn test_batch_all_succeed() {
        let server = MockServer::start().await;
        mount_graphql(&server, resolved_response("PRRT_any", true)).await;
        let github = github_for(&server).await;

        let ids = vec!["PRRT_1".to_string(), "PRRT_2".to_string(), "PRRT_3".to_string()];
        let report = resolve_threads_batch(&github, &ids).await;

        assert!(report.all_succeeded);
        assert_eq!(report.success_count, 3);
        assert_eq!(report.failure_count, 0);
        assert_eq!(report.success_count + report.failure_count, ids.len());
    }
}
