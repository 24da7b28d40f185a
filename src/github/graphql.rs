//! GraphQL plumbing shared by the review-thread operations.
//!
//! GitHub reports GraphQL-level failures inside an otherwise-200 response as
//! a top-level `errors` array; the helpers here decode those entries and
//! classify them by type or message substring. HTTP-level failures never
//! reach this module: octocrab surfaces them before a body is decoded.

use indoc::indoc;
use serde::Deserialize;

/// Review threads fetched per pull request in one page.
pub(crate) const THREAD_PAGE: u32 = 100;

/// Comments loaded per thread by the list query. Review correlation only
/// sees this first page, so a thread whose correlating comment sits beyond
/// it will not be matched. The by-ID queries use the larger
/// [`DETAIL_COMMENT_PAGE`]; the two caps are intentionally distinct.
pub(crate) const LIST_COMMENT_PAGE: u32 = 15;

/// Comments loaded per thread by the single and batch by-ID queries.
pub(crate) const DETAIL_COMMENT_PAGE: u32 = 50;

pub(crate) const PULL_REQUEST_THREADS_QUERY: &str = indoc! {"
    query PullRequestThreads($owner: String!, $repo: String!, $pullNumber: Int!, $threadPage: Int!, $commentPage: Int!) {
      repository(owner: $owner, name: $repo) {
        pullRequest(number: $pullNumber) {
          reviewThreads(first: $threadPage) {
            nodes {
              id
              isResolved
              comments(first: $commentPage) {
                nodes {
                  pullRequestReview {
                    id
                    databaseId
                  }
                  author {
                    login
                  }
                  bodyText
                }
              }
            }
          }
        }
      }
    }
"};

pub(crate) const REVIEW_THREAD_QUERY: &str = indoc! {"
    query ReviewThread($threadId: ID!, $commentPage: Int!) {
      node(id: $threadId) {
        ... on PullRequestReviewThread {
          ...ThreadFields
        }
      }
    }

    fragment ThreadFields on PullRequestReviewThread {
      id
      isResolved
      comments(first: $commentPage) {
        nodes {
          id
          databaseId
          bodyText
          createdAt
          author {
            login
          }
          pullRequestReview {
            databaseId
          }
        }
      }
    }
"};

pub(crate) const RESOLVE_THREAD_MUTATION: &str = indoc! {"
    mutation ResolveReviewThread($input: ResolveReviewThreadInput!) {
      resolveReviewThread(input: $input) {
        thread {
          id
          isResolved
        }
      }
    }
"};

const THREAD_FIELDS_FRAGMENT: &str = indoc! {"
    fragment ThreadFields on PullRequestReviewThread {
      id
      isResolved
      comments(first: $commentPage) {
        nodes {
          id
          databaseId
          bodyText
          createdAt
          author {
            login
          }
          pullRequestReview {
            databaseId
          }
        }
      }
    }
"};

/// Build a single query that looks up `count` thread nodes through generated
/// aliases (`thread0`, `thread1`, ...). Alias names come from the index and
/// the IDs travel as variables, so caller input never lands in query text.
pub(crate) fn batch_thread_query(count: usize) -> String {
    let declarations = (0..count)
        .map(|i| format!("$id{i}: ID!"))
        .collect::<Vec<_>>()
        .join(", ");
    let lookups = (0..count)
        .map(|i| format!("  thread{i}: node(id: $id{i}) {{\n    ... on PullRequestReviewThread {{\n      ...ThreadFields\n    }}\n  }}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "query ReviewThreadsBatch({declarations}, $commentPage: Int!) {{\n{lookups}\n}}\n\n{THREAD_FIELDS_FRAGMENT}"
    )
}

/// Response envelope for GitHub GraphQL calls. Both halves are optional:
/// error responses omit `data`, success responses omit `errors`.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlErrorEntry>>,
}

/// One entry of a top-level GraphQL `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GraphQlErrorEntry {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub message: Option<String>,
}

impl GraphQlErrorEntry {
    /// Permission failures are reported either with a typed entry or only a
    /// message, depending on the credential kind (integration vs PAT).
    pub(crate) fn is_forbidden(&self) -> bool {
        self.error_type.as_deref() == Some("FORBIDDEN")
            || self
                .message
                .as_deref()
                .is_some_and(|m| m.contains("Resource not accessible"))
    }

    pub(crate) fn is_not_found(&self) -> bool {
        self.error_type.as_deref() == Some("NOT_FOUND")
            || self
                .message
                .as_deref()
                .is_some_and(|m| m.contains("Could not resolve"))
    }

    fn label(&self) -> String {
        match (self.error_type.as_deref(), self.message.as_deref()) {
            (Some(t), Some(m)) => format!("{t}: {m}"),
            (Some(t), None) => t.to_string(),
            (None, Some(m)) => m.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Join error entries as `"type: message; type: message"`, dropping absent
/// parts. May be empty when every entry is blank.
pub(crate) fn error_summary(entries: &[GraphQlErrorEntry]) -> String {
    entries
        .iter()
        .map(GraphQlErrorEntry::label)
        .filter(|label| !label.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Join just the error messages with `", "`.
pub(crate) fn joined_messages(entries: &[GraphQlErrorEntry]) -> String {
    entries
        .iter()
        .filter_map(|e| e.message.as_deref())
        .collect::<Vec<_>>()
        .join(", ")
}
