//! REST review-comment operations. Like [`super::reviews`], these raise on
//! failure.

use octocrab::Octocrab;

use super::sanitize_github_name;
use super::types::ReviewComment;
use crate::error::GitHubError;

/// Fetch a single review comment by its numeric ID.
pub async fn get_comment(
    github: &Octocrab,
    owner: &str,
    repo: &str,
    comment_id: u64,
) -> Result<ReviewComment, GitHubError> {
    sanitize_github_name(owner, "owner")?;
    sanitize_github_name(repo, "repo")?;

    let route = format!("/repos/{owner}/{repo}/pulls/comments/{comment_id}");
    let response: serde_json::Value = github
        .get(&route, None::<&()>)
        .await
        .map_err(GitHubError::from)?;

    Ok(serde_json::from_value(response)?)
}

/// Reply to a review comment. The reply is a new comment whose review may
/// differ from the parent's.
pub async fn reply_to_comment(
    github: &Octocrab,
    owner: &str,
    repo: &str,
    pull_number: u64,
    comment_id: u64,
    body: &str,
) -> Result<ReviewComment, GitHubError> {
    sanitize_github_name(owner, "owner")?;
    sanitize_github_name(repo, "repo")?;

    let route =
        format!("/repos/{owner}/{repo}/pulls/{pull_number}/comments/{comment_id}/replies");
    let payload = serde_json::json!({ "body": body });
    let response: serde_json::Value = github
        .post(&route, Some(&payload))
        .await
        .map_err(GitHubError::from)?;

    Ok(serde_json::from_value(response)?)
}
