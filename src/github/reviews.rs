//! REST review operations. These propagate errors to the caller instead of
//! folding them into a result payload.

use octocrab::Octocrab;

use super::sanitize_github_name;
use super::types::Review;
use crate::error::GitHubError;

/// Fetch a single pull request review by its numeric ID.
pub async fn get_review(
    github: &Octocrab,
    owner: &str,
    repo: &str,
    pull_number: u64,
    review_id: u64,
) -> Result<Review, GitHubError> {
    sanitize_github_name(owner, "owner")?;
    sanitize_github_name(repo, "repo")?;

    let route = format!("/repos/{owner}/{repo}/pulls/{pull_number}/reviews/{review_id}");
    let response: serde_json::Value = github
        .get(&route, None::<&()>)
        .await
        .map_err(GitHubError::from)?;

    Ok(serde_json::from_value(response)?)
}
