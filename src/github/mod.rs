//! GitHub API operations behind the MCP tools.
//!
//! Two calling conventions coexist here and are part of the contract:
//! the REST operations ([`reviews`], [`comments`]) and the thread-fetch
//! primitive propagate [`crate::error::GitHubError`] to the caller, while
//! everything else ([`threads`], [`resolve`], [`lookup`]) captures expected
//! failures into its result payload and never returns `Err`.

use crate::error::GitHubError;

pub mod comments;
mod graphql;
pub mod lookup;
pub mod resolve;
pub mod reviews;
pub mod threads;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

/// Validate that a GitHub owner/repo name doesn't contain characters that
/// could be used for URL injection in raw API routes.
pub(crate) fn sanitize_github_name(name: &str, field: &str) -> Result<(), GitHubError> {
    if name.is_empty() {
        return Err(GitHubError::InvalidParam(format!(
            "{} must not be empty",
            field
        )));
    }
    for ch in ['/', '?', '#', '%', '\0', ' ', '\n', '\t'] {
        if name.contains(ch) {
            return Err(GitHubError::InvalidParam(format!(
                "{} contains invalid character '{}'",
                field, ch
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_github_name_valid() {
        assert!(sanitize_github_name("my-org", "owner").is_ok());
        assert!(sanitize_github_name("user_name", "owner").is_ok());
        assert!(sanitize_github_name("repo.name", "repo").is_ok());
    }

    #[test]
    fn test_sanitize_github_name_empty() {
        assert!(sanitize_github_name("", "owner").is_err());
    }

    #[test]
    fn test_sanitize_github_name_slash() {
        assert!(sanitize_github_name("owner/repo", "owner").is_err());
        assert!(sanitize_github_name("../etc", "owner").is_err());
    }

    #[test]
    fn test_sanitize_github_name_query() {
        assert!(sanitize_github_name("owner?evil=1", "owner").is_err());
        assert!(sanitize_github_name("repo#fragment", "repo").is_err());
    }

    #[test]
    fn test_sanitize_github_name_whitespace() {
        assert!(sanitize_github_name("my repo", "repo").is_err());
        assert!(sanitize_github_name("my\nrepo", "repo").is_err());
    }
}
