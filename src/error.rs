use chrono::{DateTime, Duration, Utc};
use rmcp::model::ErrorData;

/// Seconds added to "now" when a rate-limited response does not say when the
/// limit resets.
const RATE_LIMIT_FALLBACK_SECS: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Permission denied: {message}")]
    Permission { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        errors: Vec<serde_json::Value>,
    },

    #[error("Rate limit exceeded: {message} (resets at {reset_at})")]
    RateLimit {
        message: String,
        reset_at: DateTime<Utc>,
    },

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("GitHub API request failed: {0}")]
    Transport(#[source] octocrab::Error),

    #[error("{0}")]
    Graphql(String),

    #[error("Failed to decode GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Missing required parameter: {0}")]
    InvalidParam(String),
}

impl GitHubError {
    /// Classify an HTTP error status the way GitHub's REST API uses them.
    pub fn from_status(
        status: u16,
        message: Option<String>,
        errors: Option<Vec<serde_json::Value>>,
    ) -> Self {
        let message = message.filter(|m| !m.is_empty());
        match status {
            401 => GitHubError::Authentication {
                message: message.unwrap_or_else(|| "Authentication failed".to_string()),
            },
            403 => GitHubError::Permission {
                message: message.unwrap_or_else(|| "Insufficient permissions".to_string()),
            },
            404 => GitHubError::NotFound {
                resource: message.unwrap_or_else(|| "Resource".to_string()),
            },
            409 => GitHubError::Conflict {
                message: message.unwrap_or_else(|| "Conflict occurred".to_string()),
            },
            422 => GitHubError::Validation {
                message: message.unwrap_or_else(|| "Validation failed".to_string()),
                errors: errors.unwrap_or_default(),
            },
            429 => GitHubError::RateLimit {
                message: message.unwrap_or_else(|| "Rate limit exceeded".to_string()),
                // The decoded error body carries no reset timestamp.
                reset_at: Utc::now() + Duration::seconds(RATE_LIMIT_FALLBACK_SECS),
            },
            _ => GitHubError::Api {
                status,
                message: message.unwrap_or_else(|| "GitHub API error".to_string()),
            },
        }
    }

    pub fn to_mcp_error(&self) -> ErrorData {
        match self {
            GitHubError::InvalidParam(_) => ErrorData::invalid_params(self.to_string(), None),
            _ => ErrorData::internal_error(self.to_string(), None),
        }
    }
}

impl From<octocrab::Error> for GitHubError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => GitHubError::from_status(
                source.status_code.as_u16(),
                Some(source.message),
                source.errors,
            ),
            other => GitHubError::Transport(other),
        }
    }
}
