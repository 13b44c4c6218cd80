//! Error taxonomy for catalog requests and facet edits.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("search text must not be empty")]
    EmptyQuery,
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("catalog returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected catalog response: {0}")]
    Decode(String),
    #[error("catalog request timed out after {0:?}")]
    Timeout(Duration),
}

impl SearchError {
    /// Banner text for the display layer.
    pub fn user_message(&self) -> String {
        match self {
            SearchError::EmptyQuery => "Type a course code or title to search.".to_string(),
            SearchError::Timeout(_) => {
                "The course catalog took too long to respond; please try again.".to_string()
            }
            SearchError::Transport(detail) => {
                let lower = detail.to_ascii_lowercase();
                if lower.contains("dns")
                    || lower.contains("connection refused")
                    || lower.contains("failed to connect")
                    || lower.contains("error sending request")
                {
                    "Course catalog unreachable; check your connection and retry.".to_string()
                } else {
                    format!("Search failed: {detail}")
                }
            }
            SearchError::Status { status, message } => match status {
                404 => "The course catalog could not find that resource.".to_string(),
                429 => "Too many searches in a short time; wait a moment and retry.".to_string(),
                500..=599 => {
                    format!("The course catalog is having trouble (HTTP {status}); please retry.")
                }
                _ => format!("Search failed (HTTP {status}): {message}"),
            },
            SearchError::Decode(_) => {
                "Received an unexpected response from the course catalog.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            SearchError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("error").to_string(),
            }
        } else {
            SearchError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FacetError {
    #[error("no departments are loaded for {0}")]
    DepartmentsUnavailable(String),
    #[error("department '{0}' is not offered by the selected college")]
    UnknownDepartment(String),
}
