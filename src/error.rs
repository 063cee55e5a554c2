use thiserror::Error;

/// Text shown in place of the result-count line when a search fails.
pub const SEARCH_FAILED_MESSAGE: &str =
    "Error :( are you sure you've typed valid english words? (press F12 for details)";

/// Errors raised while talking to the search backend
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Malformed(err.to_string())
    }
}

impl SearchError {
    /// Whether the request never produced a usable HTTP response
    pub fn is_transport(&self) -> bool {
        matches!(self, SearchError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_errors_become_malformed() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: SearchError = err.into();
        assert!(matches!(err, SearchError::Malformed(_)));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_status_display_includes_body() {
        let err = SearchError::Status {
            status: 404,
            body: "{\"error\": \"nothing\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "backend returned HTTP 404: {\"error\": \"nothing\"}"
        );
    }
}
