use thiserror::Error;

/// Application-wide error type for the analysis core.
///
/// Most of these never reach a UI consumer: adapters turn them into sentinel
/// results or leave session state untouched. They surface as `Err` only from
/// the plumbing layers (HTTP clients, configuration, input validation).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AppError {
    /// A provider or backend endpoint could not be reached, or answered with
    /// a failure status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The reply arrived but did not carry the expected structure.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Saving or re-reading persisted results failed after a successful analysis.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Caller input was rejected before any request was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration is missing or invalid (e.g., a bad environment variable).
    #[error("Configuration error: {0}")]
    Config(String),

    /// An operation did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(format!("HTTP request timed out: {}", err))
        } else if err.is_decode() {
            AppError::MalformedResponse(format!("HTTP body decode error: {}", err))
        } else {
            AppError::Transport(format!("HTTP error: {}", err))
        }
    }
}

impl AppError {
    /// True for failures that happened before or during the exchange itself,
    /// as opposed to a reply that arrived but could not be understood.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_) | AppError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_error_maps_to_malformed_response() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let app_err: AppError = err.into();
        assert!(matches!(app_err, AppError::MalformedResponse(_)));
        assert!(!app_err.is_transport());
    }

    #[test]
    fn test_url_error_maps_to_config() {
        let err = url::Url::parse("not a url").unwrap_err();
        let app_err: AppError = err.into();
        assert!(matches!(app_err, AppError::Config(_)));
    }

    #[test]
    fn test_timeout_counts_as_transport() {
        assert!(AppError::Timeout("slow".into()).is_transport());
        assert!(AppError::Transport("down".into()).is_transport());
        assert!(!AppError::Persistence("save".into()).is_transport());
    }
}
