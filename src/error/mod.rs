use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("RPC protocol error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Remote report source errors.
///
/// All of these are recoverable: callers degrade to "no new data" and keep
/// serving whatever the store already holds.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source unavailable: {message} (attempts: {attempts})")]
    Unavailable { message: String, attempts: u32 },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// JSON-RPC protocol errors
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Unknown tool: {tool_name}")]
    UnknownTool { tool_name: String },

    #[error("Invalid parameters for {tool_name}: {message}")]
    InvalidParameters { tool_name: String, message: String },

    #[error("Tool execution failed: {message}")]
    ExecutionFailed { message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Selection-session errors surfaced as user-visible messages.
///
/// A missing report is not an error at all (lookups return `Option`); these
/// cover the two recoverable "the user gave us nothing" conditions.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Nothing selected: add at least one stock before generating")]
    NothingSelected,

    #[error("The input is empty. Please enter one or more stock names")]
    EmptyInput,
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<AppError> for RpcError {
    fn from(err: AppError) -> Self {
        RpcError::ExecutionFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type alias for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config {
            message: "missing key".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration error: missing key");

        let err = AppError::Internal {
            message: "unexpected".to_string(),
        };
        assert_eq!(err.to_string(), "Internal error: unexpected");
    }

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Unavailable {
            message: "connection refused".to_string(),
            attempts: 4,
        };
        assert_eq!(
            err.to_string(),
            "Source unavailable: connection refused (attempts: 4)"
        );

        let err = SourceError::Api {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 401 - unauthorized");

        let err = SourceError::InvalidResponse {
            message: "malformed JSON".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid response: malformed JSON");

        let err = SourceError::Timeout { timeout_ms: 5000 };
        assert_eq!(err.to_string(), "Request timeout after 5000ms");
    }

    #[test]
    fn test_rpc_error_display() {
        let err = RpcError::InvalidRequest {
            message: "bad format".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid request: bad format");

        let err = RpcError::UnknownTool {
            tool_name: "nonexistent".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown tool: nonexistent");

        let err = RpcError::InvalidParameters {
            tool_name: "reports_browse_get".to_string(),
            message: "missing name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid parameters for reports_browse_get: missing name"
        );

        let err = RpcError::ExecutionFailed {
            message: "lookup failed".to_string(),
        };
        assert_eq!(err.to_string(), "Tool execution failed: lookup failed");
    }

    #[test]
    fn test_session_error_display() {
        assert_eq!(
            SessionError::NothingSelected.to_string(),
            "Nothing selected: add at least one stock before generating"
        );
        assert_eq!(
            SessionError::EmptyInput.to_string(),
            "The input is empty. Please enter one or more stock names"
        );
    }

    #[test]
    fn test_session_error_conversion_to_app_error() {
        let app_err: AppError = SessionError::NothingSelected.into();
        assert!(matches!(app_err, AppError::Internal { .. }));
        assert!(app_err.to_string().contains("Nothing selected"));
    }

    #[test]
    fn test_app_error_conversion_to_rpc_error() {
        let app_err = AppError::Config {
            message: "test error".to_string(),
        };
        let rpc_err: RpcError = app_err.into();
        assert!(matches!(rpc_err, RpcError::ExecutionFailed { .. }));
        assert!(rpc_err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_source_error_conversion_to_app_error() {
        let source_err = SourceError::Timeout { timeout_ms: 1000 };
        let app_err: AppError = source_err.into();
        assert!(matches!(app_err, AppError::Source(_)));
    }

    #[test]
    fn test_rpc_error_conversion_to_app_error() {
        let rpc_err = RpcError::UnknownTool {
            tool_name: "test".to_string(),
        };
        let app_err: AppError = rpc_err.into();
        assert!(matches!(app_err, AppError::Rpc(_)));
    }
}
