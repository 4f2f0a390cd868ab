//! Client error types
//!
//! Errors raised while talking to the server or handing payloads to the page.
//! Controllers never surface these directly; they turn them into the messages
//! the user sees.

use thiserror::Error;

/// Errors that can occur in the page clients
#[derive(Error, Debug)]
pub enum ClientError {
    /// The native HTTP client failed (connect, redirect loop, body read)
    #[cfg(feature = "native")]
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Any other transport failure, e.g. a rejected browser fetch
    #[error("{0}")]
    Transport(String),

    /// Response body was not the JSON we expected
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Server-embedded chart payload could not be parsed
    #[error("Invalid chart payload: {0}")]
    ChartPayload(String),

    /// The charting library rejected a call
    #[error("Chart error: {0}")]
    Chart(String),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::Transport("Failed to fetch".to_string());
        assert_eq!(err.to_string(), "Failed to fetch");

        let err = ClientError::Chart("Plotly is not loaded".to_string());
        assert_eq!(err.to_string(), "Chart error: Plotly is not loaded");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::Decode(_)));
        assert!(err.to_string().starts_with("Invalid response: "));
    }
}
