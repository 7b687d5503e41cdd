//! Custom error types for the MCP server.

use oura_client::OuraError;
use schemars::JsonSchema;
use serde::Serialize;
use thiserror::Error;

/// Tool-boundary errors. Every variant is converted into an error-shaped
/// tool reply; none escape as protocol faults.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Access token is required")]
    MissingToken,

    #[error("Invalid Oura API token. Please check your Personal Access Token and try again.")]
    RejectedToken,

    #[error("Invalid date format: {0}. Expected format: YYYY-MM-DD")]
    InvalidDate(String),

    #[error(transparent)]
    Client(#[from] OuraError),
}

/// Machine-readable label carried alongside the error message in tool replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidToken,
    InvalidDateFormat,
    ApiError,
    NetworkError,
}

impl ServerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServerError::MissingToken | ServerError::RejectedToken => ErrorKind::InvalidToken,
            ServerError::InvalidDate(_) => ErrorKind::InvalidDateFormat,
            ServerError::Client(OuraError::Network(_)) => ErrorKind::NetworkError,
            ServerError::Client(_) => ErrorKind::ApiError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_per_variant() {
        assert_eq!(ServerError::MissingToken.kind(), ErrorKind::InvalidToken);
        assert_eq!(ServerError::RejectedToken.kind(), ErrorKind::InvalidToken);
        assert_eq!(
            ServerError::InvalidDate("nope".into()).kind(),
            ErrorKind::InvalidDateFormat
        );
        assert_eq!(
            ServerError::Client(OuraError::Api {
                status: 500,
                body: "boom".into()
            })
            .kind(),
            ErrorKind::ApiError
        );
    }

    #[test]
    fn kind_labels_serialize_snake_case() {
        assert_eq!(
            serde_json::to_value(ErrorKind::InvalidToken).unwrap(),
            "invalid_token"
        );
        assert_eq!(
            serde_json::to_value(ErrorKind::NetworkError).unwrap(),
            "network_error"
        );
    }
}
