//! Bar API client library
//!
//! This crate talks to the remote bar service: the GraphQL endpoint that
//! stores bars and favorite memberships, and the places endpoint used for
//! bar details. It owns the wire types and transport only; domain logic
//! lives in `app-core`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod graphql;
pub mod operations;
pub mod places;

pub use graphql::{BarApiConfig, GraphqlClient, GraphqlRequest, GraphqlResponse, RetryConfig};
pub use operations::{
    BarApiClient, BarConnection, BarMemberNode, BarNode, CreateBarMemberInput, UpdateBarInput,
};
pub use places::{PlaceDetailsResult, PlacesClient, PlacesConfig};

/// Result type for bar API operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bar API operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Non-success HTTP status from the server
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from server
        message: String,
    },

    /// The server answered with a GraphQL `errors` array
    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// The response carried neither data nor errors
    #[error("Empty response for {0}")]
    EmptyData(String),
}

impl Error {
    /// Check if this error is a transient network condition worth retrying
    ///
    /// Statuses treated as transient: 408, 425, 429, 500, 502, 503, 504, 522, 524
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(e) => e.is_timeout() || e.is_connect(),
            Error::Api { status, .. } => {
                matches!(status, 408 | 425 | 429 | 500 | 502 | 503 | 504 | 522 | 524)
            }
            _ => false,
        }
    }
}
