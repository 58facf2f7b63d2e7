//! Ports to the remote data layer
//!
//! The list screen, favorite workflow and details screen talk to the
//! outside world only through these traits. Adapters live in
//! [`crate::memory`] (in-process, for tests and previews) and
//! [`crate::remote`] (the bar API).

use async_trait::async_trait;
use thiserror::Error;

use crate::bars::{Bar, BarId, BarMember, UserId};
use crate::details::PlaceDetails;

/// Errors raised by repository adapters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// Request could not reach the service
    #[error("Network error: {0}")]
    Network(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Write rejected because it would duplicate an existing record
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input or response failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Service temporarily unavailable or not signed in
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Source of the bar list
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BarSource: Send + Sync {
    /// Fetch every bar from the network
    async fn list_bars(&self) -> Result<Vec<Bar>>;
}

/// Point lookup of favorite memberships
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipLookup: Send + Sync {
    /// Find the membership for a (user, bar) pair
    ///
    /// Returns `None` when the user has not favorited the bar.
    async fn find_membership(&self, user_id: &UserId, bar_id: &BarId) -> Result<Option<BarMember>>;
}

/// Creation of favorite memberships
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipWriter: Send + Sync {
    /// Create the membership for a (user, bar) pair
    async fn create_membership(&self, user_id: &UserId, bar_id: &BarId) -> Result<BarMember>;
}

/// Writes to a bar's denormalized favorite state
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BarWriter: Send + Sync {
    /// Persist the bar, including its favorite count
    async fn update_favorite_state(&self, bar: &Bar) -> Result<()>;
}

/// Lookup of third-party place details
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaceDetailsSource: Send + Sync {
    /// Fetch details for a place id
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails>;
}

/// Access to the signed-in session
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Identifier of the signed-in user
    async fn current_user_id(&self) -> Result<UserId>;
}
