//! Favorite workflow
//!
//! Adding a bar to a user's favourites is a check-then-act sequence:
//!
//! 1. Look up the (user, bar) membership.
//! 2. If it exists, report `AlreadyExists` and write nothing.
//! 3. Otherwise create the membership and update the bar's favorite count
//!    concurrently, and wait for both.
//!
//! A failure of either write is reported as `Failed`. A write that did
//! succeed is not undone when its sibling fails, so the membership may exist
//! while the count is stale (or the reverse) until the next successful
//! update.
//!
//! The lookup and the writes are not atomic. Two attempts racing for the
//! same pair can both pass the check; only a uniqueness rule in the
//! membership store rejects the second create.

use std::sync::Arc;
use thiserror::Error;

use crate::bars::{Bar, UserId};
use crate::ports::{BarWriter, MembershipLookup, MembershipWriter, RepositoryError};

/// Reason string for failures that are not write failures
pub const UNEXPECTED_REASON: &str = "unexpected";

/// Reason string for write failures
pub const MUTATION_REASON: &str = "mutation failed";

/// Favorite workflow errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FavoriteError {
    /// Request was malformed before any I/O happened
    #[error("Invalid favorite request: {0}")]
    InvalidInput(String),

    /// Membership lookup could not be completed
    #[error("Membership lookup failed: {0}")]
    LookupFailed(RepositoryError),

    /// One or both writes failed
    #[error(
        "Favorite mutation failed (membership: {}, bar update: {})",
        side(.create),
        side(.update)
    )]
    MutationFailed {
        /// Error from creating the membership, if it failed
        create: Option<RepositoryError>,
        /// Error from updating the bar, if it failed
        update: Option<RepositoryError>,
    },
}

fn side(error: &Option<RepositoryError>) -> String {
    match error {
        Some(e) => e.to_string(),
        None => "ok".to_string(),
    }
}

impl FavoriteError {
    /// Short, stable reason for the failure
    pub fn reason(&self) -> &'static str {
        match self {
            FavoriteError::InvalidInput(_) | FavoriteError::LookupFailed(_) => UNEXPECTED_REASON,
            FavoriteError::MutationFailed { .. } => MUTATION_REASON,
        }
    }

    /// Whether one write succeeded while the other failed
    pub fn is_partial(&self) -> bool {
        matches!(
            self,
            FavoriteError::MutationFailed { create, update } if create.is_some() != update.is_some()
        )
    }
}

/// Result of one favorite attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteOutcome {
    /// Membership created and bar updated
    Created,
    /// The user had already favorited the bar
    AlreadyExists,
    /// The attempt failed
    Failed(FavoriteError),
}

impl FavoriteOutcome {
    /// Whether a new favorite was recorded
    pub fn is_created(&self) -> bool {
        matches!(self, FavoriteOutcome::Created)
    }

    /// Terminal attempt state for this outcome
    pub fn state(&self) -> FavoriteAttemptState {
        match self {
            FavoriteOutcome::Created => FavoriteAttemptState::Created,
            FavoriteOutcome::AlreadyExists => FavoriteAttemptState::AlreadyExists,
            FavoriteOutcome::Failed(_) => FavoriteAttemptState::Failed,
        }
    }
}

/// Progress of a favorite attempt
///
/// `Idle -> Checking -> {AlreadyExists | Mutating -> {Created | Failed}}`.
/// A lookup failure goes straight from `Checking` to `Failed`. Invalid input
/// (an empty user or bar id) goes from `Idle` to `Failed` without checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FavoriteAttemptState {
    /// Not started
    #[default]
    Idle,
    /// Looking up the membership
    Checking,
    /// Membership already existed
    AlreadyExists,
    /// Both writes in flight
    Mutating,
    /// Both writes succeeded
    Created,
    /// The attempt failed
    Failed,
}

impl FavoriteAttemptState {
    /// Whether the attempt has finished
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            FavoriteAttemptState::AlreadyExists
                | FavoriteAttemptState::Created
                | FavoriteAttemptState::Failed
        )
    }
}

/// Runs favorite attempts against the membership and bar stores
///
/// # Example
///
/// ```rust
/// use app_core::bars::{Bar, UserId};
/// use app_core::favorites::{FavoriteOutcome, FavoriteService};
/// use app_core::memory::InMemoryBarStore;
/// use chrono::Utc;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let bar = Bar::new("bar-1", "The Crown", Utc::now());
///     let store = Arc::new(InMemoryBarStore::with_bars(vec![bar.clone()]));
///     let service = FavoriteService::from_store(store);
///     let user = UserId::new("user-1");
///
///     assert_eq!(service.add_favorite(&user, &bar).await, FavoriteOutcome::Created);
///     assert_eq!(service.add_favorite(&user, &bar).await, FavoriteOutcome::AlreadyExists);
/// }
/// ```
#[derive(Clone)]
pub struct FavoriteService {
    lookup: Arc<dyn MembershipLookup>,
    members: Arc<dyn MembershipWriter>,
    bars: Arc<dyn BarWriter>,
}

impl FavoriteService {
    /// Create a favorite service from its three collaborators
    pub fn new(
        lookup: Arc<dyn MembershipLookup>,
        members: Arc<dyn MembershipWriter>,
        bars: Arc<dyn BarWriter>,
    ) -> Self {
        Self {
            lookup,
            members,
            bars,
        }
    }

    /// Create a favorite service backed by a single store
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: MembershipLookup + MembershipWriter + BarWriter + 'static,
    {
        Self::new(store.clone(), store.clone(), store)
    }

    /// Add a bar to a user's favourites
    ///
    /// Never returns an error: every failure is folded into
    /// `FavoriteOutcome::Failed`.
    pub async fn add_favorite(&self, user_id: &UserId, bar: &Bar) -> FavoriteOutcome {
        self.add_favorite_observed(user_id, bar, |_| {}).await
    }

    /// Add a bar to a user's favourites, reporting each state transition
    ///
    /// `observe` sees every state after `Idle`, ending with a terminal one.
    pub async fn add_favorite_observed<F>(
        &self,
        user_id: &UserId,
        bar: &Bar,
        mut observe: F,
    ) -> FavoriteOutcome
    where
        F: FnMut(FavoriteAttemptState) + Send,
    {
        let outcome = self.run(user_id, bar, &mut observe).await;
        observe(outcome.state());

        match &outcome {
            FavoriteOutcome::Created => {
                tracing::info!(user = %user_id, bar = %bar.id, "bar added to favourites");
            }
            FavoriteOutcome::AlreadyExists => {
                tracing::debug!(user = %user_id, bar = %bar.id, "bar already in favourites");
            }
            FavoriteOutcome::Failed(error) if error.is_partial() => {
                tracing::warn!(
                    user = %user_id,
                    bar = %bar.id,
                    error = %error,
                    "favourite partially applied, not rolled back"
                );
            }
            FavoriteOutcome::Failed(error) => {
                tracing::error!(user = %user_id, bar = %bar.id, error = %error, "favourite failed");
            }
        }

        outcome
    }

    async fn run<F>(&self, user_id: &UserId, bar: &Bar, observe: &mut F) -> FavoriteOutcome
    where
        F: FnMut(FavoriteAttemptState) + Send,
    {
        if user_id.is_empty() {
            return FavoriteOutcome::Failed(FavoriteError::InvalidInput(
                "user id is empty".to_string(),
            ));
        }
        if bar.id.is_empty() {
            return FavoriteOutcome::Failed(FavoriteError::InvalidInput(
                "bar id is empty".to_string(),
            ));
        }

        observe(FavoriteAttemptState::Checking);
        match self.lookup.find_membership(user_id, &bar.id).await {
            Ok(Some(_)) => return FavoriteOutcome::AlreadyExists,
            Ok(None) => {}
            Err(e) => return FavoriteOutcome::Failed(FavoriteError::LookupFailed(e)),
        }

        observe(FavoriteAttemptState::Mutating);
        let updated = bar.with_favorite_added();
        let (created, bar_updated) = tokio::join!(
            self.members.create_membership(user_id, &bar.id),
            self.bars.update_favorite_state(&updated),
        );

        match (created, bar_updated) {
            (Ok(_), Ok(())) => FavoriteOutcome::Created,
            (create, update) => FavoriteOutcome::Failed(FavoriteError::MutationFailed {
                create: create.err(),
                update: update.err(),
            }),
        }
    }
}
