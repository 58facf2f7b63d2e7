//! Favorite Workflow Integration Tests
//!
//! End-to-end tests for adding bars to favourites against the in-memory
//! store: first and repeated attempts, concurrent mutations, partial
//! failure, and racing attempts for the same pair.

use app_core::bars::{Bar, BarId, BarMember, UserId};
use app_core::favorites::{FavoriteAttemptState, FavoriteError, FavoriteOutcome, FavoriteService};
use app_core::memory::InMemoryBarStore;
use app_core::ports::{BarWriter, MembershipLookup, MembershipWriter, RepositoryError};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

fn crown() -> Bar {
    Bar::new("bar-1", "The Crown", Utc.with_ymd_and_hms(2018, 6, 1, 20, 0, 0).unwrap())
        .with_location("1 High St")
        .with_coordinates(51.5072, -0.1276)
}

/// Test the first attempt creates the favorite and the second is a no-op
#[tokio::test]
async fn test_created_then_already_exists() {
    let store = Arc::new(InMemoryBarStore::with_bars(vec![crown()]));
    let service = FavoriteService::from_store(store.clone());
    let user = UserId::new("user-1");

    let first = service.add_favorite(&user, &crown()).await;
    assert_eq!(first, FavoriteOutcome::Created);
    assert_eq!(store.membership_count(&user, &BarId::new("bar-1")).await, 1);
    assert_eq!(store.bar(&BarId::new("bar-1")).await.unwrap().favorite_count, 1);

    // Second attempt writes nothing
    let stored = store.bar(&BarId::new("bar-1")).await.unwrap();
    let second = service.add_favorite(&user, &stored).await;
    assert_eq!(second, FavoriteOutcome::AlreadyExists);
    assert_eq!(store.membership_count(&user, &BarId::new("bar-1")).await, 1);
    assert_eq!(store.bar(&BarId::new("bar-1")).await.unwrap().favorite_count, 1);
}

/// Test different users favoriting the same bar
#[tokio::test]
async fn test_users_are_independent() {
    let store = Arc::new(InMemoryBarStore::with_bars(vec![crown()]));
    let service = FavoriteService::from_store(store.clone());

    let alice = service.add_favorite(&UserId::new("alice"), &crown()).await;
    let stored = store.bar(&BarId::new("bar-1")).await.unwrap();
    let bob = service.add_favorite(&UserId::new("bob"), &stored).await;

    assert!(alice.is_created());
    assert!(bob.is_created());
    assert_eq!(store.members().await.len(), 2);
    assert_eq!(store.bar(&BarId::new("bar-1")).await.unwrap().favorite_count, 2);
}

/// Test a failed bar update leaves the membership in place
#[tokio::test]
async fn test_partial_failure_is_not_rolled_back() {
    let store = Arc::new(InMemoryBarStore::with_bars(vec![crown()]));
    store
        .fail_update(RepositoryError::Unavailable("throttled".to_string()))
        .await;
    let service = FavoriteService::from_store(store.clone());
    let user = UserId::new("user-1");

    let outcome = service.add_favorite(&user, &crown()).await;
    match &outcome {
        FavoriteOutcome::Failed(error) => {
            assert!(error.is_partial());
            assert_eq!(error.reason(), "mutation failed");
        }
        other => panic!("expected failure, got {:?}", other),
    }

    // Membership was written; the count was not
    assert_eq!(store.membership_count(&user, &BarId::new("bar-1")).await, 1);
    assert_eq!(store.bar(&BarId::new("bar-1")).await.unwrap().favorite_count, 0);

    // A retry sees the membership and leaves the stale count alone
    store.clear_failures().await;
    let retry = service.add_favorite(&user, &crown()).await;
    assert_eq!(retry, FavoriteOutcome::AlreadyExists);
    assert_eq!(store.bar(&BarId::new("bar-1")).await.unwrap().favorite_count, 0);
}

/// Test a lookup failure performs no writes
#[tokio::test]
async fn test_lookup_failure_writes_nothing() {
    let store = Arc::new(InMemoryBarStore::with_bars(vec![crown()]));
    store
        .fail_lookup(RepositoryError::Network("connection reset".to_string()))
        .await;
    let service = FavoriteService::from_store(store.clone());

    let mut states = Vec::new();
    let outcome = service
        .add_favorite_observed(&UserId::new("user-1"), &crown(), |s| states.push(s))
        .await;

    assert!(matches!(
        outcome,
        FavoriteOutcome::Failed(FavoriteError::LookupFailed(_))
    ));
    assert_eq!(
        states,
        vec![FavoriteAttemptState::Checking, FavoriteAttemptState::Failed]
    );
    assert!(store.members().await.is_empty());
}

/// Writers that only finish once both are in flight
struct RendezvousWriters {
    store: InMemoryBarStore,
    barrier: Barrier,
}

#[async_trait]
impl MembershipWriter for RendezvousWriters {
    async fn create_membership(
        &self,
        user_id: &UserId,
        bar_id: &BarId,
    ) -> app_core::ports::Result<BarMember> {
        self.barrier.wait().await;
        self.store.create_membership(user_id, bar_id).await
    }
}

#[async_trait]
impl BarWriter for RendezvousWriters {
    async fn update_favorite_state(&self, bar: &Bar) -> app_core::ports::Result<()> {
        self.barrier.wait().await;
        self.store.update_favorite_state(bar).await
    }
}

/// Test both mutations are in flight at the same time
#[tokio::test]
async fn test_mutations_run_concurrently() {
    let store = InMemoryBarStore::with_bars(vec![crown()]);
    let writers = Arc::new(RendezvousWriters {
        store: store.clone(),
        barrier: Barrier::new(2),
    });
    let service = FavoriteService::new(Arc::new(store.clone()), writers.clone(), writers);

    // Sequential writes would never pass the barrier
    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        service.add_favorite(&UserId::new("user-1"), &crown()),
    )
    .await
    .expect("mutations were not issued concurrently");

    assert_eq!(outcome, FavoriteOutcome::Created);
}

/// Lookup that waits until both racers have checked
struct RacingLookup {
    store: InMemoryBarStore,
    barrier: Barrier,
}

#[async_trait]
impl MembershipLookup for RacingLookup {
    async fn find_membership(
        &self,
        user_id: &UserId,
        bar_id: &BarId,
    ) -> app_core::ports::Result<Option<BarMember>> {
        let found = self.store.find_membership(user_id, bar_id).await;
        self.barrier.wait().await;
        found
    }
}

/// Test two racing attempts both pass the check; the store rejects one
#[tokio::test]
async fn test_racing_attempts_leave_one_membership() {
    let store = InMemoryBarStore::with_bars(vec![crown()]);
    let lookup = Arc::new(RacingLookup {
        store: store.clone(),
        barrier: Barrier::new(2),
    });
    let shared = Arc::new(store.clone());
    let service = FavoriteService::new(lookup, shared.clone(), shared);
    let user = UserId::new("user-1");

    let (bar_a, bar_b) = (crown(), crown());
    let (a, b) = tokio::join!(
        service.add_favorite(&user, &bar_a),
        service.add_favorite(&user, &bar_b),
    );

    let created = [&a, &b].iter().filter(|o| o.is_created()).count();
    assert_eq!(created, 1, "outcomes: {:?}, {:?}", a, b);

    let loser = if a.is_created() { &b } else { &a };
    match loser {
        FavoriteOutcome::Failed(FavoriteError::MutationFailed { create, .. }) => {
            assert!(matches!(create, Some(RepositoryError::Conflict(_))));
        }
        other => panic!("expected the losing attempt to fail, got {:?}", other),
    }

    assert_eq!(store.membership_count(&user, &BarId::new("bar-1")).await, 1);
}
