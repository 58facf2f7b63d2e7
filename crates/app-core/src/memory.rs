//! In-process repository adapters
//!
//! [`InMemoryBarStore`] implements every bar and membership port against
//! process memory. It backs previews and tests, and it can be told to fail
//! specific operations to exercise error paths.
//!
//! Memberships are unique per (user, bar): creating a duplicate is rejected
//! with `RepositoryError::Conflict`, the same way the remote store rejects it.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::bars::{Bar, BarId, BarMember, UserId};
use crate::details::PlaceDetails;
use crate::ports::{
    BarSource, BarWriter, MembershipLookup, MembershipWriter, PlaceDetailsSource,
    RepositoryError, Result, SessionSource,
};

/// Operations that can be told to fail
#[derive(Debug, Clone, Default)]
struct Failures {
    list: Option<RepositoryError>,
    lookup: Option<RepositoryError>,
    create: Option<RepositoryError>,
    update: Option<RepositoryError>,
}

#[derive(Debug, Default)]
struct StoreState {
    bars: Vec<Bar>,
    members: Vec<BarMember>,
    failures: Failures,
}

/// Bar and membership store held in memory
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBarStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryBarStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with bars
    pub fn with_bars(bars: Vec<Bar>) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState {
                bars,
                ..Default::default()
            })),
        }
    }

    /// Insert or replace a bar
    pub async fn insert_bar(&self, bar: Bar) {
        let mut state = self.state.write().await;
        match state.bars.iter_mut().find(|b| b.id == bar.id) {
            Some(existing) => *existing = bar,
            None => state.bars.push(bar),
        }
    }

    /// Look up a bar by id
    pub async fn bar(&self, bar_id: &BarId) -> Option<Bar> {
        self.state
            .read()
            .await
            .bars
            .iter()
            .find(|b| &b.id == bar_id)
            .cloned()
    }

    /// All stored bars in insertion order
    pub async fn bars(&self) -> Vec<Bar> {
        self.state.read().await.bars.clone()
    }

    /// All stored memberships in creation order
    pub async fn members(&self) -> Vec<BarMember> {
        self.state.read().await.members.clone()
    }

    /// Number of memberships for a (user, bar) pair
    pub async fn membership_count(&self, user_id: &UserId, bar_id: &BarId) -> usize {
        self.state
            .read()
            .await
            .members
            .iter()
            .filter(|m| m.links(user_id, bar_id))
            .count()
    }

    /// Make `list_bars` fail with `error`
    pub async fn fail_list(&self, error: RepositoryError) {
        self.state.write().await.failures.list = Some(error);
    }

    /// Make `find_membership` fail with `error`
    pub async fn fail_lookup(&self, error: RepositoryError) {
        self.state.write().await.failures.lookup = Some(error);
    }

    /// Make `create_membership` fail with `error`
    pub async fn fail_create(&self, error: RepositoryError) {
        self.state.write().await.failures.create = Some(error);
    }

    /// Make `update_favorite_state` fail with `error`
    pub async fn fail_update(&self, error: RepositoryError) {
        self.state.write().await.failures.update = Some(error);
    }

    /// Stop injecting failures
    pub async fn clear_failures(&self) {
        self.state.write().await.failures = Failures::default();
    }
}

#[async_trait]
impl BarSource for InMemoryBarStore {
    async fn list_bars(&self) -> Result<Vec<Bar>> {
        let state = self.state.read().await;
        if let Some(error) = &state.failures.list {
            return Err(error.clone());
        }
        Ok(state.bars.clone())
    }
}

#[async_trait]
impl MembershipLookup for InMemoryBarStore {
    async fn find_membership(&self, user_id: &UserId, bar_id: &BarId) -> Result<Option<BarMember>> {
        let state = self.state.read().await;
        if let Some(error) = &state.failures.lookup {
            return Err(error.clone());
        }
        Ok(state
            .members
            .iter()
            .find(|m| m.links(user_id, bar_id))
            .cloned())
    }
}

#[async_trait]
impl MembershipWriter for InMemoryBarStore {
    async fn create_membership(&self, user_id: &UserId, bar_id: &BarId) -> Result<BarMember> {
        let mut state = self.state.write().await;
        if let Some(error) = &state.failures.create {
            return Err(error.clone());
        }
        if state.members.iter().any(|m| m.links(user_id, bar_id)) {
            return Err(RepositoryError::Conflict(format!(
                "membership already exists for {} in {}",
                user_id, bar_id
            )));
        }

        let member = BarMember {
            id: Some(uuid::Uuid::new_v4().to_string()),
            user_id: user_id.clone(),
            bar_id: bar_id.clone(),
            created_at: Some(Utc::now()),
        };
        state.members.push(member.clone());
        Ok(member)
    }
}

#[async_trait]
impl BarWriter for InMemoryBarStore {
    async fn update_favorite_state(&self, bar: &Bar) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(error) = &state.failures.update {
            return Err(error.clone());
        }
        match state.bars.iter_mut().find(|b| b.id == bar.id) {
            Some(existing) => {
                *existing = bar.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!("bar {}", bar.id))),
        }
    }
}

/// Place details source returning fixed records
#[derive(Debug, Clone, Default)]
pub struct StaticPlaceDetails {
    places: Vec<PlaceDetails>,
}

impl StaticPlaceDetails {
    /// Create a source serving the given places
    pub fn new(places: Vec<PlaceDetails>) -> Self {
        Self { places }
    }
}

#[async_trait]
impl PlaceDetailsSource for StaticPlaceDetails {
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails> {
        self.places
            .iter()
            .find(|p| p.place_id == place_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("place {}", place_id)))
    }
}

/// Session source with a fixed signed-in user, or none
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user_id: Option<UserId>,
}

impl StaticSession {
    /// Session signed in as `user_id`
    pub fn signed_in(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    /// Session with nobody signed in
    pub fn signed_out() -> Self {
        Self { user_id: None }
    }
}

#[async_trait]
impl SessionSource for StaticSession {
    async fn current_user_id(&self) -> Result<UserId> {
        self.user_id
            .clone()
            .ok_or_else(|| RepositoryError::Unavailable("no signed-in user".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn crown() -> Bar {
        Bar::new("bar-1", "The Crown", Utc.with_ymd_and_hms(2018, 6, 1, 20, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_create_membership_is_unique() {
        let store = InMemoryBarStore::with_bars(vec![crown()]);
        let user = UserId::new("user-1");
        let bar = BarId::new("bar-1");

        let member = store.create_membership(&user, &bar).await.unwrap();
        assert!(member.id.is_some());
        assert!(member.links(&user, &bar));

        let duplicate = store.create_membership(&user, &bar).await;
        assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));
        assert_eq!(store.membership_count(&user, &bar).await, 1);
    }

    #[tokio::test]
    async fn test_find_membership() {
        let store = InMemoryBarStore::new();
        let user = UserId::new("user-1");
        let bar = BarId::new("bar-1");

        assert_eq!(store.find_membership(&user, &bar).await, Ok(None));
        store.create_membership(&user, &bar).await.unwrap();
        assert!(store.find_membership(&user, &bar).await.unwrap().is_some());
        assert_eq!(
            store.find_membership(&UserId::new("user-2"), &bar).await,
            Ok(None)
        );
    }

    #[tokio::test]
    async fn test_update_replaces_bar() {
        let store = InMemoryBarStore::with_bars(vec![crown()]);

        store
            .update_favorite_state(&crown().with_favorite_added())
            .await
            .unwrap();

        let stored = store.bar(&BarId::new("bar-1")).await.unwrap();
        assert_eq!(stored.favorite_count, 1);
    }

    #[tokio::test]
    async fn test_update_unknown_bar() {
        let store = InMemoryBarStore::new();

        let result = store.update_favorite_state(&crown()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = InMemoryBarStore::with_bars(vec![crown()]);
        store
            .fail_list(RepositoryError::Network("offline".to_string()))
            .await;

        assert!(store.list_bars().await.is_err());

        store.clear_failures().await;
        assert_eq!(store.list_bars().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_bar_replaces_by_id() {
        let store = InMemoryBarStore::with_bars(vec![crown()]);
        store.insert_bar(crown().with_phone("020 7946 0000")).await;

        let bars = store.bars().await;
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].phone.as_deref(), Some("020 7946 0000"));
    }

    #[tokio::test]
    async fn test_static_sources() {
        let places = StaticPlaceDetails::new(vec![PlaceDetails {
            place_id: "ChIJ123".to_string(),
            name: "The Crown".to_string(),
            address: None,
            phone: None,
            website: None,
            lat: 51.5,
            lng: -0.12,
        }]);

        assert_eq!(places.place_details("ChIJ123").await.unwrap().name, "The Crown");
        assert!(matches!(
            places.place_details("missing").await,
            Err(RepositoryError::NotFound(_))
        ));

        assert_eq!(
            StaticSession::signed_in("user-1").current_user_id().await,
            Ok(UserId::new("user-1"))
        );
        assert!(StaticSession::signed_out().current_user_id().await.is_err());
    }
}
