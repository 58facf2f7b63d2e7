//! Repository adapters backed by the bar API
//!
//! Converts between the wire records of `bar-api` and the domain records of
//! [`crate::bars`], and folds transport errors into [`RepositoryError`].

use async_trait::async_trait;
use bar_api::{
    BarApiClient, BarMemberNode, BarNode, CreateBarMemberInput, PlaceDetailsResult, PlacesClient,
    UpdateBarInput,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::bars::{Bar, BarId, BarMember, UserId};
use crate::details::PlaceDetails;
use crate::ports::{
    BarSource, BarWriter, MembershipLookup, MembershipWriter, PlaceDetailsSource,
    RepositoryError, Result,
};

/// Map a bar API error onto the repository taxonomy
pub fn map_api_error(error: bar_api::Error) -> RepositoryError {
    match &error {
        bar_api::Error::Api { status: 404, .. } | bar_api::Error::EmptyData(_) => {
            RepositoryError::NotFound(error.to_string())
        }
        bar_api::Error::Api { status: 409, .. } => RepositoryError::Conflict(error.to_string()),
        bar_api::Error::GraphQl(messages) if messages.iter().any(|m| is_conditional_failure(m)) => {
            RepositoryError::Conflict(error.to_string())
        }
        bar_api::Error::Json(_) | bar_api::Error::InvalidInput(_) => {
            RepositoryError::Validation(error.to_string())
        }
        e if e.is_retryable() => RepositoryError::Unavailable(error.to_string()),
        _ => RepositoryError::Network(error.to_string()),
    }
}

fn is_conditional_failure(message: &str) -> bool {
    message.contains("ConditionalCheckFailed") || message.contains("conditional request failed")
}

fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Validation(format!("invalid {} {:?}: {}", field, value, e)))
}

fn parse_coordinate(field: &str, value: &str) -> Result<f64> {
    if value.trim().is_empty() {
        return Ok(0.0);
    }
    value
        .trim()
        .parse()
        .map_err(|_| RepositoryError::Validation(format!("invalid {} {:?}", field, value)))
}

impl TryFrom<BarNode> for Bar {
    type Error = RepositoryError;

    fn try_from(node: BarNode) -> Result<Self> {
        Ok(Bar {
            lat: parse_coordinate("lat", &node.lat)?,
            lng: parse_coordinate("lng", &node.lng)?,
            created_at: parse_timestamp("createdAt", &node.created_at)?,
            id: BarId::new(node.id),
            name: node.name,
            phone: node.phone,
            location: node.location,
            url: node.url,
            website: node.website,
            added_by: node.added_by.map(UserId::new),
            favorite_count: node.favorite_count.unwrap_or_default(),
        })
    }
}

impl TryFrom<BarMemberNode> for BarMember {
    type Error = RepositoryError;

    fn try_from(node: BarMemberNode) -> Result<Self> {
        let created_at = node
            .created_at
            .as_deref()
            .map(|t| parse_timestamp("createdAt", t))
            .transpose()?;

        Ok(BarMember {
            id: node.id,
            user_id: UserId::new(node.user_id),
            bar_id: BarId::new(node.bar_id),
            created_at,
        })
    }
}

impl From<&Bar> for UpdateBarInput {
    fn from(bar: &Bar) -> Self {
        UpdateBarInput {
            id: bar.id.to_string(),
            name: bar.name.clone(),
            phone: bar.phone.clone(),
            location: bar.location.clone(),
            lat: bar.lat.to_string(),
            lng: bar.lng.to_string(),
            url: bar.url.clone(),
            website: bar.website.clone(),
            added_by: bar.added_by.as_ref().map(UserId::to_string),
            favorite_count: bar.favorite_count,
        }
    }
}

impl From<PlaceDetailsResult> for PlaceDetails {
    fn from(result: PlaceDetailsResult) -> Self {
        let (lat, lng) = result
            .geometry
            .map(|g| (g.location.lat, g.location.lng))
            .unwrap_or_default();

        PlaceDetails {
            place_id: result.place_id,
            name: result.name,
            address: result.formatted_address,
            phone: result.formatted_phone_number,
            website: result.website,
            lat,
            lng,
        }
    }
}

/// Bar and membership repository over the bar API
#[derive(Clone)]
pub struct ApiBarRepository {
    client: Arc<BarApiClient>,
}

impl ApiBarRepository {
    /// Create a repository over a client
    pub fn new(client: BarApiClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl BarSource for ApiBarRepository {
    async fn list_bars(&self) -> Result<Vec<Bar>> {
        let nodes = self.client.list_all_bars().await.map_err(map_api_error)?;

        // Malformed records are skipped, not fatal
        let mut bars = Vec::with_capacity(nodes.len());
        for node in nodes {
            let id = node.id.clone();
            match Bar::try_from(node) {
                Ok(bar) => bars.push(bar),
                Err(e) => tracing::warn!(bar = %id, error = %e, "skipping malformed bar"),
            }
        }
        Ok(bars)
    }
}

#[async_trait]
impl MembershipLookup for ApiBarRepository {
    async fn find_membership(&self, user_id: &UserId, bar_id: &BarId) -> Result<Option<BarMember>> {
        self.client
            .get_bar_member(user_id.as_str(), bar_id.as_str())
            .await
            .map_err(map_api_error)?
            .map(BarMember::try_from)
            .transpose()
    }
}

#[async_trait]
impl MembershipWriter for ApiBarRepository {
    async fn create_membership(&self, user_id: &UserId, bar_id: &BarId) -> Result<BarMember> {
        let input = CreateBarMemberInput {
            user_id: user_id.to_string(),
            bar_id: bar_id.to_string(),
        };
        let node = self
            .client
            .create_bar_member(&input)
            .await
            .map_err(map_api_error)?;
        BarMember::try_from(node)
    }
}

#[async_trait]
impl BarWriter for ApiBarRepository {
    async fn update_favorite_state(&self, bar: &Bar) -> Result<()> {
        self.client
            .update_bar(&UpdateBarInput::from(bar))
            .await
            .map_err(map_api_error)?;
        Ok(())
    }
}

/// Place details source over the places API
#[derive(Clone)]
pub struct PlacesApi {
    client: Arc<PlacesClient>,
}

impl PlacesApi {
    /// Create a source over a places client
    pub fn new(client: PlacesClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl PlaceDetailsSource for PlacesApi {
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails> {
        self.client
            .place_details(place_id)
            .await
            .map(PlaceDetails::from)
            .map_err(map_api_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bar_api::places::{Geometry, LatLng};

    fn node() -> BarNode {
        BarNode {
            id: "bar-1".to_string(),
            name: "The Crown".to_string(),
            phone: Some("020 7946 0000".to_string()),
            location: Some("1 High St".to_string()),
            lat: "51.5072".to_string(),
            lng: "-0.1276".to_string(),
            url: None,
            website: None,
            added_by: Some("user-1".to_string()),
            created_at: "2018-06-01T20:15:00.000Z".to_string(),
            favorite_count: None,
        }
    }

    #[test]
    fn test_bar_from_node() {
        let bar = Bar::try_from(node()).unwrap();

        assert_eq!(bar.id, BarId::new("bar-1"));
        assert_eq!(bar.lat, 51.5072);
        assert_eq!(bar.lng, -0.1276);
        assert_eq!(bar.added_by, Some(UserId::new("user-1")));
        assert_eq!(bar.favorite_count, 0);
        assert_eq!(bar.created_at.to_rfc3339(), "2018-06-01T20:15:00+00:00");
    }

    #[test]
    fn test_bar_from_node_rejects_bad_timestamp() {
        let mut bad = node();
        bad.created_at = "yesterday".to_string();

        assert!(matches!(Bar::try_from(bad), Err(RepositoryError::Validation(_))));
    }

    #[test]
    fn test_bar_from_node_rejects_bad_coordinate() {
        let mut bad = node();
        bad.lat = "north".to_string();

        assert!(matches!(Bar::try_from(bad), Err(RepositoryError::Validation(_))));
    }

    #[test]
    fn test_update_input_carries_favorite_count() {
        let bar = Bar::try_from(node()).unwrap().with_favorite_added();
        let input = UpdateBarInput::from(&bar);

        assert_eq!(input.id, "bar-1");
        assert_eq!(input.favorite_count, 1);
        assert_eq!(input.lat, "51.5072");
        assert_eq!(input.added_by.as_deref(), Some("user-1"));
    }

    #[test]
    fn test_member_from_node() {
        let member = BarMember::try_from(BarMemberNode {
            id: Some("m-1".to_string()),
            user_id: "user-1".to_string(),
            bar_id: "bar-1".to_string(),
            created_at: None,
        })
        .unwrap();

        assert!(member.links(&UserId::new("user-1"), &BarId::new("bar-1")));
        assert!(member.created_at.is_none());
    }

    #[test]
    fn test_place_details_from_result() {
        let details = PlaceDetails::from(PlaceDetailsResult {
            place_id: "ChIJ123".to_string(),
            name: "The Crown".to_string(),
            formatted_address: Some("1 High St".to_string()),
            formatted_phone_number: None,
            website: None,
            geometry: Some(Geometry {
                location: LatLng { lat: 51.5, lng: -0.12 },
            }),
        });

        assert_eq!(details.address.as_deref(), Some("1 High St"));
        assert_eq!(details.lat, 51.5);
    }

    #[test]
    fn test_error_mapping() {
        let not_found = bar_api::Error::Api {
            status: 404,
            message: "missing".to_string(),
        };
        assert!(matches!(map_api_error(not_found), RepositoryError::NotFound(_)));

        let busy = bar_api::Error::Api {
            status: 503,
            message: "busy".to_string(),
        };
        assert!(matches!(map_api_error(busy), RepositoryError::Unavailable(_)));

        let conflict = bar_api::Error::GraphQl(vec![
            "ConditionalCheckFailedException: item exists".to_string(),
        ]);
        assert!(matches!(map_api_error(conflict), RepositoryError::Conflict(_)));

        let conditional =
            bar_api::Error::GraphQl(vec!["The conditional request failed".to_string()]);
        assert!(matches!(map_api_error(conditional), RepositoryError::Conflict(_)));

        let invalid = bar_api::Error::InvalidInput("empty id".to_string());
        assert!(matches!(map_api_error(invalid), RepositoryError::Validation(_)));

        let denied = bar_api::Error::Api {
            status: 401,
            message: "denied".to_string(),
        };
        assert!(matches!(map_api_error(denied), RepositoryError::Network(_)));
    }
}
