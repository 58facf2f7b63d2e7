//! Bar details
//!
//! The details screen opens with only a place id. It resolves the place's
//! details and the signed-in user before rendering, so the favorite button
//! knows who is acting.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::bars::UserId;
use crate::ports::{PlaceDetailsSource, RepositoryError, SessionSource};

/// Details loading errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DetailsError {
    /// Place id was empty
    #[error("Place id cannot be empty")]
    MissingPlaceId,

    /// Place details lookup failed
    #[error("Place details lookup failed: {0}")]
    Lookup(RepositoryError),

    /// No signed-in user could be resolved
    #[error("Session lookup failed: {0}")]
    Session(RepositoryError),
}

/// Result type for details operations
pub type Result<T> = std::result::Result<T, DetailsError>;

/// Details of a place as shown on the details screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    /// Place identifier
    pub place_id: String,
    /// Display name
    pub name: String,
    /// Formatted address
    #[serde(default)]
    pub address: Option<String>,
    /// Formatted phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Website URL
    #[serde(default)]
    pub website: Option<String>,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

/// Everything the details screen needs after loading
#[derive(Debug, Clone, PartialEq)]
pub struct BarDetails {
    /// Place details
    pub details: PlaceDetails,
    /// Signed-in user
    pub user_id: UserId,
}

/// Loads place details together with the signed-in user
pub struct DetailsService {
    places: Arc<dyn PlaceDetailsSource>,
    session: Arc<dyn SessionSource>,
}

impl DetailsService {
    /// Create a new details service
    pub fn new(places: Arc<dyn PlaceDetailsSource>, session: Arc<dyn SessionSource>) -> Self {
        Self { places, session }
    }

    /// Load details for a place
    ///
    /// # Errors
    ///
    /// - `DetailsError::MissingPlaceId` - empty place id
    /// - `DetailsError::Lookup` - the place could not be resolved
    /// - `DetailsError::Session` - nobody is signed in
    pub async fn load(&self, place_id: &str) -> Result<BarDetails> {
        if place_id.is_empty() {
            return Err(DetailsError::MissingPlaceId);
        }

        let details = self
            .places
            .place_details(place_id)
            .await
            .map_err(DetailsError::Lookup)?;

        let user_id = self
            .session
            .current_user_id()
            .await
            .map_err(DetailsError::Session)?;

        tracing::debug!(place_id, user = %user_id, "loaded bar details");
        Ok(BarDetails { details, user_id })
    }
}
