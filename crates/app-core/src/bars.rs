//! Bar and membership records
//!
//! Domain types shared by the list screen, the favorite workflow and the
//! repository adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the id is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of a bar
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarId(String);

impl BarId {
    /// Create a bar id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the id is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BarId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A bar
///
/// Descriptive fields are read-only from the app's point of view; only
/// `favorite_count` changes, through the favorite workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    /// Unique identifier
    pub id: BarId,
    /// Display name
    pub name: String,
    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Free-text address
    #[serde(default)]
    pub location: Option<String>,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
    /// External map URL
    #[serde(default)]
    pub url: Option<String>,
    /// Website URL
    #[serde(default)]
    pub website: Option<String>,
    /// When the bar was added
    pub created_at: DateTime<Utc>,
    /// User who added the bar
    #[serde(default)]
    pub added_by: Option<UserId>,
    /// Number of users who favorited the bar
    #[serde(default)]
    pub favorite_count: u32,
}

impl Bar {
    /// Create a bar with only the required fields set
    pub fn new(id: impl Into<BarId>, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: None,
            location: None,
            lat: 0.0,
            lng: 0.0,
            url: None,
            website: None,
            created_at,
            added_by: None,
            favorite_count: 0,
        }
    }

    /// Set the phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the address
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the coordinates
    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.lat = lat;
        self.lng = lng;
        self
    }

    /// Set the website
    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    /// Set the external map URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the user who added the bar
    pub fn with_added_by(mut self, user: impl Into<UserId>) -> Self {
        self.added_by = Some(user.into());
        self
    }

    /// Copy of this bar with one more favorite counted
    pub fn with_favorite_added(&self) -> Self {
        let mut bar = self.clone();
        bar.favorite_count = bar.favorite_count.saturating_add(1);
        bar
    }
}

impl From<String> for BarId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A user's favorite membership in a bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarMember {
    /// Server-side identifier, when known
    #[serde(default)]
    pub id: Option<String>,
    /// Member user
    pub user_id: UserId,
    /// Favorited bar
    pub bar_id: BarId,
    /// When the membership was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl BarMember {
    /// Create a membership for a (user, bar) pair
    pub fn new(user_id: UserId, bar_id: BarId) -> Self {
        Self {
            id: None,
            user_id,
            bar_id,
            created_at: None,
        }
    }

    /// Check whether this membership links the given pair
    pub fn links(&self, user_id: &UserId, bar_id: &BarId) -> bool {
        &self.user_id == user_id && &self.bar_id == bar_id
    }
}
