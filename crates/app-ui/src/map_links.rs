//! Directions sheet
//!
//! Lists the map apps a user can open for directions to a bar. Pressing an
//! app hands its URL to the contact dispatcher and closes the sheet.

use app_platform::linking::{ContactDispatcher, DispatchOutcome, UrlLauncher};
use app_state::Visibility;
use serde::Serialize;

/// Where directions lead
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destination {
    /// Display name
    pub name: String,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

impl Destination {
    /// Create a destination
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
        }
    }
}

/// Map apps offered for directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MapApp {
    /// Apple Maps
    AppleMaps,
    /// Google Maps
    GoogleMaps,
    /// Waze
    Waze,
}

impl MapApp {
    /// All apps in display order
    pub const ALL: [MapApp; 3] = [MapApp::AppleMaps, MapApp::GoogleMaps, MapApp::Waze];

    /// Display name
    pub fn label(self) -> &'static str {
        match self {
            MapApp::AppleMaps => "Apple Maps",
            MapApp::GoogleMaps => "Google Maps",
            MapApp::Waze => "Waze",
        }
    }

    /// Directions URL for a destination
    pub fn directions_url(self, destination: &Destination) -> String {
        let name = urlencoding::encode(&destination.name);
        let (lat, lng) = (destination.lat, destination.lng);

        match self {
            MapApp::AppleMaps => format!("maps://?daddr={},{}&q={}", lat, lng, name),
            MapApp::GoogleMaps => {
                format!("comgooglemaps://?daddr={},{}&q={}&directionsmode=driving", lat, lng, name)
            }
            MapApp::Waze => format!("waze://?ll={},{}&navigate=yes&q={}", lat, lng, name),
        }
    }
}

/// One row of the sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLinkOption {
    /// App
    pub app: MapApp,
    /// Display name
    pub label: &'static str,
    /// URL opened on press
    pub url: String,
}

/// Directions sheet state
#[derive(Debug, Clone, Default)]
pub struct MapLinksSheet {
    visibility: Visibility,
    destination: Option<Destination>,
}

impl MapLinksSheet {
    /// Create a hidden sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the sheet is shown
    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    /// Destination the sheet was opened for
    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// Toggle the sheet for a destination, returning the new visibility
    pub fn toggle(&mut self, destination: Destination) -> bool {
        self.destination = Some(destination);
        self.visibility.toggle()
    }

    /// Cancel or back: hide the sheet
    pub fn hide(&mut self) {
        self.visibility.hide();
    }

    /// Options for the current destination; empty without one
    pub fn options(&self) -> Vec<MapLinkOption> {
        let Some(destination) = &self.destination else {
            return Vec::new();
        };

        MapApp::ALL
            .into_iter()
            .map(|app| MapLinkOption {
                app,
                label: app.label(),
                url: app.directions_url(destination),
            })
            .collect()
    }

    /// Open directions in `app` and hide the sheet
    pub async fn press<L: UrlLauncher>(
        &mut self,
        app: MapApp,
        dispatcher: &ContactDispatcher<L>,
    ) -> DispatchOutcome {
        self.visibility.hide();

        match &self.destination {
            Some(destination) => dispatcher.open_url(&app.directions_url(destination)).await,
            None => {
                tracing::warn!(app = app.label(), "map link pressed without a destination");
                DispatchOutcome::Unsupported(app.label().to_string())
            }
        }
    }
}
