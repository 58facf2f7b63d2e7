//! Bar details screen

use app_core::details::{BarDetails, DetailsService};
use app_platform::linking::{ContactDispatcher, DispatchOutcome, SchemeAllowList, UrlLauncher};
use std::time::Instant;

use super::Result;
use crate::animations::{button_reveal, ButtonReveal};
use crate::map_links::{Destination, MapApp, MapLinksSheet};

/// Controller for the details screen of one place
pub struct BarDetailsScreen<L: UrlLauncher> {
    place_id: String,
    service: DetailsService,
    dispatcher: ContactDispatcher<SchemeAllowList<L>>,
    loading: bool,
    details: Option<BarDetails>,
    go_back: ButtonReveal,
    map_links: MapLinksSheet,
}

impl<L: UrlLauncher> BarDetailsScreen<L> {
    /// Create the screen for a place id
    pub fn new(place_id: impl Into<String>, service: DetailsService, launcher: L) -> Self {
        Self {
            place_id: place_id.into(),
            service,
            dispatcher: ContactDispatcher::for_contacts(launcher),
            loading: false,
            details: None,
            go_back: button_reveal(),
            map_links: MapLinksSheet::new(),
        }
    }

    /// Place shown by this screen
    pub fn place_id(&self) -> &str {
        &self.place_id
    }

    /// Load details and the signed-in user
    ///
    /// On success the "Go Back" button starts revealing. On failure the
    /// screen stays empty and the error is logged.
    pub async fn load(&mut self) -> Result<()> {
        self.load_at(Instant::now()).await
    }

    /// Like [`BarDetailsScreen::load`], starting the reveal at `now`
    pub async fn load_at(&mut self, now: Instant) -> Result<()> {
        self.loading = true;
        let result = self.service.load(&self.place_id).await;
        self.loading = false;

        match result {
            Ok(details) => {
                self.details = Some(details);
                self.go_back.start_at(now);
                Ok(())
            }
            Err(e) => {
                tracing::error!(place_id = %self.place_id, error = %e, "failed to load bar details");
                Err(e.into())
            }
        }
    }

    /// Whether a load is in progress
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Loaded details
    pub fn details(&self) -> Option<&BarDetails> {
        self.details.as_ref()
    }

    /// "Go Back" button reveal
    pub fn go_back_button(&self) -> &ButtonReveal {
        &self.go_back
    }

    /// Open the place's website
    pub async fn open_website(&self) -> DispatchOutcome {
        match self.details.as_ref().and_then(|d| d.details.website.as_deref()) {
            Some(website) => self.dispatcher.open_website(website).await,
            None => {
                tracing::warn!(place_id = %self.place_id, "no website to open");
                DispatchOutcome::Unsupported(String::new())
            }
        }
    }

    /// Dial the place's phone number
    pub async fn open_phone(&self) -> DispatchOutcome {
        match self.details.as_ref().and_then(|d| d.details.phone.as_deref()) {
            Some(phone) => self.dispatcher.open_phone(phone).await,
            None => {
                tracing::warn!(place_id = %self.place_id, "no phone number to dial");
                DispatchOutcome::Unsupported(String::new())
            }
        }
    }

    /// Show or hide the directions sheet
    ///
    /// Does nothing until details are loaded.
    pub fn toggle_map_links(&mut self) -> bool {
        match &self.details {
            Some(loaded) => {
                let place = &loaded.details;
                self.map_links
                    .toggle(Destination::new(place.name.clone(), place.lat, place.lng))
            }
            None => self.map_links.is_visible(),
        }
    }

    /// Directions sheet
    pub fn map_links(&self) -> &MapLinksSheet {
        &self.map_links
    }

    /// Open directions in a map app
    pub async fn open_directions(&mut self, app: MapApp) -> DispatchOutcome {
        self.map_links.press(app, &self.dispatcher).await
    }

    /// Launcher behind the scheme allow list
    pub fn launcher(&self) -> &L {
        self.dispatcher.launcher().inner()
    }
}
