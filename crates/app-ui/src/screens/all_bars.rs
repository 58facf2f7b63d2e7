//! All bars screen
//!
//! A sortable list of every bar. Swiping a row reveals a `LIKE` action that
//! adds the bar to the user's favourites; row icons open the bar's website,
//! dial its phone, or show the directions sheet. Pull-to-refresh refetches
//! the list while the current rows stay visible.

use app_core::bar_list::BarListObserver;
use app_core::bars::{Bar, BarId, UserId};
use app_core::favorites::FavoriteService;
use app_core::ordering::{order, SortDirection, SortSpec};
use app_platform::linking::{ContactDispatcher, DispatchOutcome, SchemeAllowList, UrlLauncher};
use app_state::SegmentedSelection;
use serde::Serialize;

use super::Result;
use crate::formatting::added_on_label;
use crate::map_links::{Destination, MapApp, MapLinksSheet};
use crate::notices::Notice;

/// Sort segments shown above the list
pub const SORT_OPTIONS: [&str; 2] = ["Name", "Created At"];

/// Label of the swipe action on each row
pub const LIKE_ACTION: &str = "LIKE";

/// View model for one list row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarRow {
    /// Bar id
    pub id: BarId,
    /// Bar name
    pub name: String,
    /// Address line
    pub location: Option<String>,
    /// Phone line
    pub phone: Option<String>,
    /// Website, if the web icon should be active
    pub website: Option<String>,
    /// "Added on ..." line
    pub added_on: String,
    /// Swipe action label
    pub swipe_action: &'static str,
}

impl From<&Bar> for BarRow {
    fn from(bar: &Bar) -> Self {
        Self {
            id: bar.id.clone(),
            name: bar.name.clone(),
            location: bar.location.clone(),
            phone: bar.phone.clone(),
            website: bar.website.clone(),
            added_on: added_on_label(bar.created_at),
            swipe_action: LIKE_ACTION,
        }
    }
}

/// Controller for the all bars screen
pub struct AllBarsScreen<L: UrlLauncher> {
    bars: BarListObserver,
    favorites: FavoriteService,
    user_id: UserId,
    dispatcher: ContactDispatcher<SchemeAllowList<L>>,
    sort: SegmentedSelection,
    direction: SortDirection,
    map_links: MapLinksSheet,
}

impl<L: UrlLauncher> AllBarsScreen<L> {
    /// Create the screen for a signed-in user
    pub fn new(
        bars: BarListObserver,
        favorites: FavoriteService,
        user_id: UserId,
        launcher: L,
    ) -> Result<Self> {
        Ok(Self {
            bars,
            favorites,
            user_id,
            dispatcher: ContactDispatcher::for_contacts(launcher),
            sort: SegmentedSelection::new(SORT_OPTIONS)?,
            direction: SortDirection::Ascending,
            map_links: MapLinksSheet::new(),
        })
    }

    /// Initial load of the bar list
    pub async fn load(&self) -> Result<()> {
        self.bars.fetch().await?;
        Ok(())
    }

    /// Pull-to-refresh
    ///
    /// On failure the previous rows stay in place.
    pub async fn refresh(&self) -> Result<()> {
        self.bars.refetch().await.inspect_err(|e| {
            tracing::warn!(error = %e, "bar list refresh failed");
        })?;
        Ok(())
    }

    /// Whether the refresh spinner should show
    pub fn is_refreshing(&self) -> bool {
        self.bars.is_refreshing()
    }

    /// Whether the first load is in progress
    pub fn is_loading(&self) -> bool {
        self.bars.is_loading()
    }

    /// Sort segment labels
    pub fn sort_options(&self) -> &[String] {
        self.sort.options()
    }

    /// Selected sort segment
    pub fn selected_segment(&self) -> usize {
        self.sort.selected_index()
    }

    /// Current sort
    pub fn sort_spec(&self) -> Result<SortSpec> {
        Ok(SortSpec::parse(&self.sort.selected_key(), self.direction.as_str())?)
    }

    /// Select a sort segment
    ///
    /// The selection only changes when the segment maps to a sortable
    /// property.
    pub fn select_sort_segment(&mut self, index: usize) -> Result<SortSpec> {
        let mut sort = self.sort.clone();
        let key = sort.select(index)?;
        let spec = SortSpec::parse(&key, self.direction.as_str())?;

        tracing::debug!(index, property = %spec.property, "sort segment selected");
        self.sort = sort;
        Ok(spec)
    }

    /// Change the sort direction
    pub fn set_direction(&mut self, direction: SortDirection) {
        self.direction = direction;
    }

    /// Loaded bars in display order
    pub fn bars(&self) -> Result<Vec<Bar>> {
        let bars = self.bars.data().unwrap_or_default();
        Ok(order(&bars, &self.sort.selected_key(), self.direction.as_str())?)
    }

    /// Row view models in display order
    pub fn rows(&self) -> Result<Vec<BarRow>> {
        Ok(self.bars()?.iter().map(BarRow::from).collect())
    }

    /// Find a loaded bar by id
    pub fn bar(&self, id: &BarId) -> Option<Bar> {
        self.bars
            .data()
            .and_then(|bars| bars.into_iter().find(|b| &b.id == id))
    }

    /// Swipe action: add the bar to the user's favourites
    pub async fn like(&self, bar: &Bar) -> Notice {
        let outcome = self.favorites.add_favorite(&self.user_id, bar).await;
        Notice::from(&outcome)
    }

    /// Open the bar's website
    pub async fn open_website(&self, bar: &Bar) -> DispatchOutcome {
        match &bar.website {
            Some(website) => self.dispatcher.open_website(website).await,
            None => {
                tracing::warn!(bar = %bar.id, "bar has no website");
                DispatchOutcome::Unsupported(String::new())
            }
        }
    }

    /// Dial the bar's phone number
    pub async fn open_phone(&self, bar: &Bar) -> DispatchOutcome {
        match &bar.phone {
            Some(phone) => self.dispatcher.open_phone(phone).await,
            None => {
                tracing::warn!(bar = %bar.id, "bar has no phone number");
                DispatchOutcome::Unsupported(String::new())
            }
        }
    }

    /// Show or hide the directions sheet for a bar
    pub fn toggle_map_links(&mut self, bar: &Bar) -> bool {
        self.map_links
            .toggle(Destination::new(bar.name.clone(), bar.lat, bar.lng))
    }

    /// Directions sheet
    pub fn map_links(&self) -> &MapLinksSheet {
        &self.map_links
    }

    /// Open directions in a map app
    pub async fn open_directions(&mut self, app: MapApp) -> DispatchOutcome {
        self.map_links.press(app, &self.dispatcher).await
    }

    /// Dismiss the directions sheet
    pub fn hide_map_links(&mut self) {
        self.map_links.hide();
    }

    /// Dispatcher used for links
    pub fn dispatcher(&self) -> &ContactDispatcher<SchemeAllowList<L>> {
        &self.dispatcher
    }

    /// Launcher behind the scheme allow list
    pub fn launcher(&self) -> &L {
        self.dispatcher.launcher().inner()
    }
}
