//! Core application logic for Barfly
//!
//! This crate contains the bar domain: records, list ordering, the favorite
//! workflow, details loading, and the ports and adapters that connect them
//! to the bar API or to process memory.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bar_list;
pub mod bars;
pub mod details;
pub mod favorites;
pub mod memory;
pub mod ordering;
pub mod ports;
pub mod remote;

pub use bar_list::{observe_bars, BarListObserver, BarListQuery};
pub use bars::{Bar, BarId, BarMember, UserId};
pub use details::{BarDetails, DetailsError, DetailsService, PlaceDetails};
pub use favorites::{FavoriteAttemptState, FavoriteError, FavoriteOutcome, FavoriteService};
pub use memory::{InMemoryBarStore, StaticPlaceDetails, StaticSession};
pub use ordering::{order, order_by, OrderingError, SortDirection, SortProperty, SortSpec};
pub use ports::{
    BarSource, BarWriter, MembershipLookup, MembershipWriter, PlaceDetailsSource,
    RepositoryError, SessionSource,
};
pub use remote::{ApiBarRepository, PlacesApi};
