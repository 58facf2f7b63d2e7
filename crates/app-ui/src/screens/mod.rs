//! Screen controllers
//!
//! Each screen owns its view state and talks to the core services; a
//! renderer reads the view models and forwards user input.

pub mod all_bars;
pub mod bar_details;

pub use all_bars::{AllBarsScreen, BarRow, LIKE_ACTION, SORT_OPTIONS};
pub use bar_details::BarDetailsScreen;

use app_core::details::DetailsError;
use app_core::ordering::OrderingError;
use app_state::{QueryError, ViewStateError};
use thiserror::Error;

/// Screen errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScreenError {
    /// View state rejected the input
    #[error(transparent)]
    View(#[from] ViewStateError),

    /// The selected sort could not be applied
    #[error(transparent)]
    Ordering(#[from] OrderingError),

    /// The bar list could not be loaded
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Bar details could not be loaded
    #[error(transparent)]
    Details(#[from] DetailsError),
}

/// Result type for screen operations
pub type Result<T> = std::result::Result<T, ScreenError>;
