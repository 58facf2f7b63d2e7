//! User-facing notices
//!
//! Alerts shown after a favorite attempt. Each has a single `OK` button and
//! cannot be dismissed any other way. Failure notices never carry internal
//! error detail.

use app_core::favorites::FavoriteOutcome;
use serde::Serialize;

/// Label of the single notice button
pub const OK_BUTTON: &str = "OK";

/// Kind of notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    /// Favorite recorded
    Success,
    /// Favorite already existed
    AlreadyAdded,
    /// Something went wrong
    Error,
}

/// Alert shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Kind of notice
    pub kind: NoticeKind,
    /// Title line
    pub title: &'static str,
    /// Body text
    pub message: &'static str,
    /// Button labels
    pub buttons: Vec<&'static str>,
    /// Whether tapping outside dismisses the notice
    pub cancelable: bool,
}

impl Notice {
    fn new(kind: NoticeKind, title: &'static str, message: &'static str) -> Self {
        Self {
            kind,
            title,
            message,
            buttons: vec![OK_BUTTON],
            cancelable: false,
        }
    }

    /// Favorite recorded
    pub fn success() -> Self {
        Self::new(
            NoticeKind::Success,
            "Success",
            "This bar has been added to your favourites.",
        )
    }

    /// Favorite already existed
    pub fn already_added() -> Self {
        Self::new(
            NoticeKind::AlreadyAdded,
            "Already added",
            "This bar is already in your favourites.",
        )
    }

    /// Generic failure
    pub fn error() -> Self {
        Self::new(NoticeKind::Error, "Error", "There was an error, please try again.")
    }
}

impl From<&FavoriteOutcome> for Notice {
    fn from(outcome: &FavoriteOutcome) -> Self {
        match outcome {
            FavoriteOutcome::Created => Notice::success(),
            FavoriteOutcome::AlreadyExists => Notice::already_added(),
            FavoriteOutcome::Failed(_) => Notice::error(),
        }
    }
}
