//! User interface for Barfly
//!
//! This crate provides the screen controllers and the small design system
//! they share. Rendering is left to the host; controllers expose view models
//! and take user input as method calls.
//!
//! # Modules
//!
//! - [`screens`] - All bars list and bar details controllers
//! - [`map_links`] - Directions sheet
//! - [`notices`] - Alerts shown after a favorite attempt
//! - [`animations`] - Time-sampled animation specs
//! - [`formatting`] - Date labels
//! - [`tokens`] - Design tokens (durations, easing)
//!
//! # Example
//!
//! ```rust
//! use app_ui::animations::fade_in;
//! use app_ui::formatting::added_on_label;
//! use chrono::{TimeZone, Utc};
//! use std::time::Duration;
//!
//! let created = Utc.with_ymd_and_hms(2024, 3, 3, 16, 5, 9).unwrap();
//! assert_eq!(added_on_label(created), "Added on March 3rd 2024, 4:05:09 pm");
//!
//! let fade = fade_in();
//! assert_eq!(fade.value_at(Duration::from_millis(100)), 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod animations;
pub mod formatting;
pub mod map_links;
pub mod notices;
pub mod screens;
pub mod tokens;

pub use animations::{
    button_reveal, fade_in, fade_in_for, item_animation, Animation, AnimationSpec, ButtonReveal,
    Easing,
};
pub use formatting::added_on_label;
pub use map_links::{Destination, MapApp, MapLinkOption, MapLinksSheet};
pub use notices::{Notice, NoticeKind};
pub use screens::{AllBarsScreen, BarDetailsScreen, BarRow, ScreenError};
pub use tokens::{duration, easing};
