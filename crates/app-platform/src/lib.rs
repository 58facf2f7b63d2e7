//! Platform services for Barfly
//!
//! This crate sits at the OS boundary: handing URLs to whatever app can open
//! them (browser, dialer, maps) and installing the process-wide log
//! subscriber.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod linking;
pub mod logging;

pub use linking::{
    ContactDispatcher, DispatchOutcome, LaunchError, RecordingLauncher, SchemeAllowList,
    UrlLauncher,
};
pub use logging::init_logging;
