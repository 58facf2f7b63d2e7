//! Application state management for Barfly
//!
//! This crate provides query state tracking (network status, refetch,
//! last error) and the small pieces of view state screens own.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod query;
pub mod view;

pub use query::{FetchPolicy, NetworkStatus, Query, QueryConfig, QueryError, QueryKey, QueryObserver};
pub use view::{camel_case, SegmentedSelection, ViewStateError, Visibility};
