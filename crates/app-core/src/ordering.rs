//! Bar list ordering
//!
//! Sorts a bar list by a user-selected property and direction. Text
//! properties compare case-insensitively (Unicode lowercase folding), so
//! "alpha" sorts before "Beta"; timestamps compare chronologically. The sort
//! is stable and descending order reverses the comparator rather than the
//! output, so bars with equal keys keep their input order in both
//! directions.
//!
//! Ordering is recomputed on every render; lists are small (tens to low
//! hundreds of bars) and the input is never mutated.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::bars::Bar;

/// Ordering errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderingError {
    /// Property is not sortable
    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),

    /// Direction is neither `asc` nor `desc`
    #[error("Invalid sort direction: {0}")]
    InvalidSortDirection(String),
}

/// Result type for ordering operations
pub type Result<T> = std::result::Result<T, OrderingError>;

/// Sortable bar properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortProperty {
    /// Bar name (case-insensitive)
    #[default]
    Name,
    /// Address (case-insensitive, missing sorts as empty)
    Location,
    /// Creation time
    CreatedAt,
}

impl SortProperty {
    /// All sortable properties
    pub const ALL: [SortProperty; 3] =
        [SortProperty::Name, SortProperty::Location, SortProperty::CreatedAt];

    /// Property key as used by the list screen
    pub fn as_str(&self) -> &'static str {
        match self {
            SortProperty::Name => "name",
            SortProperty::Location => "location",
            SortProperty::CreatedAt => "createdAt",
        }
    }
}

impl FromStr for SortProperty {
    type Err = OrderingError;

    fn from_str(s: &str) -> Result<Self> {
        SortProperty::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| OrderingError::InvalidSortKey(s.to_string()))
    }
}

impl fmt::Display for SortProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// Direction key (`asc` / `desc`)
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// The opposite direction
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl FromStr for SortDirection {
    type Err = OrderingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            other => Err(OrderingError::InvalidSortDirection(other.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Property and direction driving a sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SortSpec {
    /// Property to sort by
    pub property: SortProperty,
    /// Direction
    pub direction: SortDirection,
}

impl SortSpec {
    /// Create a sort spec
    pub fn new(property: SortProperty, direction: SortDirection) -> Self {
        Self { property, direction }
    }

    /// Parse a spec from its string keys
    ///
    /// # Errors
    ///
    /// - `OrderingError::InvalidSortKey` - unknown property
    /// - `OrderingError::InvalidSortDirection` - unknown direction
    pub fn parse(property: &str, direction: &str) -> Result<Self> {
        Ok(Self {
            property: property.parse()?,
            direction: direction.parse()?,
        })
    }
}

/// Order bars by string keys
///
/// Fails before sorting when either key is invalid; a bad key is a caller
/// bug and is logged at error level.
///
/// # Example
///
/// ```
/// use app_core::bars::Bar;
/// use app_core::ordering::order;
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let bars = vec![
///     Bar::new("1", "Zeta", now),
///     Bar::new("2", "alpha", now),
///     Bar::new("3", "Beta", now),
/// ];
///
/// let sorted = order(&bars, "name", "asc").unwrap();
/// let names: Vec<_> = sorted.iter().map(|b| b.name.as_str()).collect();
/// assert_eq!(names, ["alpha", "Beta", "Zeta"]);
/// ```
pub fn order(records: &[Bar], property: &str, direction: &str) -> Result<Vec<Bar>> {
    let spec = SortSpec::parse(property, direction).inspect_err(|e| {
        tracing::error!(property, direction, error = %e, "refusing to order bars");
    })?;
    Ok(order_by(records, spec))
}

/// Order bars by a parsed spec
pub fn order_by(records: &[Bar], spec: SortSpec) -> Vec<Bar> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| compare(a, b, spec));
    sorted
}

/// Compare two bars under a spec
pub fn compare(a: &Bar, b: &Bar, spec: SortSpec) -> Ordering {
    let ordering = match spec.property {
        SortProperty::Name => compare_text(&a.name, &b.name),
        SortProperty::Location => compare_text(
            a.location.as_deref().unwrap_or_default(),
            b.location.as_deref().unwrap_or_default(),
        ),
        SortProperty::CreatedAt => a.created_at.cmp(&b.created_at),
    };

    match spec.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
