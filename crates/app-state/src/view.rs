//! Screen-local view state
//!
//! Small pieces of UI state that screens own explicitly instead of keeping
//! them in globals: a segmented control selection and a visibility toggle.

use thiserror::Error;

/// View state errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewStateError {
    /// Segment index outside the option list
    #[error("Segment index {index} out of range (0..{len})")]
    SegmentOutOfRange {
        /// Requested index
        index: usize,
        /// Number of options
        len: usize,
    },

    /// A segmented control needs at least one option
    #[error("Segmented control has no options")]
    NoOptions,
}

/// Result type for view state operations
pub type Result<T> = std::result::Result<T, ViewStateError>;

/// Selection state of a segmented control
///
/// Each option has a display label; the selected option is also exposed as
/// a camelCase key (`"Created At"` becomes `"createdAt"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedSelection {
    options: Vec<String>,
    selected_index: usize,
}

impl SegmentedSelection {
    /// Create a selection with the first option selected
    pub fn new<I, S>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        if options.is_empty() {
            return Err(ViewStateError::NoOptions);
        }
        Ok(Self {
            options,
            selected_index: 0,
        })
    }

    /// Option labels in display order
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of the selected option
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Label of the selected option
    pub fn selected_label(&self) -> &str {
        self.options
            .get(self.selected_index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// camelCase key of the selected option
    pub fn selected_key(&self) -> String {
        camel_case(self.selected_label())
    }

    /// Select an option by index, returning its key
    pub fn select(&mut self, index: usize) -> Result<String> {
        if index >= self.options.len() {
            return Err(ViewStateError::SegmentOutOfRange {
                index,
                len: self.options.len(),
            });
        }
        self.selected_index = index;
        Ok(self.selected_key())
    }
}

/// Visibility flag for sheets and overlays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visibility {
    visible: bool,
}

impl Visibility {
    /// Hidden by default
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the element is shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip visibility, returning the new value
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Show the element
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Hide the element
    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Convert a display label into a camelCase key
///
/// Words are split on any non-alphanumeric character; the first word is
/// lowercased and the rest are capitalized.
pub fn camel_case(label: &str) -> String {
    let mut key = String::with_capacity(label.len());

    for (i, word) in label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let lower = word.to_lowercase();
        if i == 0 {
            key.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            key.extend(first.to_uppercase());
            key.push_str(chars.as_str());
        }
    }

    key
}
