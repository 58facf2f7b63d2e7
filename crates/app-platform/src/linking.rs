//! URL launching
//!
//! Websites, phone numbers and map links are handed to the OS through a
//! [`UrlLauncher`]. A URL nothing can open is not an error for the user:
//! [`ContactDispatcher`] logs it and reports [`DispatchOutcome::Unsupported`].

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised when opening a URL
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LaunchError {
    /// No handler accepted the URL
    #[error("No handler for URL: {0}")]
    NoHandler(String),

    /// Handler was found but failed to open the URL
    #[error("Failed to open URL: {0}")]
    Failed(String),
}

/// Result type for launch operations
pub type Result<T> = std::result::Result<T, LaunchError>;

/// Something that can open URLs on the device
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlLauncher: Send + Sync {
    /// Whether some installed app handles this URL
    async fn can_open(&self, url: &str) -> bool;

    /// Open the URL
    async fn open(&self, url: &str) -> Result<()>;
}

/// What happened to a dispatch request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// URL handed to the launcher
    Opened(String),
    /// URL was malformed or nothing could open it; nothing happened
    Unsupported(String),
    /// Launcher accepted the URL but failed to open it
    Failed(LaunchError),
}

impl DispatchOutcome {
    /// Whether the URL was opened
    pub fn is_opened(&self) -> bool {
        matches!(self, DispatchOutcome::Opened(_))
    }
}

/// Scheme of a URL (`https`, `tel`, ...), lowercased
///
/// Returns `None` when the text does not start with a valid scheme.
pub fn scheme(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if valid && !rest.is_empty() {
        Some(scheme.to_ascii_lowercase())
    } else {
        None
    }
}

/// Build a `tel://` URL from a display phone number
///
/// Whitespace is dropped; anything other than digits, `+`, `*`, `#`, `-`,
/// `(`, `)` or `.` makes the number unusable.
pub fn phone_url(number: &str) -> Option<String> {
    let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    let valid = digits.chars().any(|c| c.is_ascii_digit())
        && digits
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '*' | '#' | '-' | '(' | ')' | '.'));

    valid.then(|| format!("tel://{}", digits))
}

/// Opens websites, phone numbers and map links
pub struct ContactDispatcher<L: UrlLauncher> {
    launcher: L,
}

impl<L: UrlLauncher> ContactDispatcher<L> {
    /// Create a dispatcher over a launcher
    pub fn new(launcher: L) -> Self {
        Self { launcher }
    }

    /// Get the underlying launcher
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Open a website
    pub async fn open_website(&self, url: &str) -> DispatchOutcome {
        self.open_url(url.trim()).await
    }

    /// Start a call to a phone number
    pub async fn open_phone(&self, number: &str) -> DispatchOutcome {
        match phone_url(number) {
            Some(url) => self.open_url(&url).await,
            None => {
                tracing::warn!(number, "not a dialable phone number");
                DispatchOutcome::Unsupported(number.to_string())
            }
        }
    }

    /// Open any URL, checking first that something can handle it
    pub async fn open_url(&self, url: &str) -> DispatchOutcome {
        if scheme(url).is_none() {
            tracing::warn!(url, "malformed URL");
            return DispatchOutcome::Unsupported(url.to_string());
        }

        if !self.launcher.can_open(url).await {
            tracing::warn!(url, "no app can open URL");
            return DispatchOutcome::Unsupported(url.to_string());
        }

        match self.launcher.open(url).await {
            Ok(()) => {
                tracing::debug!(url, "opened URL");
                DispatchOutcome::Opened(url.to_string())
            }
            Err(e) => {
                tracing::error!(url, error = %e, "failed to open URL");
                DispatchOutcome::Failed(e)
            }
        }
    }
}

impl<L: UrlLauncher> ContactDispatcher<SchemeAllowList<L>> {
    /// Dispatcher limited to web, phone and map app schemes
    pub fn for_contacts(launcher: L) -> Self {
        Self::new(SchemeAllowList::contact_schemes(launcher))
    }
}

/// Launcher that records what it was asked to open
///
/// Handles every well-formed URL unless restricted with
/// [`RecordingLauncher::supporting`]. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    opened: Arc<Mutex<Vec<String>>>,
    supported: Option<HashSet<String>>,
    fail_with: Option<LaunchError>,
}

impl RecordingLauncher {
    /// Create a launcher that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept URLs with these schemes
    pub fn supporting<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported = Some(schemes.into_iter().map(Into::into).collect());
        self
    }

    /// Fail every `open` with `error`
    pub fn failing(mut self, error: LaunchError) -> Self {
        self.fail_with = Some(error);
        self
    }

    /// URLs opened so far
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

#[async_trait]
impl UrlLauncher for RecordingLauncher {
    async fn can_open(&self, url: &str) -> bool {
        match (&self.supported, scheme(url)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(supported), Some(s)) => supported.contains(&s),
        }
    }

    async fn open(&self, url: &str) -> Result<()> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        self.opened.lock().push(url.to_string());
        Ok(())
    }
}

/// Launcher policy that only lets listed schemes through
pub struct SchemeAllowList<L: UrlLauncher> {
    inner: L,
    schemes: HashSet<String>,
}

impl<L: UrlLauncher> SchemeAllowList<L> {
    /// Wrap `inner`, allowing only `schemes`
    pub fn new<I, S>(inner: L, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            inner,
            schemes: schemes
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Allow the schemes the bar screens use
    pub fn contact_schemes(inner: L) -> Self {
        Self::new(inner, ["http", "https", "tel", "maps", "comgooglemaps", "waze"])
    }

    /// Get the wrapped launcher
    pub fn inner(&self) -> &L {
        &self.inner
    }

    fn allows(&self, url: &str) -> bool {
        scheme(url).is_some_and(|s| self.schemes.contains(&s))
    }
}

#[async_trait]
impl<L: UrlLauncher> UrlLauncher for SchemeAllowList<L> {
    async fn can_open(&self, url: &str) -> bool {
        self.allows(url) && self.inner.can_open(url).await
    }

    async fn open(&self, url: &str) -> Result<()> {
        if !self.allows(url) {
            return Err(LaunchError::NoHandler(url.to_string()));
        }
        self.inner.open(url).await
    }
}
