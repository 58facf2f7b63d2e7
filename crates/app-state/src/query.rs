//! Query management
//!
//! This module tracks server state for a single remote query: the latest
//! data, a network status indicator that screens poll to drive loading and
//! pull-to-refresh spinners, and the last error. Status codes follow the
//! numbering clients of GraphQL caches commonly use, so `Refetch` is `4`.
//!
//! Fetches may overlap (a second pull-to-refresh before the first returns).
//! Only the most recently started fetch updates the observed data and
//! status; earlier ones still return their result to their caller.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;

/// Query errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Query fetch failed
    #[error("Query fetch failed: {0}")]
    FetchError(String),
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

/// Query key for identifying queries in logs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Scope of the query (e.g., "bars", "members")
    pub scope: String,

    /// Unique identifier within the scope
    pub id: String,

    /// Optional parameters, kept sorted
    pub params: BTreeMap<String, String>,
}

impl QueryKey {
    /// Create a new query key
    pub fn new(scope: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            id: id.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter to the query key
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope, self.id)?;
        let mut separator = '?';
        for (k, v) in &self.params {
            write!(f, "{}{}={}", separator, k, v)?;
            separator = '&';
        }
        Ok(())
    }
}

/// Network activity of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NetworkStatus {
    /// First load, no data yet
    Loading = 1,
    /// Reloading with data already present
    SetVariables = 2,
    /// Explicit refetch (pull-to-refresh)
    Refetch = 4,
    /// Idle with data (or never fetched)
    Ready = 7,
    /// Last fetch failed
    Error = 8,
}

impl NetworkStatus {
    /// Numeric status code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether a request is currently in flight
    pub fn is_in_flight(self) -> bool {
        !matches!(self, NetworkStatus::Ready | NetworkStatus::Error)
    }
}

/// How a fetch treats already-loaded data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Return loaded data if present, otherwise hit the network
    CacheFirst,
    /// Always hit the network
    #[default]
    NetworkOnly,
}

/// Query configuration
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Fetch policy for `fetch`; `refetch` always goes to the network
    pub fetch_policy: FetchPolicy,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            fetch_policy: FetchPolicy::NetworkOnly,
        }
    }
}

/// Query trait for defining data fetching logic
#[async_trait]
pub trait Query: Send + Sync {
    /// The type of data this query returns
    type Data: Clone + Send + Sync;

    /// Fetch the data
    async fn fetch(&self) -> Result<Self::Data>;

    /// Get the query key
    fn key(&self) -> QueryKey;

    /// Get the query configuration
    fn config(&self) -> QueryConfig {
        QueryConfig::default()
    }
}

/// Query metadata
#[derive(Debug, Clone)]
struct QueryMeta {
    status: NetworkStatus,
    fetched_at: Option<SystemTime>,
    fetch_count: u32,
    last_error: Option<QueryError>,
    // Fetch allowed to publish its result
    latest: u64,
}

impl QueryMeta {
    fn new() -> Self {
        Self {
            status: NetworkStatus::Ready,
            fetched_at: None,
            fetch_count: 0,
            last_error: None,
            latest: 0,
        }
    }
}

/// Holds the latest result of one query and its network status
///
/// Cloning is cheap; clones share state, so a screen can hand a clone to a
/// spawned refresh task and keep polling `network_status` from its own.
pub struct QueryObserver<Q: Query> {
    query: Arc<Q>,
    data: Arc<RwLock<Option<Q::Data>>>,
    meta: Arc<RwLock<QueryMeta>>,
}

impl<Q: Query> QueryObserver<Q> {
    /// Create an observer; nothing is fetched until `fetch` is called
    pub fn new(query: Q) -> Self {
        Self {
            query: Arc::new(query),
            data: Arc::new(RwLock::new(None)),
            meta: Arc::new(RwLock::new(QueryMeta::new())),
        }
    }

    /// Get the observed query
    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Load data according to the configured fetch policy
    pub async fn fetch(&self) -> Result<Q::Data> {
        if self.query.config().fetch_policy == FetchPolicy::CacheFirst {
            if let Some(data) = self.data() {
                return Ok(data);
            }
        }

        let status = if self.data.read().is_some() {
            NetworkStatus::SetVariables
        } else {
            NetworkStatus::Loading
        };
        self.run(status).await
    }

    /// Force a network fetch, keeping current data visible meanwhile
    pub async fn refetch(&self) -> Result<Q::Data> {
        self.run(NetworkStatus::Refetch).await
    }

    async fn run(&self, status: NetworkStatus) -> Result<Q::Data> {
        let key = self.query.key();

        let generation = {
            let mut meta = self.meta.write();
            meta.status = status;
            meta.fetch_count += 1;
            meta.latest += 1;
            meta.latest
        };
        tracing::debug!(query = %key, status = status.code(), generation, "fetching query");

        let result = self.query.fetch().await;

        // Lock order: meta, then data
        let mut meta = self.meta.write();
        if meta.latest != generation {
            tracing::debug!(query = %key, generation, "superseded fetch finished");
            return result;
        }

        match &result {
            Ok(data) => {
                *self.data.write() = Some(data.clone());
                meta.status = NetworkStatus::Ready;
                meta.fetched_at = Some(SystemTime::now());
                meta.last_error = None;
            }
            Err(e) => {
                tracing::warn!(query = %key, error = %e, "query fetch failed");
                meta.status = NetworkStatus::Error;
                meta.last_error = Some(e.clone());
            }
        }
        result
    }

    /// Latest successfully fetched data
    pub fn data(&self) -> Option<Q::Data> {
        self.data.read().clone()
    }

    /// Current network status
    pub fn network_status(&self) -> NetworkStatus {
        self.meta.read().status
    }

    /// True while a refetch is in flight
    pub fn is_refreshing(&self) -> bool {
        self.network_status() == NetworkStatus::Refetch
    }

    /// True during the first load
    pub fn is_loading(&self) -> bool {
        self.network_status() == NetworkStatus::Loading
    }

    /// Error from the last fetch, cleared by the next success
    pub fn last_error(&self) -> Option<QueryError> {
        self.meta.read().last_error.clone()
    }

    /// When data was last fetched successfully
    pub fn fetched_at(&self) -> Option<SystemTime> {
        self.meta.read().fetched_at
    }

    /// Number of fetches started
    pub fn fetch_count(&self) -> u32 {
        self.meta.read().fetch_count
    }
}

impl<Q: Query> Clone for QueryObserver<Q> {
    fn clone(&self) -> Self {
        Self {
            query: Arc::clone(&self.query),
            data: Arc::clone(&self.data),
            meta: Arc::clone(&self.meta),
        }
    }
}
