//! Bar list query
//!
//! Adapts a [`BarSource`] to the generic query observer so the list screen
//! gets loading and refresh status for free. The list always goes to the
//! network; there is no persistent cache.

use app_state::{FetchPolicy, Query, QueryConfig, QueryError, QueryKey, QueryObserver};
use async_trait::async_trait;
use std::sync::Arc;

use crate::bars::Bar;
use crate::ports::BarSource;

/// Query for every bar
#[derive(Clone)]
pub struct BarListQuery {
    source: Arc<dyn BarSource>,
}

impl BarListQuery {
    /// Create a query over a bar source
    pub fn new(source: Arc<dyn BarSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Query for BarListQuery {
    type Data = Vec<Bar>;

    async fn fetch(&self) -> app_state::query::Result<Self::Data> {
        self.source
            .list_bars()
            .await
            .map_err(|e| QueryError::FetchError(e.to_string()))
    }

    fn key(&self) -> QueryKey {
        QueryKey::new("bars", "all")
    }

    fn config(&self) -> QueryConfig {
        QueryConfig {
            fetch_policy: FetchPolicy::NetworkOnly,
        }
    }
}

/// Observer over the bar list
pub type BarListObserver = QueryObserver<BarListQuery>;

/// Create a bar list observer over a source
pub fn observe_bars(source: Arc<dyn BarSource>) -> BarListObserver {
    QueryObserver::new(BarListQuery::new(source))
}
