//! Shared fixtures for unit tests.

use crate::domain::requests::{OwnersQueryByItemsRequest, OwnersQueryByItemsResponse};
use crate::ports::outbound::LiveAuctionsStore;
use ah_01_state::{
    InMemoryNamespaceProvisioner, ProcessMode, StateContext, TopologyConfig, TopologyStatusSource,
};
use shared_types::DatabaseError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn topology() -> TopologyConfig {
    TopologyConfig::from_json(
        br#"{"regions": [
            {"name": "us", "primary": true,
             "realms": [{"slug": "tichondrius",
                         "modification_dates": {"downloaded": 30,
                                                "live_auctions_received": 20,
                                                "pricelist_histories_received": 10}}]},
            {"name": "eu", "realms": [{"slug": "silvermoon"}]}
        ]}"#,
    )
    .unwrap()
}

pub async fn state(mode: ProcessMode) -> Arc<StateContext> {
    let ctx = StateContext::bootstrap(
        mode,
        &topology(),
        Arc::new(TopologyStatusSource::new(topology())),
        &InMemoryNamespaceProvisioner::new(),
    )
    .await
    .unwrap();
    Arc::new(ctx)
}

/// Store that counts calls and answers with a fixed result.
pub struct SpyStore {
    calls: AtomicUsize,
    result: Result<OwnersQueryByItemsResponse, DatabaseError>,
}

impl SpyStore {
    pub fn answering(result: Result<OwnersQueryByItemsResponse, DatabaseError>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            result,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LiveAuctionsStore for SpyStore {
    fn query_owners_by_items(
        &self,
        _request: &OwnersQueryByItemsRequest,
    ) -> Result<OwnersQueryByItemsResponse, DatabaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}
