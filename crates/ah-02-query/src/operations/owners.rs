use super::QueryOperation;
use crate::domain::failure::QueryFailure;
use crate::domain::requests::{OwnersQueryByItemsRequest, OwnersQueryByItemsResponse};
use crate::ports::outbound::LiveAuctionsStore;
use ah_01_state::StateContext;
use async_trait::async_trait;
use shared_types::QuerySubject;
use std::sync::Arc;

/// Per-owner totals for a set of items in one realm's live auctions.
pub struct OwnersQueryByItems {
    state: Arc<StateContext>,
    store: Arc<dyn LiveAuctionsStore>,
}

impl OwnersQueryByItems {
    pub fn new(state: Arc<StateContext>, store: Arc<dyn LiveAuctionsStore>) -> Self {
        Self { state, store }
    }
}

#[async_trait]
impl QueryOperation for OwnersQueryByItems {
    type Request = OwnersQueryByItemsRequest;
    type Response = OwnersQueryByItemsResponse;

    const SUBJECT: QuerySubject = QuerySubject::OwnersQueryByItems;

    async fn execute(
        &self,
        request: OwnersQueryByItemsRequest,
    ) -> Result<OwnersQueryByItemsResponse, QueryFailure> {
        self.state.realm(&request.region_name, &request.realm_slug)?;
        Ok(self.store.query_owners_by_items(&request)?)
    }
}
