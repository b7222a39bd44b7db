use super::QueryOperation;
use crate::domain::failure::QueryFailure;
use crate::domain::requests::{RealmModificationDatesRequest, RealmModificationDatesResponse};
use ah_01_state::StateContext;
use async_trait::async_trait;
use shared_types::QuerySubject;
use std::sync::Arc;

/// Answers a realm's three modification markers.
pub struct RealmModificationDatesQuery {
    state: Arc<StateContext>,
}

impl RealmModificationDatesQuery {
    pub fn new(state: Arc<StateContext>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl QueryOperation for RealmModificationDatesQuery {
    type Request = RealmModificationDatesRequest;
    type Response = RealmModificationDatesResponse;

    const SUBJECT: QuerySubject = QuerySubject::QueryRealmModificationDates;

    async fn execute(
        &self,
        request: RealmModificationDatesRequest,
    ) -> Result<RealmModificationDatesResponse, QueryFailure> {
        let realm = self.state.realm(&request.region_name, &request.realm_slug)?;
        Ok(RealmModificationDatesResponse {
            modification_dates: realm.modification_dates,
        })
    }
}
