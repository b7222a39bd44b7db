use super::QueryOperation;
use crate::domain::failure::QueryFailure;
use ah_01_state::{StateContext, StatusRequest};
use async_trait::async_trait;
use shared_types::{QuerySubject, Status};
use std::sync::Arc;

/// Answers a region's current status.
pub struct StatusQuery {
    state: Arc<StateContext>,
}

impl StatusQuery {
    pub fn new(state: Arc<StateContext>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl QueryOperation for StatusQuery {
    type Request = StatusRequest;
    type Response = Status;

    const SUBJECT: QuerySubject = QuerySubject::Status;

    async fn execute(&self, request: StatusRequest) -> Result<Status, QueryFailure> {
        Ok(self.state.status(&request.region_name)?)
    }
}
