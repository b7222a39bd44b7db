//! Query operations, one per subject.

pub mod modification_dates;
pub mod owners;
pub mod status;

use crate::domain::failure::QueryFailure;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::QuerySubject;

pub use modification_dates::RealmModificationDatesQuery;
pub use owners::OwnersQueryByItems;
pub use status::StatusQuery;

/// The decode, execute and encode triple bound to one subject.
#[async_trait]
pub trait QueryOperation: Send + Sync + 'static {
    type Request: DeserializeOwned + Send;
    type Response: Serialize + Send;

    const SUBJECT: QuerySubject;

    async fn execute(&self, request: Self::Request) -> Result<Self::Response, QueryFailure>;
}
