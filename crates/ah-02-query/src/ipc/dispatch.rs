//! Generic decode, execute, encode and reply adapter.

use crate::operations::QueryOperation;
use ah_telemetry::QUERY_REPLIES;
use async_trait::async_trait;
use shared_bus::{Message, Messenger, Request, RequestHandler};
use shared_types::MessengerCode;
use std::sync::Arc;
use tracing::{debug, warn};

/// Binds one [`QueryOperation`] to the messenger.
///
/// Every request gets exactly one reply:
///
/// 1. Decode. A malformed body replies `MsgJSONParseError`; nothing is executed.
/// 2. Execute. A failure replies with its code and message.
/// 3. Encode. A failure replies `GenericError`.
/// 4. Reply `Ok` with the encoded response.
pub struct Dispatch<Q: QueryOperation> {
    operation: Arc<Q>,
    messenger: Arc<dyn Messenger>,
}

impl<Q: QueryOperation> Dispatch<Q> {
    pub fn new(operation: Q, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            operation: Arc::new(operation),
            messenger,
        }
    }

    /// Build the reply envelope for one request body.
    pub async fn respond(&self, data: &[u8]) -> Message {
        let request: Q::Request = match serde_json::from_slice(data) {
            Ok(request) => request,
            Err(e) => {
                debug!(subject = %Q::SUBJECT, error = %e, "Failed to decode request");
                return Message::failure(MessengerCode::MsgJSONParseError, e.to_string());
            }
        };

        let response = match self.operation.execute(request).await {
            Ok(response) => response,
            Err(failure) => return Message::failure(failure.code, failure.err),
        };

        match serde_json::to_string(&response) {
            Ok(data) => Message::with_data(data),
            Err(e) => {
                warn!(subject = %Q::SUBJECT, error = %e, "Failed to encode response");
                Message::failure(MessengerCode::GenericError, e.to_string())
            }
        }
    }
}

#[async_trait]
impl<Q: QueryOperation> RequestHandler for Dispatch<Q> {
    async fn handle(&self, request: Request) {
        let reply = self.respond(&request.data).await;
        QUERY_REPLIES
            .with_label_values(&[Q::SUBJECT.as_str(), reply.code.label()])
            .inc();

        if let Err(e) = self.messenger.reply_to(&request, reply) {
            warn!(subject = %Q::SUBJECT, error = %e, "Failed to reply");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::requests::{
        OwnersQueryByItemsRequest, OwnersQueryByItemsResponse, RealmModificationDatesResponse,
    };
    use crate::operations::{OwnersQueryByItems, RealmModificationDatesQuery, StatusQuery};
    use crate::test_utils::{state, SpyStore};
    use ah_01_state::ProcessMode;
    use shared_bus::InMemoryMessenger;
    use shared_types::{DatabaseCode, DatabaseError, Status};

    fn messenger() -> Arc<dyn Messenger> {
        Arc::new(InMemoryMessenger::new())
    }

    fn owners_request(region: &str, realm: &str) -> Vec<u8> {
        serde_json::to_vec(&OwnersQueryByItemsRequest {
            region_name: region.into(),
            realm_slug: realm.into(),
            item_ids: vec![1, 2],
        })
        .unwrap()
    }

    async fn owners_dispatch(store: Arc<SpyStore>) -> Dispatch<OwnersQueryByItems> {
        let ctx = state(ProcessMode::LiveAuctions).await;
        Dispatch::new(OwnersQueryByItems::new(ctx, store), messenger())
    }

    #[tokio::test]
    async fn test_decode_failure_never_reaches_store() {
        let store = Arc::new(SpyStore::answering(Ok(OwnersQueryByItemsResponse::default())));
        let dispatch = owners_dispatch(store.clone()).await;

        let bodies: [&[u8]; 4] = [b"not json", b"{}", br#"{"region_name": 5}"#, b""];
        for body in bodies {
            let reply = dispatch.respond(body).await;
            assert_eq!(reply.code, MessengerCode::MsgJSONParseError);
            assert!(!reply.err.is_empty());
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_lookup_miss_never_reaches_store() {
        let store = Arc::new(SpyStore::answering(Ok(OwnersQueryByItemsResponse::default())));
        let dispatch = owners_dispatch(store.clone()).await;

        let region_miss = dispatch.respond(&owners_request("kr", "azshara")).await;
        let realm_miss = dispatch.respond(&owners_request("us", "azshara")).await;

        assert_eq!(region_miss.code, MessengerCode::NotFound);
        assert_eq!(region_miss.err, "region not found");
        assert_eq!(realm_miss.code, MessengerCode::NotFound);
        assert_eq!(realm_miss.err, "realm not found");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_store_codes_are_translated() {
        let cases = [
            (DatabaseCode::NotFound, MessengerCode::NotFound),
            (DatabaseCode::CorruptData, MessengerCode::GenericError),
            (DatabaseCode::StorageFailure, MessengerCode::GenericError),
            (DatabaseCode::GenericError, MessengerCode::GenericError),
        ];
        for (db_code, wire_code) in cases {
            let store = Arc::new(SpyStore::answering(Err(DatabaseError::new(db_code, "nope"))));
            let dispatch = owners_dispatch(store.clone()).await;

            let reply = dispatch.respond(&owners_request("us", "tichondrius")).await;
            assert_eq!(reply.code, wire_code);
            assert_eq!(reply.err, "nope");
            assert_eq!(store.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_success_encodes_response() {
        let expected = OwnersQueryByItemsResponse {
            total_volume: 3,
            ..OwnersQueryByItemsResponse::default()
        };
        let store = Arc::new(SpyStore::answering(Ok(expected.clone())));
        let dispatch = owners_dispatch(store).await;

        let reply = dispatch.respond(&owners_request("us", "tichondrius")).await;
        assert!(reply.is_ok());
        let decoded: OwnersQueryByItemsResponse = serde_json::from_str(&reply.data).unwrap();
        assert_eq!(decoded, expected);
    }

    #[tokio::test]
    async fn test_realm_modification_dates() {
        let ctx = state(ProcessMode::Api).await;
        let dispatch = Dispatch::new(RealmModificationDatesQuery::new(ctx), messenger());

        let reply = dispatch
            .respond(br#"{"region_name": "us", "realm_slug": "tichondrius"}"#)
            .await;
        let decoded: RealmModificationDatesResponse = serde_json::from_str(&reply.data).unwrap();
        assert_eq!(decoded.modification_dates.downloaded, 30);
        assert_eq!(decoded.modification_dates.live_auctions_received, 20);
        assert_eq!(decoded.modification_dates.pricelist_histories_received, 10);

        let reply = dispatch
            .respond(br#"{"region_name": "eu", "realm_slug": "tichondrius"}"#)
            .await;
        assert_eq!(reply.code, MessengerCode::NotFound);
        assert_eq!(reply.err, "realm not found");
    }

    #[tokio::test]
    async fn test_status() {
        let ctx = state(ProcessMode::Api).await;
        let dispatch = Dispatch::new(StatusQuery::new(ctx), messenger());

        let reply = dispatch.respond(br#"{"region_name": "eu"}"#).await;
        let status: Status = serde_json::from_str(&reply.data).unwrap();
        assert_eq!(status.region.name, "eu");

        let reply = dispatch.respond(br#"{"region_name": "kr"}"#).await;
        assert_eq!(reply.code, MessengerCode::NotFound);
    }
}
