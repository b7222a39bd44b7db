//! Subject table built once per process mode.

use crate::ipc::dispatch::Dispatch;
use crate::operations::{OwnersQueryByItems, RealmModificationDatesQuery, StatusQuery};
use crate::ports::outbound::LiveAuctionsStore;
use ah_01_state::{ProcessMode, StateContext};
use shared_bus::{Messenger, MessengerError, RequestHandler, StopSignal, SubscriptionHandle};
use shared_types::QuerySubject;
use std::sync::Arc;
use tracing::info;

/// Everything the query operations read from.
#[derive(Clone)]
pub struct QueryDeps {
    pub state: Arc<StateContext>,
    pub live_auctions: Arc<dyn LiveAuctionsStore>,
}

/// Subjects answered by a process mode.
#[must_use]
pub fn subjects_for(mode: ProcessMode) -> Vec<QuerySubject> {
    QuerySubject::ALL
        .into_iter()
        .filter(|subject| mode.hosts(owner_of(*subject)))
        .collect()
}

fn owner_of(subject: QuerySubject) -> ProcessMode {
    match subject {
        QuerySubject::Status | QuerySubject::QueryRealmModificationDates => ProcessMode::Api,
        QuerySubject::OwnersQueryByItems => ProcessMode::LiveAuctions,
    }
}

fn handler_for(
    subject: QuerySubject,
    deps: &QueryDeps,
    messenger: &Arc<dyn Messenger>,
) -> Arc<dyn RequestHandler> {
    let messenger = Arc::clone(messenger);
    match subject {
        QuerySubject::Status => Arc::new(Dispatch::new(
            StatusQuery::new(Arc::clone(&deps.state)),
            messenger,
        )),
        QuerySubject::OwnersQueryByItems => Arc::new(Dispatch::new(
            OwnersQueryByItems::new(Arc::clone(&deps.state), Arc::clone(&deps.live_auctions)),
            messenger,
        )),
        QuerySubject::QueryRealmModificationDates => Arc::new(Dispatch::new(
            RealmModificationDatesQuery::new(Arc::clone(&deps.state)),
            messenger,
        )),
    }
}

/// One handler per subject the mode answers.
pub struct DispatchTable {
    entries: Vec<(QuerySubject, Arc<dyn RequestHandler>)>,
    messenger: Arc<dyn Messenger>,
}

impl DispatchTable {
    pub fn for_mode(mode: ProcessMode, deps: &QueryDeps, messenger: Arc<dyn Messenger>) -> Self {
        let entries = subjects_for(mode)
            .into_iter()
            .map(|subject| (subject, handler_for(subject, deps, &messenger)))
            .collect();
        Self { entries, messenger }
    }

    #[must_use]
    pub fn subjects(&self) -> Vec<QuerySubject> {
        self.entries.iter().map(|(subject, _)| *subject).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One messenger subscription per entry, all sharing `stop`.
    pub async fn subscribe_all(
        &self,
        stop: &StopSignal,
    ) -> Result<Vec<SubscriptionHandle>, MessengerError> {
        let mut handles = Vec::with_capacity(self.entries.len());
        for (subject, handler) in &self.entries {
            let handle = self
                .messenger
                .subscribe(subject.as_str(), stop.clone(), Arc::clone(handler))
                .await?;
            info!(subject = %subject, "Listening for queries");
            handles.push(handle);
        }
        Ok(handles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLiveAuctions;
    use crate::domain::auctions::Auction;
    use crate::domain::requests::{OwnersQueryByItemsRequest, OwnersQueryByItemsResponse};
    use crate::test_utils::state;
    use shared_bus::{stop_channel, InMemoryMessenger, Message};
    use shared_types::MessengerCode;
    use std::time::Duration;
    use tokio::time::timeout;

    #[test]
    fn test_subjects_per_mode() {
        assert_eq!(
            subjects_for(ProcessMode::Api),
            vec![QuerySubject::Status, QuerySubject::QueryRealmModificationDates]
        );
        assert_eq!(
            subjects_for(ProcessMode::LiveAuctions),
            vec![QuerySubject::OwnersQueryByItems]
        );
        assert!(subjects_for(ProcessMode::Gateway).is_empty());
        assert!(subjects_for(ProcessMode::PubsubTopicsMonitor).is_empty());
        assert_eq!(subjects_for(ProcessMode::Standalone).len(), 3);
    }

    async fn request(messenger: &InMemoryMessenger, subject: QuerySubject, body: &[u8]) -> Message {
        messenger
            .request(subject.as_str(), body.to_vec(), Duration::from_secs(1))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_table_answers_over_messenger() {
        let messenger = Arc::new(InMemoryMessenger::new());
        let store = Arc::new(InMemoryLiveAuctions::new());
        store.load(
            "us",
            "tichondrius",
            vec![Auction {
                id: 1,
                item_id: 7,
                owner: "Alice".into(),
                buyout: 3,
                quantity: 2,
            }],
        );
        let deps = QueryDeps {
            state: state(ProcessMode::Standalone).await,
            live_auctions: store,
        };
        let table = DispatchTable::for_mode(ProcessMode::Standalone, &deps, messenger.clone());
        let (stop, signal) = stop_channel();
        let handles = table.subscribe_all(&signal).await.unwrap();
        assert_eq!(handles.len(), 3);

        let body = serde_json::to_vec(&OwnersQueryByItemsRequest {
            region_name: "us".into(),
            realm_slug: "tichondrius".into(),
            item_ids: vec![7],
        })
        .unwrap();
        let reply = request(&messenger, QuerySubject::OwnersQueryByItems, &body).await;
        let response: OwnersQueryByItemsResponse = serde_json::from_str(&reply.data).unwrap();
        assert_eq!(response.total_value, 6);

        let reply = request(&messenger, QuerySubject::Status, b"garbage").await;
        assert_eq!(reply.code, MessengerCode::MsgJSONParseError);

        stop.stop();
        for handle in handles {
            timeout(Duration::from_secs(1), handle.stopped())
                .await
                .expect("subscription released");
        }
        assert_eq!(messenger.subscriber_count(QuerySubject::Status.as_str()), 0);
    }

    #[tokio::test]
    async fn test_unloaded_realm_is_not_found() {
        let messenger = Arc::new(InMemoryMessenger::new());
        let deps = QueryDeps {
            state: state(ProcessMode::LiveAuctions).await,
            live_auctions: Arc::new(InMemoryLiveAuctions::new()),
        };
        let table = DispatchTable::for_mode(ProcessMode::LiveAuctions, &deps, messenger.clone());
        let (_stop, signal) = stop_channel();
        let _handles = table.subscribe_all(&signal).await.unwrap();

        let body = br#"{"region_name": "eu", "realm_slug": "silvermoon", "item_ids": [1]}"#;
        let reply = request(&messenger, QuerySubject::OwnersQueryByItems, body).await;
        assert_eq!(reply.code, MessengerCode::NotFound);
    }
}
