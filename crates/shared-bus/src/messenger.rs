//! # Messenger
//!
//! Request/reply over a lightweight pub/sub transport.
//!
//! A handler registered with [`Messenger::subscribe`] is invoked once per
//! inbound request, each invocation on its own task. Once the stop signal
//! fires no further invocations start and the subject registration is
//! released.

use crate::message::Message;
use crate::stop::{wait_for_stop, StopSignal};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::MessengerCode;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Errors from messenger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessengerError {
    #[error("no responders for subject {0}")]
    NoResponders(String),

    #[error("request on subject {subject} timed out after {timeout:?}")]
    Timeout { subject: String, timeout: Duration },

    #[error("request has no reply inbox")]
    NoReplyInbox,

    #[error("requester is no longer waiting for a reply")]
    RequesterGone,

    #[error("failed to encode message: {0}")]
    Encode(String),

    #[error("failed to decode reply: {0}")]
    Decode(String),

    #[error("messenger connection failed: {0}")]
    Connection(String),
}

/// One inbound request.
#[derive(Debug)]
pub struct Request {
    pub subject: String,
    pub data: Vec<u8>,
    reply: Option<mpsc::UnboundedSender<Vec<u8>>>,
}

impl Request {
    /// A request without a reply inbox, as produced by a plain publish.
    pub fn fire_and_forget(subject: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            subject: subject.into(),
            data,
            reply: None,
        }
    }

    /// A request whose replies land in `inbox`.
    pub fn with_inbox(
        subject: impl Into<String>,
        data: Vec<u8>,
        inbox: mpsc::UnboundedSender<Vec<u8>>,
    ) -> Self {
        Self {
            subject: subject.into(),
            data,
            reply: Some(inbox),
        }
    }

    #[must_use]
    pub fn expects_reply(&self) -> bool {
        self.reply.is_some()
    }
}

/// Callback invoked once per inbound request.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, request: Request);
}

/// Request/reply transport.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Register `handler` for `subject` until `stop` fires.
    async fn subscribe(
        &self,
        subject: &str,
        stop: StopSignal,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<SubscriptionHandle, MessengerError>;

    /// Send `message` back to whoever issued `request`.
    ///
    /// Exactly one reply per request is expected; a second reply is a caller
    /// error that this layer does not detect.
    fn reply_to(&self, request: &Request, message: Message) -> Result<(), MessengerError>;

    /// Issue a request and wait up to `timeout` for its reply.
    async fn request(
        &self,
        subject: &str,
        data: Vec<u8>,
        timeout: Duration,
    ) -> Result<Message, MessengerError>;

    /// Deliver `data` to every subscriber of `subject` without expecting a
    /// reply. Returns the number of subscribers reached.
    async fn publish(&self, subject: &str, data: Vec<u8>) -> Result<usize, MessengerError>;
}

/// Handle to a running subscription.
pub struct SubscriptionHandle {
    subject: String,
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Wait until the subscription has been released after its stop signal.
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            warn!(subject = %self.subject, error = %e, "Subscription task failed");
        }
    }
}

struct SubjectEntry {
    id: u64,
    sender: mpsc::UnboundedSender<Request>,
}

type SubjectTable = Arc<RwLock<HashMap<String, Vec<SubjectEntry>>>>;

/// In-process messenger.
///
/// Requests on a subject with several subscribers are spread round-robin,
/// like a queue group.
pub struct InMemoryMessenger {
    subjects: SubjectTable,
    next_id: AtomicU64,
    requests_sent: AtomicU64,
}

impl InMemoryMessenger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subjects: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            requests_sent: AtomicU64::new(0),
        }
    }

    /// Number of active subscriptions on `subject`.
    #[must_use]
    pub fn subscriber_count(&self, subject: &str) -> usize {
        self.subjects.read().get(subject).map_or(0, Vec::len)
    }

    /// Total requests issued through this messenger.
    #[must_use]
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent.load(Ordering::Relaxed)
    }

    fn pick_subscriber(&self, subject: &str) -> Option<mpsc::UnboundedSender<Request>> {
        let subjects = self.subjects.read();
        let entries = subjects.get(subject)?;
        if entries.is_empty() {
            return None;
        }
        let n = self.requests_sent.load(Ordering::Relaxed) as usize;
        Some(entries[n % entries.len()].sender.clone())
    }
}

impl Default for InMemoryMessenger {
    fn default() -> Self {
        Self::new()
    }
}

fn reject_stopped(request: &Request) {
    let Some(inbox) = request.reply.as_ref() else {
        return;
    };
    match Message::failure(MessengerCode::GenericError, "subscription stopped").encode() {
        Ok(encoded) => {
            let _ = inbox.send(encoded);
        }
        Err(e) => warn!(subject = %request.subject, error = %e, "Failed to encode stop reply"),
    }
}

#[async_trait]
impl Messenger for InMemoryMessenger {
    async fn subscribe(
        &self,
        subject: &str,
        mut stop: StopSignal,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<SubscriptionHandle, MessengerError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Request>();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.subjects
            .write()
            .entry(subject.to_string())
            .or_default()
            .push(SubjectEntry { id, sender: tx });
        debug!(subject = subject, id = id, "Messenger subscription registered");

        let subjects = Arc::clone(&self.subjects);
        let owned_subject = subject.to_string();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = wait_for_stop(&mut stop) => break,
                    next = rx.recv() => match next {
                        Some(request) => {
                            let handler = Arc::clone(&handler);
                            tokio::spawn(async move { handler.handle(request).await });
                        }
                        None => break,
                    },
                }
            }

            {
                let mut table = subjects.write();
                if let Some(entries) = table.get_mut(&owned_subject) {
                    entries.retain(|entry| entry.id != id);
                    if entries.is_empty() {
                        table.remove(&owned_subject);
                    }
                }
            }

            // Requests queued before stop still get an answer.
            rx.close();
            let mut rejected = 0usize;
            while let Ok(request) = rx.try_recv() {
                rejected += 1;
                reject_stopped(&request);
            }
            debug!(
                subject = %owned_subject,
                id = id,
                rejected = rejected,
                "Messenger subscription released"
            );
        });

        Ok(SubscriptionHandle {
            subject: subject.to_string(),
            task,
        })
    }

    fn reply_to(&self, request: &Request, message: Message) -> Result<(), MessengerError> {
        let inbox = request.reply.as_ref().ok_or(MessengerError::NoReplyInbox)?;
        let encoded = message
            .encode()
            .map_err(|e| MessengerError::Encode(e.to_string()))?;
        inbox
            .send(encoded)
            .map_err(|_| MessengerError::RequesterGone)
    }

    async fn request(
        &self,
        subject: &str,
        data: Vec<u8>,
        timeout: Duration,
    ) -> Result<Message, MessengerError> {
        let subscriber = self
            .pick_subscriber(subject)
            .ok_or_else(|| MessengerError::NoResponders(subject.to_string()))?;
        self.requests_sent.fetch_add(1, Ordering::Relaxed);

        let (inbox_tx, mut inbox_rx) = mpsc::unbounded_channel();
        subscriber
            .send(Request::with_inbox(subject, data, inbox_tx))
            .map_err(|_| MessengerError::NoResponders(subject.to_string()))?;

        let reply = match tokio::time::timeout(timeout, inbox_rx.recv()).await {
            Ok(Some(reply)) => reply,
            // The request was dropped unanswered.
            Ok(None) => return Err(MessengerError::NoResponders(subject.to_string())),
            Err(_) => {
                return Err(MessengerError::Timeout {
                    subject: subject.to_string(),
                    timeout,
                })
            }
        };

        Message::decode(&reply).map_err(|e| MessengerError::Decode(e.to_string()))
    }

    async fn publish(&self, subject: &str, data: Vec<u8>) -> Result<usize, MessengerError> {
        let senders: Vec<_> = self
            .subjects
            .read()
            .get(subject)
            .map(|entries| entries.iter().map(|e| e.sender.clone()).collect())
            .unwrap_or_default();

        let mut delivered = 0;
        for sender in senders {
            if sender
                .send(Request::fire_and_forget(subject, data.clone()))
                .is_ok()
            {
                delivered += 1;
            }
        }
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stop::stop_channel;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;
    use tokio::time::timeout;

    /// Echoes the request payload back.
    struct Echo {
        messenger: Arc<InMemoryMessenger>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RequestHandler for Echo {
        async fn handle(&self, request: Request) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let data = String::from_utf8_lossy(&request.data).to_string();
            let _ = self.messenger.reply_to(&request, Message::with_data(data));
        }
    }

    /// Holds on to every request without replying.
    #[derive(Default)]
    struct Silent {
        held: Mutex<Vec<Request>>,
    }

    #[async_trait]
    impl RequestHandler for Silent {
        async fn handle(&self, request: Request) {
            self.held.lock().push(request);
        }
    }

    /// Drops every request without replying.
    struct Discard;

    #[async_trait]
    impl RequestHandler for Discard {
        async fn handle(&self, _request: Request) {}
    }

    #[tokio::test]
    async fn test_request_reply_round_trip() {
        let messenger = Arc::new(InMemoryMessenger::new());
        let echo = Arc::new(Echo {
            messenger: Arc::clone(&messenger),
            calls: AtomicUsize::new(0),
        });
        let (_stop, signal) = stop_channel();
        messenger.subscribe("echo", signal, echo.clone()).await.unwrap();

        let reply = messenger
            .request("echo", b"hello".to_vec(), Duration::from_secs(1))
            .await
            .unwrap();

        assert!(reply.is_ok());
        assert_eq!(reply.data, "hello");
        assert_eq!(echo.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_request_without_subscriber() {
        let messenger = InMemoryMessenger::new();
        let result = messenger
            .request("nobody", vec![], Duration::from_millis(50))
            .await;
        assert!(matches!(result, Err(MessengerError::NoResponders(_))));
    }

    #[tokio::test]
    async fn test_request_times_out_without_reply() {
        let messenger = InMemoryMessenger::new();
        let (_stop, signal) = stop_channel();
        messenger
            .subscribe("silent", signal, Arc::new(Silent::default()))
            .await
            .unwrap();

        let result = messenger
            .request("silent", vec![], Duration::from_millis(20))
            .await;
        assert!(matches!(result, Err(MessengerError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_stop_releases_subject() {
        let messenger = Arc::new(InMemoryMessenger::new());
        let (stop, signal) = stop_channel();
        let handle = messenger
            .subscribe("silent", signal, Arc::new(Silent::default()))
            .await
            .unwrap();
        assert_eq!(messenger.subscriber_count("silent"), 1);

        stop.stop();
        timeout(Duration::from_millis(200), handle.stopped())
            .await
            .expect("subscription should stop");

        assert_eq!(messenger.subscriber_count("silent"), 0);
        let result = messenger
            .request("silent", vec![], Duration::from_millis(20))
            .await;
        assert!(matches!(result, Err(MessengerError::NoResponders(_))));
    }

    #[tokio::test]
    async fn test_dropped_request_is_not_a_timeout() {
        let messenger = InMemoryMessenger::new();
        let (_stop, signal) = stop_channel();
        messenger
            .subscribe("discard", signal, Arc::new(Discard))
            .await
            .unwrap();

        let result = messenger
            .request("discard", vec![], Duration::from_secs(5))
            .await;
        assert!(matches!(result, Err(MessengerError::NoResponders(ref s)) if s == "discard"));
    }

    #[tokio::test]
    async fn test_requests_queued_at_stop_are_rejected() {
        let messenger = InMemoryMessenger::new();
        let (stop, signal) = stop_channel();
        let handler = Arc::new(Silent::default());
        let handle = messenger
            .subscribe("status", signal, handler.clone())
            .await
            .unwrap();

        // The subscription task has not run yet: the request is queued, then
        // stop wins the race.
        stop.stop();
        let reply = messenger
            .request("status", vec![], Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(reply.code, MessengerCode::GenericError);
        assert_eq!(reply.err, "subscription stopped");
        assert!(handler.held.lock().is_empty());
        timeout(Duration::from_millis(200), handle.stopped())
            .await
            .expect("subscription should stop");
    }

    #[tokio::test]
    async fn test_reply_to_fire_and_forget_request() {
        let messenger = InMemoryMessenger::new();
        let request = Request::fire_and_forget("metrics", vec![]);
        let result = messenger.reply_to(&request, Message::new());
        assert!(matches!(result, Err(MessengerError::NoReplyInbox)));
    }

    #[tokio::test]
    async fn test_failure_code_survives_the_wire() {
        let messenger = InMemoryMessenger::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let request = Request::with_inbox("status", vec![], tx);

        messenger
            .reply_to(
                &request,
                Message::failure(MessengerCode::NotFound, "region not found"),
            )
            .unwrap();

        let reply = Message::decode(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(reply.code, MessengerCode::NotFound);
        assert_eq!(reply.err, "region not found");
    }

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let messenger = Arc::new(InMemoryMessenger::new());
        let (_stop, signal) = stop_channel();
        for _ in 0..3 {
            messenger
                .subscribe("fanout", signal.clone(), Arc::new(Silent::default()))
                .await
                .unwrap();
        }
        assert_eq!(messenger.publish("fanout", vec![1]).await.unwrap(), 3);
        assert_eq!(messenger.publish("empty", vec![1]).await.unwrap(), 0);
    }
}
