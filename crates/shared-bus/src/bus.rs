//! # Durable Topic Bus
//!
//! Topic-based pub/sub with a subscription-management plane.
//!
//! Topics outlive their subscribers: a consumer that goes away leaves its
//! topic behind with no subscription. Those orphaned topics are found with
//! [`Bus::check_all_subscriptions`] and deleted with [`Bus::prune_topics`].

use crate::message::BusMessage;
use crate::stop::wait_for_stop;
use crate::subscription::{
    PruneResult, PruneResults, SubscribeConfig, SubscriptionCheckResult,
    SubscriptionCheckResults,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::BusCode;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Errors from bus operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("cannot reply to a message without a reply-to topic")]
    NoReplyTopic,

    #[error("page size must be greater than zero")]
    InvalidPageSize,

    #[error("topic not found: {0}")]
    TopicNotFound(String),

    #[error("request on topic {0} timed out")]
    Timeout(String),

    #[error("bus connection failed: {0}")]
    Connection(String),
}

/// Callback invoked once per delivered message.
#[async_trait]
pub trait BusCallback: Send + Sync {
    async fn on_message(&self, message: BusMessage);
}

/// Durable topic bus.
#[async_trait]
pub trait Bus: Send + Sync {
    /// Establish a durable subscription on `topic`.
    ///
    /// Returns once the subscription is active (after `on_ready` fires).
    /// Delivery continues in the background until `config.stop` fires, after
    /// which `on_stopped` fires.
    async fn subscribe_to_topic(&self, topic: &str, config: SubscribeConfig)
        -> Result<(), BusError>;

    /// Publish `message` to every subscription of `topic`. Returns the
    /// message id.
    async fn publish(&self, topic: &str, message: BusMessage) -> Result<String, BusError>;

    /// Acknowledge `message` by publishing `reply` to its reply topic.
    async fn reply_to(&self, message: &BusMessage, reply: BusMessage)
        -> Result<String, BusError>;

    /// Acknowledge `message` with an error tag.
    async fn reply_to_with_error(
        &self,
        message: &BusMessage,
        err: &str,
        code: BusCode,
    ) -> Result<String, BusError> {
        self.reply_to(message, BusMessage::failure(code, err)).await
    }

    /// Publish `message` and wait for its reply on a fresh reply topic.
    async fn request(
        &self,
        topic: &str,
        message: BusMessage,
        timeout: Duration,
    ) -> Result<BusMessage, BusError>;

    /// Full paginated scan of every topic's subscription state.
    async fn check_all_subscriptions(
        &self,
        page_size: usize,
    ) -> Result<SubscriptionCheckResults, BusError>;

    /// Best-effort deletion of the named topics. Every name is attempted.
    async fn prune_topics(&self, names: &[String]) -> PruneResults;
}

struct TopicSubscription {
    name: String,
    sender: mpsc::UnboundedSender<BusMessage>,
}

#[derive(Default)]
struct TopicEntry {
    subscriptions: Vec<TopicSubscription>,
}

type TopicTable = Arc<RwLock<BTreeMap<String, TopicEntry>>>;

/// In-process bus.
///
/// Topics are kept in name order so that scans paginate deterministically.
pub struct InMemoryBus {
    topics: TopicTable,
    messages_published: AtomicU64,
    pages_scanned: AtomicU64,
}

impl InMemoryBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            topics: Arc::new(RwLock::new(BTreeMap::new())),
            messages_published: AtomicU64::new(0),
            pages_scanned: AtomicU64::new(0),
        }
    }

    /// Create `topic` if it does not exist yet.
    pub fn create_topic(&self, topic: &str) {
        self.topics.write().entry(topic.to_string()).or_default();
    }

    #[must_use]
    pub fn topic_exists(&self, topic: &str) -> bool {
        self.topics.read().contains_key(topic)
    }

    #[must_use]
    pub fn subscription_count(&self, topic: &str) -> usize {
        self.topics
            .read()
            .get(topic)
            .map_or(0, |entry| entry.subscriptions.len())
    }

    #[must_use]
    pub fn topic_names(&self) -> Vec<String> {
        self.topics.read().keys().cloned().collect()
    }

    #[must_use]
    pub fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }

    /// Pages fetched by all scans so far.
    #[must_use]
    pub fn pages_scanned(&self) -> u64 {
        self.pages_scanned.load(Ordering::Relaxed)
    }

    fn register(&self, topic: &str) -> (String, mpsc::UnboundedReceiver<BusMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let name = format!("{}-sub-{}", topic, Uuid::new_v4());
        self.topics
            .write()
            .entry(topic.to_string())
            .or_default()
            .subscriptions
            .push(TopicSubscription {
                name: name.clone(),
                sender: tx,
            });
        (name, rx)
    }

    fn unregister(topics: &TopicTable, topic: &str, name: &str) {
        if let Some(entry) = topics.write().get_mut(topic) {
            entry.subscriptions.retain(|s| s.name != name);
        }
    }

    fn scan_page(&self, after: Option<&str>, page_size: usize) -> Vec<SubscriptionCheckResult> {
        let topics = self.topics.read();
        let lower = match after {
            Some(name) => Bound::Excluded(name.to_string()),
            None => Bound::Unbounded,
        };
        topics
            .range((lower, Bound::Unbounded))
            .take(page_size)
            .map(|(name, entry)| SubscriptionCheckResult {
                topic_name: name.clone(),
                subscription_names: entry.subscriptions.iter().map(|s| s.name.clone()).collect(),
            })
            .collect()
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bus for InMemoryBus {
    async fn subscribe_to_topic(
        &self,
        topic: &str,
        config: SubscribeConfig,
    ) -> Result<(), BusError> {
        let SubscribeConfig {
            mut stop,
            on_ready,
            on_stopped,
            callback,
        } = config;

        let (name, mut rx) = self.register(topic);
        debug!(topic = topic, subscription = %name, "Bus subscription active");
        if let Some(ready) = on_ready {
            let _ = ready.send(());
        }

        let topics = Arc::clone(&self.topics);
        let topic = topic.to_string();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = wait_for_stop(&mut stop) => break,
                    next = rx.recv() => match next {
                        Some(message) => {
                            let callback = Arc::clone(&callback);
                            tokio::spawn(async move { callback.on_message(message).await });
                        }
                        // Topic was pruned out from under the subscription.
                        None => break,
                    },
                }
            }

            InMemoryBus::unregister(&topics, &topic, &name);
            debug!(topic = %topic, subscription = %name, "Bus subscription stopped");
            if let Some(stopped) = on_stopped {
                let _ = stopped.send(());
            }
        });

        Ok(())
    }

    async fn publish(&self, topic: &str, mut message: BusMessage) -> Result<String, BusError> {
        let id = Uuid::new_v4().to_string();
        message.id = id.clone();

        let senders: Vec<_> = {
            let mut topics = self.topics.write();
            let entry = topics.entry(topic.to_string()).or_default();
            entry.subscriptions.iter().map(|s| s.sender.clone()).collect()
        };

        for sender in senders {
            if sender.send(message.clone()).is_err() {
                debug!(topic = topic, "Dropped delivery to a closing subscription");
            }
        }
        self.messages_published.fetch_add(1, Ordering::Relaxed);

        Ok(id)
    }

    async fn reply_to(
        &self,
        message: &BusMessage,
        reply: BusMessage,
    ) -> Result<String, BusError> {
        let topic = message
            .reply_to
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(BusError::NoReplyTopic)?;
        self.publish(topic, reply).await
    }

    async fn request(
        &self,
        topic: &str,
        mut message: BusMessage,
        timeout: Duration,
    ) -> Result<BusMessage, BusError> {
        let reply_topic = format!("{}-reply-{}", topic, Uuid::new_v4());
        let (name, mut rx) = self.register(&reply_topic);

        message.reply_to = Some(reply_topic.clone());
        self.publish(topic, message).await?;

        let reply = tokio::time::timeout(timeout, rx.recv()).await;
        // The reply topic is left behind without a subscriber.
        InMemoryBus::unregister(&self.topics, &reply_topic, &name);

        match reply {
            Ok(Some(reply)) => Ok(reply),
            Ok(None) | Err(_) => Err(BusError::Timeout(topic.to_string())),
        }
    }

    async fn check_all_subscriptions(
        &self,
        page_size: usize,
    ) -> Result<SubscriptionCheckResults, BusError> {
        if page_size == 0 {
            return Err(BusError::InvalidPageSize);
        }

        let mut results = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self.scan_page(cursor.as_deref(), page_size);
            self.pages_scanned.fetch_add(1, Ordering::Relaxed);

            let exhausted = page.len() < page_size;
            cursor = page.last().map(|r| r.topic_name.clone());
            results.extend(page);
            if exhausted || cursor.is_none() {
                break;
            }
        }

        Ok(SubscriptionCheckResults(results))
    }

    async fn prune_topics(&self, names: &[String]) -> PruneResults {
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let removed = self.topics.write().remove(name);
            let error = match removed {
                Some(_) => None,
                None => {
                    warn!(topic = %name, "Cannot prune unknown topic");
                    Some(BusError::TopicNotFound(name.clone()).to_string())
                }
            };
            results.push(PruneResult {
                topic_name: name.clone(),
                error,
            });
        }
        PruneResults(results)
    }
}
