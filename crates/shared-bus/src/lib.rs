//! # Shared Bus - Messaging for Inter-Process Communication
//!
//! Two transports are abstracted here:
//!
//! - **Messenger**: lightweight request/reply. Exactly one reply per request,
//!   correlated through the request's implicit reply inbox.
//! - **Bus**: durable topic-based pub/sub with a subscription-management
//!   plane (enumerate subscriptions, prune topics, acknowledge messages).
//!
//! ```text
//! ┌──────────────┐  request()   ┌──────────────┐  subscribe()  ┌──────────────┐
//! │  Requester   │ ───────────→ │  Messenger   │ ────────────→ │   Handler    │
//! │              │ ←─────────── │              │ ←──────────── │              │
//! └──────────────┘    reply     └──────────────┘   reply_to()  └──────────────┘
//!
//! ┌──────────────┐  publish()   ┌──────────────┐  callback     ┌──────────────┐
//! │  Producer    │ ───────────→ │  Bus topic   │ ────────────→ │ Subscription │
//! └──────────────┘              └──────────────┘               └──────────────┘
//!                                      ↑ check_all_subscriptions / prune_topics
//! ```
//!
//! ## Delivery
//!
//! Every inbound request or message is handled on its own task. Handlers must
//! not assume exclusive access to shared state. Cancellation is cooperative:
//! a stop signal ends delivery, an in-flight handler always runs to completion.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod bus;
pub mod message;
pub mod messenger;
pub mod stop;
pub mod subscription;

pub use bus::{Bus, BusCallback, BusError, InMemoryBus};
pub use message::{BusMessage, Message};
pub use messenger::{
    InMemoryMessenger, Messenger, MessengerError, Request, RequestHandler, SubscriptionHandle,
};
pub use stop::{stop_channel, wait_for_stop, StopHandle, StopSignal};
pub use subscription::{
    PruneResult, PruneResults, SubscribeConfig, SubscriptionCheckResult,
    SubscriptionCheckResults, SubscriptionSignals,
};

/// Page size used when scanning the subscription-management plane.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Default timeout for a messenger or bus request.
pub const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_size() {
        assert_eq!(DEFAULT_PAGE_SIZE, 1000);
    }
}
