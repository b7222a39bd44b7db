//! Status source adapters.

use crate::domain::errors::StatusSourceError;
use crate::domain::topology::TopologyConfig;
use crate::ports::outbound::{StatusRequest, StatusSource};
use async_trait::async_trait;
use shared_bus::Messenger;
use shared_types::{QuerySubject, Status};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Fetches statuses with a request/reply round trip on the `status` subject.
pub struct MessengerStatusSource {
    messenger: Arc<dyn Messenger>,
    timeout: Duration,
}

impl MessengerStatusSource {
    pub fn new(messenger: Arc<dyn Messenger>, timeout: Duration) -> Self {
        Self { messenger, timeout }
    }
}

#[async_trait]
impl StatusSource for MessengerStatusSource {
    async fn fetch_status(&self, region_name: &str) -> Result<Status, StatusSourceError> {
        let request = StatusRequest {
            region_name: region_name.to_string(),
        };
        let data =
            serde_json::to_vec(&request).map_err(|e| StatusSourceError::Decode(e.to_string()))?;

        let reply = self
            .messenger
            .request(QuerySubject::Status.as_str(), data, self.timeout)
            .await?;
        if !reply.is_ok() {
            return Err(StatusSourceError::Rejected {
                code: reply.code,
                err: reply.err,
            });
        }

        let status: Status = serde_json::from_str(&reply.data)
            .map_err(|e| StatusSourceError::Decode(e.to_string()))?;
        debug!(
            region = region_name,
            realms = status.realms.len(),
            "Fetched status"
        );
        Ok(status)
    }
}

/// Answers statuses from the bootstrap topology.
pub struct TopologyStatusSource {
    topology: TopologyConfig,
}

impl TopologyStatusSource {
    pub fn new(topology: TopologyConfig) -> Self {
        Self { topology }
    }
}

#[async_trait]
impl StatusSource for TopologyStatusSource {
    async fn fetch_status(&self, region_name: &str) -> Result<Status, StatusSourceError> {
        self.topology
            .region(region_name)
            .map(|region| region.status())
            .ok_or_else(|| StatusSourceError::UnknownRegion(region_name.to_string()))
    }
}
