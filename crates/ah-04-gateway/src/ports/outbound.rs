//! # Outbound Ports (Driven Side)

use crate::domain::errors::GatewayError;
use async_trait::async_trait;
use shared_types::RegionRealmTimestampTuples;

/// The remote compute service.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Ask the gateway to compute pricelist histories for every tuple.
    /// Returns once the gateway has answered.
    async fn compute_all_pricelist_histories(
        &self,
        tuples: &RegionRealmTimestampTuples,
    ) -> Result<(), GatewayError>;
}
