//! HTTP remote gateway client.

use crate::domain::errors::GatewayError;
use crate::ports::outbound::RemoteGateway;
use async_trait::async_trait;
use reqwest::Client;
use shared_types::RegionRealmTimestampTuples;
use std::time::Duration;
use tracing::info;

/// Path of the compute operation under the gateway endpoint.
pub const COMPUTE_ALL_PRICELIST_HISTORIES_PATH: &str = "compute-all-pricelist-histories";

/// Calls the gateway with a JSON POST.
///
/// The endpoint is resolved once, at construction. Only connecting is bounded
/// by a timeout; the call itself may run as long as the gateway needs.
pub struct HttpRemoteGateway {
    client: Client,
    url: String,
}

impl HttpRemoteGateway {
    pub fn new(endpoint: &str) -> Result<Self, GatewayError> {
        let endpoint = endpoint.trim_end_matches('/');
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(GatewayError::InvalidEndpoint(endpoint.to_string()));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/{}", endpoint, COMPUTE_ALL_PRICELIST_HISTORIES_PATH),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteGateway for HttpRemoteGateway {
    async fn compute_all_pricelist_histories(
        &self,
        tuples: &RegionRealmTimestampTuples,
    ) -> Result<(), GatewayError> {
        info!(url = %self.url, tuples = tuples.len(), "Calling compute-all-pricelist-histories");

        let response = self
            .client
            .post(&self.url)
            .json(tuples)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    GatewayError::Connection(self.url.clone())
                } else {
                    GatewayError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("Done calling compute-all-pricelist-histories");
        Ok(())
    }
}
