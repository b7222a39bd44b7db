//! # Outbound Ports (Driven Side)
//!
//! Collaborators the state context depends on.

use crate::domain::errors::{ProvisionError, StatusSourceError};
use crate::domain::mode::NamespaceKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::Status;
use std::path::PathBuf;

/// Body of a `status` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {
    pub region_name: String,
}

/// Supplies the current status of a region.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, region_name: &str) -> Result<Status, StatusSourceError>;
}

/// Ensures per-realm storage namespaces exist.
pub trait NamespaceProvisioner: Send + Sync {
    /// Create the namespace if absent. Idempotent.
    fn ensure_namespace(
        &self,
        kind: NamespaceKind,
        region_name: &str,
        realm_slug: &str,
    ) -> Result<PathBuf, ProvisionError>;
}
