//! Storage namespace adapters.

use crate::domain::errors::ProvisionError;
use crate::domain::mode::NamespaceKind;
use crate::ports::outbound::NamespaceProvisioner;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Namespace path: `<databases>/<kind>/<region>/<realm>`.
#[must_use]
pub fn namespace_path(
    databases_dir: &Path,
    kind: NamespaceKind,
    region_name: &str,
    realm_slug: &str,
) -> PathBuf {
    databases_dir
        .join(kind.dir_name())
        .join(region_name)
        .join(realm_slug)
}

/// Creates namespaces as directories on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsNamespaceProvisioner {
    databases_dir: PathBuf,
}

impl FsNamespaceProvisioner {
    pub fn new(databases_dir: impl Into<PathBuf>) -> Self {
        Self {
            databases_dir: databases_dir.into(),
        }
    }

    #[must_use]
    pub fn databases_dir(&self) -> &Path {
        &self.databases_dir
    }
}

impl NamespaceProvisioner for FsNamespaceProvisioner {
    fn ensure_namespace(
        &self,
        kind: NamespaceKind,
        region_name: &str,
        realm_slug: &str,
    ) -> Result<PathBuf, ProvisionError> {
        let path = namespace_path(&self.databases_dir, kind, region_name, realm_slug);
        std::fs::create_dir_all(&path).map_err(|e| ProvisionError {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(path)
    }
}

/// Records namespaces in memory. Optionally fails for one realm.
#[derive(Debug, Default)]
pub struct InMemoryNamespaceProvisioner {
    created: Mutex<BTreeSet<PathBuf>>,
    fail_realm: Option<String>,
}

impl InMemoryNamespaceProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provisioner that rejects every namespace for `realm_slug`.
    pub fn failing_for(realm_slug: impl Into<String>) -> Self {
        Self {
            created: Mutex::new(BTreeSet::new()),
            fail_realm: Some(realm_slug.into()),
        }
    }

    pub fn created(&self) -> Vec<PathBuf> {
        self.created.lock().iter().cloned().collect()
    }
}

impl NamespaceProvisioner for InMemoryNamespaceProvisioner {
    fn ensure_namespace(
        &self,
        kind: NamespaceKind,
        region_name: &str,
        realm_slug: &str,
    ) -> Result<PathBuf, ProvisionError> {
        let path = namespace_path(Path::new("databases"), kind, region_name, realm_slug);
        if self.fail_realm.as_deref() == Some(realm_slug) {
            return Err(ProvisionError {
                path,
                message: "provisioning disabled".to_string(),
            });
        }
        self.created.lock().insert(path.clone());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_provisioner_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let provisioner = FsNamespaceProvisioner::new(dir.path().join("databases"));

        let path = provisioner
            .ensure_namespace(NamespaceKind::LiveAuctions, "us", "tichondrius")
            .unwrap();

        assert!(path.is_dir());
        assert!(path.ends_with("databases/live-auctions/us/tichondrius"));
    }

    #[test]
    fn test_fs_provisioner_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let provisioner = FsNamespaceProvisioner::new(dir.path());

        let first = provisioner
            .ensure_namespace(NamespaceKind::PricelistHistories, "eu", "silvermoon")
            .unwrap();
        let second = provisioner
            .ensure_namespace(NamespaceKind::PricelistHistories, "eu", "silvermoon")
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fs_provisioner_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();
        let provisioner = FsNamespaceProvisioner::new(&blocker);

        let err = provisioner
            .ensure_namespace(NamespaceKind::LiveAuctions, "us", "a")
            .unwrap_err();
        assert!(err.path.starts_with(&blocker));
    }

    #[test]
    fn test_in_memory_provisioner_failure() {
        let provisioner = InMemoryNamespaceProvisioner::failing_for("bad");
        assert!(provisioner
            .ensure_namespace(NamespaceKind::LiveAuctions, "us", "good")
            .is_ok());
        assert!(provisioner
            .ensure_namespace(NamespaceKind::LiveAuctions, "us", "bad")
            .is_err());
        assert_eq!(provisioner.created().len(), 1);
    }
}
