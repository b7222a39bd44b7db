//! Topic record registry adapters.

use crate::domain::errors::RegistryError;
use crate::ports::outbound::TopicRecordRegistry;
use parking_lot::Mutex;
use shared_types::TopicRecords;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Registry held in memory.
#[derive(Debug, Default)]
pub struct InMemoryTopicRegistry {
    records: Mutex<TopicRecords>,
}

impl InMemoryTopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: TopicRecords) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl TopicRecordRegistry for InMemoryTopicRegistry {
    fn records(&self) -> Result<TopicRecords, RegistryError> {
        Ok(self.records.lock().clone())
    }

    fn fill(&self, names: &[String], now: u64) -> Result<TopicRecords, RegistryError> {
        let mut records = self.records.lock();
        for name in names {
            records.insert(name.clone(), now);
        }
        Ok(records.clone())
    }

    fn clean(&self, names: &[String]) -> Result<(), RegistryError> {
        let mut records = self.records.lock();
        for name in names {
            records.remove(name);
        }
        Ok(())
    }
}

/// Registry persisted as one JSON object of `name -> last_seen`.
///
/// Every mutation rewrites the whole file through a temporary sibling and a
/// rename, so readers never see a partial file.
#[derive(Debug)]
pub struct JsonFileTopicRegistry {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileTopicRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, path: &Path, e: std::io::Error) -> RegistryError {
        RegistryError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    }

    fn read(&self) -> Result<TopicRecords, RegistryError> {
        match std::fs::read(&self.path) {
            Ok(data) if data.is_empty() => Ok(TopicRecords::new()),
            Ok(data) => serde_json::from_slice(&data)
                .map_err(|e| RegistryError::Corrupt(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(TopicRecords::new()),
            Err(e) => Err(self.io_error(&self.path, e)),
        }
    }

    fn write(&self, records: &TopicRecords) -> Result<(), RegistryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
        }
        let data =
            serde_json::to_vec(records).map_err(|e| RegistryError::Corrupt(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, data).map_err(|e| self.io_error(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(&self.path, e))?;
        debug!(path = %self.path.display(), records = records.len(), "Wrote topic registry");
        Ok(())
    }
}

impl TopicRecordRegistry for JsonFileTopicRegistry {
    fn records(&self) -> Result<TopicRecords, RegistryError> {
        let _guard = self.lock.lock();
        self.read()
    }

    fn fill(&self, names: &[String], now: u64) -> Result<TopicRecords, RegistryError> {
        let _guard = self.lock.lock();
        let mut records = self.read()?;
        for name in names {
            records.insert(name.clone(), now);
        }
        self.write(&records)?;
        Ok(records)
    }

    fn clean(&self, names: &[String]) -> Result<(), RegistryError> {
        if names.is_empty() {
            return Ok(());
        }
        let _guard = self.lock.lock();
        let mut records = self.read()?;
        for name in names {
            records.remove(name);
        }
        self.write(&records)
    }
}
