//! In-memory key/value store adapter.
//!
//! Implements both [`SettingsPort`] and [`StoragePort`] over a
//! `HashMap`.  A flash-backed store would expose the same two ports.
//!
//! - Settings validation: every field is checked before persistence.
//! - Namespace isolation: each subsystem uses its own namespace prefix.
//! - Writes replace the whole value; there are no partial updates.

use std::cell::RefCell;
use std::collections::HashMap;

use log::info;

use crate::app::ports::{ConfigError, SettingsPort, StorageError, StoragePort};
use crate::settings::{FeederSettings, validate_settings};

const SETTINGS_NAMESPACE: &str = "pawfeeder";
const SETTINGS_KEY: &str = "settings";
const MAX_BLOB_SIZE: usize = 4000;

#[derive(Debug, Default)]
pub struct MemoryStore {
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// Number of stored keys across all namespaces.
    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.borrow().is_empty()
    }
}

impl SettingsPort for MemoryStore {
    fn load(&self) -> Result<FeederSettings, ConfigError> {
        let key = Self::composite_key(SETTINGS_NAMESPACE, SETTINGS_KEY);
        match self.store.borrow().get(&key) {
            Some(bytes) => {
                let settings: FeederSettings =
                    postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
                info!("MemoryStore: loaded settings ({} bytes)", bytes.len());
                Ok(settings)
            }
            None => {
                info!("MemoryStore: no stored settings, using defaults");
                Ok(FeederSettings::default())
            }
        }
    }

    fn save(&self, settings: &FeederSettings) -> Result<(), ConfigError> {
        validate_settings(settings)?;
        let bytes = postcard::to_allocvec(settings).map_err(|_| ConfigError::IoError)?;
        if bytes.len() > MAX_BLOB_SIZE {
            return Err(ConfigError::StorageFull);
        }
        let key = Self::composite_key(SETTINGS_NAMESPACE, SETTINGS_KEY);
        info!("MemoryStore: settings saved ({} bytes)", bytes.len());
        self.store.borrow_mut().insert(key, bytes);
        Ok(())
    }
}

impl StoragePort for MemoryStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let composite = Self::composite_key(namespace, key);
        match self.store.borrow().get(&composite) {
            Some(data) => {
                let len = data.len().min(buf.len());
                buf[..len].copy_from_slice(&data[..len]);
                Ok(len)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if data.len() > MAX_BLOB_SIZE {
            return Err(StorageError::Full);
        }
        let composite = Self::composite_key(namespace, key);
        self.store.borrow_mut().insert(composite, data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        let composite = Self::composite_key(namespace, key);
        self.store.borrow_mut().remove(&composite);
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        let composite = Self::composite_key(namespace, key);
        self.store.borrow().contains_key(&composite)
    }
}
