//! Configuration store
//!
//! Repository pattern:
//! - `SettingsBackend` abstracts single-row JSON persistence
//! - `FormConfigStore` layers form semantics (defaults, lenient load) on top
//!
//! Writes are full replacements; concurrent writers are last-write-wins.

use crate::config::{FormConfiguration, FormKey};
use crate::defaults::default_configuration;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Store result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid row key: {0}")]
    InvalidKey(String),

    #[error("corrupt row {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Keyed JSON rows with single-row upsert.
///
/// A reader sees either the previous or the new row, never a partial one.
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// Fetch a row; `Ok(None)` when it was never written.
    async fn fetch(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Insert or fully replace a row.
    async fn upsert(&self, key: &str, value: Value) -> StoreResult<()>;
}

/// In-memory backend (for testing and development)
#[derive(Default)]
pub struct InMemoryBackend {
    rows: RwLock<HashMap<String, Value>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsBackend for InMemoryBackend {
    async fn fetch(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.rows.read().get(key).cloned())
    }

    async fn upsert(&self, key: &str, value: Value) -> StoreResult<()> {
        self.rows.write().insert(key.to_string(), value);
        Ok(())
    }
}

/// One `<key>.json` file per row under a directory.
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn row_path(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl SettingsBackend for JsonFileBackend {
    async fn fetch(&self, key: &str) -> StoreResult<Option<Value>> {
        let path = self.row_path(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Corrupt { key: key.to_string(), source })
    }

    async fn upsert(&self, key: &str, value: Value) -> StoreResult<()> {
        let path = self.row_path(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let content = serde_json::to_vec_pretty(&value)
            .map_err(|source| StoreError::Corrupt { key: key.to_string(), source })?;

        // one temp file per write; rename is atomic on the same filesystem
        let tmp = self.dir.join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));
        let written = match tokio::fs::write(&tmp, content).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(key, path = %path.display(), "row written");
        Ok(())
    }
}

/// Per-form configuration records over a [`SettingsBackend`].
#[derive(Clone)]
pub struct FormConfigStore {
    backend: Arc<dyn SettingsBackend>,
}

impl FormConfigStore {
    pub fn new(backend: Arc<dyn SettingsBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBackend::new()))
    }

    pub fn backend(&self) -> Arc<dyn SettingsBackend> {
        Arc::clone(&self.backend)
    }

    /// Last saved configuration, or the built-in default when the form was
    /// never saved or the backend cannot be read.
    pub async fn get(&self, key: FormKey) -> FormConfiguration {
        match self.try_get(key).await {
            Ok(Some(config)) => config,
            Ok(None) => default_configuration(key),
            Err(e) => {
                warn!(form = %key, error = %e, "form config read failed, serving default");
                default_configuration(key)
            }
        }
    }

    /// Strict read: `Ok(None)` when never saved, errors propagated.
    pub async fn try_get(&self, key: FormKey) -> StoreResult<Option<FormConfiguration>> {
        let row = self.backend.fetch(key.as_str()).await?;
        Ok(row.map(|raw| FormConfiguration::from_raw(key, &raw)))
    }

    /// Replace the whole record. Validates nothing; callers run the builder
    /// checks first.
    pub async fn put(&self, key: FormKey, config: &FormConfiguration) -> StoreResult<()> {
        self.backend.upsert(key.as_str(), config.to_value()).await?;
        debug!(form = %key, fields = config.fields.len(), "form config saved");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::field::{FieldSchema, FieldType};
    use serde_json::json;

    /// Backend whose every call fails.
    pub(crate) struct BrokenBackend;

    #[async_trait]
    impl SettingsBackend for BrokenBackend {
        async fn fetch(&self, _key: &str) -> StoreResult<Option<Value>> {
            Err(StoreError::Unavailable("database offline".into()))
        }

        async fn upsert(&self, _key: &str, _value: Value) -> StoreResult<()> {
            Err(StoreError::Unavailable("database offline".into()))
        }
    }

    fn custom_join() -> FormConfiguration {
        let mut config = default_configuration(FormKey::Join);
        config.copy.title = "Play with us.".into();
        config.fields = vec![FieldSchema::new("join_stage", "stage_name", "Stage name", FieldType::Text).required()];
        config
    }

    #[tokio::test]
    async fn test_never_saved_returns_default() {
        let store = FormConfigStore::in_memory();
        for key in FormKey::ALL {
            let config = store.get(key).await;
            assert_eq!(config, default_configuration(key));
            assert!(!config.fields.is_empty());
            assert!(store.try_get(key).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = FormConfigStore::in_memory();
        store.put(FormKey::Join, &custom_join()).await.unwrap();
        assert_eq!(store.get(FormKey::Join).await, custom_join());
        assert_eq!(store.get(FormKey::Enquire).await, default_configuration(FormKey::Enquire));
    }

    #[tokio::test]
    async fn test_put_replaces_wholesale() {
        let store = FormConfigStore::in_memory();
        store.put(FormKey::Join, &custom_join()).await.unwrap();
        let mut second = default_configuration(FormKey::Join);
        second.recipient_email = Some("artists@example.com".into());
        store.put(FormKey::Join, &second).await.unwrap();
        assert_eq!(store.get(FormKey::Join).await, second);
    }

    #[tokio::test]
    async fn test_broken_backend_degrades_on_read_and_fails_on_write() {
        let store = FormConfigStore::new(Arc::new(BrokenBackend));
        assert_eq!(store.get(FormKey::Contact).await, default_configuration(FormKey::Contact));
        assert!(store.try_get(FormKey::Contact).await.is_err());
        assert!(matches!(
            store.put(FormKey::Contact, &custom_join()).await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_row_is_loaded_leniently() {
        let backend = Arc::new(InMemoryBackend::new());
        backend
            .upsert("join", json!({"title": 5, "fields": [null, {"label": "Stage name", "type": "bogus"}]}))
            .await
            .unwrap();
        let store = FormConfigStore::new(backend);
        let config = store.get(FormKey::Join).await;
        assert_eq!(config.copy.title, default_configuration(FormKey::Join).copy.title);
        assert_eq!(config.fields.len(), 1);
        assert_eq!(config.fields[0].name, "stage_name");
        assert_eq!(config.fields[0].field_type, FieldType::Text);
    }

    #[tokio::test]
    async fn test_json_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FormConfigStore::new(Arc::new(JsonFileBackend::new(dir.path().join("rows"))));

        assert_eq!(store.get(FormKey::Join).await, default_configuration(FormKey::Join));
        store.put(FormKey::Join, &custom_join()).await.unwrap();
        assert!(dir.path().join("rows/join.json").exists());
        assert_eq!(std::fs::read_dir(dir.path().join("rows")).unwrap().count(), 1);
        assert_eq!(store.get(FormKey::Join).await, custom_join());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_json_file_backend_concurrent_writers() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(JsonFileBackend::new(dir.path()));

        for round in 0..10 {
            let mut tasks = Vec::new();
            for writer in 0..8 {
                let backend = Arc::clone(&backend);
                tasks.push(tokio::spawn(async move {
                    backend.upsert("join", json!({"round": round, "writer": writer})).await
                }));
            }
            for reader in 0..4 {
                let backend = Arc::clone(&backend);
                tasks.push(tokio::spawn(async move {
                    match backend.fetch("join").await {
                        Ok(_) => Ok::<(), StoreError>(()),
                        Err(e) => panic!("reader {reader} saw a broken row: {e}"),
                    }
                }));
            }
            for task in tasks {
                task.await.unwrap().unwrap();
            }

            let row = backend.fetch("join").await.unwrap().unwrap();
            assert_eq!(row["round"], round);
        }

        // only the row itself is left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_json_file_backend_corrupt_row() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("contact.json"), b"{not json").unwrap();
        let backend = JsonFileBackend::new(dir.path());
        assert!(matches!(backend.fetch("contact").await, Err(StoreError::Corrupt { .. })));

        let store = FormConfigStore::new(Arc::new(backend));
        assert_eq!(store.get(FormKey::Contact).await, default_configuration(FormKey::Contact));
    }

    #[tokio::test]
    async fn test_json_file_backend_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path());
        assert!(matches!(backend.fetch("../etc/passwd").await, Err(StoreError::InvalidKey(_))));
        assert!(matches!(backend.upsert("", json!({})).await, Err(StoreError::InvalidKey(_))));
    }
}
