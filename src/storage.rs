use crate::dates::{date_key, parse_date_key};
use crate::errors::StorageError;
use crate::models::{DailyRecord, Medication, RecordsMap};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

pub const RECORDS_KEY: &str = "uc-tracker-records";
pub const MEDICATIONS_KEY: &str = "uc-tracker-medications";

// Writes replace the whole blob.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    async fn write(&self, key: &str, payload: Vec<u8>) -> Result<(), StorageError>;
}

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl BlobStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, key: &str, payload: Vec<u8>) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.path(key), payload).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn put_raw(&self, key: &str, payload: impl Into<Vec<u8>>) {
        self.blobs.lock().await.insert(key.to_string(), payload.into());
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.blobs.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, payload: Vec<u8>) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other(
                "memory store rejected write",
            )));
        }
        self.blobs.lock().await.insert(key.to_string(), payload);
        Ok(())
    }
}

// Loads never fail: a bad blob yields an empty collection and bad entries
// are dropped. Saves log and return their error.
#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn BlobStore>,
}

impl Gateway {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStore::new(dir)))
    }

    pub async fn load_records(&self) -> RecordsMap {
        let Some(raw) = self.read_blob::<BTreeMap<String, serde_json::Value>>(RECORDS_KEY).await
        else {
            return RecordsMap::new();
        };

        let mut records = RecordsMap::new();
        for (raw_key, value) in raw {
            let key = match parse_date_key(&raw_key) {
                Ok(day) => date_key(day),
                Err(_) => {
                    warn!("dropping record under invalid date key {raw_key:?}");
                    continue;
                }
            };
            // A canonically spelled key beats any variant of the same day.
            if raw_key != key && records.contains_key(&key) {
                warn!("dropping duplicate record {raw_key:?} for {key}");
                continue;
            }
            let mut record: DailyRecord = match serde_json::from_value(value) {
                Ok(record) => record,
                Err(err) => {
                    warn!("dropping unreadable record {raw_key}: {err}");
                    continue;
                }
            };
            record.date = key.clone();
            record.sanitize();
            records.insert(key, record);
        }
        debug!(count = records.len(), "loaded records");
        records
    }

    pub async fn save_records(&self, records: &RecordsMap) -> Result<(), StorageError> {
        self.write_blob(RECORDS_KEY, records).await
    }

    pub async fn load_medications(&self) -> Vec<Medication> {
        let Some(raw) = self.read_blob::<Vec<serde_json::Value>>(MEDICATIONS_KEY).await else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut medications = Vec::with_capacity(raw.len());
        for value in raw {
            let mut med: Medication = match serde_json::from_value(value) {
                Ok(med) => med,
                Err(err) => {
                    warn!("dropping unreadable medication: {err}");
                    continue;
                }
            };
            med.name = med.name.trim().to_string();
            if med.id.is_empty() || med.name.is_empty() || !seen.insert(med.id.clone()) {
                warn!("dropping medication with missing name or duplicate id {:?}", med.id);
                continue;
            }
            medications.push(med);
        }
        debug!(count = medications.len(), "loaded medications");
        medications
    }

    pub async fn save_medications(&self, medications: &[Medication]) -> Result<(), StorageError> {
        self.write_blob(MEDICATIONS_KEY, medications).await
    }

    async fn read_blob<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.read(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(err) => {
                    error!("failed to parse {key}: {err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                error!("failed to read {key}: {err}");
                None
            }
        }
    }

    async fn write_blob<T: serde::Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let result = match serde_json::to_vec_pretty(value) {
            Ok(payload) => self.store.write(key, payload).await,
            Err(err) => Err(err.into()),
        };
        if let Err(err) = &result {
            error!("failed to persist {key}: {err}");
        }
        result
    }
}
