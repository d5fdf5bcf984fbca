//! In-memory object store for tests.

use crate::io::cloud::traits::{CloudIOError, CloudResult, ErrorKind, ObjectIO, ObjectSummary};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

type BucketStorage = Arc<Mutex<HashMap<String, BTreeMap<String, Vec<u8>>>>>;

/// Object store backed by a shared map; clones see the same buckets.
///
/// Failures can be queued with [`FakeObjectIO::fail_next`] to exercise retry
/// paths; each queued error is returned by the next call, whatever it is.
#[derive(Clone, Default)]
pub struct FakeObjectIO {
    storage: BucketStorage,
    failures: Arc<Mutex<VecDeque<CloudIOError>>>,
}

impl FakeObjectIO {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bucket.
    pub fn create_bucket(&self, bucket: &str) {
        self.storage
            .lock()
            .expect("storage mutex poisoned")
            .entry(bucket.to_string())
            .or_default();
    }

    /// Make the next call fail with `kind`.
    pub fn fail_next(&self, kind: ErrorKind) {
        self.failures
            .lock()
            .expect("failures mutex poisoned")
            .push_back(CloudIOError::new(kind, "injected failure"));
    }

    fn injected(&self) -> CloudResult<()> {
        match self
            .failures
            .lock()
            .expect("failures mutex poisoned")
            .pop_front()
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn missing_object(bucket: &str, key: &str) -> CloudIOError {
    CloudIOError::new(ErrorKind::NotFound, format!("Object {bucket}/{key} not found"))
}

impl ObjectIO for FakeObjectIO {
    fn bucket_exists(&self, bucket: &str) -> CloudResult<bool> {
        self.injected()?;
        Ok(self
            .storage
            .lock()
            .expect("storage mutex poisoned")
            .contains_key(bucket))
    }

    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> CloudResult<()> {
        self.injected()?;
        self.storage
            .lock()
            .expect("storage mutex poisoned")
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>> {
        self.injected()?;
        let storage = self.storage.lock().expect("storage mutex poisoned");
        storage
            .get(bucket)
            .and_then(|b| b.get(key))
            .cloned()
            .ok_or_else(|| missing_object(bucket, key))
    }

    fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> CloudResult<Vec<ObjectSummary>> {
        self.injected()?;
        let storage = self.storage.lock().expect("storage mutex poisoned");
        let bucket_map = storage.get(bucket).ok_or_else(|| {
            CloudIOError::new(ErrorKind::NotFound, format!("Bucket {bucket} not found"))
        })?;

        // BTreeMap keeps listings in key order, like S3
        Ok(bucket_map
            .iter()
            .filter(|(key, _)| prefix.is_none_or(|p| key.starts_with(p)))
            .map(|(key, data)| ObjectSummary {
                key: key.clone(),
                size: data.len() as u64,
                last_modified: Some(0),
            })
            .collect())
    }

    fn object_exists(&self, bucket: &str, key: &str) -> CloudResult<bool> {
        self.injected()?;
        let storage = self.storage.lock().expect("storage mutex poisoned");
        Ok(storage.get(bucket).is_some_and(|b| b.contains_key(key)))
    }

    fn get_metadata(&self, bucket: &str, key: &str) -> CloudResult<ObjectSummary> {
        self.injected()?;
        let storage = self.storage.lock().expect("storage mutex poisoned");
        storage
            .get(bucket)
            .and_then(|b| b.get(key))
            .map(|data| ObjectSummary {
                key: key.to_string(),
                size: data.len() as u64,
                last_modified: Some(0),
            })
            .ok_or_else(|| missing_object(bucket, key))
    }
}
