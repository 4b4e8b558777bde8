//! Object store test utilities

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use release_versions::versions::error::StoreError;
use release_versions::versions::service::{LatestCache, VersionsService};
use release_versions::versions::store::ObjectStore;

/// In-memory store that records every path it is asked for
#[derive(Default)]
pub struct RecordingStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, path: &str, contents: &str) -> Self {
        self.set_object(path, contents);
        self
    }

    pub fn set_object(&self, path: &str, contents: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), contents.as_bytes().to_vec());
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, path: &str) -> usize {
        self.requests().iter().filter(|p| *p == path).count()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn get_object_contents(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.requests.lock().unwrap().push(path.to_string());

        match self.objects.lock().unwrap().get(path) {
            Some(contents) => Ok(contents.clone()),
            None => Err(StoreError::NotFound(path.to_string())),
        }
    }
}

/// Create a service over `store` with its own 10 minute cache
pub fn create_test_service(store: Arc<RecordingStore>) -> VersionsService {
    VersionsService::new(store, Arc::new(LatestCache::from_minutes(10)))
}
