//! Read-only object store over plain HTTP GET (public buckets)

use tracing::{debug, warn};

use crate::versions::error::StoreError;
use crate::versions::store::ObjectStore;

/// Object store that reads `<base_url>/<path>` from a publicly readable bucket
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpObjectStore {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("release-versions/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get_object_contents(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("Fetching object {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            warn!("Object store returned status {}: {}", status, url);
            return Err(StoreError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response.bytes().await?;
        debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(body.to_vec())
    }
}
