//! Object store trait for reading documents from the config bucket

#[cfg(test)]
use mockall::automock;

use crate::versions::error::StoreError;

/// Path of the versions manifest within the bucket
pub const VERSIONS_PATH: &str = "versions.yml";

/// Path of the bill of materials for a platform release
///
/// # Examples
/// - `"1.28.1"` -> `"bom/1.28.1.yml"`
pub fn bom_path(version: &str) -> String {
    format!("bom/{}.yml", version)
}

/// Trait for reading raw objects from a remote store
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetches the full contents of the object at `path`
    ///
    /// # Arguments
    /// * `path` - Bucket-relative path (e.g., "versions.yml" or "bom/1.28.1.yml")
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - Raw object bytes
    /// * `Err(StoreError)` - If the read fails
    async fn get_object_contents(&self, path: &str) -> Result<Vec<u8>, StoreError>;
}
