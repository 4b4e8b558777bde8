//! Lookups of release version metadata with cached "latest" values

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::versions::cache::ExpiringCache;
use crate::versions::document::parse_document;
use crate::versions::error::{ConfigError, LoadError};
use crate::versions::semver::{CompareResult, compare_versions};
use crate::versions::store::{ObjectStore, VERSIONS_PATH, bom_path};
use crate::versions::types::{BillOfMaterials, Versions};

/// Cache key for the latest tool release
pub const LATEST_TOOL_KEY: &str = "__latest-tool__";

/// Cache key for the latest platform release
pub const LATEST_PLATFORM_KEY: &str = "__latest-platform__";

/// Reported when the build carries no version
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Version recorded in this build's package metadata
const BUILD_VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

pub type LatestCache = ExpiringCache<String, String>;

pub struct VersionsService {
    store: Arc<dyn ObjectStore>,
    cache: Arc<LatestCache>,
    running_version: Option<String>,
}

impl VersionsService {
    pub fn new(store: Arc<dyn ObjectStore>, cache: Arc<LatestCache>) -> Self {
        Self {
            store,
            cache,
            running_version: BUILD_VERSION.map(str::to_string),
        }
    }

    /// Override the version reported for the running build
    pub fn with_running_version(mut self, version: Option<&str>) -> Self {
        self.running_version = version.map(str::to_string);
        self
    }

    async fn load<T: DeserializeOwned>(&self, path: &str) -> Result<T, LoadError> {
        let bytes = self.store.get_object_contents(path).await?;
        Ok(parse_document(&bytes)?)
    }

    /// Fetch and parse the versions manifest
    pub async fn get_versions(&self) -> Result<Versions, ConfigError> {
        info!("Loading {} from config bucket", VERSIONS_PATH);

        self.load(VERSIONS_PATH).await.map_err(|e| {
            warn!("Failed to load {}: {}", VERSIONS_PATH, e);
            ConfigError::fatal(format!(
                "Could not load \"{}\" from config bucket: {}.",
                VERSIONS_PATH, e
            ))
        })
    }

    /// Fetch and parse the bill of materials for one platform release
    ///
    /// Fails without touching the store when no version is given.
    pub async fn get_bill_of_materials(
        &self,
        version: Option<&str>,
    ) -> Result<BillOfMaterials, ConfigError> {
        let Some(version) = version.filter(|v| !v.is_empty()) else {
            return Err(ConfigError::fatal(
                "You must pick a version of the platform to deploy.",
            ));
        };

        let path = bom_path(version);
        info!("Loading bill of materials for {} from {}", version, path);

        self.load(&path).await.map_err(|e| {
            warn!("Failed to load bill of materials {}: {}", path, e);
            ConfigError::fatal(format!(
                "Unable to retrieve the bill of materials for version \"{}\": {}",
                version, e
            ))
        })
    }

    /// Latest published tool version, served from cache when fresh
    pub async fn get_latest_tool_version(&self) -> Result<String, ConfigError> {
        self.cached_latest(LATEST_TOOL_KEY, |versions| versions.latest_tool)
            .await
    }

    /// Latest published platform version, served from cache when fresh
    pub async fn get_latest_platform_version(&self) -> Result<String, ConfigError> {
        self.cached_latest(LATEST_PLATFORM_KEY, |versions| versions.latest_platform)
            .await
    }

    async fn cached_latest(
        &self,
        key: &str,
        select: fn(Versions) -> String,
    ) -> Result<String, ConfigError> {
        if let Some(version) = self.cache.get(key) {
            debug!("Cache hit for {}: {}", key, version);
            return Ok(version);
        }

        debug!("Cache miss for {}", key);
        let version = select(self.get_versions().await?);
        self.cache.put(key.to_string(), version.clone());

        Ok(version)
    }

    /// Version of the running build, or "Unknown"
    pub fn get_running_tool_version(&self) -> String {
        version_or_unknown(self.running_version.as_deref())
    }

    /// Returns the latest tool version if it is newer than the running build
    pub async fn check_for_tool_update(&self) -> Result<Option<String>, ConfigError> {
        let running = self.get_running_tool_version();
        let latest = self.get_latest_tool_version().await?;

        match compare_versions(&running, &latest) {
            CompareResult::Outdated => {
                info!("Newer tool version available: {} -> {}", running, latest);
                Ok(Some(latest))
            }
            CompareResult::Invalid => {
                debug!("Cannot compare {} against {}", running, latest);
                Ok(None)
            }
            CompareResult::Latest | CompareResult::Newer => Ok(None),
        }
    }
}

/// Version recorded in this build's package metadata, or "Unknown"
pub fn running_tool_version() -> String {
    version_or_unknown(BUILD_VERSION)
}

fn version_or_unknown(version: Option<&str>) -> String {
    version
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_VERSION)
        .to_string()
}
