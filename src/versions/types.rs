//! Records mapped from the versions manifest and bill of materials documents
//!
//! Every record is relaxed: unknown fields are ignored and missing fields
//! take their default value.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::versions::document::{scalar_string, scalar_string_opt};

/// The versions manifest (`versions.yml`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Versions {
    /// Newest published release of the tool itself
    #[serde(deserialize_with = "scalar_string")]
    pub latest_tool: String,
    /// Newest published platform release
    #[serde(deserialize_with = "scalar_string")]
    pub latest_platform: String,
    /// Platform releases that can be deployed
    pub versions: Vec<ReleaseVersion>,
    /// Releases that were pulled, with the reason why
    pub illegal_versions: Vec<IllegalVersion>,
}

impl Versions {
    pub fn find(&self, version: &str) -> Option<&ReleaseVersion> {
        self.versions.iter().find(|v| v.version == version)
    }

    pub fn illegal_reason(&self, version: &str) -> Option<&str> {
        self.illegal_versions
            .iter()
            .find(|v| v.version == version)
            .map(|v| v.reason.as_str())
    }

    /// A release is supported when it is listed and has not been pulled
    pub fn is_supported(&self, version: &str) -> bool {
        self.find(version).is_some() && self.illegal_reason(version).is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseVersion {
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
    #[serde(deserialize_with = "scalar_string")]
    pub alias: String,
    #[serde(deserialize_with = "scalar_string")]
    pub changelog: String,
    #[serde(deserialize_with = "scalar_string_opt")]
    pub minimum_tool_version: Option<String>,
    /// Milliseconds since the UNIX epoch
    pub last_update: Option<i64>,
}

impl ReleaseVersion {
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_update.and_then(DateTime::from_timestamp_millis)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IllegalVersion {
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
    #[serde(deserialize_with = "scalar_string")]
    pub reason: String,
}

/// Exact component versions making up one platform release
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BillOfMaterials {
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
    #[serde(deserialize_with = "scalar_string")]
    pub timestamp: String,
    #[serde(deserialize_with = "scalar_string")]
    pub hostname: String,
    pub artifact_sources: ArtifactSources,
    pub services: BTreeMap<String, ServiceArtifact>,
    pub dependencies: BTreeMap<String, Dependency>,
}

impl BillOfMaterials {
    pub fn service_version(&self, service: &str) -> Option<&str> {
        self.services.get(service).map(|s| s.version.as_str())
    }

    pub fn dependency_version(&self, dependency: &str) -> Option<&str> {
        self.dependencies.get(dependency).map(|d| d.version.as_str())
    }
}

/// Where the artifacts of a release were published
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArtifactSources {
    #[serde(deserialize_with = "scalar_string_opt")]
    pub docker_registry: Option<String>,
    #[serde(deserialize_with = "scalar_string_opt")]
    pub debian_repository: Option<String>,
    #[serde(deserialize_with = "scalar_string_opt")]
    pub google_image_project: Option<String>,
    #[serde(deserialize_with = "scalar_string_opt")]
    pub git_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceArtifact {
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
    #[serde(deserialize_with = "scalar_string_opt")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Dependency {
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn manifest() -> Versions {
        Versions {
            latest_tool: "1.40.0".to_string(),
            latest_platform: "1.28.1".to_string(),
            versions: vec![
                ReleaseVersion {
                    version: "1.28.1".to_string(),
                    alias: "Gilmore Girls".to_string(),
                    last_update: Some(1_656_000_000_000),
                    ..Default::default()
                },
                ReleaseVersion {
                    version: "1.27.0".to_string(),
                    ..Default::default()
                },
            ],
            illegal_versions: vec![IllegalVersion {
                version: "1.27.0".to_string(),
                reason: "Broken rollback".to_string(),
            }],
        }
    }

    #[rstest]
    #[case("1.28.1", true)]
    #[case("1.27.0", false)] // listed but pulled
    #[case("0.1.0", false)] // not listed
    fn is_supported_requires_listed_and_not_illegal(
        #[case] version: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(manifest().is_supported(version), expected);
    }

    #[test]
    fn illegal_reason_returns_reason_for_pulled_release() {
        assert_eq!(manifest().illegal_reason("1.27.0"), Some("Broken rollback"));
        assert_eq!(manifest().illegal_reason("1.28.1"), None);
    }

    #[test]
    fn find_returns_matching_release() {
        let manifest = manifest();
        let release = manifest.find("1.28.1").unwrap();

        assert_eq!(release.alias, "Gilmore Girls");
        assert!(manifest.find("9.9.9").is_none());
    }

    #[test]
    fn last_updated_converts_epoch_millis() {
        let manifest = manifest();
        let updated = manifest.versions[0].last_updated().unwrap();

        assert_eq!(updated.timestamp(), 1_656_000_000);
        assert_eq!(manifest.versions[1].last_updated(), None);
    }

    #[test]
    fn bill_of_materials_looks_up_services_and_dependencies() {
        let mut bom = BillOfMaterials::default();
        bom.services.insert(
            "gateway".to_string(),
            ServiceArtifact {
                version: "2.3.1".to_string(),
                commit: None,
            },
        );
        bom.dependencies.insert(
            "redis".to_string(),
            Dependency {
                version: "6.2".to_string(),
            },
        );

        assert_eq!(bom.service_version("gateway"), Some("2.3.1"));
        assert_eq!(bom.service_version("scheduler"), None);
        assert_eq!(bom.dependency_version("redis"), Some("6.2"));
    }
}
