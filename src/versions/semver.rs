use semver::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareResult {
    /// Current version equals the latest
    Latest,
    /// A newer version has been published
    Outdated,
    /// Current version is ahead of the latest (development build)
    Newer,
    /// One of the versions is not a version at all
    Invalid,
}

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Strips a leading `v` and pads partial versions with zeros.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "v1.2" -> Version(1, 2, 0)
/// - "1.2.3-rc.1" -> Version(1, 2, 3-rc.1)
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Compare the running version against the latest published one
pub fn compare_versions(current: &str, latest: &str) -> CompareResult {
    let (Some(current), Some(latest)) = (parse_version(current), parse_version(latest)) else {
        return CompareResult::Invalid;
    };

    match current.cmp(&latest) {
        std::cmp::Ordering::Equal => CompareResult::Latest,
        std::cmp::Ordering::Less => CompareResult::Outdated,
        std::cmp::Ordering::Greater => CompareResult::Newer,
    }
}
