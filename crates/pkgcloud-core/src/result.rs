//! Output of a put step
//!
//! The CI system reads a `version` object and a list of `metadata` name/value
//! pairs from stdout.

use serde::{Deserialize, Serialize};

/// Value reported as the version of a delete-by-version run
pub const DELETED_MARKER: &str = "<DELETED>";

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub version: Version,
    pub metadata: Vec<MetadataField>,
}

/// Emitted version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Version {
    /// Link to the published package
    Package { package: String },
    /// Sentinel for delete-by-version runs
    Deleted { deleted: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    pub name: String,
    pub value: String,
}

impl MetadataField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl PublishResult {
    /// Result for a published (or already present) package
    pub fn published(filename: &str, link: String) -> Self {
        Self {
            metadata: vec![
                MetadataField::new("Filename", filename),
                MetadataField::new("Package link", link.clone()),
            ],
            version: Version::Package { package: link },
        }
    }

    /// Result for a delete-by-version run
    pub fn deleted() -> Self {
        Self {
            version: Version::Deleted {
                deleted: DELETED_MARKER.to_string(),
            },
            metadata: Vec::new(),
        }
    }

    /// The package link, if this is a publish result
    pub fn package_link(&self) -> Option<&str> {
        match &self.version {
            Version::Package { package } => Some(package),
            Version::Deleted { .. } => None,
        }
    }
}

/// Public web link of a package file
///
/// Deterministic in its inputs, so a re-run without upload reports the same
/// version.
pub fn package_link(
    base_url: &str,
    username: &str,
    repo: &str,
    distribution: &str,
    filename: &str,
) -> String {
    format!(
        "{}/{}/{}/packages/{}/{}",
        base_url.trim_end_matches('/'),
        username,
        repo,
        distribution,
        filename
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_link() {
        let link = package_link(
            "https://packagecloud.io/",
            "test_username",
            "test_repo",
            "debian/jessie",
            "some.deb",
        );
        assert_eq!(
            link,
            "https://packagecloud.io/test_username/test_repo/packages/debian/jessie/some.deb"
        );
    }

    #[test]
    fn test_published_serialization() {
        let result = PublishResult::published("some.deb", "https://x/some.deb".to_string());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["version"]["package"], "https://x/some.deb");
        assert_eq!(json["metadata"][0]["name"], "Filename");
        assert_eq!(json["metadata"][0]["value"], "some.deb");
        assert_eq!(json["metadata"][1]["name"], "Package link");
        assert_eq!(json["metadata"][1]["value"], "https://x/some.deb");
    }

    #[test]
    fn test_deleted_serialization() {
        let result = PublishResult::deleted();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"version": {"deleted": "<DELETED>"}, "metadata": []})
        );
        assert!(result.package_link().is_none());
    }

    #[test]
    fn test_deserialize_both_shapes() {
        let published: PublishResult = serde_json::from_str(
            r#"{"version": {"package": "https://x"}, "metadata": []}"#,
        )
        .unwrap();
        assert_eq!(published.package_link(), Some("https://x"));

        let deleted: PublishResult =
            serde_json::from_str(r#"{"version": {"deleted": "<DELETED>"}, "metadata": []}"#)
                .unwrap();
        assert_eq!(deleted, PublishResult::deleted());
    }
}
