//! Remote package records

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RepoError, Result};

/// A package as reported by the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePackage {
    /// File name, also the key used for deletion
    pub filename: String,

    /// Distribution the file lives in, e.g. `debian/jessie`
    pub distro_version: String,

    /// Package version string
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub release: Option<String>,

    /// `deb`, `rpm`, `dsc`, ...
    #[serde(default, rename = "type")]
    pub package_type: Option<String>,
}

impl RemotePackage {
    pub fn new(
        filename: impl Into<String>,
        distro_version: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            distro_version: distro_version.into(),
            version: version.into(),
            name: None,
            release: None,
            package_type: None,
        }
    }
}

/// Base name of a local package file, as the service will store it
pub fn package_file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| RepoError::Other(format!("Not a package file: {}", path.display())))
}
