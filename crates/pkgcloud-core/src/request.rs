//! Put-step request model
//!
//! The CI system hands the resource a JSON document with a `source` section
//! (shared by every step using the resource) and a `params` section (per step).
//! Everything is optional at this level; [`crate::resolve`] decides what is
//! required.

use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Full request passed on stdin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub source: Source,

    #[serde(default)]
    pub params: Params,
}

impl Request {
    /// Parse a request from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a request from a reader (usually stdin)
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Resource configuration shared across steps
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Source {
    /// Account name on the package service (used in URLs and links)
    #[serde(default)]
    pub username: Option<String>,

    /// API token
    #[serde(default)]
    pub api_key: Option<String>,

    /// Target repository under `username`
    #[serde(default)]
    pub repo: Option<String>,

    /// Default distribution when a step doesn't set one
    #[serde(default)]
    pub distribution_name: Option<String>,

    /// Service base URL, for self-hosted installations
    #[serde(default)]
    pub url: Option<String>,
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("username", &self.username)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("repo", &self.repo)
            .field("distribution_name", &self.distribution_name)
            .field("url", &self.url)
            .finish()
    }
}

/// Per-step parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Params {
    /// Overrides `source.distribution_name`
    #[serde(default)]
    pub distribution_name: Option<String>,

    /// Glob, relative to the working directory, locating the package to push
    #[serde(default)]
    pub package_file_glob: Option<String>,

    /// Delete and re-push when the file name is already taken
    #[serde(default, rename = "override")]
    pub override_existing: bool,

    /// Regular expression; every package whose version matches is deleted
    #[serde(default)]
    pub delete_version: Option<String>,

    /// Maximum number of delete-and-retry cycles in override mode
    #[serde(default)]
    pub override_attempts: Option<u32>,
}
