//! Input resolution
//!
//! Turns a raw [`Request`] plus the step's working directory into a
//! [`ResolvedRequest`]. All validation happens here, before any network
//! client exists.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::distribution::Distribution;
use crate::error::{CoreError, Result};
use crate::request::Request;

/// Package service used when `source.url` is not set
pub const DEFAULT_URL: &str = "https://packagecloud.io";

/// Delete-and-retry cycles allowed in override mode
pub const DEFAULT_ATTEMPTS: u32 = 10;

/// What a run does
#[derive(Debug, Clone)]
pub enum Mode {
    /// Upload a single package file
    Publish { artifact: PathBuf },
    /// Delete every package whose version matches
    DeleteVersions { pattern: Regex },
}

/// Validated input for a run
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    pub username: String,
    pub api_key: String,
    pub repo: String,
    pub base_url: String,
    pub distribution: Distribution,
    pub mode: Mode,
    pub override_existing: bool,
    pub attempts: u32,
}

/// Validate a request against a working directory
pub fn resolve(request: &Request, work_dir: &Path) -> Result<ResolvedRequest> {
    let source = &request.source;
    let params = &request.params;

    let username = required(&source.username, "username")?;
    let api_key = required(&source.api_key, "api_key")?;
    let repo = required(&source.repo, "repo")?;

    let distribution_name = params
        .distribution_name
        .as_deref()
        .or(source.distribution_name.as_deref())
        .ok_or_else(|| {
            CoreError::config("Distribution name should be set either in params or source")
        })?;
    let distribution = Distribution::parse(distribution_name)?;

    let mode = match (&params.package_file_glob, &params.delete_version) {
        (Some(_), Some(_)) => {
            return Err(CoreError::config(
                "package_file_glob and delete_version should not be set in the same time",
            ));
        }
        (None, None) => {
            return Err(CoreError::config(
                "Either package_file_glob or delete_version should be set",
            ));
        }
        (Some(glob), None) => Mode::Publish {
            artifact: find_package_file(work_dir, glob)?,
        },
        (None, Some(pattern)) => Mode::DeleteVersions {
            pattern: Regex::new(pattern)?,
        },
    };

    let base_url = source
        .url
        .as_deref()
        .unwrap_or(DEFAULT_URL)
        .trim_end_matches('/')
        .to_string();

    Ok(ResolvedRequest {
        username,
        api_key,
        repo,
        base_url,
        distribution,
        mode,
        override_existing: params.override_existing,
        attempts: params.override_attempts.unwrap_or(DEFAULT_ATTEMPTS),
    })
}

fn required(value: &Option<String>, field: &str) -> Result<String> {
    value.clone().ok_or_else(|| CoreError::missing(field))
}

/// Locate the package file matching `pattern` inside `work_dir`
///
/// The first match in lexicographic order wins. The working directory itself
/// is escaped so only `pattern` is interpreted as a glob.
pub fn find_package_file(work_dir: &Path, pattern: &str) -> Result<PathBuf> {
    let full_pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&work_dir.to_string_lossy()),
        pattern
    );

    let mut matches: Vec<PathBuf> = glob::glob(&full_pattern)?
        .filter_map(|entry| entry.ok())
        .collect();
    matches.sort();

    tracing::debug!(
        pattern = %full_pattern,
        matches = matches.len(),
        "Resolved package file glob"
    );

    match matches.into_iter().next() {
        Some(path) if path.is_file() => Ok(path),
        _ => Err(CoreError::config(format!(
            "Package file {} not found in directory {}",
            pattern,
            work_dir.display()
        ))),
    }
}
