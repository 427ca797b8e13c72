//! Mock repository for testing
//!
//! Keeps packages in memory and mimics the service's behaviour: a second
//! upload of the same file name into the same distribution is a conflict,
//! deletions remove the file, and listings are scoped to a distribution.
//! Every call is counted for assertions.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use pkgcloud_core::{DEFAULT_URL, Distribution};

use crate::backend::PackageRepository;
use crate::error::{RepoError, Result};
use crate::package::{RemotePackage, package_file_name};
use crate::upload::UploadOutcome;

/// (repo, distribution, filename)
type PackageKey = (String, String, String);

/// In-memory package repository for testing
#[derive(Clone)]
pub struct MockRepository {
    username: String,
    base_url: String,
    state: Arc<RwLock<MockState>>,
}

#[derive(Default)]
struct MockState {
    packages: BTreeMap<PackageKey, RemotePackage>,
    uploads: HashMap<PackageKey, usize>,
    deletes: HashMap<PackageKey, usize>,
    counts: OperationCounts,
    stuck_deletes: bool,
    failing_deletes: HashSet<String>,
    upload_failure: Option<(u16, String)>,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationCounts {
    /// Every upload call
    pub upload_attempts: usize,
    /// Uploads that stored a package
    pub uploads: usize,
    pub conflicts: usize,
    pub deletes: usize,
    pub lists: usize,
}

impl MockRepository {
    /// Create an empty repository owned by `username`
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            base_url: DEFAULT_URL.to_string(),
            state: Arc::new(RwLock::new(MockState::default())),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Pre-populate `repo` with packages
    pub fn with_packages(self, repo: &str, packages: Vec<RemotePackage>) -> Self {
        {
            let mut state = self.write();
            for package in packages {
                let key = (
                    repo.to_string(),
                    package.distro_version.clone(),
                    package.filename.clone(),
                );
                state.packages.insert(key, package);
            }
        }
        self
    }

    /// Deletions succeed but leave the package in place
    pub fn with_stuck_deletes(self) -> Self {
        self.write().stuck_deletes = true;
        self
    }

    /// Deleting `filename` fails with a server error
    pub fn with_failing_delete(self, filename: impl Into<String>) -> Self {
        self.write().failing_deletes.insert(filename.into());
        self
    }

    /// Every upload is rejected with `status` and `body`
    pub fn with_upload_failure(self, status: u16, body: impl Into<String>) -> Self {
        self.write().upload_failure = Some((status, body.into()));
        self
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.read().counts.clone()
    }

    /// Successful uploads of one file
    pub fn uploads_of(&self, repo: &str, distribution: &str, filename: &str) -> usize {
        self.read()
            .uploads
            .get(&key(repo, distribution, filename))
            .copied()
            .unwrap_or(0)
    }

    /// Deletions of one file
    pub fn deletes_of(&self, repo: &str, distribution: &str, filename: &str) -> usize {
        self.read()
            .deletes
            .get(&key(repo, distribution, filename))
            .copied()
            .unwrap_or(0)
    }

    /// All packages currently stored in `repo`
    pub fn packages(&self, repo: &str) -> Vec<RemotePackage> {
        self.read()
            .packages
            .iter()
            .filter(|((r, _, _), _)| r == repo)
            .map(|(_, package)| package.clone())
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, MockState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MockState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn key(repo: &str, distribution: &str, filename: &str) -> PackageKey {
    (
        repo.to_string(),
        distribution.to_string(),
        filename.to_string(),
    )
}

/// `some_3.6.14~alpha.39-1_all.deb` -> `3.6.14~alpha.39-1_all`
fn version_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match stem.split_once('_') {
        Some((_, version)) => version.to_string(),
        None => stem,
    }
}

#[async_trait]
impl PackageRepository for MockRepository {
    fn username(&self) -> &str {
        &self.username
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn upload(
        &self,
        repo: &str,
        package: &Path,
        distribution: &Distribution,
    ) -> Result<UploadOutcome> {
        let filename = package_file_name(package)?;
        tokio::fs::metadata(package).await?;

        let mut state = self.write();
        state.counts.upload_attempts += 1;

        if let Some((status, body)) = state.upload_failure.clone() {
            return Ok(UploadOutcome::Failed { status, body });
        }

        let key = key(repo, distribution.as_str(), &filename);
        if state.packages.contains_key(&key) {
            state.counts.conflicts += 1;
            return Ok(UploadOutcome::Conflict);
        }

        let version = version_from_filename(&filename);
        state.packages.insert(
            key.clone(),
            RemotePackage::new(filename, distribution.as_str(), version),
        );
        *state.uploads.entry(key).or_default() += 1;
        state.counts.uploads += 1;

        Ok(UploadOutcome::Uploaded)
    }

    async fn delete(
        &self,
        repo: &str,
        distro_name: &str,
        distro_version: &str,
        filename: &str,
    ) -> Result<()> {
        let mut state = self.write();
        state.counts.deletes += 1;

        if state.failing_deletes.contains(filename) {
            return Err(RepoError::Remote {
                status: 500,
                body: format!("failed to delete {}", filename),
            });
        }

        let key = key(
            repo,
            &format!("{}/{}", distro_name, distro_version),
            filename,
        );
        *state.deletes.entry(key.clone()).or_default() += 1;
        if !state.stuck_deletes {
            state.packages.remove(&key);
        }

        Ok(())
    }

    async fn list(&self, repo: &str, distribution: &Distribution) -> Result<Vec<RemotePackage>> {
        let mut state = self.write();
        state.counts.lists += 1;

        Ok(state
            .packages
            .iter()
            .filter(|((r, d, _), _)| r == repo && d == distribution.as_str())
            .map(|(_, package)| package.clone())
            .collect())
    }
}
