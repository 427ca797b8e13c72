//! Remote repository trait
//!
//! Publish and prune logic only sees this interface, so it runs the same
//! against the HTTP client and the in-memory mock.

use async_trait::async_trait;
use std::path::Path;

use pkgcloud_core::Distribution;

use crate::client::PackagecloudClient;
use crate::error::Result;
use crate::package::RemotePackage;
use crate::upload::UploadOutcome;

/// Remote package repository operations
#[async_trait]
pub trait PackageRepository: Send + Sync {
    /// Account that owns the repositories
    fn username(&self) -> &str;

    /// Service base URL, also the host of package links
    fn base_url(&self) -> &str;

    /// Upload a package file into a distribution
    async fn upload(
        &self,
        repo: &str,
        package: &Path,
        distribution: &Distribution,
    ) -> Result<UploadOutcome>;

    /// Delete a package file
    async fn delete(
        &self,
        repo: &str,
        distro_name: &str,
        distro_version: &str,
        filename: &str,
    ) -> Result<()>;

    /// All packages of a distribution
    async fn list(&self, repo: &str, distribution: &Distribution) -> Result<Vec<RemotePackage>>;
}

#[async_trait]
impl PackageRepository for PackagecloudClient {
    fn username(&self) -> &str {
        PackagecloudClient::username(self)
    }

    fn base_url(&self) -> &str {
        PackagecloudClient::base_url(self)
    }

    async fn upload(
        &self,
        repo: &str,
        package: &Path,
        distribution: &Distribution,
    ) -> Result<UploadOutcome> {
        self.upload_package(repo, package, distribution).await
    }

    async fn delete(
        &self,
        repo: &str,
        distro_name: &str,
        distro_version: &str,
        filename: &str,
    ) -> Result<()> {
        self.delete_package(repo, distro_name, distro_version, filename)
            .await
    }

    async fn list(&self, repo: &str, distribution: &Distribution) -> Result<Vec<RemotePackage>> {
        self.list_packages(repo, distribution).await
    }
}
