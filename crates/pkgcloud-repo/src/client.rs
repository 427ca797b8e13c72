//! HTTP client for the package service API (v1)
//!
//! Endpoints used:
//! - `GET    /api/v1/distributions.json`
//! - `POST   /api/v1/repos/:user/:repo/packages.json`
//! - `GET    /api/v1/repos/:user/:repo/packages.json?page=N&per_page=M`
//! - `DELETE /api/v1/repos/:user/:repo/:distro/:version/:filename`
//!
//! Building a client performs no network call; bad credentials only show up
//! on the first request.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use pkgcloud_core::{Distribution, ResolvedRequest};
use reqwest::header::{AUTHORIZATION, HeaderMap};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use tokio::sync::OnceCell;
use url::Url;

use crate::credentials::Credentials;
use crate::error::{RepoError, Result};
use crate::package::{RemotePackage, package_file_name};
use crate::pagination::{PageInfo, fetch_all};
use crate::upload::{UploadOutcome, classify_upload};

pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Page size requested from the listing endpoint
pub const DEFAULT_PER_PAGE: usize = 100;

/// Package service client
pub struct PackagecloudClient {
    client: reqwest::Client,
    credentials: Credentials,
    base_url: String,
    per_page: usize,
    /// `distributions.json`, fetched on first upload
    distributions: OnceCell<DistributionIndex>,
}

struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl RawResponse {
    /// Turn a non-success response into a remote error carrying the raw body
    fn ensure_success(self) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(RepoError::Remote {
                status: self.status.as_u16(),
                body: self.body,
            })
        }
    }
}

impl PackagecloudClient {
    /// Create a client for `base_url` (e.g. `https://packagecloud.io`)
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| RepoError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(RepoError::InvalidUrl {
                url: base_url,
                reason: "not a hierarchical URL".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            // Never follow redirects with the API token attached
            .redirect(reqwest::redirect::Policy::none())
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("pkgcloud-resource/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RepoError::Network {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            credentials,
            base_url,
            per_page: DEFAULT_PER_PAGE,
            distributions: OnceCell::new(),
        })
    }

    /// Create a client from a resolved request
    pub fn from_request(request: &ResolvedRequest) -> Result<Self> {
        Self::new(
            &request.base_url,
            Credentials::new(&request.username, &request.api_key),
        )
    }

    /// Override the listing page size
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload a package file into `distribution`
    ///
    /// Transport and authentication problems are errors; everything the
    /// service answers is classified into an [`UploadOutcome`].
    pub async fn upload_package(
        &self,
        repo: &str,
        package: &Path,
        distribution: &Distribution,
    ) -> Result<UploadOutcome> {
        let filename = package_file_name(package)?;
        let distro_version_id = self
            .distro_version_id(package_type(package), distribution)
            .await?;

        let data = tokio::fs::read(package).await?;
        let part = Part::bytes(data)
            .file_name(filename.clone())
            .mime_str("application/octet-stream")?;
        let form = Form::new()
            .text("package[distro_version_id]", distro_version_id.to_string())
            .part("package[package_file]", part);

        let url = self.repo_endpoint(repo, &["packages.json"])?;
        tracing::info!(%filename, %distribution, repo, "Uploading package");

        let response = self.send(self.client.post(url.clone()).multipart(form), &url).await?;
        Ok(classify_upload(response.status.as_u16(), &response.body))
    }

    /// Delete a package file from `<distro_name>/<distro_version>`
    pub async fn delete_package(
        &self,
        repo: &str,
        distro_name: &str,
        distro_version: &str,
        filename: &str,
    ) -> Result<()> {
        let url = self.repo_endpoint(repo, &[distro_name, distro_version, filename])?;
        self.send(self.client.delete(url.clone()), &url)
            .await?
            .ensure_success()?;

        tracing::info!(
            %filename,
            distribution = %format!("{}/{}", distro_name, distro_version),
            repo,
            "Deleted package"
        );
        Ok(())
    }

    /// List every package of `distribution`, across all pages
    pub async fn list_packages(
        &self,
        repo: &str,
        distribution: &Distribution,
    ) -> Result<Vec<RemotePackage>> {
        let packages = fetch_all(|page| self.list_page(repo, page)).await?;

        Ok(packages
            .into_iter()
            .filter(|p| p.distro_version == distribution.as_str())
            .collect())
    }

    async fn list_page(&self, repo: &str, page: u32) -> Result<(Vec<RemotePackage>, PageInfo)> {
        let mut url = self.repo_endpoint(repo, &["packages.json"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &self.per_page.to_string());

        let response = self
            .send(self.client.get(url.clone()), &url)
            .await?
            .ensure_success()?;

        let packages: Vec<RemotePackage> = serde_json::from_str(&response.body)?;
        Ok((packages, PageInfo::from_headers(&response.headers)))
    }

    async fn distro_version_id(
        &self,
        package_type: Option<&str>,
        distribution: &Distribution,
    ) -> Result<u64> {
        let index = self
            .distributions
            .get_or_try_init(|| self.fetch_distributions())
            .await?;

        index
            .find(package_type, distribution)
            .ok_or_else(|| RepoError::UnknownDistribution {
                distribution: distribution.to_string(),
            })
    }

    async fn fetch_distributions(&self) -> Result<DistributionIndex> {
        let url = self.endpoint(&["api", "v1", "distributions.json"])?;
        let response = self
            .send(self.client.get(url.clone()), &url)
            .await?
            .ensure_success()?;

        Ok(DistributionIndex(serde_json::from_str(&response.body)?))
    }

    /// Send an authenticated request and read the whole body
    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<RawResponse> {
        let response = request
            .header(AUTHORIZATION, self.credentials.auth_header())
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        tracing::debug!(%url, status = status.as_u16(), "Package service responded");

        if status == StatusCode::UNAUTHORIZED {
            return Err(RepoError::AuthFailed {
                message: format!(
                    "Invalid credentials for user {}: {}",
                    self.username(),
                    body.trim()
                ),
            });
        }
        if status == StatusCode::FORBIDDEN {
            return Err(RepoError::AuthFailed {
                message: format!("Access denied to {}", url.path()),
            });
        }

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| RepoError::InvalidUrl {
                url: self.base_url.clone(),
                reason: "not a hierarchical URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repo_endpoint(&self, repo: &str, tail: &[&str]) -> Result<Url> {
        let mut segments = vec!["api", "v1", "repos", self.credentials.username(), repo];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }
}

/// Package type key in `distributions.json`, from the file extension
fn package_type(package: &Path) -> Option<&'static str> {
    let extension = package.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "deb" => Some("deb"),
        "rpm" => Some("rpm"),
        "dsc" => Some("dsc"),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct DistroFamily {
    index_name: String,
    #[serde(default)]
    versions: Vec<DistroVersion>,
}

#[derive(Debug, Deserialize)]
struct DistroVersion {
    id: u64,
    index_name: String,
}

/// `distributions.json`: package type -> distribution families
#[derive(Debug, Default)]
struct DistributionIndex(BTreeMap<String, Vec<DistroFamily>>);

impl DistributionIndex {
    /// Numeric id of `distribution`, preferring the entries of `package_type`
    fn find(&self, package_type: Option<&str>, distribution: &Distribution) -> Option<u64> {
        let lookup = |families: &Vec<DistroFamily>| {
            families
                .iter()
                .filter(|family| family.index_name == distribution.os())
                .flat_map(|family| family.versions.iter())
                .find(|version| version.index_name == distribution.release())
                .map(|version| version.id)
        };

        match package_type.and_then(|t| self.0.get(t)) {
            Some(families) => lookup(families),
            None => self.0.values().find_map(lookup),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> DistributionIndex {
        let json = r#"{
            "deb": [
                {"display_name": "Debian", "index_name": "debian", "versions": [
                    {"id": 23, "display_name": "8.0 Jessie", "index_name": "jessie"},
                    {"id": 149, "display_name": "9.0 Stretch", "index_name": "stretch"}
                ]}
            ],
            "dsc": [
                {"display_name": "Debian", "index_name": "debian", "versions": [
                    {"id": 24, "display_name": "8.0 Jessie", "index_name": "jessie"}
                ]}
            ],
            "rpm": [
                {"display_name": "Enterprise Linux", "index_name": "el", "versions": [
                    {"id": 140, "display_name": "7.0", "index_name": "7"}
                ]}
            ]
        }"#;
        DistributionIndex(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_find_by_package_type() {
        let index = index();
        let jessie = Distribution::parse("debian/jessie").unwrap();

        assert_eq!(index.find(Some("deb"), &jessie), Some(23));
        assert_eq!(index.find(Some("dsc"), &jessie), Some(24));
        assert_eq!(index.find(Some("rpm"), &jessie), None);
    }

    #[test]
    fn test_find_without_package_type() {
        let index = index();
        let el7 = Distribution::parse("el/7").unwrap();
        let buster = Distribution::parse("debian/buster").unwrap();

        assert_eq!(index.find(None, &el7), Some(140));
        assert_eq!(index.find(None, &buster), None);
    }

    #[test]
    fn test_package_type() {
        assert_eq!(package_type(Path::new("/tmp/some_1.0_all.deb")), Some("deb"));
        assert_eq!(package_type(Path::new("pkg-1.0-1.x86_64.RPM")), Some("rpm"));
        assert_eq!(package_type(Path::new("pkg.dsc")), Some("dsc"));
        assert_eq!(package_type(Path::new("pkg.tar.gz")), None);
        assert_eq!(package_type(Path::new("noext")), None);
    }

    #[test]
    fn test_endpoints() {
        let client = PackagecloudClient::new(
            "https://packagecloud.io/",
            Credentials::new("test_username", "key"),
        )
        .unwrap();

        assert_eq!(client.base_url(), "https://packagecloud.io");
        assert_eq!(
            client
                .repo_endpoint("test_repo", &["debian", "jessie", "some_1.0+b1_all.deb"])
                .unwrap()
                .as_str(),
            "https://packagecloud.io/api/v1/repos/test_username/test_repo/debian/jessie/some_1.0+b1_all.deb"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = PackagecloudClient::new(
            "https://example.com/pkg",
            Credentials::new("user", "key"),
        )
        .unwrap();

        assert_eq!(
            client.endpoint(&["api", "v1", "distributions.json"]).unwrap().as_str(),
            "https://example.com/pkg/api/v1/distributions.json"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = PackagecloudClient::new("not a url", Credentials::new("u", "k"))
            .err()
            .unwrap();
        assert!(matches!(err, RepoError::InvalidUrl { .. }));

        let err = PackagecloudClient::new("mailto:ops@example.com", Credentials::new("u", "k"))
            .err()
            .unwrap();
        assert!(matches!(err, RepoError::InvalidUrl { .. }));
    }
}
