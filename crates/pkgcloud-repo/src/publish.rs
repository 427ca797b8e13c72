//! Publishing a package
//!
//! Uploads a package file and reports a deterministic link to it. When the
//! file name is already taken in the target distribution:
//!
//! - without override, the existing package is kept and the same link is
//!   reported, so re-running a put step is harmless;
//! - with override, the existing file is deleted and the upload retried, at
//!   most `attempts` times.

use std::path::Path;

use pkgcloud_core::{Distribution, PublishResult, package_link};

use crate::backend::PackageRepository;
use crate::error::{RepoError, Result};
use crate::package::package_file_name;
use crate::upload::UploadOutcome;

/// Publish `package` into `distribution` of `repo`
pub async fn publish_package(
    repository: &dyn PackageRepository,
    repo: &str,
    package: &Path,
    distribution: &Distribution,
    override_existing: bool,
    attempts: u32,
) -> Result<PublishResult> {
    let filename = package_file_name(package)?;
    let link = package_link(
        repository.base_url(),
        repository.username(),
        repo,
        distribution.as_str(),
        &filename,
    );

    let mut remaining = attempts;
    loop {
        match repository.upload(repo, package, distribution).await? {
            UploadOutcome::Uploaded => {
                tracing::info!(%filename, %link, "Package published");
                return Ok(PublishResult::published(&filename, link));
            }
            UploadOutcome::Conflict if !override_existing => {
                tracing::info!(%filename, %link, "Package already exists, keeping it");
                return Ok(PublishResult::published(&filename, link));
            }
            UploadOutcome::Conflict => {
                if remaining == 0 {
                    return Err(RepoError::ExhaustedRetries { filename, attempts });
                }
                tracing::warn!(
                    %filename,
                    %distribution,
                    remaining,
                    "Package already exists, deleting it before publishing again"
                );
                repository
                    .delete(repo, distribution.os(), distribution.release(), &filename)
                    .await?;
                remaining -= 1;
            }
            UploadOutcome::Failed { status, body } => {
                return Err(RepoError::Remote { status, body });
            }
        }
    }
}
