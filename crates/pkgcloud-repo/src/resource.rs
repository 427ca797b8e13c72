//! Put-step dispatch

use pkgcloud_core::{Mode, PublishResult, ResolvedRequest};

use crate::backend::PackageRepository;
use crate::error::Result;
use crate::prune::delete_versions;
use crate::publish::publish_package;

/// Run a resolved request against a repository
pub async fn execute(
    request: &ResolvedRequest,
    repository: &dyn PackageRepository,
) -> Result<PublishResult> {
    match &request.mode {
        Mode::Publish { artifact } => {
            publish_package(
                repository,
                &request.repo,
                artifact,
                &request.distribution,
                request.override_existing,
                request.attempts,
            )
            .await
        }
        Mode::DeleteVersions { pattern } => {
            delete_versions(repository, &request.repo, &request.distribution, pattern).await
        }
    }
}
