//! Delete-by-version
//!
//! Lists a distribution and deletes every package whose version matches a
//! regular expression. The match is a search, not a full match: anchor the
//! pattern (`^3\.6\.14`) to avoid catching more than intended.
//!
//! There is no dry-run and no rollback. A failed deletion aborts the run and
//! packages deleted before it stay deleted.

use regex::Regex;

use pkgcloud_core::{Distribution, PublishResult};

use crate::backend::PackageRepository;
use crate::error::Result;

/// Delete every package in `distribution` whose version matches `pattern`
pub async fn delete_versions(
    repository: &dyn PackageRepository,
    repo: &str,
    distribution: &Distribution,
    pattern: &Regex,
) -> Result<PublishResult> {
    let packages = repository.list(repo, distribution).await?;
    let total = packages.len();

    let matching: Vec<_> = packages
        .into_iter()
        .filter(|package| pattern.is_match(&package.version))
        .collect();

    tracing::info!(
        %distribution,
        pattern = pattern.as_str(),
        listed = total,
        matching = matching.len(),
        "Deleting packages by version"
    );

    for package in &matching {
        repository
            .delete(
                repo,
                distribution.os(),
                distribution.release(),
                &package.filename,
            )
            .await?;
        tracing::info!(filename = %package.filename, version = %package.version, "Deleted");
    }

    Ok(PublishResult::deleted())
}
