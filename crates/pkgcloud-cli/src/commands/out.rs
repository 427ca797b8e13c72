//! Out command - the put step

use std::fs::File;
use std::path::Path;

use pkgcloud_core::{Mode, Request, resolve};
use pkgcloud_repo::{PackagecloudClient, execute};

use crate::error::{CliError, Result};

/// Read the request, run it and print the result document
pub async fn run(work_dir: &Path, request_file: Option<&Path>, api_url: Option<&str>) -> Result<()> {
    let mut request = match request_file {
        Some(path) => Request::from_reader(File::open(path)?)?,
        None => Request::from_reader(std::io::stdin().lock())?,
    };
    if let Some(url) = api_url {
        request.source.url = Some(url.to_string());
    }

    let resolved = resolve(&request, work_dir)?;
    match &resolved.mode {
        Mode::Publish { artifact } => tracing::info!(
            repo = %resolved.repo,
            distribution = %resolved.distribution,
            artifact = %artifact.display(),
            override_existing = resolved.override_existing,
            "Publishing package"
        ),
        Mode::DeleteVersions { pattern } => tracing::info!(
            repo = %resolved.repo,
            distribution = %resolved.distribution,
            pattern = pattern.as_str(),
            "Deleting packages by version"
        ),
    }

    let client = PackagecloudClient::from_request(&resolved)?;
    let result = execute(&resolved, &client).await?;

    let json = serde_json::to_string(&result).map_err(|e| CliError::internal(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
