//! pkgcloud Repository Client
//!
//! This crate talks to the package service on behalf of the CI resource:
//!
//! - **Upload**: Push a package file into an `<os>/<version>` distribution
//! - **Delete**: Remove a single package file
//! - **List**: Enumerate packages of a distribution across all result pages
//!
//! On top of those remote operations it implements the two things a put step
//! can do: publish a package (with optional delete-and-republish on name
//! conflicts) and delete every package whose version matches a pattern.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pkgcloud_core::{Request, resolve};
//! use pkgcloud_repo::{PackagecloudClient, execute};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let request = Request::from_json(r#"{
//!     "source": {"username": "acme", "api_key": "token", "repo": "tools"},
//!     "params": {"distribution_name": "debian/jessie", "package_file_glob": "*.deb"}
//! }"#)?;
//! let resolved = resolve(&request, Path::new("/tmp/build/put"))?;
//!
//! let client = PackagecloudClient::from_request(&resolved)?;
//! let result = execute(&resolved, &client).await?;
//! println!("{}", serde_json::to_string(&result)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Destructive operations
//!
//! Delete-by-version has no dry-run and no rollback. Every package whose
//! version matches is deleted, one by one; if a deletion fails the run aborts
//! and the packages already deleted stay deleted.

pub mod error;
pub mod credentials;
pub mod package;
pub mod upload;
pub mod pagination;
pub mod client;
pub mod backend;
pub mod mock;
pub mod publish;
pub mod prune;
pub mod resource;

// Re-exports for convenience
pub use error::{RepoError, Result};
pub use credentials::Credentials;
pub use package::RemotePackage;
pub use upload::{UploadOutcome, classify_upload};
pub use pagination::{PageInfo, Pagination, fetch_all};
pub use client::{DEFAULT_PER_PAGE, PackagecloudClient};
pub use backend::PackageRepository;
pub use mock::{MockRepository, OperationCounts};
pub use publish::publish_package;
pub use prune::delete_versions;
pub use resource::execute;
