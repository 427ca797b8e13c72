//! pkgcloud-core - Core types for the pkgcloud CI resource
//!
//! This crate provides the foundational types used by the resource:
//! - `Request`: The structured `source`/`params` input of a put step
//! - `Distribution`: A validated `<os>/<version>` target
//! - `ResolvedRequest`: Validated input, ready for the remote client
//! - `PublishResult`: The version and metadata emitted by a run

pub mod distribution;
pub mod error;
pub mod request;
pub mod resolve;
pub mod result;

pub use distribution::Distribution;
pub use error::{CoreError, Result};
pub use request::{Params, Request, Source};
pub use resolve::{DEFAULT_ATTEMPTS, DEFAULT_URL, Mode, ResolvedRequest, resolve};
pub use result::{DELETED_MARKER, MetadataField, PublishResult, Version, package_link};
