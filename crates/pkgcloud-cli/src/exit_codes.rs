//! Standard exit codes for the resource binary
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.
//! The CI system only distinguishes zero from non-zero; the finer codes help
//! when running the binary by hand.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Config error - invalid or incomplete request
pub const CONFIG_ERROR: i32 = 2;

/// Remote error - the package service rejected a request
pub const REMOTE_ERROR: i32 = 3;

/// Authentication error - credentials refused
pub const AUTH_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Network error - service unreachable (sysexits.h EX_UNAVAILABLE)
pub const UNAVAILABLE: i32 = 69;
