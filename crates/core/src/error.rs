//! Error types for bakmount
//!
//! This module defines the error taxonomy surfaced by every storage surface.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::range::Range;
use std::io;
use thiserror::Error;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for storage surfaces
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error raised by the backing stream
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Malformed buffer, offset, count, position or chunk size
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation the storage surface cannot represent
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Growing an in-memory file would exceed its limit or available memory
    #[error("Storage full: {0}")]
    StorageFull(String),

    /// Request straddles a stored overlay chunk instead of matching it exactly
    #[error("Unsupported unaligned access: requested {requested}, stored chunk {stored}")]
    UnalignedAccess {
        /// Grid cell of the request
        requested: Range,
        /// Overlay chunk it partially overlaps
        stored: Range,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Shorthand for [`Error::Unsupported`]
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Error::Unsupported(msg.into())
    }

    /// Shorthand for [`Error::StorageFull`]
    pub fn storage_full(msg: impl Into<String>) -> Self {
        Error::StorageFull(msg.into())
    }

    /// True for every failure the host should report as "not supported"
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_) | Error::UnalignedAccess { .. })
    }

    /// True if the host should report "disk full"
    pub fn is_storage_full(&self) -> bool {
        matches!(self, Error::StorageFull(_))
    }

    /// True for argument validation failures
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}
