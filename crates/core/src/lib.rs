//! Core types and traits for bakmount
//!
//! This crate defines the foundational pieces shared by every layer:
//! - Range: inclusive byte interval with an overlap-aware comparison
//! - TypedRange / RangeKind: per-call classification of a grid cell
//! - StorageConfig: chunk size and read alignment policy
//! - FileStorage: the capability surface a mount adapter drives
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod range;
pub mod traits;

pub use config::{
    ConfigError, ReadAlignment, StorageConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MEMORY_FILE_LIMIT,
    MAX_CHUNK_SIZE,
};
pub use error::{Error, Result};
pub use range::{Range, RangeKind, TypedRange};
pub use traits::{FileStorage, SeekOrigin};
