//! Volume layer for bakmount
//!
//! A host-agnostic file table that a mount adapter (FUSE, Dokan, ...) drives:
//! - Volume: name → file, built from a container's streams
//! - VolumeConfig: storage configuration plus creatable file extensions
//! - VolumeError: failures the adapter maps to host status codes
//!
//! Files found in the container get a HybridStorage over their stream, so
//! writes land in memory and the archive is never modified. Files the host
//! creates (the database log) get a growable MemoryStorage. The choice is made
//! once, when the file enters the table.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod volume;

pub use config::VolumeConfig;
pub use error::VolumeError;
pub use volume::{FileInfo, FileOrigin, Volume};
