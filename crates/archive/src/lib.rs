//! Container readers for bakmount
//!
//! Turns an archive into named, read-only, fixed-length byte streams, one per
//! logical data file, without copying their bytes:
//! - StreamSource: what the volume consumes
//! - WindowStream: bounded view into a shared archive handle
//! - TarArchive: tar files, one stream per regular-file entry
//! - InMemorySource: the same layout over an in-memory buffer
//!
//! Windows over one archive share a single handle. Every window read seeks and
//! reads under one lock acquisition, so engines over different files of the
//! same archive never interleave their seek-then-read pairs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod source;
pub mod tar_archive;
pub mod window;

pub use source::{ArchiveError, InMemorySource, NamedStream, StreamSource};
pub use tar_archive::TarArchive;
pub use window::WindowStream;
