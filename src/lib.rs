//! bakmount - mount database backups as writable files
//!
//! The data files inside a backup container are exposed as ordinary files a
//! database server can attach. Writes are kept in memory as whole pages on
//! top of the archived bytes; the archive is only ever read.
//!
//! # Quick Start
//!
//! ```no_run
//! use bakmount::{TarArchive, Volume, VolumeConfig};
//!
//! let archive = TarArchive::open("backup.tar")?;
//! let volume = Volume::from_source(&archive, VolumeConfig::default())?;
//!
//! let mut page = vec![0u8; 8192];
//! volume.read_file("sales.mdf", &mut page, 0)?;
//! volume.write_file("sales.mdf", &page, 8192)?;
//! volume.create_file("sales_log.ldf")?;
//! # Ok::<(), bakmount::VolumeError>(())
//! ```
//!
//! # Architecture
//!
//! - [`bakmount_core`]: ranges, the `FileStorage` trait, errors and config
//! - [`bakmount_storage`]: the copy-on-write `HybridStorage` and `MemoryStorage`
//! - [`bakmount_archive`]: container readers handing out windowed streams
//! - [`bakmount_vfs`]: the file table a mount adapter drives

pub use bakmount_archive::{ArchiveError, InMemorySource, NamedStream, StreamSource, TarArchive};
pub use bakmount_core::{
    Error, FileStorage, Range, ReadAlignment, Result, SeekOrigin, StorageConfig,
    DEFAULT_CHUNK_SIZE,
};
pub use bakmount_storage::{HybridStorage, MemoryStorage};
pub use bakmount_vfs::{FileInfo, FileOrigin, Volume, VolumeConfig, VolumeError};
