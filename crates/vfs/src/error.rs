//! Volume error types

use bakmount_archive::ArchiveError;

/// Volume errors
#[derive(Debug, thiserror::Error)]
pub enum VolumeError {
    /// No file with that name
    #[error("File not found: {0}")]
    NotFound(String),

    /// A file with that name already exists
    #[error("File already exists: {0}")]
    AlreadyExists(String),

    /// The file may not be created or removed
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Failure from the file's storage surface
    #[error("Storage error: {0}")]
    Storage(#[from] bakmount_core::Error),

    /// Failure reading the container
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

impl VolumeError {
    /// True if the host should report "not supported"
    pub fn is_unsupported(&self) -> bool {
        matches!(self, VolumeError::Storage(e) if e.is_unsupported())
    }

    /// True if the host should report "disk full"
    pub fn is_disk_full(&self) -> bool {
        matches!(self, VolumeError::Storage(e) if e.is_storage_full())
    }
}

impl From<bakmount_core::ConfigError> for VolumeError {
    fn from(e: bakmount_core::ConfigError) -> Self {
        VolumeError::Storage(e.into())
    }
}
