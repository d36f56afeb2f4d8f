//! Volume: the file table a mount adapter drives
//!
//! Every file sits behind its own mutex, so operations on one file are
//! serialised while different files proceed independently. The table lock is
//! only held for lookups and membership changes, never across storage I/O.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bakmount_archive::StreamSource;
use bakmount_core::{Error, FileStorage, SeekOrigin};
use bakmount_storage::{HybridStorage, MemoryStorage};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::config::VolumeConfig;
use crate::error::VolumeError;

/// Where a file came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOrigin {
    /// Found in the container; copy-on-write over the archived bytes
    Archived,
    /// Created by the host; growable, held in memory
    Created,
}

/// Snapshot of a file's metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// File name as first seen
    pub name: String,
    /// Current length in bytes
    pub length: u64,
    /// Where the file came from
    pub origin: FileOrigin,
}

struct FileEntry {
    name: String,
    origin: FileOrigin,
    storage: Mutex<Box<dyn FileStorage + Send>>,
}

impl FileEntry {
    fn new(name: String, origin: FileOrigin, storage: Box<dyn FileStorage + Send>) -> Self {
        Self {
            name,
            origin,
            storage: Mutex::new(storage),
        }
    }

    fn info(&self) -> FileInfo {
        FileInfo {
            name: self.name.clone(),
            length: self.storage.lock().len(),
            origin: self.origin,
        }
    }
}

/// Case-insensitive table of mounted files
pub struct Volume {
    config: VolumeConfig,
    files: RwLock<BTreeMap<String, Arc<FileEntry>>>,
}

impl fmt::Debug for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Volume")
            .field("config", &self.config)
            .field("files", &self.files.read().len())
            .finish()
    }
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

fn seek_offset(offset: u64) -> Result<i64, VolumeError> {
    i64::try_from(offset)
        .map_err(|_| Error::invalid_argument(format!("offset {offset} out of range")).into())
}

impl Volume {
    /// Create an empty volume
    pub fn new(config: VolumeConfig) -> Result<Self, VolumeError> {
        config.validate()?;
        Ok(Self {
            config,
            files: RwLock::new(BTreeMap::new()),
        })
    }

    /// Build a volume holding one overlay storage per stream of `source`
    ///
    /// # Errors
    ///
    /// Fails if the source cannot be read, a backing stream cannot be
    /// measured, or two streams share a name (ignoring case).
    pub fn from_source<S>(source: &S, config: VolumeConfig) -> Result<Self, VolumeError>
    where
        S: StreamSource,
        S::Stream: Send + 'static,
    {
        let volume = Self::new(config)?;
        {
            let mut files = volume.files.write();
            for named in source.streams()? {
                let k = key(&named.name);
                if files.contains_key(&k) {
                    return Err(VolumeError::AlreadyExists(named.name));
                }
                let storage = HybridStorage::with_config(named.stream, &volume.config.storage)?;
                debug!(name = %named.name, length = named.length, "mounted archived file");
                files.insert(
                    k,
                    Arc::new(FileEntry::new(named.name, FileOrigin::Archived, Box::new(storage))),
                );
            }
            info!(
                files = files.len(),
                chunk_size = volume.config.storage.chunk_size,
                "built volume from stream source"
            );
        }
        Ok(volume)
    }

    /// Volume configuration
    pub fn config(&self) -> &VolumeConfig {
        &self.config
    }

    fn entry(&self, name: &str) -> Result<Arc<FileEntry>, VolumeError> {
        self.files
            .read()
            .get(&key(name))
            .cloned()
            .ok_or_else(|| VolumeError::NotFound(name.to_string()))
    }

    /// True if a file called `name` exists
    pub fn contains(&self, name: &str) -> bool {
        self.files.read().contains_key(&key(name))
    }

    /// Create an empty growable file
    ///
    /// # Errors
    ///
    /// `AccessDenied` unless the extension is creatable; `AlreadyExists` if
    /// the name is taken.
    pub fn create_file(&self, name: &str) -> Result<FileInfo, VolumeError> {
        if !self.config.is_creatable(name) {
            return Err(VolumeError::AccessDenied(name.to_string()));
        }

        let mut files = self.files.write();
        let k = key(name);
        if files.contains_key(&k) {
            return Err(VolumeError::AlreadyExists(name.to_string()));
        }

        let entry = Arc::new(FileEntry::new(
            name.to_string(),
            FileOrigin::Created,
            Box::new(MemoryStorage::new().with_limit(self.config.memory_file_limit)),
        ));
        let info = entry.info();
        files.insert(k, entry);
        info!(name, "created file");
        Ok(info)
    }

    /// Read into `buffer` starting at byte `offset` of the file
    ///
    /// Returns the number of bytes read.
    pub fn read_file(
        &self,
        name: &str,
        buffer: &mut [u8],
        offset: u64,
    ) -> Result<usize, VolumeError> {
        let entry = self.entry(name)?;
        let mut storage = entry.storage.lock();
        storage.seek(seek_offset(offset)?, SeekOrigin::Begin)?;
        Ok(storage.read(buffer, 0, buffer.len())?)
    }

    /// Write all of `buffer` starting at byte `offset` of the file
    ///
    /// Returns the number of bytes written.
    pub fn write_file(&self, name: &str, buffer: &[u8], offset: u64) -> Result<usize, VolumeError> {
        let entry = self.entry(name)?;
        let mut storage = entry.storage.lock();
        storage.seek(seek_offset(offset)?, SeekOrigin::Begin)?;
        storage.write(buffer, 0, buffer.len())?;
        Ok(buffer.len())
    }

    /// Truncate or extend the file
    ///
    /// Archived files have a fixed length and report unsupported.
    pub fn set_end_of_file(&self, name: &str, length: u64) -> Result<(), VolumeError> {
        let entry = self.entry(name)?;
        let mut storage = entry.storage.lock();
        storage.set_length(length)?;
        Ok(())
    }

    /// Remove a created file
    ///
    /// # Errors
    ///
    /// `AccessDenied` for archived files; `NotFound` if there is no such file.
    pub fn delete_file(&self, name: &str) -> Result<(), VolumeError> {
        let mut files = self.files.write();
        let k = key(name);
        match files.get(&k).map(|entry| entry.origin) {
            None => Err(VolumeError::NotFound(name.to_string())),
            Some(FileOrigin::Archived) => Err(VolumeError::AccessDenied(name.to_string())),
            Some(FileOrigin::Created) => {
                files.remove(&k);
                info!(name, "deleted file");
                Ok(())
            }
        }
    }

    /// Metadata for one file
    pub fn file_info(&self, name: &str) -> Result<FileInfo, VolumeError> {
        Ok(self.entry(name)?.info())
    }

    /// Metadata for every file, ordered by name
    pub fn files(&self) -> Vec<FileInfo> {
        let entries: Vec<Arc<FileEntry>> = self.files.read().values().cloned().collect();
        entries.iter().map(|entry| entry.info()).collect()
    }
}
