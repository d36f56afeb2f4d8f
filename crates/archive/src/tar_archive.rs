//! Tar container reader
//!
//! Scans the archive once to record where each regular-file entry's data
//! starts, then serves every entry as a window over one shared file handle.
//! Entry data is never copied.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::source::{ArchiveError, NamedStream, StreamSource};
use crate::window::WindowStream;

#[derive(Debug, Clone)]
struct TarEntry {
    name: String,
    offset: u64,
    size: u64,
}

/// Tar archive exposing its regular files as streams
#[derive(Debug)]
pub struct TarArchive {
    path: PathBuf,
    file: Arc<Mutex<File>>,
    entries: Vec<TarEntry>,
}

impl TarArchive {
    /// Open and index a tar archive
    ///
    /// Entries that are not regular files are skipped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;

        let mut entries = Vec::new();
        {
            let mut archive = tar::Archive::new(&file);
            for entry in archive.entries()? {
                let entry = entry?;
                if !entry.header().entry_type().is_file() {
                    continue;
                }

                let raw = entry.path()?.to_string_lossy().into_owned();
                let name = raw.trim_start_matches("./").to_string();
                if name.is_empty() || name.ends_with('/') {
                    return Err(ArchiveError::InvalidEntryName(raw));
                }

                debug!(
                    name = %name,
                    offset = entry.raw_file_position(),
                    size = entry.size(),
                    "indexed tar entry"
                );
                entries.push(TarEntry {
                    name,
                    offset: entry.raw_file_position(),
                    size: entry.size(),
                });
            }
        }

        info!(path = %path.display(), streams = entries.len(), "opened tar archive");
        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
            entries,
        })
    }

    /// Archive location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of regular-file entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the archive holds no regular files
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StreamSource for TarArchive {
    type Stream = WindowStream<File>;

    fn streams(&self) -> Result<Vec<NamedStream<Self::Stream>>, ArchiveError> {
        Ok(self
            .entries
            .iter()
            .map(|entry| NamedStream {
                name: entry.name.clone(),
                length: entry.size,
                stream: WindowStream::new(Arc::clone(&self.file), entry.offset, entry.size),
            })
            .collect())
    }
}
