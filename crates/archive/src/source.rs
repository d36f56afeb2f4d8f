//! Stream source trait and the in-memory source

use std::io::{self, Cursor, Read, Seek};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::window::WindowStream;

/// A named, read-only, fixed-length stream extracted from a container
#[derive(Debug, Clone)]
pub struct NamedStream<S> {
    /// File name as recorded in the container
    pub name: String,
    /// Stream length in bytes
    pub length: u64,
    /// The stream, positioned at its start
    pub stream: S,
}

/// Container that yields one stream per logical data file
pub trait StreamSource {
    /// Stream type handed out for each file
    type Stream: Read + Seek;

    /// All data file streams, in container order
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be read.
    fn streams(&self) -> Result<Vec<NamedStream<Self::Stream>>, ArchiveError>;
}

/// Container reader errors
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// I/O error while reading the container
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Entry name that cannot be used as a file name
    #[error("Invalid entry name: {0:?}")]
    InvalidEntryName(String),
}

/// Stream source over files laid out back to back in one buffer
///
/// Mirrors the layout of a real container: every stream is a window over a
/// single shared reader.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    files: Vec<(String, Vec<u8>)>,
}

impl InMemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file
    pub fn with_file(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.files.push((name.into(), data));
        self
    }
}

impl StreamSource for InMemorySource {
    type Stream = WindowStream<Cursor<Vec<u8>>>;

    fn streams(&self) -> Result<Vec<NamedStream<Self::Stream>>, ArchiveError> {
        let mut blob = Vec::new();
        let mut layout = Vec::with_capacity(self.files.len());
        for (name, data) in &self.files {
            if name.is_empty() {
                return Err(ArchiveError::InvalidEntryName(name.clone()));
            }
            layout.push((name.clone(), blob.len() as u64, data.len() as u64));
            blob.extend_from_slice(data);
        }

        let shared = Arc::new(Mutex::new(Cursor::new(blob)));
        Ok(layout
            .into_iter()
            .map(|(name, base, length)| NamedStream {
                name,
                length,
                stream: WindowStream::new(Arc::clone(&shared), base, length),
            })
            .collect())
    }
}
