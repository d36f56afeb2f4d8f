//! Growable in-memory file
//!
//! Pass-through storage for files created at runtime (the database log the
//! host creates next to the attached data files). Behaves like an ordinary
//! stream: reads and writes happen at the cursor and advance it, writes past
//! the end extend the file, and the length can be changed freely up to the
//! file's limit.

use bakmount_core::traits::{check_buffer_args, seek_target};
use bakmount_core::{Error, FileStorage, Result, SeekOrigin, DEFAULT_MEMORY_FILE_LIMIT};

/// In-memory file backed by a `Vec<u8>`
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    data: Vec<u8>,
    position: u64,
    /// Largest length the file may grow to
    limit: u64,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::from_bytes(Vec::new())
    }
}

impl MemoryStorage {
    /// Create an empty file
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a file holding `data`, cursor at the start
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data,
            position: 0,
            limit: DEFAULT_MEMORY_FILE_LIMIT,
        }
    }

    /// Cap the length the file may grow to
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Largest length the file may grow to
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Current content
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the file and return its content
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Zero-extend the file to `length` bytes
    ///
    /// Fails with `StorageFull` past the limit or when the allocation is
    /// refused; the content is unchanged on failure.
    fn grow_to(&mut self, length: u64) -> Result<()> {
        if length > self.limit {
            return Err(Error::storage_full(format!(
                "length {length} exceeds in-memory file limit {}",
                self.limit
            )));
        }
        let length = usize::try_from(length).map_err(|_| {
            Error::storage_full(format!("length {length} exceeds addressable memory"))
        })?;
        if length > self.data.len() {
            self.data
                .try_reserve_exact(length - self.data.len())
                .map_err(|e| Error::storage_full(format!("cannot grow to {length} bytes: {e}")))?;
            self.data.resize(length, 0);
        }
        Ok(())
    }
}

impl FileStorage for MemoryStorage {
    fn read(&mut self, buffer: &mut [u8], offset: usize, count: usize) -> Result<usize> {
        check_buffer_args(buffer.len(), offset, count)?;

        let len = self.data.len() as u64;
        if self.position >= len {
            return Ok(0);
        }

        // position < len, so it fits in usize
        let start = self.position as usize;
        let n = count.min(self.data.len() - start);
        buffer[offset..offset + n].copy_from_slice(&self.data[start..start + n]);
        self.position += n as u64;
        Ok(n)
    }

    fn write(&mut self, buffer: &[u8], offset: usize, count: usize) -> Result<()> {
        check_buffer_args(buffer.len(), offset, count)?;
        if count == 0 {
            return Ok(());
        }

        let end = self.position.checked_add(count as u64).ok_or_else(|| {
            Error::storage_full(format!("write of {count} bytes at {} overflows", self.position))
        })?;
        self.grow_to(end)?;

        // end <= data.len() after growing
        let (start, end) = (self.position as usize, end as usize);
        self.data[start..end].copy_from_slice(&buffer[offset..offset + count]);
        self.position = end as u64;
        Ok(())
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64> {
        let target = seek_target(self.position, self.len(), offset, origin)?;
        self.set_position(target)?;
        Ok(self.position)
    }

    fn set_length(&mut self, length: u64) -> Result<()> {
        if length < self.data.len() as u64 {
            self.data.truncate(length as usize);
        } else {
            self.grow_to(length)?;
        }
        self.position = self.position.min(length);
        Ok(())
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn position(&self) -> u64 {
        self.position
    }

    /// Any position is accepted; a later write fills the gap with zeros.
    fn set_position(&mut self, position: u64) -> Result<()> {
        self.position = position;
        Ok(())
    }
}
