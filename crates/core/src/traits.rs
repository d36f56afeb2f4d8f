//! Storage surface trait
//!
//! `FileStorage` is what a mount adapter drives for every open file. Two
//! implementations live in `bakmount-storage`: a growable in-memory file for
//! files created at runtime, and the hybrid overlay over a read-only backing
//! stream. The adapter picks one when the file comes into existence; nothing
//! downstream inspects the concrete type.

use crate::error::Result;

/// Origin for [`FileStorage::seek`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    /// `position = offset`
    Begin,
    /// `position = position + offset`
    Current,
    /// `position = length - offset`
    End,
}

/// Random-access file surface
///
/// Implementations are not internally synchronised. Callers serialise all
/// operations on one instance.
pub trait FileStorage {
    /// Read `count` bytes into `buffer[offset..offset + count]`
    ///
    /// Returns the number of bytes placed in the buffer.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `offset + count` exceeds the buffer.
    fn read(&mut self, buffer: &mut [u8], offset: usize, count: usize) -> Result<usize>;

    /// Write `buffer[offset..offset + count]`
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `offset + count` exceeds the buffer.
    fn write(&mut self, buffer: &[u8], offset: usize, count: usize) -> Result<()>;

    /// Move the cursor and return the new position
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the candidate position is negative, or past the end
    /// of a fixed-length surface.
    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64>;

    /// Truncate or extend the file
    ///
    /// # Errors
    ///
    /// `Unsupported` for surfaces with a fixed length.
    fn set_length(&mut self, length: u64) -> Result<()>;

    /// Current length in bytes
    fn len(&self) -> u64;

    /// True if the file holds no bytes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursor position
    fn position(&self) -> u64;

    /// Set the cursor position
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `position` exceeds the length of a fixed-length
    /// surface.
    fn set_position(&mut self, position: u64) -> Result<()>;
}

/// Check that `offset + count` fits inside a buffer of `len` bytes
pub fn check_buffer_args(len: usize, offset: usize, count: usize) -> Result<()> {
    match offset.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(crate::Error::invalid_argument(format!(
            "offset {offset} + count {count} exceeds buffer length {len}"
        ))),
    }
}

/// Resolve a seek request to a candidate position
///
/// Bounds against the length are left to the caller's position setter.
pub fn seek_target(position: u64, length: u64, offset: i64, origin: SeekOrigin) -> Result<u64> {
    let candidate = match origin {
        SeekOrigin::Begin => i128::from(offset),
        SeekOrigin::Current => i128::from(position) + i128::from(offset),
        SeekOrigin::End => i128::from(length) - i128::from(offset),
    };
    u64::try_from(candidate).map_err(|_| {
        crate::Error::invalid_argument(format!("seek to negative position {candidate}"))
    })
}
