//! Bounded read-only views over a shared reader

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use parking_lot::Mutex;

/// Read-only stream over `[base, base + len)` of a shared reader
///
/// Each window keeps its own cursor. The shared reader's cursor is
/// repositioned on every read while its lock is held.
#[derive(Debug)]
pub struct WindowStream<R> {
    inner: Arc<Mutex<R>>,
    base: u64,
    len: u64,
    pos: u64,
}

impl<R> WindowStream<R> {
    /// Create a window of `len` bytes starting at `base`
    pub fn new(inner: Arc<Mutex<R>>, base: u64, len: u64) -> Self {
        Self {
            inner,
            base,
            len,
            pos: 0,
        }
    }

    /// Offset of the window inside the shared reader
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Window length
    pub fn len(&self) -> u64 {
        self.len
    }

    /// True for a zero-length window
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// manual impl: cloning shares the reader, R itself need not be Clone
impl<R> Clone for WindowStream<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            base: self.base,
            len: self.len,
            pos: self.pos,
        }
    }
}

impl<R: Read + Seek> Read for WindowStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.len || buf.is_empty() {
            return Ok(0);
        }

        let max = (buf.len() as u64).min(self.len - self.pos) as usize;
        let n = {
            let mut inner = self.inner.lock();
            inner.seek(SeekFrom::Start(self.base + self.pos))?;
            inner.read(&mut buf[..max])?
        };
        self.pos += n as u64;
        Ok(n)
    }
}

impl<R> Seek for WindowStream<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::End(delta) => self.len.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
        };
        self.pos = target.ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "seek before start of window")
        })?;
        Ok(self.pos)
    }
}
