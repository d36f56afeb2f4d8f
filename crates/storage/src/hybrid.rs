//! HybridStorage: writable view over a read-only backing stream
//!
//! Writes never reach the backing stream. Each chunk a write touches is copied
//! into the overlay index on first touch and updated in place afterwards.
//! Reads merge untouched backing bytes with overlay chunks.
//!
//! # Design Notes
//!
//! - **Page-granular only**: reads and writes must cover whole chunks. A write
//!   that is not a chunk multiple, or does not start on a chunk boundary, is
//!   rejected instead of being merged into a partial chunk.
//! - **Fast path**: when no overlay chunk overlaps a read, it goes straight to
//!   the backing stream.
//! - **Fixed length**: the length is captured from the backing stream at
//!   construction. `set_length` and writes past the end are unsupported.
//! - **Cursor**: `read` and `write` address `position + offset` and do not
//!   advance the cursor. Hosts position with `seek` before every call.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use bakmount_core::{FileStorage, SeekOrigin, StorageConfig};
//! use bakmount_storage::HybridStorage;
//!
//! let backing = Cursor::new(vec![0u8; 64]);
//! let mut storage = HybridStorage::with_config(backing, &StorageConfig::for_testing()).unwrap();
//!
//! storage.seek(16, SeekOrigin::Begin).unwrap();
//! storage.write(&[0xFF; 16], 0, 16).unwrap();
//!
//! let mut page = [0u8; 16];
//! storage.read(&mut page, 0, 16).unwrap();
//! assert_eq!(page, [0xFF; 16]);
//!
//! // the backing bytes are untouched
//! assert!(storage.into_inner().into_inner().iter().all(|&b| b == 0));
//! ```

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use bakmount_core::config::validate_chunk_size;
use bakmount_core::traits::{check_buffer_args, seek_target};
use bakmount_core::{
    Error, FileStorage, Range, RangeKind, ReadAlignment, Result, SeekOrigin, StorageConfig,
};
use tracing::{debug, warn};

use crate::classify::{classify, Classified};
use crate::grid::chunk_grid;
use crate::overlay::{OverlayChunk, OverlayIndex};

/// Copy-on-write storage over a read-only stream
///
/// Not internally synchronised; the owner serialises calls. The backing
/// stream is only ever read and is handed back by [`HybridStorage::into_inner`].
#[derive(Debug)]
pub struct HybridStorage<R> {
    /// Read-only source bytes
    backing: R,
    /// Backing length, fixed for the lifetime of the storage
    length: u64,
    /// Cursor, always `<= length`
    position: u64,
    /// Chunk size in `(0, MAX_CHUNK_SIZE)`
    chunk_size: u32,
    /// Treatment of reads that are not a chunk multiple
    read_alignment: ReadAlignment,
    /// Written chunks
    overlay: OverlayIndex,
}

impl<R: Read + Seek> HybridStorage<R> {
    /// Create storage with the default configuration (8 KiB chunks)
    pub fn new(backing: R) -> Result<Self> {
        Self::with_config(backing, &StorageConfig::default())
    }

    /// Create storage with an explicit configuration
    ///
    /// Measures the backing stream by seeking to its end.
    pub fn with_config(mut backing: R, config: &StorageConfig) -> Result<Self> {
        config.validate()?;

        let length = backing.seek(SeekFrom::End(0))?;
        backing.seek(SeekFrom::Start(0))?;

        Ok(Self {
            backing,
            length,
            position: 0,
            chunk_size: config.chunk_size,
            read_alignment: config.read_alignment,
            overlay: OverlayIndex::new(),
        })
    }

    /// Chunk size in bytes
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Change the chunk size
    ///
    /// # Errors
    ///
    /// `InvalidArgument` outside `(0, MAX_CHUNK_SIZE)`; `Unsupported` once the
    /// overlay holds chunks cut at the current size.
    pub fn set_chunk_size(&mut self, chunk_size: u32) -> Result<()> {
        validate_chunk_size(chunk_size)?;
        if chunk_size != self.chunk_size && !self.overlay.is_empty() {
            return Err(Error::unsupported(format!(
                "cannot change chunk size to {chunk_size} with {} overlay chunks of {}",
                self.overlay.len(),
                self.chunk_size
            )));
        }
        self.chunk_size = chunk_size;
        Ok(())
    }

    /// Written chunks
    pub fn overlay(&self) -> &OverlayIndex {
        &self.overlay
    }

    /// Give the backing stream back, discarding the overlay
    pub fn into_inner(self) -> R {
        self.backing
    }

    fn chunk(&self) -> u64 {
        u64::from(self.chunk_size)
    }

    /// Absolute byte range addressed by `offset` and `count` (`count > 0`)
    fn request_range(&self, offset: usize, count: usize) -> Range {
        Range::with_count(self.position + offset as u64, count as u64)
    }

    /// Overlay ranges overlapping `request`, ascending
    fn stored_ranges(&self, request: Range) -> Vec<Range> {
        self.overlay
            .query_overlap(request)
            .map(OverlayChunk::range)
            .collect()
    }

    fn classify_request(&self, request: Range, stored: &[Range]) -> Result<Classified> {
        let grid = chunk_grid(request, self.chunk());
        classify(&grid, stored).map_err(|e| {
            warn!(
                start = request.from(),
                count = request.count(),
                error = %e,
                "rejected unaligned access"
            );
            e
        })
    }

    /// Read backing bytes at `from` until `dest` is full or the stream ends
    fn read_backing(&mut self, from: u64, dest: &mut [u8]) -> Result<usize> {
        self.backing.seek(SeekFrom::Start(from))?;

        let mut filled = 0;
        while filled < dest.len() {
            match self.backing.read(&mut dest[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    fn reject(&self, request: Range, reason: &str) -> Error {
        warn!(
            start = request.from(),
            count = request.count(),
            chunk_size = self.chunk_size,
            reason,
            "rejected request"
        );
        Error::unsupported(format!(
            "{reason}: {request} with chunk size {}",
            self.chunk_size
        ))
    }
}

impl<R: Read + Seek> FileStorage for HybridStorage<R> {
    fn read(&mut self, buffer: &mut [u8], offset: usize, count: usize) -> Result<usize> {
        check_buffer_args(buffer.len(), offset, count)?;
        if count == 0 {
            return Ok(0);
        }

        let chunk = self.chunk();
        if count as u64 % chunk != 0 {
            return match self.read_alignment {
                ReadAlignment::Legacy => Ok(count),
                ReadAlignment::Reject => {
                    let request = self.request_range(offset, count);
                    Err(self.reject(request, "read length is not a chunk multiple"))
                }
            };
        }

        let request = self.request_range(offset, count);
        let stored = self.stored_ranges(request);
        if stored.is_empty() {
            return self.read_backing(request.from(), &mut buffer[offset..offset + count]);
        }

        if !request.is_aligned_to(chunk) {
            return Err(self.reject(
                request,
                "read over overlay does not start on a chunk boundary",
            ));
        }
        let cells = self.classify_request(request, &stored)?;
        debug!(
            start = request.from(),
            count,
            overlay_hits = stored.len(),
            "assembling read from overlay"
        );

        let mut total = 0;
        for cell in cells {
            let dest = offset + (cell.range.from() - request.from()) as usize;
            let window = &mut buffer[dest..dest + cell.range.count() as usize];
            match cell.kind {
                RangeKind::Original => total += self.read_backing(cell.range.from(), window)?,
                RangeKind::Overwritten => {
                    window.copy_from_slice(self.overlay.fetch_exact(cell.range)?);
                    total += window.len();
                }
            }
        }
        Ok(total)
    }

    fn write(&mut self, buffer: &[u8], offset: usize, count: usize) -> Result<()> {
        check_buffer_args(buffer.len(), offset, count)?;
        if count == 0 {
            return Ok(());
        }

        let chunk = self.chunk();
        let request = self.request_range(offset, count);
        if count as u64 % chunk != 0 || !request.is_aligned_to(chunk) {
            return Err(self.reject(request, "partial-chunk write"));
        }
        if request.end() > self.length {
            return Err(self.reject(request, "write past the end of fixed-length storage"));
        }

        // classify everything before touching the overlay so a rejected
        // write leaves it unchanged
        let stored = self.stored_ranges(request);
        let cells = self.classify_request(request, &stored)?;

        for cell in cells {
            let start = offset + (cell.range.from() - request.from()) as usize;
            let source = &buffer[start..start + cell.range.count() as usize];
            match cell.kind {
                RangeKind::Original => {
                    debug!(chunk = cell.range.from(), "copy-on-write: new overlay chunk");
                    self.overlay.insert(cell.range, source.to_vec())?;
                }
                RangeKind::Overwritten => {
                    debug!(chunk = cell.range.from(), "overwriting overlay chunk in place");
                    self.overlay.fetch_exact_mut(cell.range)?.copy_from_slice(source);
                }
            }
        }
        Ok(())
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64> {
        let target = seek_target(self.position, self.length, offset, origin)?;
        self.set_position(target)?;
        Ok(self.position)
    }

    fn set_length(&mut self, length: u64) -> Result<()> {
        Err(Error::unsupported(format!(
            "cannot resize overlay storage of fixed length {} to {length}",
            self.length
        )))
    }

    fn len(&self) -> u64 {
        self.length
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn set_position(&mut self, position: u64) -> Result<()> {
        if position > self.length {
            return Err(Error::invalid_argument(format!(
                "position {position} exceeds length {}",
                self.length
            )));
        }
        self.position = position;
        Ok(())
    }
}
