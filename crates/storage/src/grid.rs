//! Chunk grid calculator
//!
//! Maps a byte range to the ascending run of chunk-aligned cells covering it.
//! The first cell starts at `floor(from / chunk_size) * chunk_size` and cells
//! are added until one reaches the range's last byte.

use bakmount_core::Range;
use smallvec::SmallVec;

/// Cells for one request; a database extent is eight pages
pub type Grid = SmallVec<[Range; 8]>;

/// Snap `range` outward to the chunk grid
pub fn chunk_grid(range: Range, chunk_size: u64) -> Grid {
    debug_assert!(chunk_size > 0);

    let mut grid = Grid::new();
    let mut from = range.from() / chunk_size * chunk_size;
    while from <= range.to() {
        grid.push(Range::with_count(from, chunk_size));
        from += chunk_size;
    }
    grid
}
