//! Inclusive byte ranges
//!
//! `Range` carries two distinct relations:
//! - `==` is exact equality of both bounds. It decides whether an overlay hit
//!   is a true grid match or a partial straddle.
//! - [`Range::cmp_overlap`] treats overlapping ranges as equal and otherwise
//!   orders by `from`. It is not transitive and is not an `Ord`
//!   implementation. It is only sound against a set of pairwise disjoint keys.

use std::cmp::Ordering;
use std::fmt;

/// Inclusive byte interval `[from, to]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    from: u64,
    to: u64,
}

impl Range {
    /// Create a range from inclusive bounds
    pub fn new(from: u64, to: u64) -> Self {
        debug_assert!(from <= to, "range bounds inverted: {from} > {to}");
        Self { from, to }
    }

    /// Create a range of `count` bytes starting at `from`
    ///
    /// `count` must be non-zero; an empty range has no inclusive form.
    pub fn with_count(from: u64, count: u64) -> Self {
        debug_assert!(count > 0, "empty range at {from}");
        Self::new(from, from + count - 1)
    }

    /// First byte offset
    pub fn from(&self) -> u64 {
        self.from
    }

    /// Last byte offset (inclusive)
    pub fn to(&self) -> u64 {
        self.to
    }

    /// One past the last byte offset
    pub fn end(&self) -> u64 {
        self.to + 1
    }

    /// Number of bytes covered
    pub fn count(&self) -> u64 {
        self.to - self.from + 1
    }

    /// True if the two ranges share at least one byte
    pub fn overlaps(&self, other: &Range) -> bool {
        self.from <= other.to && self.to >= other.from
    }

    /// Overlap-as-equal ordering used for interval lookups
    ///
    /// Returns `Equal` when the ranges overlap, otherwise compares `from`.
    pub fn cmp_overlap(&self, other: &Range) -> Ordering {
        if self.overlaps(other) {
            Ordering::Equal
        } else {
            self.from.cmp(&other.from)
        }
    }

    /// True if `from` is a multiple of `chunk_size`
    pub fn is_aligned_to(&self, chunk_size: u64) -> bool {
        self.from % chunk_size == 0
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}-{} ({})", self.from, self.to, self.count())
        }
    }
}

/// Where the bytes of a grid cell come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// Untouched; served from the backing stream
    Original,
    /// Backed by an overlay chunk
    Overwritten,
}

/// A grid cell tagged with its source
///
/// Produced fresh for every read or write and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedRange {
    /// The grid cell
    pub range: Range,
    /// Source of its bytes
    pub kind: RangeKind,
}

impl TypedRange {
    /// Tag a cell as served from the backing stream
    pub fn original(range: Range) -> Self {
        Self {
            range,
            kind: RangeKind::Original,
        }
    }

    /// Tag a cell as served from the overlay
    pub fn overwritten(range: Range) -> Self {
        Self {
            range,
            kind: RangeKind::Overwritten,
        }
    }
}
