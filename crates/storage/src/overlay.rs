//! Overlay index for written chunks
//!
//! Holds the post-write content of every chunk touched by a write:
//! - Maps chunk start offset → OverlayChunk using BTreeMap for sorted order
//! - query_overlap() returns every chunk overlapping a range, ascending
//! - fetch_exact() resolves a grid cell to its payload, or fails if the cell
//!   is only partially covered
//!
//! Stored ranges are pairwise disjoint. `insert` refuses anything that would
//! break that, which is what makes the overlap-as-equal lookup sound.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included};

use bakmount_core::{Error, Range, Result};

/// A written chunk and its current content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayChunk {
    range: Range,
    payload: Vec<u8>,
}

impl OverlayChunk {
    /// Byte range this chunk replaces
    pub fn range(&self) -> Range {
        self.range
    }

    /// Current content
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Overlay index: chunk start → chunk
///
/// Entries are created on first write to a chunk and updated in place
/// afterwards. Nothing is ever removed.
#[derive(Debug, Default)]
pub struct OverlayIndex {
    chunks: BTreeMap<u64, OverlayChunk>,
}

impl OverlayIndex {
    /// Create a new empty OverlayIndex
    pub fn new() -> Self {
        Self {
            chunks: BTreeMap::new(),
        }
    }

    /// Add a chunk for a range not yet present
    ///
    /// # Errors
    ///
    /// `UnalignedAccess` if `range` overlaps a stored chunk, `InvalidArgument`
    /// if the payload length does not match the range.
    pub fn insert(&mut self, range: Range, payload: Vec<u8>) -> Result<()> {
        if payload.len() as u64 != range.count() {
            return Err(Error::invalid_argument(format!(
                "payload of {} bytes for range {range}",
                payload.len()
            )));
        }
        if let Some(existing) = self.query_overlap(range).next() {
            return Err(Error::UnalignedAccess {
                requested: range,
                stored: existing.range,
            });
        }

        self.chunks.insert(range.from(), OverlayChunk { range, payload });
        Ok(())
    }

    /// All chunks overlapping `range`, ascending by start
    ///
    /// Only the last chunk starting at or before `range.from()` can reach into
    /// the range from the left; every chunk starting inside it overlaps.
    pub fn query_overlap(&self, range: Range) -> impl Iterator<Item = &OverlayChunk> + '_ {
        let head = self
            .chunks
            .range(..=range.from())
            .next_back()
            .map(|(_, chunk)| chunk)
            .filter(move |chunk| chunk.range.cmp_overlap(&range) == Ordering::Equal);
        let tail = self
            .chunks
            .range((Excluded(range.from()), Included(range.to())))
            .map(|(_, chunk)| chunk);

        head.into_iter().chain(tail)
    }

    /// True if any chunk overlaps `range`
    pub fn overlaps(&self, range: Range) -> bool {
        self.query_overlap(range).next().is_some()
    }

    /// Payload of the chunk stored for exactly `range`
    ///
    /// # Errors
    ///
    /// `UnalignedAccess` if the overlap is not a single exact match,
    /// `Unsupported` if nothing is stored there.
    pub fn fetch_exact(&self, range: Range) -> Result<&[u8]> {
        let key = self.locate_exact(range)?;
        self.chunks
            .get(&key)
            .map(|chunk| chunk.payload.as_slice())
            .ok_or_else(|| Self::missing(range))
    }

    /// Mutable payload of the chunk stored for exactly `range`
    ///
    /// # Errors
    ///
    /// Same as [`OverlayIndex::fetch_exact`].
    pub fn fetch_exact_mut(&mut self, range: Range) -> Result<&mut [u8]> {
        let key = self.locate_exact(range)?;
        self.chunks
            .get_mut(&key)
            .map(|chunk| chunk.payload.as_mut_slice())
            .ok_or_else(|| Self::missing(range))
    }

    fn locate_exact(&self, range: Range) -> Result<u64> {
        let mut hits = self.query_overlap(range);
        let first = hits.next().ok_or_else(|| Self::missing(range))?;

        // a second hit means the request spans more than one stored chunk
        if let Some(second) = hits.next() {
            return Err(Error::UnalignedAccess {
                requested: range,
                stored: second.range,
            });
        }
        if first.range != range {
            return Err(Error::UnalignedAccess {
                requested: range,
                stored: first.range,
            });
        }
        Ok(first.range.from())
    }

    fn missing(range: Range) -> Error {
        Error::unsupported(format!("no overlay chunk stored for {range}"))
    }

    /// Stored ranges in ascending order
    pub fn ranges(&self) -> impl Iterator<Item = Range> + '_ {
        self.chunks.values().map(|chunk| chunk.range)
    }

    /// Number of stored chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total payload bytes held
    pub fn overlay_bytes(&self) -> u64 {
        self.chunks.values().map(|chunk| chunk.payload.len() as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(from: u64) -> Range {
        Range::with_count(from, 16)
    }

    fn index_with(starts: &[u64]) -> OverlayIndex {
        let mut index = OverlayIndex::new();
        for &from in starts {
            index.insert(chunk(from), vec![from as u8; 16]).unwrap();
        }
        index
    }

    #[test]
    fn test_insert_and_fetch_exact() {
        let index = index_with(&[32]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.fetch_exact(chunk(32)).unwrap(), &[32u8; 16]);
        assert_eq!(index.overlay_bytes(), 16);
    }

    #[test]
    fn test_insert_overlapping_rejected() {
        let mut index = index_with(&[32]);

        let result = index.insert(Range::with_count(40, 16), vec![0; 16]);
        assert!(matches!(result, Err(Error::UnalignedAccess { .. })));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_insert_payload_length_mismatch() {
        let mut index = OverlayIndex::new();
        let result = index.insert(chunk(0), vec![0; 8]);
        assert!(result.unwrap_err().is_invalid_argument());
        assert!(index.is_empty());
    }

    #[test]
    fn test_query_overlap_ascending() {
        let index = index_with(&[64, 0, 32]);

        let hits: Vec<Range> = index
            .query_overlap(Range::new(0, 79))
            .map(OverlayChunk::range)
            .collect();
        assert_eq!(hits, vec![chunk(0), chunk(32), chunk(64)]);
    }

    #[test]
    fn test_query_overlap_includes_left_straddler() {
        let index = index_with(&[0, 32]);

        // starts inside chunk 0, ends inside chunk 32
        let hits: Vec<Range> = index
            .query_overlap(Range::new(8, 40))
            .map(OverlayChunk::range)
            .collect();
        assert_eq!(hits, vec![chunk(0), chunk(32)]);
    }

    #[test]
    fn test_query_overlap_skips_gaps() {
        let index = index_with(&[0, 64]);

        assert!(!index.overlaps(chunk(16)));
        assert!(!index.overlaps(chunk(32)));
        assert!(index.overlaps(Range::new(16, 64)));
        assert_eq!(index.query_overlap(Range::new(16, 63)).count(), 0);
    }

    #[test]
    fn test_fetch_exact_missing() {
        let index = index_with(&[0]);
        let err = index.fetch_exact(chunk(16)).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn test_fetch_exact_partial_overlap() {
        let index = index_with(&[0]);
        let err = index.fetch_exact(Range::new(8, 23)).unwrap_err();
        assert!(matches!(
            err,
            Error::UnalignedAccess { stored, .. } if stored == chunk(0)
        ));
    }

    #[test]
    fn test_fetch_exact_ambiguous() {
        let index = index_with(&[0, 16]);
        let err = index.fetch_exact(Range::new(0, 31)).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_fetch_exact_mut_updates_in_place() {
        let mut index = index_with(&[16]);

        index.fetch_exact_mut(chunk(16)).unwrap().fill(0xAB);

        assert_eq!(index.fetch_exact(chunk(16)).unwrap(), &[0xABu8; 16]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_ranges_iteration_order() {
        let index = index_with(&[48, 16, 0]);
        let ranges: Vec<u64> = index.ranges().map(|r| r.from()).collect();
        assert_eq!(ranges, vec![0, 16, 48]);
    }
}
