//! Storage layer for bakmount
//!
//! This crate implements the two storage surfaces behind `FileStorage`:
//! - HybridStorage: copy-on-write overlay over a read-only backing stream
//! - MemoryStorage: growable in-memory file for files created at runtime
//!
//! and the pieces the overlay engine is built from:
//! - grid: chunk-aligned cover of a byte range
//! - overlay: ordered, overlap-queryable store of written chunks
//! - classify: merge of a grid with overlay hits into typed ranges
//!
//! # Overlay path
//!
//! A request is turned into an absolute range, snapped to the chunk grid and
//! checked against the overlay. Cells with no overlay hit are served from the
//! backing stream, cells with an exact hit from the overlay. A hit that
//! straddles a cell is rejected rather than merged.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod grid;
pub mod hybrid;
pub mod memory;
pub mod overlay;

pub use classify::classify;
pub use grid::chunk_grid;
pub use hybrid::HybridStorage;
pub use memory::MemoryStorage;
pub use overlay::{OverlayChunk, OverlayIndex};
