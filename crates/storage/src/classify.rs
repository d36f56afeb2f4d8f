//! Intersection classifier
//!
//! Merges the chunk grid of a request with the overlay chunks overlapping it.
//! Each cell comes out tagged `Original` (no overlay chunk touches it) or
//! `Overwritten` (an overlay chunk coincides with it exactly). An overlay
//! chunk that covers a cell only in part makes the whole request fail with
//! `UnalignedAccess`. Only whole, aligned pages are merged.

use bakmount_core::{Error, Range, Result, TypedRange};
use smallvec::SmallVec;

/// Typed cells for one request, ascending
pub type Classified = SmallVec<[TypedRange; 8]>;

/// Tag every cell of `grid` with the source of its bytes
///
/// Both `grid` and `stored` must be ascending by start; `stored` must be
/// pairwise disjoint. The output covers `grid` cell for cell.
pub fn classify(grid: &[Range], stored: &[Range]) -> Result<Classified> {
    debug_assert!(stored.windows(2).all(|w| w[0].to() < w[1].from()));

    let mut typed = Classified::with_capacity(grid.len());
    let mut hits = stored.iter().peekable();

    for &cell in grid {
        while hits.next_if(|hit| hit.to() < cell.from()).is_some() {}

        match hits.peek() {
            Some(&&hit) if hit.overlaps(&cell) => {
                if hit != cell {
                    return Err(Error::UnalignedAccess {
                        requested: cell,
                        stored: hit,
                    });
                }
                typed.push(TypedRange::overwritten(cell));
                hits.next();
            }
            _ => typed.push(TypedRange::original(cell)),
        }
    }

    Ok(typed)
}
