//! Centroid-driven spatial partitioning.
//!
//! Oversized groups are split into quadrants around their center of gravity
//! until every group holds at most `maxdim` points, then each group snaps its
//! center onto one of its members.

mod gravbox;

pub use self::gravbox::{GravBox, SnapMode};

use crate::points::Point;
use std::str::FromStr;
use tracing::{debug, trace};

impl FromStr for SnapMode {
    type Err = String;
    fn from_str(s: &str) -> Result<SnapMode, String> {
        match s {
            "first" => Ok(SnapMode::FirstMember),
            "nearest" => Ok(SnapMode::Nearest),
            other => Err(format!("unknown snap mode `{}`, expected `first` or `nearest`", other)),
        }
    }
}

/*
Boxes live in an arena scanned front to back by an index that never goes
back. Children are appended at the end. A slot is `None` once its points have
moved into children. A box whose split gives back a single child holds only
coincident points; that child takes the parent's slot and is left as it is.
*/
pub fn compute_gravity_partitions(points: Vec<Point>, maxdim: usize, snap: SnapMode) -> Vec<GravBox> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut arena: Vec<Option<GravBox>> = vec![Some(GravBox::new(points))];
    let mut i = 0;
    while i < arena.len() {
        let gb = match arena[i].take() {
            Some(gb) => gb,
            None => {
                i += 1;
                continue;
            }
        };
        if gb.len() <= maxdim || gb.len() <= 1 {
            arena[i] = Some(gb);
            i += 1;
            continue;
        }

        let size = gb.len();
        let mut children = gb.split();
        if children.len() < 2 {
            debug!(slot = i, size, "oversized box of coincident points cannot be split");
            arena[i] = children.pop();
        } else {
            trace!(slot = i, size, children = children.len(), "split box");
            arena.extend(children.into_iter().map(Some));
        }
        i += 1;
    }

    let visited = arena.len();
    let mut result: Vec<GravBox> = arena.into_iter().flatten().collect();
    for gb in result.iter_mut() {
        gb.snap_center(snap);
    }
    debug!(boxes = result.len(), visited, maxdim, "gravity partitioning done");
    result
}
