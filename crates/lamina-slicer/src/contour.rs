//! Chain the unordered segments of one level into contours.
//!
//! Segments arrive in mesh traversal order with no chaining guarantee. The
//! list is split in half, each half is chained recursively, and the two
//! lists of partial paths are merged. Endpoints match only when their
//! coordinates are exactly equal; the intersection routine produces
//! identical bits for the two triangles sharing an edge.

use crate::path::{Contour, Segment};

/// Chain segments into maximal connected paths.
///
/// Closed paths come back with their first point repeated at the end. Open
/// paths are where the plane leaves through a hole in the mesh.
pub fn reconstruct(segments: &[Segment]) -> Vec<Contour> {
    match segments {
        [] => Vec::new(),
        [segment] => vec![Contour::from_segment(segment)],
        _ => {
            let (left, right) = segments.split_at(segments.len() / 2);
            merge(reconstruct(left), reconstruct(right))
        }
    }
}

/// Merge two lists of partial paths.
///
/// Paths are taken in order, left list first. Each one absorbs any remaining
/// path sharing an endpoint with it until it closes or nothing matches. A
/// path is absorbed at most once.
fn merge(left: Vec<Contour>, right: Vec<Contour>) -> Vec<Contour> {
    let mut pool: Vec<Option<Contour>> = left.into_iter().chain(right).map(Some).collect();
    let mut merged = Vec::with_capacity(pool.len());

    for i in 0..pool.len() {
        let Some(mut path) = pool[i].take() else {
            continue;
        };
        'extend: while !path.is_closed() {
            for slot in pool[i + 1..].iter_mut() {
                if let Some(other) = slot {
                    if try_join(&mut path, other) {
                        *slot = None;
                        continue 'extend;
                    }
                }
            }
            break;
        }
        merged.push(path);
    }

    merged
}

/// Join `other` onto `path` if they share an endpoint.
///
/// Pairings are tried in a fixed order: end to start, end to end, start to
/// start, start to end. The shared point is kept once.
fn try_join(path: &mut Contour, other: &Contour) -> bool {
    let (Some(&start), Some(&end)) = (path.start(), path.end()) else {
        return false;
    };
    let (Some(&o_start), Some(&o_end)) = (other.start(), other.end()) else {
        return false;
    };

    if end == o_start {
        path.points.extend_from_slice(&other.points[1..]);
    } else if end == o_end {
        path.points.extend(other.points.iter().rev().skip(1));
    } else if start == o_start {
        let mut joined = other.clone();
        joined.reverse();
        joined.points.extend_from_slice(&path.points[1..]);
        *path = joined;
    } else if start == o_end {
        let mut points = other.points.clone();
        points.extend_from_slice(&path.points[1..]);
        path.points = points;
    } else {
        return false;
    }
    true
}
