//! Intersection and angle math used by the slicer.

use lamina_math::Point3;

use crate::path::Segment;

/// Intersect the triangle `(p1, p2, p3)` with the plane at height `z`.
///
/// Vertices are classified by `height - z < 0`, so a vertex lying exactly on
/// the plane counts with the vertices above it. Returns `None` when all three
/// vertices fall on the same side. Otherwise the two crossing points are
/// interpolated on the two edges that change side; the order of the points
/// follows the edges, not any winding.
///
/// Degenerate inputs never fail. They may produce a zero-length segment.
pub fn intersect(p1: &Point3, p2: &Point3, p3: &Point3, z: f64) -> Option<Segment> {
    let (d1, d2, d3) = (p1.z - z, p2.z - z, p3.z - z);
    let (s1, s2, s3) = (d1 < 0.0, d2 < 0.0, d3 < 0.0);

    if s1 != s2 {
        let first = edge_crossing(p1, d1, p2, d2);
        let second = if s1 != s3 {
            edge_crossing(p3, d3, p1, d1)
        } else {
            edge_crossing(p3, d3, p2, d2)
        };
        Some(Segment::new(first, second))
    } else if s3 != s1 {
        Some(Segment::new(
            edge_crossing(p1, d1, p3, d3),
            edge_crossing(p3, d3, p2, d2),
        ))
    } else {
        None
    }
}

/// Point where the edge `a -> b` crosses the plane, given the signed
/// distances of its ends.
///
/// `(db * a - da * b) / (db - da)` on every coordinate. Swapping the ends
/// negates numerator and denominator exactly, so both triangles sharing an
/// edge get the same bits.
fn edge_crossing(a: &Point3, da: f64, b: &Point3, db: f64) -> Point3 {
    let denom = db - da;
    let lerp = |ca: f64, cb: f64| (db * ca - da * cb) / denom;
    Point3::new(lerp(a.x, b.x), lerp(a.y, b.y), lerp(a.z, b.z))
}

/// Cosine of the angle at `p1` in the path `p0 -> p1 -> p2`, in the XY plane.
///
/// A straight continuation gives `-1`, a right angle `0`, a full reversal
/// `1`. Returns `0` if a point is missing or if both legs have zero length.
pub fn cos_angle(p0: Option<&Point3>, p1: Option<&Point3>, p2: Option<&Point3>) -> f64 {
    let (Some(p0), Some(p1), Some(p2)) = (p0, p1, p2) else {
        return 0.0;
    };

    let a2 = (p1.xy() - p2.xy()).norm_squared();
    let b2 = (p1.xy() - p0.xy()).norm_squared();
    let c2 = (p0.xy() - p2.xy()).norm_squared();

    let num = a2 + b2 - c2;
    let det = 2.0 * (a2 * b2).sqrt();
    if det == 0.0 {
        return 0.0;
    }

    (num / det).clamp(-1.0, 1.0)
}
