//! Angle-threshold simplification of contours.

use lamina_math::Point3;

use crate::geometry::cos_angle;
use crate::path::{Contour, Segment};

/// Drop points whose angle is wider than `max_angle_deg`.
///
/// The angle at a point is measured between its two legs, so a straight
/// continuation is 180° and a right-angle corner is 90°. Walking each
/// contour, a candidate is dropped when the angle it forms with the last
/// kept point and the next point exceeds the threshold. An open contour
/// keeps its first and last points. On a closed contour the seam point is
/// tested against its two neighbors like any other, and the loop is closed
/// again on the next kept point when it goes.
///
/// Walks repeat until nothing more is dropped, so the result is a fixed
/// point: simplifying it again changes nothing.
pub fn simplify_contour(contour: &Contour, max_angle_deg: f64) -> Contour {
    let cos_max = max_angle_deg.to_radians().cos();
    let closed = contour.is_closed();
    let mut points = contour.points.clone();

    loop {
        let before = points.len();
        points = drop_wide_angles(&points, cos_max);
        if closed {
            drop_seam(&mut points, cos_max);
        }
        if points.len() == before {
            break;
        }
    }

    Contour::new(points)
}

/// One walk over the interior points.
fn drop_wide_angles(points: &[Point3], cos_max: f64) -> Vec<Point3> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut remove = vec![false; points.len()];
    let (mut i0, mut i1) = (0, 1);
    for i2 in 2..points.len() {
        if cos_angle(points.get(i0), points.get(i1), points.get(i2)) < cos_max {
            remove[i1] = true;
        } else {
            i0 = i1;
        }
        i1 = i2;
    }

    points
        .iter()
        .zip(&remove)
        .filter(|(_, removed)| !**removed)
        .map(|(p, _)| *p)
        .collect()
}

/// Drop the seam of a closed loop if it is too straight.
///
/// Loops of three distinct points are left alone.
fn drop_seam(points: &mut Vec<Point3>, cos_max: f64) {
    let n = points.len();
    if n < 5 {
        return;
    }
    if cos_angle(points.get(n - 2), points.first(), points.get(1)) < cos_max {
        points.pop();
        points.remove(0);
        let first = points[0];
        points.push(first);
    }
}

/// Simplify every contour of a level and flatten them into segments.
pub fn simplify(contours: &[Contour], max_angle_deg: f64) -> Vec<Segment> {
    contours
        .iter()
        .flat_map(|c| {
            let simplified = simplify_contour(c, max_angle_deg);
            simplified.segments().collect::<Vec<_>>()
        })
        .collect()
}

/// Fraction of segments removed, `1 - output / input`.
///
/// Zero when there was no input.
pub fn reduction_ratio(input: usize, output: usize) -> f64 {
    if input == 0 {
        return 0.0;
    }
    1.0 - output as f64 / input as f64
}
