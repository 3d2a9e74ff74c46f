//! Mesh slicing - bin triangle/plane intersections into slice levels.

use lamina_mesh::Triangle;
use rayon::prelude::*;

use crate::error::{Result, SlicerError};
use crate::geometry::intersect;
use crate::path::Segment;

/// Evenly spaced slice heights strictly inside `[min, max]`.
///
/// The span is divided into `count + 1` steps and every level sits half a
/// step above a step boundary, so no level coincides with the extremes of
/// the mesh.
pub fn level_heights(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 || max <= min {
        return Vec::new();
    }
    let spacing = (max - min) / (count + 1) as f64;
    let start = min + spacing / 2.0;
    (0..count).map(|i| start + i as f64 * spacing).collect()
}

/// Check that levels are finite and strictly increasing.
pub fn validate_levels(levels: &[f64]) -> Result<()> {
    if let Some(i) = levels.iter().position(|l| !l.is_finite()) {
        return Err(SlicerError::InvalidLevels(format!(
            "level {} is not finite ({})",
            i, levels[i]
        )));
    }
    if let Some(i) = levels.windows(2).position(|w| w[0] >= w[1]) {
        return Err(SlicerError::InvalidLevels(format!(
            "levels must be strictly increasing, but level {} ({}) >= level {} ({})",
            i,
            levels[i],
            i + 1,
            levels[i + 1]
        )));
    }
    Ok(())
}

/// Levels crossed by a triangle, as a range of indices into `levels`.
///
/// Half-open on the triangle's height span: `[min, max)`.
pub fn level_range(triangle: &Triangle, levels: &[f64]) -> std::ops::Range<usize> {
    let (min_z, max_z) = triangle.height_range();
    let start = levels.partition_point(|&l| l < min_z);
    let end = levels.partition_point(|&l| l < max_z);
    start..end
}

/// Intersect every triangle with the levels it spans.
///
/// Returns one segment list per level, in level order. Within a level,
/// segments appear in triangle order.
pub fn slice_triangles(triangles: &[Triangle], levels: &[f64]) -> Result<Vec<Vec<Segment>>> {
    validate_levels(levels)?;
    if levels.is_empty() {
        return Ok(Vec::new());
    }

    let empty = || vec![Vec::<Segment>::new(); levels.len()];

    // Per-chunk buckets, concatenated in order.
    let buckets = triangles
        .par_iter()
        .fold(empty, |mut buckets, tri| {
            bin_triangle(tri, levels, &mut buckets);
            buckets
        })
        .reduce(empty, |mut left, right| {
            for (dst, src) in left.iter_mut().zip(right) {
                dst.extend(src);
            }
            left
        });

    Ok(buckets)
}

fn bin_triangle(tri: &Triangle, levels: &[f64], buckets: &mut [Vec<Segment>]) {
    let [p1, p2, p3] = &tri.vertices;
    for level in level_range(tri, levels) {
        if let Some(segment) = intersect(p1, p2, p3, levels[level]) {
            buckets[level].push(segment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lamina_math::Point3;

    fn tri(z1: f64, z2: f64, z3: f64) -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, z1),
            Point3::new(1.0, 0.0, z2),
            Point3::new(0.0, 1.0, z3),
        )
    }

    #[test]
    fn test_level_heights() {
        let levels = level_heights(0.0, 10.0, 4);
        assert_eq!(levels.len(), 4);
        let expected = [1.0, 3.0, 5.0, 7.0];
        for (l, e) in levels.iter().zip(expected) {
            assert_relative_eq!(*l, e, epsilon = 1e-12);
        }
        assert!(levels.iter().all(|&l| l > 0.0 && l < 10.0));
    }

    #[test]
    fn test_level_heights_degenerate() {
        assert!(level_heights(0.0, 10.0, 0).is_empty());
        assert!(level_heights(5.0, 5.0, 3).is_empty());
    }

    #[test]
    fn test_validate_levels() {
        assert!(validate_levels(&[]).is_ok());
        assert!(validate_levels(&[1.0, 2.0, 3.0]).is_ok());
        assert!(matches!(
            validate_levels(&[1.0, 3.0, 2.0]),
            Err(SlicerError::InvalidLevels(_))
        ));
        assert!(validate_levels(&[1.0, 1.0]).is_err());
        assert!(validate_levels(&[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_level_range_half_open() {
        let t = tri(2.0, 5.0, 3.5);
        let levels = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        // Levels 2, 3, 4 are tested; 5 is excluded.
        assert_eq!(level_range(&t, &levels), 1..4);
    }

    #[test]
    fn test_segments_only_strictly_inside() {
        let t = tri(2.0, 5.0, 3.5);
        let levels = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let slices = slice_triangles(&[t], &levels).unwrap();
        let hit: Vec<f64> = slices
            .iter()
            .zip(levels)
            .filter(|(segments, _)| !segments.is_empty())
            .map(|(_, level)| level)
            .collect();
        // Level 2 is tested but the vertex on the plane counts as above.
        assert_eq!(hit, vec![3.0, 4.0]);
        assert!(slices.iter().all(|s| s.len() <= 1));
    }

    #[test]
    fn test_rejects_unsorted_levels() {
        let result = slice_triangles(&[tri(0.0, 1.0, 2.0)], &[1.5, 0.5]);
        assert!(matches!(result, Err(SlicerError::InvalidLevels(_))));
    }

    #[test]
    fn test_no_levels() {
        let slices = slice_triangles(&[tri(0.0, 1.0, 2.0)], &[]).unwrap();
        assert!(slices.is_empty());
    }

    #[test]
    fn test_order_matches_sequential() {
        let triangles: Vec<Triangle> = (0..500)
            .map(|i| {
                let s = i as f64 * 0.01;
                Triangle::new(
                    Point3::new(s, 0.0, -1.0 - s),
                    Point3::new(s, 1.0, 1.0 + s),
                    Point3::new(s + 1.0, 0.5, 0.5),
                )
            })
            .collect();
        let levels = level_heights(-6.0, 6.0, 7);
        let parallel = slice_triangles(&triangles, &levels).unwrap();

        let mut sequential = vec![Vec::<Segment>::new(); levels.len()];
        for t in &triangles {
            bin_triangle(t, &levels, &mut sequential);
        }
        assert_eq!(parallel, sequential);
    }
}
