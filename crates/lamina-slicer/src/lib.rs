#![warn(missing_docs)]

//! Parallel-plane slicing of triangle meshes.
//!
//! This crate cuts a triangle soup with evenly spaced planes, chains the
//! crossings at every plane into contours and optionally thins the contours
//! by dropping near-straight points.
//!
//! # Example
//!
//! ```ignore
//! use lamina_math::SliceAxis;
//! use lamina_slicer::{slice, SliceSettings};
//!
//! let mesh = lamina_mesh::read_stl("part.stl", SliceAxis::Z)?;
//! let settings = SliceSettings {
//!     slice_count: 20,
//!     simplify_angle: Some(170.0),
//! };
//! let result = slice(&mesh, &settings)?;
//!
//! for layer in &result.layers {
//!     println!("z={:.3}: {} segments", layer.height, layer.segments.len());
//! }
//! ```

pub mod contour;
pub mod error;
pub mod geometry;
pub mod path;
pub mod simplify;
pub mod slice;

pub use contour::reconstruct;
pub use error::{Result, SlicerError};
pub use geometry::{cos_angle, intersect};
pub use path::{Contour, Segment};
pub use simplify::{reduction_ratio, simplify, simplify_contour};
pub use slice::{level_heights, level_range, slice_triangles, validate_levels};

use lamina_math::Rect;
use lamina_mesh::TriangleMesh;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Slicing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceSettings {
    /// Number of evenly spaced cutting planes.
    pub slice_count: usize,
    /// Simplification threshold in degrees. `None` skips simplification.
    pub simplify_angle: Option<f64>,
}

impl Default for SliceSettings {
    fn default() -> Self {
        Self {
            slice_count: 10,
            simplify_angle: None,
        }
    }
}

impl SliceSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.slice_count == 0 {
            return Err(SlicerError::InvalidSettings(
                "slice_count must be at least 1".into(),
            ));
        }
        if let Some(angle) = self.simplify_angle {
            if !angle.is_finite() || angle <= 0.0 || angle > 180.0 {
                return Err(SlicerError::InvalidSettings(format!(
                    "simplify_angle must be in (0, 180] degrees, got {}",
                    angle
                )));
            }
        }
        Ok(())
    }
}

/// Counts gathered while building one layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerStats {
    /// Segments produced by the plane intersection.
    pub input_segments: usize,
    /// Segments handed to the serializer.
    pub output_segments: usize,
    /// Contours after chaining.
    pub contours: usize,
    /// Contours that close on themselves.
    pub closed_contours: usize,
}

impl LayerStats {
    /// Fraction of segments removed by simplification.
    pub fn reduction(&self) -> f64 {
        reduction_ratio(self.input_segments, self.output_segments)
    }

    /// Contours where the plane leaves the mesh through a boundary.
    pub fn open_contours(&self) -> usize {
        self.contours - self.closed_contours
    }
}

/// A single cross-section.
#[derive(Debug, Clone)]
pub struct SliceLayer {
    /// Layer index (0 = lowest).
    pub index: usize,
    /// Height of the cutting plane along the slicing axis.
    pub height: f64,
    /// Chained crossings.
    pub contours: Vec<Contour>,
    /// Segments to render: the raw crossings, or the simplified contours
    /// when a threshold is set.
    pub segments: Vec<Segment>,
    /// Layer counts.
    pub stats: LayerStats,
}

/// Statistics about a slicing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceStats {
    /// Number of layers.
    pub layer_count: usize,
    /// Triangles in the input mesh.
    pub triangle_count: usize,
    /// Intersection segments across all layers.
    pub input_segments: usize,
    /// Rendered segments across all layers.
    pub output_segments: usize,
    /// Bounding box min corner, in the slicing frame.
    pub bounds_min: [f64; 3],
    /// Bounding box max corner, in the slicing frame.
    pub bounds_max: [f64; 3],
}

/// Result of a slicing run.
#[derive(Debug, Clone)]
pub struct SliceResult {
    /// Layers from bottom to top.
    pub layers: Vec<SliceLayer>,
    /// Extent of the mesh in the slice plane, shared by every layer.
    pub viewport: Rect,
    /// Run statistics.
    pub stats: SliceStats,
}

/// Slice a mesh with the given settings.
///
/// This is the main entry point. It:
/// 1. Computes evenly spaced levels from the mesh extent
/// 2. Intersects every triangle with the levels it spans
/// 3. Chains each level's segments into contours
/// 4. Simplifies the contours if a threshold is set
pub fn slice(mesh: &TriangleMesh, settings: &SliceSettings) -> Result<SliceResult> {
    settings.validate()?;

    let bounds = mesh.bounds().ok_or(SlicerError::EmptyMesh)?;
    let (z_min, z_max) = bounds.height_span();
    let levels = level_heights(z_min, z_max, settings.slice_count);
    info!(
        triangles = mesh.num_triangles(),
        levels = levels.len(),
        z_min,
        z_max,
        "Slicing mesh"
    );

    let layers = slice_at_levels(mesh, &levels, settings.simplify_angle)?;

    let stats = SliceStats {
        layer_count: layers.len(),
        triangle_count: mesh.num_triangles(),
        input_segments: layers.iter().map(|l| l.stats.input_segments).sum(),
        output_segments: layers.iter().map(|l| l.stats.output_segments).sum(),
        bounds_min: [bounds.min.x, bounds.min.y, bounds.min.z],
        bounds_max: [bounds.max.x, bounds.max.y, bounds.max.z],
    };

    Ok(SliceResult {
        layers,
        viewport: bounds.viewport(),
        stats,
    })
}

/// Slice a mesh at explicit, strictly increasing levels.
pub fn slice_at_levels(
    mesh: &TriangleMesh,
    levels: &[f64],
    simplify_angle: Option<f64>,
) -> Result<Vec<SliceLayer>> {
    if mesh.is_empty() {
        return Err(SlicerError::EmptyMesh);
    }

    let per_level = slice_triangles(&mesh.triangles, levels)?;

    let layers = per_level
        .into_par_iter()
        .zip(levels)
        .enumerate()
        .map(|(index, (segments, &height))| build_layer(index, height, segments, simplify_angle))
        .collect();

    Ok(layers)
}

fn build_layer(
    index: usize,
    height: f64,
    segments: Vec<Segment>,
    simplify_angle: Option<f64>,
) -> SliceLayer {
    let contours = reconstruct(&segments);
    let closed_contours = contours.iter().filter(|c| c.is_closed()).count();
    let input_segments = segments.len();

    let segments = match simplify_angle {
        Some(angle) => simplify(&contours, angle),
        None => segments,
    };

    let stats = LayerStats {
        input_segments,
        output_segments: segments.len(),
        contours: contours.len(),
        closed_contours,
    };

    debug!(
        layer = index,
        height,
        segments = stats.input_segments,
        contours = stats.contours,
        open = stats.open_contours(),
        "Layer sliced"
    );
    if simplify_angle.is_some() {
        info!(
            layer = index,
            "Segment count reduced by {}%",
            (100.0 * stats.reduction()) as i64
        );
    }

    SliceLayer {
        index,
        height,
        contours,
        segments,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamina_math::Point3;
    use lamina_mesh::Triangle;

    fn make_cube_mesh(size: f64) -> TriangleMesh {
        let p = |x: f64, y: f64, z: f64| Point3::new(x * size, y * size, z * size);
        let v = [
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(0.0, 1.0, 1.0),
        ];
        let faces: [[usize; 3]; 12] = [
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [2, 3, 7],
            [2, 7, 6],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        TriangleMesh::from_triangles(
            faces
                .iter()
                .map(|f| Triangle::new(v[f[0]], v[f[1]], v[f[2]]))
                .collect(),
        )
    }

    #[test]
    fn test_slice_cube() {
        let mesh = make_cube_mesh(10.0);
        let result = slice(&mesh, &SliceSettings::default()).unwrap();

        assert_eq!(result.layers.len(), 10);
        assert_eq!(result.stats.layer_count, 10);
        assert_eq!(result.stats.triangle_count, 12);
        for (i, layer) in result.layers.iter().enumerate() {
            assert_eq!(layer.index, i);
            assert!(layer.height > 0.0 && layer.height < 10.0);
            // Two triangles per side face cross every level.
            assert_eq!(layer.segments.len(), 8);
            assert_eq!(layer.contours.len(), 1);
            assert!(layer.contours[0].is_closed());
            assert_eq!(layer.stats.open_contours(), 0);
        }
        assert_eq!(result.viewport.width, 10.0);
        assert_eq!(result.viewport.height, 10.0);
    }

    #[test]
    fn test_slice_cube_simplified() {
        let mesh = make_cube_mesh(10.0);
        let settings = SliceSettings {
            slice_count: 3,
            simplify_angle: Some(170.0),
        };
        let result = slice(&mesh, &settings).unwrap();
        for layer in &result.layers {
            // Diagonal crossings collapse wherever the loop starts.
            assert_eq!(layer.segments.len(), 4);
            assert!(layer.stats.reduction() > 0.0);
        }
        assert!(result.stats.output_segments < result.stats.input_segments);
    }

    #[test]
    fn test_empty_mesh() {
        let result = slice(&TriangleMesh::new(), &SliceSettings::default());
        assert!(matches!(result, Err(SlicerError::EmptyMesh)));
    }

    #[test]
    fn test_invalid_settings() {
        let zero = SliceSettings {
            slice_count: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        for angle in [0.0, -10.0, 181.0, f64::NAN] {
            let settings = SliceSettings {
                simplify_angle: Some(angle),
                ..Default::default()
            };
            assert!(settings.validate().is_err(), "angle {}", angle);
        }

        let ok = SliceSettings {
            simplify_angle: Some(180.0),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_slice_at_levels_rejects_unsorted() {
        let mesh = make_cube_mesh(1.0);
        let result = slice_at_levels(&mesh, &[0.7, 0.3], None);
        assert!(matches!(result, Err(SlicerError::InvalidLevels(_))));
    }
}
