#![warn(missing_docs)]

//! Triangle soup for the lamina slicer.
//!
//! Each triangle owns its three points; there is no shared vertex table.
//! The slicing engine only needs the triangles and the bounding box, so
//! that is all this crate models. Binary STL loading lives in [`stl`].

pub mod error;
pub mod stl;

pub use error::{MeshError, Result};
pub use stl::{read_stl, read_stl_from_buffer, stl_bytes, write_stl};

use lamina_math::{Point2, Point3, Rect};

/// A triangle with its own three vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertices in file order.
    pub vertices: [Point3; 3],
}

impl Triangle {
    /// Create a triangle from three points.
    pub fn new(p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self {
            vertices: [p1, p2, p3],
        }
    }

    /// Lowest and highest vertex along the slicing axis (model Z).
    pub fn height_range(&self) -> (f64, f64) {
        let [a, b, c] = &self.vertices;
        (a.z.min(b.z).min(c.z), a.z.max(b.z).max(c.z))
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Bounds {
    /// Extent along the slicing axis.
    pub fn height_span(&self) -> (f64, f64) {
        (self.min.z, self.max.z)
    }

    /// Projection onto the slice plane, used as the layer viewport.
    pub fn viewport(&self) -> Rect {
        Rect::from_corners(
            Point2::new(self.min.x, self.min.y),
            Point2::new(self.max.x, self.max.y),
        )
    }
}

/// An ordered list of independent triangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// The triangles. Order does not matter to the slicer.
    pub triangles: Vec<Triangle>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from triangles.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Is the mesh empty?
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Compute the bounding box, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = *points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        });
        Some(Bounds { min, max })
    }
}
