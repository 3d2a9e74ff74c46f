#![warn(missing_docs)]

//! Math types for the lamina slicer.
//!
//! Thin wrappers around nalgebra providing the domain types shared by the
//! mesh reader, the slicing engine and the serializers: points, the slicing
//! axis and the 2D viewport rectangle.

use serde::{Deserialize, Serialize};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A point in the 2D plane of a slice.
pub type Point2 = nalgebra::Point2<f64>;

/// Direction along which the model is cut.
///
/// Slicing always happens along the model's third coordinate. Choosing an
/// axis other than Z rotates the coordinates cyclically when the mesh is
/// read, which keeps the frame right-handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceAxis {
    /// Cut along Z (file coordinates unchanged).
    #[default]
    Z,
    /// Cut along Y.
    Y,
    /// Cut along X.
    X,
}

impl SliceAxis {
    /// Numeric selector used on the command line (Z: 0, Y: 1, X: 2).
    pub fn index(self) -> usize {
        match self {
            SliceAxis::Z => 0,
            SliceAxis::Y => 1,
            SliceAxis::X => 2,
        }
    }

    /// Axis for a numeric selector, if it is one of 0, 1 or 2.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(SliceAxis::Z),
            1 => Some(SliceAxis::Y),
            2 => Some(SliceAxis::X),
            _ => None,
        }
    }

    /// Move file coordinates into the slicing frame.
    ///
    /// File component `i` lands in model component `(i + index) % 3`, so the
    /// selected axis ends up as the model's Z.
    pub fn reorient(self, p: [f32; 3]) -> Point3 {
        let k = self.index();
        let mut out = [0.0f64; 3];
        for (i, c) in p.iter().enumerate() {
            out[(i + k) % 3] = f64::from(*c);
        }
        Point3::new(out[0], out[1], out[2])
    }

    /// Inverse of [`SliceAxis::reorient`], back to file coordinates.
    pub fn restore(self, p: &Point3) -> [f32; 3] {
        let k = self.index();
        let mut out = [0.0f32; 3];
        for (i, c) in out.iter_mut().enumerate() {
            *c = p[(i + k) % 3] as f32;
        }
        out
    }
}

/// Axis-aligned rectangle in the slice plane.
///
/// Used as the viewport of a rendered layer: origin at the minimum corner,
/// extent given as width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum X.
    pub x: f64,
    /// Minimum Y.
    pub y: f64,
    /// Extent along X.
    pub width: f64,
    /// Extent along Y.
    pub height: f64,
}

impl Rect {
    /// Rectangle spanning two corners.
    pub fn from_corners(min: Point2, max: Point2) -> Self {
        Self {
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reorient_z_is_identity() {
        let p = SliceAxis::Z.reorient([1.0, 2.0, 3.0]);
        assert_eq!(p, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_reorient_y_slices_along_file_y() {
        // file (x, y, z) -> model (z, x, y): file Y becomes the slicing coordinate
        let p = SliceAxis::Y.reorient([1.0, 2.0, 3.0]);
        assert_eq!(p, Point3::new(3.0, 1.0, 2.0));
        assert_relative_eq!(p.z, 2.0);
    }

    #[test]
    fn test_reorient_x_slices_along_file_x() {
        let p = SliceAxis::X.reorient([1.0, 2.0, 3.0]);
        assert_eq!(p, Point3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn test_reorient_preserves_handedness() {
        // Cyclic permutations keep the orientation of the basis.
        for axis in [SliceAxis::Z, SliceAxis::Y, SliceAxis::X] {
            let ex = axis.reorient([1.0, 0.0, 0.0]).coords;
            let ey = axis.reorient([0.0, 1.0, 0.0]).coords;
            let ez = axis.reorient([0.0, 0.0, 1.0]).coords;
            assert_relative_eq!(ex.cross(&ey).dot(&ez), 1.0);
        }
    }

    #[test]
    fn test_restore_inverts_reorient() {
        for axis in [SliceAxis::Z, SliceAxis::Y, SliceAxis::X] {
            let p = axis.reorient([4.0, -5.0, 6.5]);
            assert_eq!(axis.restore(&p), [4.0, -5.0, 6.5]);
        }
    }

    #[test]
    fn test_axis_index() {
        assert_eq!(SliceAxis::from_index(1), Some(SliceAxis::Y));
        assert_eq!(SliceAxis::from_index(3), None);
        assert_eq!(SliceAxis::X.index(), 2);
        assert_eq!(SliceAxis::default(), SliceAxis::Z);
    }

    #[test]
    fn test_rect() {
        let r = Rect::from_corners(Point2::new(-1.0, 2.0), Point2::new(3.0, 5.0));
        assert_relative_eq!(r.width, 4.0);
        assert_relative_eq!(r.height, 3.0);
        assert_eq!((r.x, r.y), (-1.0, 2.0));
    }
}
