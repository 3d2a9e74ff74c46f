//! Segment and contour types.

use lamina_math::Point3;

/// Where one triangle crosses one slice level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First crossing point.
    pub start: Point3,
    /// Second crossing point.
    pub end: Point3,
}

impl Segment {
    /// Create a segment.
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }
}

/// A polyline built by chaining segments end to end.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// Points along the path.
    pub points: Vec<Point3>,
}

impl Contour {
    /// Create a contour from points.
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Two-point contour covering a single segment.
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            points: vec![segment.start, segment.end],
        }
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Starting point.
    pub fn start(&self) -> Option<&Point3> {
        self.points.first()
    }

    /// Ending point.
    pub fn end(&self) -> Option<&Point3> {
        self.points.last()
    }

    /// Does the path come back to its first point?
    ///
    /// Needs at least three points, so a lone zero-length segment stays open.
    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }

    /// Reverse the direction of travel.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Consecutive point pairs as segments.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(|w| Segment::new(w[0], w[1]))
    }

    /// Number of segments the contour is made of.
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn test_closed() {
        let square = Contour::new(vec![
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(1.0, 1.0),
            p(0.0, 1.0),
            p(0.0, 0.0),
        ]);
        assert!(square.is_closed());
        assert_eq!(square.segment_count(), 4);

        let open = Contour::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)]);
        assert!(!open.is_closed());
    }

    #[test]
    fn test_degenerate_segment_is_open() {
        let seg = Segment::new(p(1.0, 1.0), p(1.0, 1.0));
        assert!(!Contour::from_segment(&seg).is_closed());
    }

    #[test]
    fn test_segments() {
        let c = Contour::new(vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 3.0)]);
        let segs: Vec<Segment> = c.segments().collect();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1], Segment::new(p(2.0, 0.0), p(2.0, 3.0)));
    }
}
