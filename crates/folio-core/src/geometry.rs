//! Rectangle and point helpers shared by snapping and navigation.

use kurbo::{Point, Rect};

/// Edge coordinates of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edges {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl Edges {
    /// `(start, end, center)` on the given axis.
    pub fn along(&self, axis: Axis) -> (f64, f64, f64) {
        match axis {
            Axis::X => (self.left, self.right, self.center_x),
            Axis::Y => (self.top, self.bottom, self.center_y),
        }
    }
}

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The other axis.
    pub fn cross(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Edge coordinates of a rectangle.
pub fn edges_of(rect: Rect) -> Edges {
    let rect = rect.abs();
    Edges {
        left: rect.x0,
        right: rect.x1,
        top: rect.y0,
        bottom: rect.y1,
        center_x: (rect.x0 + rect.x1) / 2.0,
        center_y: (rect.y0 + rect.y1) / 2.0,
    }
}

/// Whether two rectangles overlap once both are grown by `buffer`.
///
/// Touching edges do not count as overlap.
pub fn rects_overlap(a: Rect, b: Rect, buffer: f64) -> bool {
    a.x0 < b.x1 + buffer && a.x1 + buffer > b.x0 && a.y0 < b.y1 + buffer && a.y1 + buffer > b.y0
}

/// Gap between two rectangles; zero when they touch or overlap.
pub fn gap_between(a: Rect, b: Rect) -> f64 {
    let dx = (b.x0 - a.x1).max(a.x0 - b.x1).max(0.0);
    let dy = (b.y0 - a.y1).max(a.y0 - b.y1).max(0.0);
    (dx * dx + dy * dy).sqrt()
}

/// A rectangle with no usable area or a non-finite coordinate.
pub fn is_degenerate(rect: Rect) -> bool {
    let finite = rect.x0.is_finite() && rect.x1.is_finite() && rect.y0.is_finite() && rect.y1.is_finite();
    !finite || rect.width() <= 0.0 || rect.height() <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert!((distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edges_of() {
        let edges = edges_of(Rect::new(10.0, 20.0, 110.0, 70.0));
        assert_eq!(edges.left, 10.0);
        assert_eq!(edges.right, 110.0);
        assert_eq!(edges.top, 20.0);
        assert_eq!(edges.bottom, 70.0);
        assert_eq!(edges.center_x, 60.0);
        assert_eq!(edges.center_y, 45.0);
        assert_eq!(edges.along(Axis::Y), (20.0, 70.0, 45.0));
    }

    #[test]
    fn test_rects_overlap_with_buffer() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let touching = Rect::new(100.0, 0.0, 200.0, 100.0);
        let near = Rect::new(105.0, 0.0, 205.0, 100.0);

        assert!(!rects_overlap(a, touching, 0.0));
        assert!(rects_overlap(a, near, 10.0));
        assert!(!rects_overlap(a, near, 5.0));
    }

    #[test]
    fn test_gap_between() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(gap_between(a, Rect::new(130.0, 0.0, 200.0, 100.0)), 30.0);
        assert_eq!(gap_between(a, Rect::new(50.0, 50.0, 150.0, 150.0)), 0.0);
        assert!((gap_between(a, Rect::new(103.0, 104.0, 200.0, 200.0)) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate() {
        assert!(is_degenerate(Rect::new(0.0, 0.0, 0.0, 10.0)));
        assert!(is_degenerate(Rect::new(0.0, 0.0, f64::NAN, 10.0)));
        assert!(!is_degenerate(Rect::new(0.0, 0.0, 1.0, 1.0)));
    }
}
