//! Geometry primitives and contact-point math.
//!
//! All coordinates are f64 CSS pixels. `Point` is used for both client-space
//! positions (as delivered by the gesture dispatcher) and positions relative
//! to the viewer's container.

/// A 2D point in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width/height pair in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are non-zero (a loaded, laid-out element).
    #[must_use]
    pub fn is_laid_out(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Bounding rectangle of the viewer's container, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Convert a client-space point into container-local coordinates.
    #[must_use]
    pub fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.left, client.y - self.top)
    }
}

/// Straight-line distance between two contact points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Midpoint between two contact points.
#[must_use]
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn distance_is_hypotenuse() {
        let d = distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!(approx_eq(d, 5.0));
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(13.7, -42.3);
        let b = Point::new(-8.1, 99.9);
        assert!(approx_eq(distance(a, b), distance(b, a)));
    }

    #[test]
    fn distance_of_coincident_points_is_zero() {
        let p = Point::new(5.0, 5.0);
        assert!(approx_eq(distance(p, p), 0.0));
    }

    #[test]
    fn midpoint_halves_both_axes() {
        let m = midpoint(Point::new(100.0, 100.0), Point::new(200.0, 300.0));
        assert!(approx_eq(m.x, 150.0));
        assert!(approx_eq(m.y, 200.0));
    }

    #[test]
    fn rect_to_local_subtracts_origin() {
        let rect = Rect::new(20.0, 30.0, 500.0, 400.0);
        let local = rect.to_local(Point::new(120.0, 130.0));
        assert!(approx_eq(local.x, 100.0));
        assert!(approx_eq(local.y, 100.0));
    }

    #[test]
    fn size_laid_out_requires_both_dimensions() {
        assert!(Size::new(10.0, 10.0).is_laid_out());
        assert!(!Size::new(0.0, 10.0).is_laid_out());
        assert!(!Size::new(10.0, 0.0).is_laid_out());
        assert!(!Size::default().is_laid_out());
    }
}
