//! Grid snapping for component positions.

use kurbo::Point;

/// Grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate moved.
    pub snapped_x: bool,
    /// Whether the Y coordinate moved.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Check if either coordinate moved.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Round `value` to the nearest multiple of `grid_size`, halves rounding up.
///
/// A non-positive or non-finite grid size leaves the value untouched.
pub fn snap(value: f64, grid_size: f64) -> f64 {
    if !(grid_size.is_finite() && grid_size > 0.0) {
        return value;
    }
    let snapped = (value / grid_size + 0.5).floor() * grid_size;
    // Normalize -0.0 so grid-aligned values compare cleanly.
    if snapped == 0.0 { 0.0 } else { snapped }
}

/// Snap a point to the nearest grid intersection, each axis independently.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    let snapped = Point::new(snap(point.x, grid_size), snap(point.y, grid_size));
    SnapResult {
        point: snapped,
        snapped_x: snapped.x != point.x,
        snapped_y: snapped.y != point.y,
    }
}

/// Check whether a point already sits on a grid intersection.
pub fn is_aligned(point: Point, grid_size: f64) -> bool {
    snap(point.x, grid_size) == point.x && snap(point.y, grid_size) == point.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        let result = snap_to_grid(Point::new(23.0, 47.0), 20.0);
        assert_eq!(result.point, Point::new(20.0, 40.0));
        assert!(result.snapped_x);
        assert!(result.snapped_y);
    }

    #[test]
    fn test_snap_to_grid_exact() {
        let result = snap_to_grid(Point::new(40.0, 60.0), 20.0);
        assert_eq!(result.point, Point::new(40.0, 60.0));
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_snap_to_grid_round_up() {
        let result = snap_to_grid(Point::new(31.0, 51.0), 20.0);
        assert_eq!(result.point, Point::new(40.0, 60.0));
    }

    #[test]
    fn test_half_rounds_up() {
        assert_eq!(snap(10.0, 20.0), 20.0);
        assert_eq!(snap(30.0, 20.0), 40.0);
        assert_eq!(snap(-10.0, 20.0), 0.0);
        assert_eq!(snap(-30.0, 20.0), -20.0);
    }

    #[test]
    fn test_drop_point_example() {
        let result = snap_to_grid(Point::new(114.0, 68.0), GRID_SIZE);
        assert_eq!(result.point, Point::new(120.0, 60.0));
    }

    #[test]
    fn test_multiple_and_idempotent() {
        let mut v = -517.3;
        while v < 517.3 {
            let once = snap(v, GRID_SIZE);
            assert_eq!(once % GRID_SIZE, 0.0, "snap({v}) = {once}");
            assert_eq!(snap(once, GRID_SIZE), once);
            v += 3.7;
        }
    }

    #[test]
    fn test_degenerate_grid_is_identity() {
        assert_eq!(snap(13.0, 0.0), 13.0);
        assert_eq!(snap(13.0, -5.0), 13.0);
        assert_eq!(snap(13.0, f64::NAN), 13.0);
    }

    #[test]
    fn test_is_aligned() {
        assert!(is_aligned(Point::new(120.0, 60.0), 20.0));
        assert!(!is_aligned(Point::new(103.0, 57.0), 20.0));
    }
}
