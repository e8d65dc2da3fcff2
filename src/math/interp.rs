//! Boundary-clamped linear interpolation over a sorted point sequence.
//!
//! Used when two datasets with different x grids are added or subtracted: the
//! right operand is evaluated at every x of the left operand. Outside the
//! sampled range the nearest end value is used (no extrapolated slopes).

use crate::domain::Point;

/// Value of the sorted sequence `points` at `x`.
///
/// - empty sequence: `0`
/// - `x <= first.x`: `first.y`; `x >= last.x`: `last.y`
/// - a point within `eps` of `x`: its `y`, no blending
/// - otherwise: linear interpolation between the bracketing points
pub fn interpolate_clamped(points: &[Point], x: f64, eps: f64) -> f64 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    if x <= first.x {
        return first.y;
    }
    if x >= last.x {
        return last.y;
    }

    // first.x < x < last.x, so 0 < i < len.
    let i = points.partition_point(|p| p.x < x);
    let hi = &points[i];
    if (hi.x - x).abs() <= eps {
        return hi.y;
    }
    let lo = &points[i - 1];
    lo.y + (hi.y - lo.y) * (x - lo.x) / (hi.x - lo.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(xy: &[(f64, f64)]) -> Vec<Point> {
        xy.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn empty_sequence_gives_zero() {
        assert_eq!(interpolate_clamped(&[], 3.0, 1e-12), 0.0);
    }

    #[test]
    fn clamps_at_both_ends() {
        let p = pts(&[(1.0, 10.0), (2.0, 20.0), (4.0, 5.0)]);
        assert_eq!(interpolate_clamped(&p, 1.0, 1e-12), 10.0);
        assert_eq!(interpolate_clamped(&p, -100.0, 1e-12), 10.0);
        assert_eq!(interpolate_clamped(&p, 4.0, 1e-12), 5.0);
        assert_eq!(interpolate_clamped(&p, 1e9, 1e-12), 5.0);
    }

    #[test]
    fn exact_match_returns_that_y() {
        let p = pts(&[(0.0, 0.0), (1.0, 7.25), (2.0, 100.0)]);
        assert_eq!(interpolate_clamped(&p, 1.0, 1e-12), 7.25);
    }

    #[test]
    fn interpolates_between_neighbours() {
        let p = pts(&[(0.0, 0.0), (2.0, 10.0), (4.0, 30.0)]);
        let v = interpolate_clamped(&p, 0.5, 1e-12);
        assert!((v - 2.5).abs() < 1e-12, "expected 2.5, got {v}");
        let v = interpolate_clamped(&p, 3.0, 1e-12);
        assert!((v - 20.0).abs() < 1e-12, "expected 20, got {v}");
    }

    #[test]
    fn single_point_is_constant() {
        let p = pts(&[(1.0, 3.0)]);
        for x in [-1.0, 1.0, 5.0] {
            assert_eq!(interpolate_clamped(&p, x, 1e-12), 3.0);
        }
    }
}
