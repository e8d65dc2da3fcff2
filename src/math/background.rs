//! Iterative Shirley background estimation.
//!
//! The background under a photoelectron peak is modelled as proportional to the
//! integrated signal above it:
//!
//! ```text
//! B(x_i) = y_a + (y_b - y_a) * A(x_i) / A(x_n)
//! A(x_i) = ∫_{x_0}^{x_i} (y - B) dx        (trapezoidal rule)
//! ```
//!
//! where `y_a`/`y_b` are the first/last y-values. Starting from the flat
//! `B = y_a`, the integral and the background are recomputed until the total
//! integral stops changing.

use tracing::{trace, warn};

use crate::domain::Point;

/// Outcome of a background estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundFit {
    /// Number of integral evaluations performed.
    pub iterations: usize,
    /// False if `max_iter` was exhausted before the total integral settled.
    pub converged: bool,
}

/// Replace the y-values of the sorted sequence `points` by its Shirley background.
///
/// Sequences with fewer than two points are left untouched.
pub fn shirley_background(points: &mut [Point], max_iter: usize, max_rdiff: f64) -> BackgroundFit {
    let n = points.len();
    if n < 2 {
        return BackgroundFit {
            iterations: 0,
            converged: true,
        };
    }

    let ya = points[0].y;
    let dy = points[n - 1].y - ya;
    let mut bg = vec![ya; n];
    let mut cumulative = vec![0.0; n];
    let mut old_total = 0.0_f64;
    let mut fit = BackgroundFit {
        iterations: 0,
        converged: false,
    };

    while fit.iterations < max_iter {
        fit.iterations += 1;
        for i in 1..n {
            let above = (points[i].y - bg[i] + points[i - 1].y - bg[i - 1]) / 2.0;
            cumulative[i] = cumulative[i - 1] + above * (points[i].x - points[i - 1].x);
        }
        let total = cumulative[n - 1];

        let rel_diff = if old_total != 0.0 {
            (total - old_total).abs() / old_total.abs()
        } else {
            1.0
        };
        trace!(iteration = fit.iterations, total, rel_diff, "shirley iteration");
        if rel_diff < max_rdiff {
            fit.converged = true;
            break;
        }
        if total == 0.0 {
            // Nothing above the background: keep it as it is.
            if old_total != 0.0 {
                warn!(iteration = fit.iterations, "total integral vanished, keeping previous background");
            }
            fit.converged = true;
            break;
        }

        old_total = total;
        for (b, a) in bg.iter_mut().zip(&cumulative) {
            *b = ya + dy / total * a;
        }
    }

    for (p, b) in points.iter_mut().zip(bg) {
        p.y = b;
    }
    fit
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn series(f: impl Fn(f64) -> f64, n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let x = i as f64 * 0.1;
                Point::new(x, f(x))
            })
            .collect()
    }

    #[test]
    fn flat_series_converges_in_one_iteration() {
        let mut pts = series(|_| 4.5, 30);
        let fit = shirley_background(&mut pts, 50, 1e-6);
        assert_eq!(fit.iterations, 1);
        assert!(fit.converged);
        assert!(pts.iter().all(|p| p.y == 4.5));
    }

    #[test]
    fn short_sequences_are_untouched() {
        let mut empty: Vec<Point> = Vec::new();
        assert_eq!(shirley_background(&mut empty, 50, 1e-6).iterations, 0);

        let mut one = vec![Point::new(1.0, 9.0)];
        shirley_background(&mut one, 50, 1e-6);
        assert_eq!(one[0].y, 9.0);
    }

    fn step_with_peak(x: f64) -> f64 {
        // Low-x side at 10, high-x side at 30, gaussian peak on the step.
        let step = 10.0 + 20.0 / (1.0 + (-(x - 5.0) * 4.0).exp());
        step + 100.0 * (-((x - 5.0) / 0.4).powi(2)).exp()
    }

    #[test]
    fn step_with_peak_gives_monotone_background_between_ends() {
        let mut pts = series(step_with_peak, 101);
        let (ya, yb) = (pts[0].y, pts[100].y);

        let fit = shirley_background(&mut pts, 50, 1e-6);
        assert!(fit.converged, "did not converge in {} iterations", fit.iterations);
        assert!(fit.iterations > 1);
        assert!((pts[0].y - ya).abs() < 1e-12);
        assert!((pts[100].y - yb).abs() < 1e-9, "end should be {yb}, got {}", pts[100].y);
        for w in pts.windows(2) {
            assert!(w[1].y >= w[0].y - 1e-6, "background should be non-decreasing");
        }
    }

    #[test]
    fn noisy_spectrum_stays_near_the_end_levels() {
        let mut rng = StdRng::seed_from_u64(11);
        let noise = Normal::new(0.0, 0.05).unwrap();
        let mut pts = series(step_with_peak, 101);
        for p in pts.iter_mut() {
            p.y += noise.sample(&mut rng);
        }
        let (ya, yb) = (pts[0].y, pts[100].y);

        let fit = shirley_background(&mut pts, 50, 1e-6);
        assert!(fit.converged);
        for p in &pts {
            assert!(
                p.y > ya.min(yb) - 0.5 && p.y < ya.max(yb) + 0.5,
                "background {} escaped [{ya}, {yb}]",
                p.y
            );
        }
    }

    #[test]
    fn dip_on_a_step_converges_with_negative_integral() {
        // Same step as above with the peak turned into a deep dip: the
        // integral above the background is negative throughout.
        let dip = |x: f64| step_with_peak(x) - 200.0 * (-((x - 5.0) / 0.4).powi(2)).exp();
        let mut pts = series(dip, 101);
        let (ya, yb) = (pts[0].y, pts[100].y);

        let fit = shirley_background(&mut pts, 50, 1e-6);
        assert!(fit.converged, "did not converge in {} iterations", fit.iterations);
        assert!(fit.iterations > 5, "stopped early after {} iterations", fit.iterations);
        assert!((pts[0].y - ya).abs() < 1e-12);
        assert!((pts[100].y - yb).abs() < 1e-9, "end should be {yb}, got {}", pts[100].y);
        for p in &pts {
            assert!(p.y > ya - 0.1 && p.y < yb + 1e-6, "background {} escaped [{ya}, {yb}]", p.y);
        }
    }

    #[test]
    fn two_point_ramp_stops_when_nothing_is_left_above() {
        // After one rescale the background is the ramp itself and the integral is exactly zero.
        let mut pts = vec![Point::new(0.0, 1.0), Point::new(2.0, 5.0)];
        let fit = shirley_background(&mut pts, 50, 1e-6);
        assert_eq!(fit.iterations, 2);
        assert!(fit.converged);
        assert_eq!((pts[0].y, pts[1].y), (1.0, 5.0));
    }

    #[test]
    fn respects_iteration_limit() {
        let mut pts = series(|x| if x < 1.0 { 1.0 } else { 3.0 + x }, 40);
        let fit = shirley_background(&mut pts, 1, 1e-12);
        assert_eq!(fit.iterations, 1);
        assert!(!fit.converged);
    }
}
