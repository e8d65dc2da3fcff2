//! Collapsing points that share the same x.
//!
//! A run is a maximal group of consecutive points whose x equals (within
//! `eps`) the x of the run's last point. Each run becomes one point:
//!
//! - `x` is the mean of the run's x values, in both modes
//! - `y` and `sigma` are summed, and divided by the run length only when averaging
//! - `is_active` is set if any point of the run was active

use crate::domain::Point;

/// Merge runs of equal-x points in the sorted sequence `points`.
pub fn merge_same_x(points: &mut Vec<Point>, average: bool, eps: f64) {
    if points.len() < 2 {
        return;
    }

    let mut merged: Vec<Point> = Vec::with_capacity(points.len());
    let mut run: Option<Run> = None;

    for p in points.iter().rev() {
        match run.as_mut() {
            Some(r) if (p.x - r.anchor).abs() <= eps => r.absorb(p),
            _ => {
                if let Some(r) = run.take() {
                    merged.push(r.finish(average));
                }
                run = Some(Run::start(p));
            }
        }
    }
    if let Some(r) = run {
        merged.push(r.finish(average));
    }

    merged.reverse();
    *points = merged;
}

struct Run {
    acc: Point,
    anchor: f64,
    count: usize,
}

impl Run {
    fn start(p: &Point) -> Self {
        Self {
            acc: *p,
            anchor: p.x,
            count: 1,
        }
    }

    fn absorb(&mut self, p: &Point) {
        self.acc.x += p.x;
        self.acc.y += p.y;
        self.acc.sigma += p.sigma;
        self.acc.is_active = self.acc.is_active || p.is_active;
        self.count += 1;
    }

    fn finish(mut self, average: bool) -> Point {
        if self.count > 1 {
            let k = self.count as f64;
            self.acc.x /= k;
            if average {
                self.acc.y /= k;
                self.acc.sigma /= k;
            }
        }
        self.acc
    }
}
