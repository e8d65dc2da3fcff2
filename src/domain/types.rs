//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - copied onto the transform stack
//! - exchanged with a dataset provider
//! - saved/reloaded by an embedding session

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Title given to an untitled dataset when it is pushed on the stack.
pub const NO_TITLE: &str = "nt";

/// One dataset sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub sigma: f64,
    pub is_active: bool,
}

impl Point {
    /// Active point with unit sigma.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            sigma: 1.0,
            is_active: true,
        }
    }

    pub fn with_sigma(x: f64, y: f64, sigma: f64) -> Self {
        Self {
            x,
            y,
            sigma,
            is_active: true,
        }
    }

    /// Total order of points: by `x` only.
    pub fn cmp_x(&self, other: &Point) -> Ordering {
        self.x.total_cmp(&other.x)
    }
}

/// Sort points by `x`, keeping the relative order of equal-x points.
pub fn sort_by_x(points: &mut [Point]) {
    points.sort_by(Point::cmp_x);
}

/// An ordered point sequence with a title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub points: Vec<Point>,
    pub title: String,
}

impl Dataset {
    pub fn new(points: Vec<Point>, title: impl Into<String>) -> Self {
        Self {
            points,
            title: title.into(),
        }
    }

    /// Build a dataset from parallel `x`/`y` slices (unit sigma, all active).
    pub fn from_xy(xs: &[f64], ys: &[f64], title: impl Into<String>) -> Self {
        let points = xs.iter().zip(ys).map(|(&x, &y)| Point::new(x, y)).collect();
        Self::new(points, title)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }
}

/// A value on the transform stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Series(Dataset),
}

impl Value {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    /// Short description used in type-error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "number",
            Value::Series(_) => "dataset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_by_x_is_stable() {
        let mut pts = vec![
            Point::new(2.0, 1.0),
            Point::new(1.0, 2.0),
            Point::new(2.0, 3.0),
            Point::new(0.5, 4.0),
        ];
        sort_by_x(&mut pts);
        let xs: Vec<f64> = pts.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = pts.iter().map(|p| p.y).collect();
        assert_eq!(xs, vec![0.5, 1.0, 2.0, 2.0]);
        assert_eq!(ys, vec![4.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn point_serializes_with_field_names() {
        let p = Point::with_sigma(1.5, 2.0, 0.1);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"is_active\":true"), "got {json}");
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
