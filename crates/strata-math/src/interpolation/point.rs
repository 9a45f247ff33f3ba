//! Points and discrete spaces: the hand-off format between curve or
//! surface builders and the interpolation algorithms.

use ndarray::{Array2, ArrayView1, Axis};

use super::Interpolation;
use crate::error::{MathError, MathResult};

/// An immutable n-dimensional coordinate with an optional function value.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    coords: Vec<f64>,
    value: Option<f64>,
}

impl Point {
    /// Creates a point without a function value.
    #[must_use]
    pub fn new(coords: Vec<f64>) -> Self {
        Self {
            coords,
            value: None,
        }
    }

    /// Creates a point carrying a function value.
    #[must_use]
    pub fn with_value(coords: Vec<f64>, value: f64) -> Self {
        Self {
            coords,
            value: Some(value),
        }
    }

    /// One-dimensional point, e.g. a time.
    #[must_use]
    pub fn one(x: f64) -> Self {
        Self::new(vec![x])
    }

    /// Two-dimensional point, e.g. (time, strike).
    #[must_use]
    pub fn two(x: f64, y: f64) -> Self {
        Self::new(vec![x, y])
    }

    /// Number of coordinates.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    /// Coordinate along `dim`, if the point has that many dimensions.
    #[must_use]
    pub fn coord(&self, dim: usize) -> Option<f64> {
        self.coords.get(dim).copied()
    }

    /// All coordinates.
    #[must_use]
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Function value, if one was attached.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// An ordered set of points of equal dimension.
///
/// Coordinates are also held as a `points × dimension` matrix so each
/// dimension can be read as a contiguous array.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteSpace {
    points: Vec<Point>,
    coordinates: Array2<f64>,
}

impl DiscreteSpace {
    /// Builds a space from points that all share one dimension.
    pub fn new(points: Vec<Point>) -> MathResult<Self> {
        let dimension = points
            .first()
            .map(Point::dimension)
            .ok_or_else(|| MathError::insufficient_data(1, 0))?;
        if dimension == 0 {
            return Err(MathError::invalid_input("points must have at least one coordinate"));
        }
        if let Some(bad) = points.iter().find(|p| p.dimension() != dimension) {
            return Err(MathError::invalid_input(format!(
                "point of dimension {} in a space of dimension {dimension}",
                bad.dimension()
            )));
        }

        let mut coordinates = Array2::zeros((points.len(), dimension));
        for (mut row, point) in coordinates.axis_iter_mut(Axis(0)).zip(&points) {
            for (cell, c) in row.iter_mut().zip(point.coords()) {
                *cell = *c;
            }
        }
        Ok(Self {
            points,
            coordinates,
        })
    }

    /// One-dimensional space from parallel `xs` and `ys`.
    pub fn from_curve(xs: &[f64], ys: &[f64]) -> MathResult<Self> {
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        Self::new(
            xs.iter()
                .zip(ys)
                .map(|(x, y)| Point::with_value(vec![*x], *y))
                .collect(),
        )
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a space holds at least one point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimension shared by every point.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.coordinates.ncols()
    }

    /// The points, in insertion order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Coordinates along one dimension.
    pub fn coordinates(&self, dim: usize) -> MathResult<ArrayView1<'_, f64>> {
        if dim >= self.dimension() {
            return Err(MathError::invalid_input(format!(
                "dimension {dim} out of range for a {}-dimensional space",
                self.dimension()
            )));
        }
        Ok(self.coordinates.column(dim))
    }

    /// Function values; fails if any point lacks one.
    pub fn values(&self) -> MathResult<Vec<f64>> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                p.value()
                    .ok_or_else(|| MathError::invalid_input(format!("point {i} has no value")))
            })
            .collect()
    }

    /// Whether coordinates along `dim` are strictly ascending.
    #[must_use]
    pub fn is_ascending(&self, dim: usize) -> bool {
        self.coordinates(dim)
            .map(|c| c.windows(2).into_iter().all(|w| w[0] < w[1]))
            .unwrap_or(false)
    }

    /// Initializes `interpolation` against the first dimension and the
    /// function values.
    pub fn initialize(&self, interpolation: &mut dyn Interpolation) -> MathResult<()> {
        let xs = self.coordinates(0)?.to_vec();
        interpolation.initialize(&xs, &self.values()?)
    }
}
