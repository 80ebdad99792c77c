//! Decision vectors and their objective vectors, one pair per subproblem.

use crate::config::Bounds;
use crate::error::Result;
use crate::problem::{Problem, evaluate_checked};
use crate::rng_util;

/// A fixed-size population of `(x, y)` pairs.
///
/// Slot `i` always holds a consistent pair: [`set`](Self::set) replaces both
/// halves together, copying the offspring rather than sharing it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population {
    x: Vec<Vec<f64>>,
    y: Vec<Vec<f64>>,
}

impl Population {
    /// Sample `n_pop` decision vectors uniformly within `bounds` and
    /// evaluate them.
    ///
    /// # Errors
    ///
    /// Returns the first evaluation error, see [`evaluate_all`].
    pub fn init<P: Problem + ?Sized>(
        rng: &mut fastrand::Rng,
        n_pop: usize,
        bounds: &Bounds,
        problem: &P,
        n_obj: usize,
    ) -> Result<Self> {
        let x = sample_uniform(rng, n_pop, bounds);
        let y = evaluate_all(problem, &x, n_obj)?;
        Ok(Self { x, y })
    }

    /// Build a population from already evaluated pairs.
    ///
    /// # Panics
    ///
    /// Panics if `x` and `y` differ in length.
    #[must_use]
    pub fn from_parts(x: Vec<Vec<f64>>, y: Vec<Vec<f64>>) -> Self {
        assert_eq!(x.len(), y.len(), "every decision vector needs an objective vector");
        Self { x, y }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if the population has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Decision vector of slot `i`.
    #[must_use]
    pub fn x(&self, i: usize) -> &[f64] {
        &self.x[i]
    }

    /// Objective vector of slot `i`.
    #[must_use]
    pub fn y(&self, i: usize) -> &[f64] {
        &self.y[i]
    }

    /// All decision vectors, in slot order.
    #[must_use]
    pub fn decisions(&self) -> &[Vec<f64>] {
        &self.x
    }

    /// All objective vectors, in slot order.
    #[must_use]
    pub fn objectives(&self) -> &[Vec<f64>] {
        &self.y
    }

    /// Overwrite slot `i` with a copy of `(x, y)`.
    pub fn set(&mut self, i: usize, x: &[f64], y: &[f64]) {
        self.x[i].clear();
        self.x[i].extend_from_slice(x);
        self.y[i].clear();
        self.y[i].extend_from_slice(y);
    }

    pub(crate) fn remove(&mut self, i: usize) {
        self.x.remove(i);
        self.y.remove(i);
    }

    pub(crate) fn push(&mut self, x: Vec<f64>, y: Vec<f64>) {
        self.x.push(x);
        self.y.push(y);
    }
}

/// Sample `n` decision vectors, each coordinate uniform in its bounds.
pub(crate) fn sample_uniform(rng: &mut fastrand::Rng, n: usize, bounds: &Bounds) -> Vec<Vec<f64>> {
    (0..n)
        .map(|_| {
            (0..bounds.dim())
                .map(|d| {
                    let (low, high) = bounds.get(d);
                    rng_util::f64_range(rng, low, high)
                })
                .collect()
        })
        .collect()
}

/// Evaluate every row of `x`, producing one objective vector per row.
///
/// # Errors
///
/// Returns [`Error::Evaluation`](crate::Error::Evaluation) naming the first
/// failing decision vector, or
/// [`Error::ObjectiveDimensionMismatch`](crate::Error::ObjectiveDimensionMismatch).
pub fn evaluate_all<P: Problem + ?Sized>(
    problem: &P,
    x: &[Vec<f64>],
    n_obj: usize,
) -> Result<Vec<Vec<f64>>> {
    x.iter().map(|xi| evaluate_checked(problem, xi, n_obj)).collect()
}
