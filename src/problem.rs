//! The [`Problem`] trait defines what gets optimized.
//!
//! A problem maps a decision vector to an objective vector, all objectives
//! minimized. For simple cases a closure works directly:
//!
//! ```
//! use amoead::Problem;
//!
//! let schaffer = |x: &[f64]| Ok::<_, String>(vec![x[0] * x[0], (x[0] - 2.0).powi(2)]);
//! assert_eq!(schaffer.evaluate(&[1.0]).unwrap(), vec![1.0, 1.0]);
//! ```
//!
//! Implement the trait on a struct when the problem carries state:
//!
//! ```
//! use amoead::Problem;
//!
//! struct Shifted {
//!     offset: f64,
//! }
//!
//! impl Problem for Shifted {
//!     type Error = std::convert::Infallible;
//!
//!     fn evaluate(&self, x: &[f64]) -> Result<Vec<f64>, Self::Error> {
//!         Ok(vec![x[0] - self.offset, self.offset - x[0]])
//!     }
//! }
//! ```

use crate::error::{Error, Result};

/// A black-box vector-valued objective function.
///
/// Evaluation is assumed pure and deterministic; the optimizer never calls
/// it concurrently.
pub trait Problem {
    /// The error type returned by [`evaluate`](Problem::evaluate).
    type Error: ToString;

    /// Evaluate one decision vector and return one value per objective.
    ///
    /// # Errors
    ///
    /// Any error whose type implements `ToString`. A failed evaluation
    /// aborts the run.
    fn evaluate(&self, x: &[f64]) -> core::result::Result<Vec<f64>, Self::Error>;
}

impl<F, E> Problem for F
where
    F: Fn(&[f64]) -> core::result::Result<Vec<f64>, E>,
    E: ToString,
{
    type Error = E;

    fn evaluate(&self, x: &[f64]) -> core::result::Result<Vec<f64>, E> {
        self(x)
    }
}

/// Evaluate `x` and check the objective count.
pub(crate) fn evaluate_checked<P: Problem + ?Sized>(
    problem: &P,
    x: &[f64],
    n_obj: usize,
) -> Result<Vec<f64>> {
    let y = problem.evaluate(x).map_err(|e| Error::Evaluation {
        x: x.to_vec(),
        message: e.to_string(),
    })?;
    if y.len() != n_obj {
        return Err(Error::ObjectiveDimensionMismatch {
            expected: n_obj,
            got: y.len(),
        });
    }
    Ok(y)
}
