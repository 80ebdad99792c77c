//! Scalarization of objective vectors into subproblem costs.
//!
//! Each subproblem compares solutions through a scalar cost computed from
//! the objective vector, its weight vector and the reference point. Lower
//! is better. Replacement logic only ever sees these scalars, so every
//! update policy works with every method here.
//!
//! | Method | Formula | Best for |
//! |--------|---------|----------|
//! | [`Tchebycheff`](Decomposition::Tchebycheff) (default) | `max(wᵢ * \|fᵢ - zᵢ\|)` | General purpose, non-convex fronts |
//! | [`ModifiedTchebycheff`](Decomposition::ModifiedTchebycheff) | `max(\|fᵢ - zᵢ\| / wᵢ)` | More uniform spread from uniform weights |
//! | [`WeightedSum`](Decomposition::WeightedSum) | `Σ(wᵢ * fᵢ)` | Convex Pareto fronts only |
//! | [`Pbi`](Decomposition::Pbi) | `d₁ + θ * d₂` | Fine-grained convergence/diversity control |
//! | [`AngularPbi`](Decomposition::AngularPbi) | `d₁ + θ * d₁ * angle` | Scale-free penalty on ray deviation |

use core::str::FromStr;

use crate::error::{Error, SchemeKind};

/// Floor applied to zero weights in Tchebycheff-type methods.
pub(crate) const WEIGHT_FLOOR: f64 = 1e-6;

const DEFAULT_THETA: f64 = 5.0;

/// Decomposition (scalarization) method.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Decomposition {
    /// Tchebycheff: `max(wᵢ * |fᵢ - zᵢ|)`.
    ///
    /// Handles non-convex Pareto fronts. The most commonly used
    /// decomposition method (default).
    #[default]
    Tchebycheff,
    /// Modified Tchebycheff: `max(|fᵢ - zᵢ| / wᵢ)`.
    ///
    /// Optimal points lie on the weight rays themselves, which gives a
    /// front spread that follows the weight layout.
    ModifiedTchebycheff,
    /// Weighted sum: `Σ(wᵢ * fᵢ)`.
    ///
    /// Simplest method but can only find solutions on convex regions
    /// of the Pareto front.
    WeightedSum,
    /// Penalty-based Boundary Intersection: `d₁ + θ * d₂`.
    ///
    /// `d₁` is the projection of `f - z` on the weight direction and `d₂`
    /// the perpendicular distance to it. Higher `theta` favors solutions
    /// closer to the weight direction.
    Pbi {
        /// Penalty parameter. Default: 5.0.
        theta: f64,
    },
    /// PBI with an angular penalty: `d₁ + θ * d₁ * φ` where `φ` is the angle
    /// between `f - z` and the weight direction.
    AngularPbi {
        /// Penalty parameter. Default: 5.0.
        theta: f64,
    },
}

impl Decomposition {
    /// Scalar cost of `values` for the subproblem with weight `weight`.
    #[must_use]
    pub fn scalarize(&self, values: &[f64], weight: &[f64], reference: &[f64]) -> f64 {
        match *self {
            Self::Tchebycheff => scalarize_tchebycheff(values, weight, reference),
            Self::ModifiedTchebycheff => scalarize_modified_tchebycheff(values, weight, reference),
            Self::WeightedSum => scalarize_weighted_sum(values, weight),
            Self::Pbi { theta } => {
                let (d1, d2) = pbi_distances(values, weight, reference);
                d1 + theta * d2
            }
            Self::AngularPbi { theta } => {
                let (d1, d2) = pbi_distances(values, weight, reference);
                if d1.is_infinite() {
                    return d1;
                }
                let angle = d2.atan2(d1);
                d1 + theta * d1.abs() * angle
            }
        }
    }

    /// Check the penalty parameter of the PBI variants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for a negative or non-finite
    /// `theta`.
    pub fn validate(&self) -> crate::error::Result<()> {
        match *self {
            Self::Pbi { theta } | Self::AngularPbi { theta }
                if !(theta.is_finite() && theta >= 0.0) =>
            {
                Err(Error::invalid(
                    "theta",
                    format!("{theta} must be finite and non-negative"),
                ))
            }
            _ => Ok(()),
        }
    }
}

impl FromStr for Decomposition {
    type Err = Error;

    /// Resolve a method by name; the PBI variants use `theta = 5.0`.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "tchebycheff" | "tch" => Ok(Self::Tchebycheff),
            "modified-tchebycheff" | "mtch" => Ok(Self::ModifiedTchebycheff),
            "weighted-sum" | "ws" => Ok(Self::WeightedSum),
            "pbi" => Ok(Self::Pbi {
                theta: DEFAULT_THETA,
            }),
            "angular-pbi" => Ok(Self::AngularPbi {
                theta: DEFAULT_THETA,
            }),
            other => Err(Error::unknown(SchemeKind::Decomposition, other)),
        }
    }
}

/// Weighted sum scalarization: `sum(w_i * f_i)`.
fn scalarize_weighted_sum(values: &[f64], weight: &[f64]) -> f64 {
    values.iter().zip(weight).map(|(&v, &w)| w * v).sum()
}

/// Tchebycheff scalarization: `max(w_i * |f_i - z_i|)`.
fn scalarize_tchebycheff(values: &[f64], weight: &[f64], ideal: &[f64]) -> f64 {
    values
        .iter()
        .zip(weight)
        .zip(ideal)
        .map(|((&v, &w), &z)| w.max(WEIGHT_FLOOR) * (v - z).abs())
        .fold(f64::NEG_INFINITY, f64::max)
}

fn scalarize_modified_tchebycheff(values: &[f64], weight: &[f64], ideal: &[f64]) -> f64 {
    values
        .iter()
        .zip(weight)
        .zip(ideal)
        .map(|((&v, &w), &z)| (v - z).abs() / w.max(WEIGHT_FLOOR))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Projection `d1` of `f - z` on the unit weight direction and the
/// perpendicular distance `d2`.
fn pbi_distances(values: &[f64], weight: &[f64], ideal: &[f64]) -> (f64, f64) {
    let diff: Vec<f64> = values.iter().zip(ideal).map(|(&v, &z)| v - z).collect();

    let w_norm: f64 = weight.iter().map(|&w| w * w).sum::<f64>().sqrt();
    if w_norm < 1e-30 {
        return (f64::INFINITY, 0.0);
    }

    let d1: f64 = diff.iter().zip(weight).map(|(&d, &w)| d * w / w_norm).sum();
    let d2 = diff
        .iter()
        .zip(weight)
        .map(|(&d, &w)| (d - d1 * w / w_norm).powi(2))
        .sum::<f64>()
        .sqrt();
    (d1, d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalarize_weighted_sum() {
        let values = [1.0, 2.0, 3.0];
        let weight = [0.5, 0.3, 0.2];
        let result = Decomposition::WeightedSum.scalarize(&values, &weight, &[0.0; 3]);
        assert!((result - (0.5 + 0.6 + 0.6)).abs() < 1e-10);
    }

    #[test]
    fn test_scalarize_tchebycheff() {
        // max(0.5 * |3-1|, 0.5 * |2-1|) = 1.0
        let result = Decomposition::Tchebycheff.scalarize(&[3.0, 2.0], &[0.5, 0.5], &[1.0, 1.0]);
        assert!((result - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_tchebycheff_zero_at_reference() {
        let z = [0.3, -1.2, 4.0];
        for w in [[1.0, 0.0, 0.0], [0.2, 0.3, 0.5], [0.0, 0.0, 1.0]] {
            assert_eq!(Decomposition::Tchebycheff.scalarize(&z, &w, &z), 0.0);
        }
    }

    #[test]
    fn test_tchebycheff_zero_weight_is_floored() {
        // A zero weight still ranks points that differ only in that objective.
        let a = Decomposition::Tchebycheff.scalarize(&[0.0, 2.0], &[1.0, 0.0], &[0.0, 0.0]);
        let b = Decomposition::Tchebycheff.scalarize(&[0.0, 1.0], &[1.0, 0.0], &[0.0, 0.0]);
        assert!(b < a);
    }

    #[test]
    fn test_modified_tchebycheff() {
        let result =
            Decomposition::ModifiedTchebycheff.scalarize(&[3.0, 2.0], &[0.5, 0.5], &[1.0, 1.0]);
        assert!((result - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_scalarize_pbi() {
        // (2,2) lies on the (1,1) direction: d1 = 2√2, d2 = 0
        let result = Decomposition::Pbi { theta: 5.0 }.scalarize(&[2.0, 2.0], &[1.0, 1.0], &[0.0, 0.0]);
        assert!((result - 2.0 * 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_pbi_penalizes_off_ray_points() {
        let pbi = Decomposition::Pbi { theta: 5.0 };
        let on_ray = pbi.scalarize(&[1.0, 1.0], &[0.5, 0.5], &[0.0, 0.0]);
        let off_ray = pbi.scalarize(&[2.0, 0.0], &[0.5, 0.5], &[0.0, 0.0]);
        // Same projection, but off_ray has d2 = √2
        assert!((off_ray - on_ray - 5.0 * 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_angular_pbi_on_ray_equals_projection() {
        let result =
            Decomposition::AngularPbi { theta: 5.0 }.scalarize(&[3.0, 0.0], &[1.0, 0.0], &[0.0, 0.0]);
        assert!((result - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("tch".parse::<Decomposition>().unwrap(), Decomposition::Tchebycheff);
        assert_eq!(
            "pbi".parse::<Decomposition>().unwrap(),
            Decomposition::Pbi { theta: 5.0 }
        );
        let err = "chebyshev".parse::<Decomposition>().unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownScheme {
                kind: SchemeKind::Decomposition,
                ..
            }
        ));
    }
}
