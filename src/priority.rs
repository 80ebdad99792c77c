//! Per-subproblem resource allocation.
//!
//! Every subproblem carries a priority `pᵢ ∈ [0, 1]`. During a sweep,
//! subproblem `i` is processed (and costs one evaluation) only when a fresh
//! uniform draw `u` satisfies `u <= pᵢ`. Every scheme keeps at least one
//! strictly positive priority so the budget is always consumed.
//!
//! | Scheme | `pᵢ` |
//! |--------|------|
//! | [`Uniform`](PriorityScheme::Uniform) (default) | `1` |
//! | [`Fixed`](PriorityScheme::Fixed) | `value` |
//! | [`IndexPower`](PriorityScheme::IndexPower) | `((i + 1) / n)^e` |
//! | [`RandomRank`](PriorityScheme::RandomRank) | `(rankᵢ / n)^e` with a random rank permutation |
//! | [`Improvement`](PriorityScheme::Improvement) | `floor + (1 - floor) * Iᵢ / max I`, refreshed from the improvement indicators |

use std::collections::HashMap;

use crate::error::{Error, Result, SchemeKind};
use crate::rng_util;

/// How priorities are assigned to subproblems.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PriorityScheme {
    /// Every subproblem is processed in every sweep.
    #[default]
    Uniform,
    /// The same probability for every subproblem.
    Fixed {
        /// Probability in `(0, 1]`.
        value: f64,
    },
    /// Probability grows with the subproblem index.
    IndexPower {
        /// Non-negative exponent; `0` is equivalent to `Uniform`.
        exponent: f64,
    },
    /// Like `IndexPower`, but over a rank permutation drawn once at setup.
    RandomRank {
        /// Non-negative exponent.
        exponent: f64,
    },
    /// Dynamic allocation from the relative improvement each subproblem
    /// achieved since the last parameter-evolution boundary.
    Improvement {
        /// Minimum probability in `[0, 1]`.
        floor: f64,
    },
}

impl PriorityScheme {
    /// Resolves a scheme from its configuration name and the numeric index
    /// parameter `ps_value`.
    ///
    /// | Name | Parameter |
    /// |------|-----------|
    /// | `uniform` | none |
    /// | `fixed` | `value` (required) |
    /// | `index-power`, `power` | `exponent` (default 1.0) |
    /// | `random-rank` | `exponent` (default 1.0) |
    /// | `improvement`, `dra` | `floor` (default 0.05) |
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownScheme`] for an unrecognized name,
    /// [`Error::MissingParameter`] when `fixed` has no `value`, and
    /// [`Error::InvalidParameter`] for out-of-range values.
    pub fn from_name(name: &str, params: &HashMap<String, f64>) -> Result<Self> {
        let get = |key: &str, default: f64| params.get(key).copied().unwrap_or(default);
        let scheme = match name {
            "uniform" => Self::Uniform,
            "fixed" => Self::Fixed {
                value: params
                    .get("value")
                    .copied()
                    .ok_or_else(|| Error::MissingParameter {
                        kind: SchemeKind::Priority,
                        scheme: name.to_owned(),
                        param: "value",
                    })?,
            },
            "index-power" | "power" => Self::IndexPower {
                exponent: get("exponent", 1.0),
            },
            "random-rank" => Self::RandomRank {
                exponent: get("exponent", 1.0),
            },
            "improvement" | "dra" => Self::Improvement {
                floor: get("floor", 0.05),
            },
            other => return Err(Error::unknown(SchemeKind::Priority, other)),
        };
        scheme.validate()?;
        Ok(scheme)
    }

    /// Check the scheme's parameter range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the parameter is out of range.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Uniform => Ok(()),
            Self::Fixed { value } if !(value > 0.0 && value <= 1.0) => Err(Error::invalid(
                "value",
                format!("fixed priority {value} must be in (0, 1]"),
            )),
            Self::IndexPower { exponent } | Self::RandomRank { exponent }
                if !(exponent.is_finite() && exponent >= 0.0) =>
            {
                Err(Error::invalid(
                    "exponent",
                    format!("{exponent} must be finite and non-negative"),
                ))
            }
            Self::Improvement { floor } if !(0.0..=1.0).contains(&floor) => Err(Error::invalid(
                "floor",
                format!("{floor} must be in [0, 1]"),
            )),
            _ => Ok(()),
        }
    }

    /// Whether priorities are refreshed from improvement indicators.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Improvement { .. })
    }

    /// Initial priorities for `n_pop` subproblems.
    ///
    /// Only `RandomRank` consumes randomness.
    #[allow(clippy::cast_precision_loss)]
    pub fn initial(&self, n_pop: usize, rng: &mut fastrand::Rng) -> Vec<f64> {
        let n = n_pop as f64;
        match *self {
            Self::Uniform | Self::Improvement { .. } => vec![1.0; n_pop],
            Self::Fixed { value } => vec![value; n_pop],
            Self::IndexPower { exponent } => (0..n_pop)
                .map(|i| ((i + 1) as f64 / n).powf(exponent))
                .collect(),
            Self::RandomRank { exponent } => rng_util::permutation(rng, n_pop)
                .into_iter()
                .map(|rank| ((rank + 1) as f64 / n).powf(exponent))
                .collect(),
        }
    }

    /// Priority given to a subproblem inserted by weight adjustment.
    #[must_use]
    pub fn fresh_value(&self) -> f64 {
        match *self {
            Self::Fixed { value } => value,
            _ => 1.0,
        }
    }

    /// Refresh `priorities` from the accumulated improvement of each
    /// subproblem. Static schemes leave them unchanged.
    ///
    /// When no subproblem improved, every priority is reset to 1.
    pub fn refresh(&self, priorities: &mut [f64], improvements: &[f64]) {
        let Self::Improvement { floor } = *self else {
            return;
        };
        let max = improvements.iter().copied().fold(0.0_f64, f64::max);
        for (p, &imp) in priorities.iter_mut().zip(improvements) {
            *p = if max > 0.0 {
                floor + (1.0 - floor) * (imp.max(0.0) / max)
            } else {
                1.0
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_params() -> HashMap<String, f64> {
        HashMap::new()
    }

    #[test]
    fn test_index_power_ends_at_one() {
        let mut rng = fastrand::Rng::with_seed(0);
        let p = PriorityScheme::IndexPower { exponent: 2.0 }.initial(4, &mut rng);
        assert_eq!(p, vec![0.0625, 0.25, 0.5625, 1.0]);
    }

    #[test]
    fn test_random_rank_is_a_permutation_of_index_power() {
        let mut rng = fastrand::Rng::with_seed(5);
        let mut p = PriorityScheme::RandomRank { exponent: 1.0 }.initial(8, &mut rng);
        p.sort_by(f64::total_cmp);
        let expected = PriorityScheme::IndexPower { exponent: 1.0 }.initial(8, &mut rng);
        assert_eq!(p, expected);
    }

    #[test]
    fn test_every_scheme_has_a_positive_maximum() {
        let mut rng = fastrand::Rng::with_seed(1);
        for scheme in [
            PriorityScheme::Uniform,
            PriorityScheme::Fixed { value: 0.3 },
            PriorityScheme::IndexPower { exponent: 4.0 },
            PriorityScheme::RandomRank { exponent: 4.0 },
            PriorityScheme::Improvement { floor: 0.0 },
        ] {
            let p = scheme.initial(10, &mut rng);
            assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
            assert!(p.iter().copied().fold(0.0, f64::max) > 0.0);
        }
    }

    #[test]
    fn test_improvement_refresh() {
        let scheme = PriorityScheme::Improvement { floor: 0.2 };
        let mut p = vec![1.0; 3];
        scheme.refresh(&mut p, &[0.0, 0.5, 1.0]);
        assert!((p[0] - 0.2).abs() < 1e-12);
        assert!((p[1] - 0.6).abs() < 1e-12);
        assert!((p[2] - 1.0).abs() < 1e-12);

        scheme.refresh(&mut p, &[0.0, 0.0, 0.0]);
        assert_eq!(p, vec![1.0; 3]);
    }

    #[test]
    fn test_static_refresh_is_noop() {
        let mut p = vec![0.25, 0.5];
        PriorityScheme::Fixed { value: 0.5 }.refresh(&mut p, &[3.0, 0.0]);
        assert_eq!(p, vec![0.25, 0.5]);
    }

    #[test]
    fn test_from_name() {
        let mut params = no_params();
        params.insert("exponent".into(), 3.0);
        assert_eq!(
            PriorityScheme::from_name("power", &params).unwrap(),
            PriorityScheme::IndexPower { exponent: 3.0 }
        );
        assert!(matches!(
            PriorityScheme::from_name("fixed", &no_params()),
            Err(Error::MissingParameter { param: "value", .. })
        ));
        assert!(matches!(
            PriorityScheme::from_name("lottery", &no_params()),
            Err(Error::UnknownScheme {
                kind: SchemeKind::Priority,
                ..
            })
        ));
        params.insert("value".into(), 0.0);
        assert!(matches!(
            PriorityScheme::from_name("fixed", &params),
            Err(Error::InvalidParameter { name: "value", .. })
        ));
    }
}
