//! Weight-vector generation on the objective simplex.
//!
//! Every subproblem of MOEA/D is defined by one weight vector: `n_obj`
//! non-negative reals that sum to 1. The number of vectors a scheme
//! produces fixes the population size for the whole run.
//!
//! | Scheme | Points |
//! |--------|--------|
//! | [`SimplexLattice`](WeightScheme::SimplexLattice) | `C(H + M - 1, M - 1)` Das-Dennis points |
//! | [`TwoLayer`](WeightScheme::TwoLayer) | Boundary lattice plus a shrunk inner lattice |
//! | [`Auto`](WeightScheme::Auto) | Smallest lattice with at least `target` points |
//!
//! Generation is deterministic so neighborhoods are reproducible.
//!
//! # Examples
//!
//! ```
//! use amoead::weights::{WeightScheme, generate};
//!
//! let w = generate(2, &WeightScheme::SimplexLattice { divisions: 4 }).unwrap();
//! assert_eq!(w.len(), 5);
//! assert!(w.iter().all(|v| (v.iter().sum::<f64>() - 1.0).abs() < 1e-12));
//! ```

use std::collections::HashMap;

use crate::error::{Error, Result, SchemeKind};

/// How weight vectors are laid out on the simplex.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeightScheme {
    /// Das-Dennis simplex-lattice design with `divisions` partitions per axis.
    SimplexLattice {
        /// Number of partitions `H`.
        divisions: usize,
    },
    /// Two stacked lattices: the boundary lattice with `outer` partitions and
    /// an inner lattice with `inner` partitions shrunk halfway to the centroid.
    ///
    /// Useful for many objectives where a single lattice needs a huge `H`
    /// before it places any point off the boundary.
    TwoLayer {
        /// Partitions of the boundary layer.
        outer: usize,
        /// Partitions of the inner layer.
        inner: usize,
    },
    /// The smallest simplex lattice with at least `target` points.
    Auto {
        /// Desired minimum number of weight vectors.
        target: usize,
    },
}

impl WeightScheme {
    /// Resolves a scheme from its configuration name and numeric parameters.
    ///
    /// | Name | Parameters |
    /// |------|-----------|
    /// | `simplex-lattice`, `das-dennis` | `divisions` |
    /// | `two-layer` | `outer`, `inner` |
    /// | `auto` | `target` |
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownScheme`] for an unrecognized name and
    /// [`Error::MissingParameter`] when a required parameter is absent.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_name(name: &str, params: &HashMap<String, f64>) -> Result<Self> {
        let get = |param: &'static str| {
            params
                .get(param)
                .map(|v| v.max(0.0) as usize)
                .ok_or_else(|| Error::MissingParameter {
                    kind: SchemeKind::Weights,
                    scheme: name.to_owned(),
                    param,
                })
        };
        match name {
            "simplex-lattice" | "das-dennis" => Ok(Self::SimplexLattice {
                divisions: get("divisions")?,
            }),
            "two-layer" => Ok(Self::TwoLayer {
                outer: get("outer")?,
                inner: get("inner")?,
            }),
            "auto" => Ok(Self::Auto {
                target: get("target")?,
            }),
            other => Err(Error::unknown(SchemeKind::Weights, other)),
        }
    }
}

/// Generate the weight vectors for `n_obj` objectives.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `n_obj < 2` or a scheme has zero
/// partitions, and [`Error::TooFewWeights`] if fewer than two vectors result.
pub fn generate(n_obj: usize, scheme: &WeightScheme) -> Result<Vec<Vec<f64>>> {
    if n_obj < 2 {
        return Err(Error::invalid("n_obj", "at least 2 objectives are required"));
    }
    let weights = match *scheme {
        WeightScheme::SimplexLattice { divisions } => {
            if divisions == 0 {
                return Err(Error::invalid("divisions", "must be positive"));
            }
            das_dennis(n_obj, divisions)
        }
        WeightScheme::TwoLayer { outer, inner } => {
            if outer == 0 || inner == 0 {
                return Err(Error::invalid("divisions", "both layers must be positive"));
            }
            two_layer(n_obj, outer, inner)
        }
        WeightScheme::Auto { target } => das_dennis(n_obj, auto_divisions(n_obj, target)),
    };
    if weights.len() < 2 {
        return Err(Error::TooFewWeights { got: weights.len() });
    }
    Ok(weights)
}

/// Generate Das-Dennis (simplex-lattice) reference points.
///
/// Returns `C(H + M - 1, M - 1)` uniformly spaced points on the
/// `M`-dimensional unit simplex, where `M = n_objectives` and
/// `H = divisions`.
pub(crate) fn das_dennis(n_objectives: usize, divisions: usize) -> Vec<Vec<f64>> {
    let mut points = Vec::with_capacity(n_combinations(divisions + n_objectives - 1, n_objectives - 1));
    let mut point = vec![0.0_f64; n_objectives];
    das_dennis_recursive(divisions, 0, divisions, &mut point, &mut points);
    points
}

#[allow(clippy::cast_precision_loss)]
fn das_dennis_recursive(
    divisions: usize,
    depth: usize,
    remaining: usize,
    current: &mut Vec<f64>,
    result: &mut Vec<Vec<f64>>,
) {
    if depth == current.len() - 1 {
        current[depth] = remaining as f64 / divisions as f64;
        result.push(current.clone());
        return;
    }

    for i in 0..=remaining {
        current[depth] = i as f64 / divisions as f64;
        das_dennis_recursive(divisions, depth + 1, remaining - i, current, result);
    }
}

#[allow(clippy::cast_precision_loss)]
fn two_layer(n_obj: usize, outer: usize, inner: usize) -> Vec<Vec<f64>> {
    let centroid = 1.0 / n_obj as f64;
    let mut weights = das_dennis(n_obj, outer);
    for w in das_dennis(n_obj, inner) {
        let shrunk: Vec<f64> = w.iter().map(|&v| 0.5 * v + 0.5 * centroid).collect();
        let duplicate = weights
            .iter()
            .any(|e| e.iter().zip(&shrunk).all(|(a, b)| (a - b).abs() < 1e-12));
        if !duplicate {
            weights.push(shrunk);
        }
    }
    weights
}

/// Choose the number of divisions for Das-Dennis to get close to a target
/// population size.
///
/// Finds the smallest `H` such that `C(H + M - 1, M - 1) >= target`.
pub(crate) fn auto_divisions(n_objectives: usize, target: usize) -> usize {
    let m = n_objectives;
    for h in 1..200 {
        if n_combinations(h + m - 1, m - 1) >= target {
            return h;
        }
    }
    12
}

/// Compute `C(n, k)` = n! / (k! * (n-k)!).
pub(crate) fn n_combinations(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: usize = 1;
    for i in 0..k {
        result = result.saturating_mul(n - i) / (i + 1);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_on_simplex(points: &[Vec<f64>]) {
        for p in points {
            let sum: f64 = p.iter().sum();
            assert!((sum - 1.0).abs() < 1e-10, "point {p:?} doesn't sum to 1");
            assert!(p.iter().all(|&v| v >= 0.0), "point {p:?} has a negative component");
        }
    }

    #[test]
    fn test_das_dennis_2d() {
        let points = das_dennis(2, 4);
        // C(4+1, 1) = 5 points
        assert_eq!(points.len(), 5);
        assert_on_simplex(&points);
    }

    #[test]
    fn test_das_dennis_closed_form_count() {
        for m in 2..=5 {
            for h in 1..=8 {
                let points = das_dennis(m, h);
                assert_eq!(points.len(), n_combinations(h + m - 1, m - 1));
                assert_on_simplex(&points);
            }
        }
    }

    #[test]
    fn test_das_dennis_is_deterministic() {
        assert_eq!(das_dennis(3, 6), das_dennis(3, 6));
    }

    #[test]
    fn test_two_layer_adds_interior_points() {
        let w = generate(3, &WeightScheme::TwoLayer { outer: 2, inner: 1 }).unwrap();
        // 6 boundary points plus 3 shrunk ones
        assert_eq!(w.len(), 9);
        assert_on_simplex(&w);
        assert!(w[6..].iter().all(|p| p.iter().all(|&v| v > 0.0)));
    }

    #[test]
    fn test_auto_divisions() {
        // For 3 objectives targeting ~91 points: H=12 gives C(14,2)=91
        let h3 = auto_divisions(3, 91);
        assert_eq!(h3, 12);
        let w = generate(2, &WeightScheme::Auto { target: 10 }).unwrap();
        assert!(w.len() >= 10);
    }

    #[test]
    fn test_n_combinations() {
        assert_eq!(n_combinations(5, 2), 10);
        assert_eq!(n_combinations(4, 0), 1);
        assert_eq!(n_combinations(4, 4), 1);
        assert_eq!(n_combinations(6, 3), 20);
    }

    #[test]
    fn test_generate_rejects_single_objective() {
        let err = generate(1, &WeightScheme::SimplexLattice { divisions: 3 }).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "n_obj", .. }));
    }

    #[test]
    fn test_from_name() {
        let mut params = HashMap::new();
        params.insert("divisions".to_owned(), 4.0);
        assert_eq!(
            WeightScheme::from_name("das-dennis", &params).unwrap(),
            WeightScheme::SimplexLattice { divisions: 4 }
        );
        assert!(matches!(
            WeightScheme::from_name("two-layer", &params),
            Err(Error::MissingParameter { param: "outer", .. })
        ));
        assert!(matches!(
            WeightScheme::from_name("sobol", &params),
            Err(Error::UnknownScheme { kind: SchemeKind::Weights, .. })
        ));
    }
}
