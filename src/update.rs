//! Neighborhood replacement policies.
//!
//! After an offspring is evaluated, its mating pool is scanned in random
//! order. Each pool member `k` is compared with the offspring on
//! subproblem `k`'s own scalar cost; accepted comparisons overwrite slot
//! `k` with a copy of the offspring. At most `max_replacements` slots are
//! overwritten per offspring, which limits how far one solution can spread
//! through the population.
//!
//! | Method | Accepts when |
//! |--------|--------------|
//! | [`Greedy`](UpdateMethod::Greedy) (default) | `g(y') <= g(yₖ)` |
//! | [`Strict`](UpdateMethod::Strict) | `g(y') < g(yₖ)` |
//! | [`Probabilistic`](UpdateMethod::Probabilistic) | improving, or with probability `exp(-Δ / (T * \|g(yₖ)\|))` |

use core::str::FromStr;

use crate::decomposition::Decomposition;
use crate::error::{Error, SchemeKind};
use crate::population::Population;

const COST_EPS: f64 = 1e-12;

/// Acceptance policy for neighborhood replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateMethod {
    /// Replace when the offspring is at least as good.
    #[default]
    Greedy,
    /// Replace only on strict improvement.
    Strict,
    /// Always replace on improvement; otherwise replace with a probability
    /// that decays with the relative worsening.
    Probabilistic {
        /// Tolerance to relative worsening. Larger values accept more.
        temperature: f64,
    },
}

impl FromStr for UpdateMethod {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "greedy" | "standard" => Ok(Self::Greedy),
            "strict" => Ok(Self::Strict),
            "probabilistic" => Ok(Self::Probabilistic { temperature: 0.1 }),
            other => Err(Error::unknown(SchemeKind::Update, other)),
        }
    }
}

/// What one replacement scan did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReplacementOutcome {
    /// Number of pool slots overwritten.
    pub replacements: usize,
    /// Sum of relative improvements `|g(y') - g(yₖ)| / |g(yₖ)|` over
    /// improving replacements.
    pub improvement: f64,
}

/// Everything a replacement scan reads besides the population.
pub struct ReplacementContext<'a> {
    /// Weight vectors, aligned with population slots.
    pub weights: &'a [Vec<f64>],
    /// Current reference point.
    pub reference: &'a [f64],
    /// Scalarization used to compare solutions.
    pub decomposition: &'a Decomposition,
    /// Replacement cap `nr`.
    pub max_replacements: usize,
}

impl UpdateMethod {
    /// Decide whether an offspring with cost `candidate` replaces a member
    /// with cost `current`.
    fn accepts(self, rng: &mut fastrand::Rng, candidate: f64, current: f64) -> bool {
        match self {
            Self::Greedy => candidate <= current,
            Self::Strict => candidate < current,
            Self::Probabilistic { temperature } => {
                if candidate <= current {
                    return true;
                }
                let scale = temperature * current.abs().max(COST_EPS);
                rng.f64() < (-(candidate - current) / scale).exp()
            }
        }
    }

    /// Scan `pool` in random order, replacing members the offspring
    /// `(x, y)` is accepted over, until `max_replacements` is reached.
    pub fn replace(
        self,
        rng: &mut fastrand::Rng,
        pool: &[usize],
        x: &[f64],
        y: &[f64],
        population: &mut Population,
        ctx: &ReplacementContext<'_>,
    ) -> ReplacementOutcome {
        let mut outcome = ReplacementOutcome::default();
        if ctx.max_replacements == 0 {
            return outcome;
        }

        let mut order = pool.to_vec();
        rng.shuffle(&mut order);

        for k in order {
            let w = &ctx.weights[k];
            let candidate = ctx.decomposition.scalarize(y, w, ctx.reference);
            let current = ctx.decomposition.scalarize(population.y(k), w, ctx.reference);

            if !self.accepts(rng, candidate, current) {
                continue;
            }

            population.set(k, x, y);
            if candidate <= current && current.abs() > COST_EPS {
                outcome.improvement += (candidate - current).abs() / current.abs();
            }
            outcome.replacements += 1;
            if outcome.replacements >= ctx.max_replacements {
                break;
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Population, Vec<Vec<f64>>) {
        let weights: Vec<Vec<f64>> = (0..5)
            .map(|i| {
                let a = f64::from(i) / 4.0;
                vec![a, 1.0 - a]
            })
            .collect();
        let pop = Population::from_parts(vec![vec![0.0]; 5], vec![vec![1.0, 1.0]; 5]);
        (pop, weights)
    }

    #[test]
    fn test_replacement_cap() {
        let (mut pop, weights) = setup();
        let ctx = ReplacementContext {
            weights: &weights,
            reference: &[0.0, 0.0],
            decomposition: &Decomposition::Tchebycheff,
            max_replacements: 2,
        };
        let mut rng = fastrand::Rng::with_seed(0);
        // The offspring beats every member on every subproblem.
        let outcome =
            UpdateMethod::Greedy.replace(&mut rng, &[0, 1, 2, 3, 4], &[0.5], &[0.1, 0.1], &mut pop, &ctx);
        assert_eq!(outcome.replacements, 2);
        let replaced = (0..5).filter(|&k| pop.x(k) == [0.5]).count();
        assert_eq!(replaced, 2);
        for k in 0..5 {
            // Pairs stay consistent.
            assert_eq!(pop.x(k) == [0.5], pop.y(k) == [0.1, 0.1]);
        }
    }

    #[test]
    fn test_improvement_accumulates_relative_gain() {
        let (mut pop, _) = setup();
        let weights = vec![vec![0.5, 0.5]; 5];
        let ctx = ReplacementContext {
            weights: &weights,
            reference: &[0.0, 0.0],
            decomposition: &Decomposition::Tchebycheff,
            max_replacements: 1,
        };
        let mut rng = fastrand::Rng::with_seed(0);
        // tch_k = 0.5, tch' = 0.25 -> relative gain 0.5
        let outcome = UpdateMethod::Greedy.replace(&mut rng, &[3], &[0.2], &[0.5, 0.5], &mut pop, &ctx);
        assert_eq!(outcome.replacements, 1);
        assert!((outcome.improvement - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_accepts_ties_strict_does_not() {
        let weights = vec![vec![0.5, 0.5]];
        let ctx = ReplacementContext {
            weights: &weights,
            reference: &[0.0, 0.0],
            decomposition: &Decomposition::Tchebycheff,
            max_replacements: 1,
        };
        let mut rng = fastrand::Rng::with_seed(0);

        let mut pop = Population::from_parts(vec![vec![0.0]], vec![vec![1.0, 1.0]]);
        let out = UpdateMethod::Strict.replace(&mut rng, &[0], &[0.9], &[1.0, 1.0], &mut pop, &ctx);
        assert_eq!(out.replacements, 0);
        assert_eq!(pop.x(0), &[0.0]);

        let out = UpdateMethod::Greedy.replace(&mut rng, &[0], &[0.9], &[1.0, 1.0], &mut pop, &ctx);
        assert_eq!(out.replacements, 1);
        assert_eq!(out.improvement, 0.0);
        assert_eq!(pop.x(0), &[0.9]);
    }

    #[test]
    fn test_greedy_rejects_worse() {
        let (mut pop, weights) = setup();
        let ctx = ReplacementContext {
            weights: &weights,
            reference: &[0.0, 0.0],
            decomposition: &Decomposition::Tchebycheff,
            max_replacements: 5,
        };
        let mut rng = fastrand::Rng::with_seed(0);
        let before = pop.clone();
        let out = UpdateMethod::Greedy.replace(&mut rng, &[0, 1, 2, 3, 4], &[0.7], &[2.0, 2.0], &mut pop, &ctx);
        assert_eq!(out, ReplacementOutcome::default());
        assert_eq!(pop, before);
    }

    #[test]
    fn test_probabilistic_sometimes_accepts_worse() {
        let weights = vec![vec![0.5, 0.5]];
        let ctx = ReplacementContext {
            weights: &weights,
            reference: &[0.0, 0.0],
            decomposition: &Decomposition::Tchebycheff,
            max_replacements: 1,
        };
        let method = UpdateMethod::Probabilistic { temperature: 1.0 };
        let mut rng = fastrand::Rng::with_seed(17);
        let mut accepted = 0;
        for _ in 0..200 {
            let mut pop = Population::from_parts(vec![vec![0.0]], vec![vec![1.0, 1.0]]);
            let out = method.replace(&mut rng, &[0], &[0.1], &[1.2, 1.2], &mut pop, &ctx);
            assert_eq!(out.improvement, 0.0);
            accepted += out.replacements;
        }
        // Acceptance probability exp(-0.2) ≈ 0.82
        assert!(accepted > 120 && accepted < 200, "accepted {accepted}");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("greedy".parse::<UpdateMethod>().unwrap(), UpdateMethod::Greedy);
        assert!(matches!(
            "elitist".parse::<UpdateMethod>(),
            Err(Error::UnknownScheme {
                kind: SchemeKind::Update,
                ..
            })
        ));
    }
}
