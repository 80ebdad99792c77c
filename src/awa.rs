//! Adaptive weight adjustment.
//!
//! Periodically reshapes the set of subproblems so they follow the front
//! the archive has discovered. Crowded subproblems are removed one at a
//! time; the same number of archive members from the sparsest regions are
//! then added as new subproblems, each with a weight vector pointing at it
//! from the reference point. The population size never changes.
//!
//! Crowding uses the *sparsity level*: the product of the distances from
//! a point to its `n_obj` nearest population members, measured on
//! objectives normalized between the reference point and the nadir.

use crate::archive::ExternalArchive;
use crate::error::{Error, Result};
use crate::neighborhood::euclidean;
use crate::population::Population;

const NORM_EPS: f64 = 1e-12;
const WEIGHT_EPS: f64 = 1e-6;

/// When and how much to reshape.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AwaConfig {
    /// First generation at which adjustment may happen.
    pub start_generation: usize,
    /// Generations between adjustments.
    pub period: usize,
    /// Share of the population replaced per adjustment, in `(0, 1)`.
    pub fraction: f64,
}

impl Default for AwaConfig {
    fn default() -> Self {
        Self {
            start_generation: 50,
            period: 10,
            fraction: 0.05,
        }
    }
}

impl AwaConfig {
    /// Check the schedule and fraction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for a zero period or a fraction
    /// outside `(0, 1)`.
    pub fn validate(&self) -> Result<()> {
        if self.period == 0 {
            return Err(Error::invalid("period", "must be at least 1"));
        }
        if !(self.fraction > 0.0 && self.fraction < 1.0) {
            return Err(Error::invalid(
                "fraction",
                format!("{} must be in (0, 1)", self.fraction),
            ));
        }
        Ok(())
    }

    /// Whether adjustment is due after `generation`.
    #[must_use]
    pub fn is_due(&self, generation: usize) -> bool {
        generation >= self.start_generation
            && (generation - self.start_generation) % self.period == 0
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn n_adjust(&self, n_pop: usize) -> usize {
        (self.fraction * n_pop as f64).round() as usize
    }
}

/// A reshaping to apply to every per-slot store.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AwaPlan {
    /// Slots to remove, each index valid after the previous removals.
    pub(crate) removed: Vec<usize>,
    /// New subproblems to append, as `(x, y, weight)`.
    pub(crate) added: Vec<(Vec<f64>, Vec<f64>, Vec<f64>)>,
}

/// Plan one adjustment, or `None` when the archive is not larger than
/// the population or the fraction rounds to zero slots.
pub(crate) fn plan(
    config: &AwaConfig,
    population: &Population,
    archive: &ExternalArchive,
    reference: &[f64],
) -> Option<AwaPlan> {
    let n_pop = population.len();
    let n_adjust = config.n_adjust(n_pop).min(n_pop.saturating_sub(1));
    if n_adjust == 0 || archive.len() <= n_pop {
        return None;
    }

    let nadir = nadir(population.objectives().iter().chain(archive.objectives()), reference);
    let normalize = |y: &[f64]| -> Vec<f64> {
        y.iter()
            .zip(reference)
            .zip(&nadir)
            .map(|((&v, &z), &n)| (v - z) / (n - z).max(NORM_EPS))
            .collect()
    };
    let k = reference.len();

    let mut live: Vec<Vec<f64>> = population.objectives().iter().map(|y| normalize(y)).collect();
    let mut removed = Vec::with_capacity(n_adjust);
    for _ in 0..n_adjust {
        let sparsity: Vec<f64> = (0..live.len())
            .map(|i| {
                let others = live
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, p)| p);
                sparsity_level(&live[i], others, k)
            })
            .collect();
        let victim = sparsity
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map_or(0, |(i, _)| i);
        live.remove(victim);
        removed.push(victim);
    }

    let mut candidates: Vec<usize> = (0..archive.len()).collect();
    let normalized_archive: Vec<Vec<f64>> =
        archive.objectives().iter().map(|y| normalize(y)).collect();
    let mut added = Vec::with_capacity(n_adjust);
    for _ in 0..n_adjust {
        let best = candidates
            .iter()
            .enumerate()
            .map(|(pos, &a)| (pos, sparsity_level(&normalized_archive[a], live.iter(), k)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(pos, _)| pos)?;
        let a = candidates.remove(best);
        live.push(normalized_archive[a].clone());

        let y = &archive.objectives()[a];
        added.push((
            archive.decisions()[a].clone(),
            y.clone(),
            weight_towards(y, reference),
        ));
    }

    Some(AwaPlan { removed, added })
}

/// Component-wise maximum of `points`, never below `reference`.
fn nadir<'a>(points: impl Iterator<Item = &'a Vec<f64>>, reference: &[f64]) -> Vec<f64> {
    let mut nadir = reference.to_vec();
    for p in points {
        for (n, &v) in nadir.iter_mut().zip(p) {
            *n = n.max(v);
        }
    }
    nadir
}

/// Product of the distances from `point` to its `k` nearest `others`.
fn sparsity_level<'a>(point: &[f64], others: impl Iterator<Item = &'a Vec<f64>>, k: usize) -> f64 {
    let mut distances: Vec<f64> = others.map(|o| euclidean(point, o)).collect();
    distances.sort_by(f64::total_cmp);
    distances.iter().take(k).product()
}

/// Weight whose Tchebycheff optimum lies on the ray from `reference`
/// through `y`: `wⱼ ∝ 1 / (yⱼ - zⱼ + eps)`.
pub(crate) fn weight_towards(y: &[f64], reference: &[f64]) -> Vec<f64> {
    let raw: Vec<f64> = y
        .iter()
        .zip(reference)
        .map(|(&v, &z)| 1.0 / ((v - z).max(0.0) + WEIGHT_EPS))
        .collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}
