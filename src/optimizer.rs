//! The MOEA/D main loop.
//!
//! [`Moead`] owns every per-run store and advances them one generation at
//! a time. A generation is a sweep over a random permutation of the
//! subproblems; each subproblem that passes its priority gate goes through
//!
//! select → mutate → evaluate → archive → reference point → replacement
//!
//! and later subproblems of the same sweep see the replacements made by
//! earlier ones. After the sweep come adaptive weight adjustment (when
//! configured and due) and the stability-index adaptation.
//!
//! The run ends once the evaluation counter reaches `n_eval`; the counter
//! starts at `n_pop` for the initial population and is checked before
//! every subproblem, so a sweep may end part-way.
//!
//! # Examples
//!
//! ```
//! use amoead::prelude::*;
//!
//! let config = Config::builder(2, 3)
//!     .weights(WeightScheme::SimplexLattice { divisions: 19 })
//!     .neighborhood_size(5)
//!     .n_eval(400)
//!     .seed(1)
//!     .build()
//!     .unwrap();
//! let problem = |x: &[f64]| Ok::<_, String>(vec![x[0], 1.0 - x[0].sqrt() + x[1] + x[2]]);
//!
//! let mut moead = Moead::new(config, problem).unwrap();
//! let snapshot = moead.run().unwrap();
//! assert_eq!(snapshot.evaluations, 400);
//! assert!(!snapshot.archive.is_empty());
//! ```

use core::ops::ControlFlow;

use crate::adaptation::{AdaptationParams, StabilityAdapter};
use crate::archive::ExternalArchive;
use crate::awa::{self, AwaConfig};
use crate::config::Config;
use crate::error::Result;
use crate::mutation;
use crate::neighborhood::NeighborTable;
use crate::population::Population;
use crate::problem::{Problem, evaluate_checked};
use crate::reference::ReferencePoint;
use crate::rng_util;
use crate::selection;
use crate::snapshot::Snapshot;
use crate::update::ReplacementContext;

/// Counters of one completed generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Subproblems that passed the priority gate and were evaluated.
    pub sampled: usize,
    /// Population slots overwritten by offspring.
    pub replacements: usize,
    /// Subproblems replaced by weight adjustment.
    pub reshaped: usize,
}

/// An adaptive MOEA/D run over a [`Problem`].
pub struct Moead<P: Problem> {
    problem: P,
    config: Config,
    rng: fastrand::Rng,
    weights: Vec<Vec<f64>>,
    neighbors: NeighborTable,
    population: Population,
    reference: ReferencePoint,
    archive: ExternalArchive,
    priorities: Vec<f64>,
    adapter: StabilityAdapter,
    evaluations: usize,
    generation: usize,
}

impl<P: Problem> Moead<P> {
    /// Validate `config`, then sample and evaluate the initial population.
    ///
    /// The initial population counts as `n_pop` evaluations.
    ///
    /// # Errors
    ///
    /// Returns any configuration error from [`Config::validate`] and any
    /// evaluation error of the initial population.
    pub fn new(config: Config, problem: P) -> Result<Self> {
        let n_pop = config.validate()?;
        let mut rng = config
            .seed
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

        let weights = config.weight_vectors()?;
        let t = config.resolved_neighborhood(n_pop);
        let neighbors = NeighborTable::build(&weights, t)?;

        let population = Population::init(&mut rng, n_pop, &config.bounds, &problem, config.n_obj)?;
        let reference = ReferencePoint::from_objectives(population.objectives());
        let archive = ExternalArchive::from_population(
            population.decisions(),
            population.objectives(),
            config.archive_capacity,
        );

        let (beta_low, beta_high) = config.beta_bounds;
        let adapter = StabilityAdapter::new(
            &mut rng,
            n_pop,
            AdaptationParams {
                beta_low,
                beta_high,
                alpha: config.alpha_for_param,
                beta: config.beta_for_param,
                n_step: config.n_step,
            },
        );
        let priorities = config.priority.initial(n_pop, &mut rng);

        trace_info!(
            n_pop,
            neighborhood = t,
            n_eval = config.n_eval,
            archive = archive.len(),
            "moead initialized"
        );

        Ok(Self {
            problem,
            config,
            rng,
            weights,
            neighbors,
            population,
            reference,
            archive,
            priorities,
            adapter,
            evaluations: n_pop,
            generation: 1,
        })
    }

    /// Whether the evaluation budget is spent.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.evaluations >= self.config.n_eval
    }

    /// Run one generation: the sweep, then weight adjustment and
    /// stability-index adaptation unless the budget ran out.
    ///
    /// # Errors
    ///
    /// Returns the first evaluation error. Replacements already applied in
    /// this generation are kept.
    pub fn step(&mut self) -> Result<GenerationStats> {
        let mut stats = GenerationStats::default();
        if self.is_finished() {
            return Ok(stats);
        }
        let order = rng_util::permutation(&mut self.rng, self.population.len());

        for i in order {
            if self.is_finished() {
                break;
            }
            if self.rng.f64() > self.priorities[i] {
                continue;
            }
            stats.sampled += 1;
            stats.replacements += self.evolve_subproblem(i)?;
        }

        let finished = self.is_finished();
        if !finished && let Some(awa) = self.config.awa {
            stats.reshaped = self.adjust_weights(&awa)?;
        }

        self.generation += 1;

        if !finished
            && let Some(boundary) = self.adapter.end_generation(&self.neighbors, &mut self.rng)
        {
            self.config
                .priority
                .refresh(&mut self.priorities, &boundary.improvements);
            trace_debug!(
                generation = self.generation,
                completed = ?boundary.completed,
                promoted = boundary.promoted,
                "stability index phase completed"
            );
        }

        trace_debug!(
            generation = self.generation,
            evaluations = self.evaluations,
            sampled = stats.sampled,
            replacements = stats.replacements,
            archive = self.archive.len(),
            "generation completed"
        );
        Ok(stats)
    }

    /// Produce, evaluate and place one offspring for subproblem `i`.
    /// Returns the number of replacements.
    fn evolve_subproblem(&mut self, i: usize) -> Result<usize> {
        let selection = selection::select(
            &mut self.rng,
            i,
            &self.neighbors,
            self.population.len(),
            self.config.delta,
        );

        let child = mutation::mutate(
            &mut self.rng,
            &self.config.mutations,
            self.population.x(i),
            self.population.x(selection.partner),
            self.adapter.beta(i),
            &self.config.bounds,
            self.config.repair,
        );

        self.evaluations += 1;
        let y = evaluate_checked(&self.problem, &child, self.config.n_obj)?;

        self.archive.insert(&child, &y);
        self.reference.update(&y);

        let ctx = ReplacementContext {
            weights: &self.weights,
            reference: self.reference.as_slice(),
            decomposition: &self.config.decomposition,
            max_replacements: self.config.max_replacements,
        };
        let outcome = self.config.update.replace(
            &mut self.rng,
            &selection.pool,
            &child,
            &y,
            &mut self.population,
            &ctx,
        );
        self.adapter.record(i, outcome.improvement);
        Ok(outcome.replacements)
    }

    /// Apply one weight adjustment if it is due. Returns the number of
    /// subproblems replaced.
    fn adjust_weights(&mut self, awa: &AwaConfig) -> Result<usize> {
        if !awa.is_due(self.generation) {
            return Ok(0);
        }
        let Some(plan) = awa::plan(
            awa,
            &self.population,
            &self.archive,
            self.reference.as_slice(),
        ) else {
            return Ok(0);
        };

        for &r in &plan.removed {
            self.population.remove(r);
            self.weights.remove(r);
            self.priorities.remove(r);
            self.adapter.remove(r);
        }
        let reshaped = plan.added.len();
        for (x, y, w) in plan.added {
            self.population.push(x, y);
            self.weights.push(w);
            self.priorities.push(self.config.priority.fresh_value());
            self.adapter.push(&mut self.rng);
        }
        self.neighbors = NeighborTable::build(&self.weights, self.neighbors.size())?;

        trace_info!(
            generation = self.generation,
            reshaped,
            "weight vectors adjusted"
        );
        Ok(reshaped)
    }

    /// Run until the budget is spent and return the final snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first evaluation error.
    pub fn run(&mut self) -> Result<Snapshot> {
        self.run_with(|_| ControlFlow::Continue(()))
    }

    /// Like [`run`](Self::run), calling `recorder` with a snapshot at the
    /// start of every generation. Returning [`ControlFlow::Break`] stops
    /// the run before that generation's sweep.
    ///
    /// # Errors
    ///
    /// Returns the first evaluation error.
    pub fn run_with<F>(&mut self, mut recorder: F) -> Result<Snapshot>
    where
        F: FnMut(&Snapshot) -> ControlFlow<()>,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "moead_run",
            n_pop = self.population.len(),
            n_eval = self.config.n_eval
        )
        .entered();

        while !self.is_finished() {
            if recorder(&self.snapshot()).is_break() {
                trace_info!(
                    generation = self.generation,
                    evaluations = self.evaluations,
                    "run stopped by recorder"
                );
                return Ok(self.snapshot());
            }
            self.step()?;
        }

        trace_info!(
            generation = self.generation,
            evaluations = self.evaluations,
            archive = self.archive.len(),
            "run completed"
        );
        Ok(self.snapshot())
    }

    /// Copy the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: 1,
            population: self.population.clone(),
            weights: self.weights.clone(),
            archive: self.archive.clone(),
            reference: self.reference.as_slice().to_vec(),
            evaluations: self.evaluations,
            generation: self.generation,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current population.
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Weight vectors, aligned with population slots.
    #[must_use]
    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    /// Neighbor table of the current weights.
    #[must_use]
    pub fn neighbors(&self) -> &NeighborTable {
        &self.neighbors
    }

    /// External archive.
    #[must_use]
    pub fn archive(&self) -> &ExternalArchive {
        &self.archive
    }

    /// Reference point.
    #[must_use]
    pub fn reference(&self) -> &[f64] {
        self.reference.as_slice()
    }

    /// Priority of every subproblem.
    #[must_use]
    pub fn priorities(&self) -> &[f64] {
        &self.priorities
    }

    /// Stability-index adaptation state.
    #[must_use]
    pub fn adapter(&self) -> &StabilityAdapter {
        &self.adapter
    }

    /// Evaluations consumed so far.
    #[must_use]
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Generation counter, starting at 1.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;
    use crate::priority::PriorityScheme;
    use crate::weights::WeightScheme;

    fn schaffer(x: &[f64]) -> core::result::Result<Vec<f64>, String> {
        Ok(vec![x[0] * x[0], (x[0] - 2.0).powi(2)])
    }

    fn config(n_eval: usize) -> Config {
        Config::builder(2, 1)
            .bounds(Bounds::uniform(1, -5.0, 5.0))
            .weights(WeightScheme::SimplexLattice { divisions: 9 })
            .neighborhood_size(3)
            .n_eval(n_eval)
            .n_step(2)
            .seed(11)
            .build()
            .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let moead = Moead::new(config(100), schaffer).unwrap();
        assert_eq!(moead.evaluations(), 10);
        assert_eq!(moead.generation(), 1);
        assert_eq!(moead.population().len(), 10);
        assert_eq!(moead.neighbors().size(), 3);
        assert!(!moead.archive().is_empty());
    }

    #[test]
    fn test_budget_below_population_finishes_immediately() {
        let mut moead = Moead::new(config(4), schaffer).unwrap();
        assert!(moead.is_finished());
        let snap = moead.run().unwrap();
        assert_eq!(snap.evaluations, 10);
        assert_eq!(snap.generation, 1);
    }

    #[test]
    fn test_counter_matches_sampled_subproblems() {
        let config = Config {
            priority: PriorityScheme::IndexPower { exponent: 2.0 },
            ..config(10_000)
        };
        let mut moead = Moead::new(config, schaffer).unwrap();
        for _ in 0..20 {
            let before = moead.evaluations();
            let stats = moead.step().unwrap();
            assert_eq!(moead.evaluations() - before, stats.sampled);
            assert!(stats.sampled <= 10);
        }
    }

    #[test]
    fn test_run_stops_exactly_at_budget() {
        let mut moead = Moead::new(config(137), schaffer).unwrap();
        let snap = moead.run().unwrap();
        assert_eq!(snap.evaluations, 137);
        assert!(moead.is_finished());
    }

    #[test]
    fn test_evaluation_error_aborts() {
        let failing = |x: &[f64]| {
            if x[0] > 4.0 {
                Err("out of domain".to_owned())
            } else {
                Ok(vec![x[0], -x[0]])
            }
        };
        let config = Config {
            bounds: Bounds::uniform(1, 0.0, 10.0),
            ..config(5_000)
        };
        match Moead::new(config, failing) {
            Err(crate::Error::Evaluation { x, message }) => {
                assert!(x[0] > 4.0);
                assert_eq!(message, "out of domain");
            }
            Ok(mut moead) => {
                let err = moead.run().unwrap_err();
                assert!(matches!(err, crate::Error::Evaluation { .. }));
            }
            Err(other) => panic!("unexpected error {other}"),
        }
    }
}
