//! Run configuration.
//!
//! A [`Config`] is an immutable value assembled through [`ConfigBuilder`].
//! [`ConfigBuilder::build`] validates every field, including the derived
//! ones: it generates the weight vectors to learn the population size and
//! checks the neighborhood against it.
//!
//! # Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | `weights` | [`SimplexLattice`](WeightScheme::SimplexLattice) with 99 divisions (2 objectives) or `Auto { target: 100 }` |
//! | `neighborhood_size` | `min(20, n_pop)` |
//! | `delta` | 0.9 |
//! | `max_replacements` | 2 |
//! | `n_eval` | 10 000 |
//! | `decomposition` | [`Tchebycheff`](Decomposition::Tchebycheff) |
//! | `update` | [`Greedy`](UpdateMethod::Greedy) |
//! | `mutations` | Levy flight (`alpha = 1`) then polynomial (`eta = 20`) |
//! | `repair` | [`Clip`](Repair::Clip) |
//! | `priority` | [`Uniform`](PriorityScheme::Uniform) |
//! | `beta_bounds` | `(0.5, 2.0)` |
//! | `alpha_for_param`, `beta_for_param` | 0.1, 1.5 |
//! | `n_step` | 10 |
//! | `awa`, `archive_capacity`, `seed` | `None` |
//!
//! # Examples
//!
//! ```
//! use amoead::prelude::*;
//!
//! let config = Config::builder(2, 5)
//!     .bounds(Bounds::uniform(5, 0.0, 1.0))
//!     .weights(WeightScheme::SimplexLattice { divisions: 49 })
//!     .neighborhood_size(10)
//!     .n_eval(2_000)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.n_pop().unwrap(), 50);
//! ```

use crate::awa::AwaConfig;
use crate::decomposition::Decomposition;
use crate::error::{Error, Result};
use crate::mutation::{MutationSpec, MutationStage, Repair, StableSampler};
use crate::priority::PriorityScheme;
use crate::update::UpdateMethod;
use crate::weights::{self, WeightScheme};

const DEFAULT_NEIGHBORHOOD: usize = 20;

/// Box constraints on the decision space.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    ranges: Vec<(f64, f64)>,
}

impl Bounds {
    /// `n_var` variables sharing the range `[low, high]`.
    #[must_use]
    pub fn uniform(n_var: usize, low: f64, high: f64) -> Self {
        Self {
            ranges: vec![(low, high); n_var],
        }
    }

    /// One `(low, high)` pair per variable.
    #[must_use]
    pub fn per_variable(ranges: Vec<(f64, f64)>) -> Self {
        Self { ranges }
    }

    /// Pair separate lower and upper bound arrays.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundsDimensionMismatch`] if the arrays differ in
    /// length.
    pub fn from_arrays(xl: &[f64], xu: &[f64]) -> Result<Self> {
        if xl.len() != xu.len() {
            return Err(Error::BoundsDimensionMismatch {
                expected: xl.len(),
                got: xu.len(),
            });
        }
        Ok(Self {
            ranges: xl.iter().copied().zip(xu.iter().copied()).collect(),
        })
    }

    /// Number of variables.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.ranges.len()
    }

    /// `(low, high)` of variable `d`.
    #[must_use]
    pub fn get(&self, d: usize) -> (f64, f64) {
        self.ranges[d]
    }

    /// Lower bounds, one per variable.
    #[must_use]
    pub fn lower(&self) -> Vec<f64> {
        self.ranges.iter().map(|r| r.0).collect()
    }

    /// Upper bounds, one per variable.
    #[must_use]
    pub fn upper(&self) -> Vec<f64> {
        self.ranges.iter().map(|r| r.1).collect()
    }

    /// Check the bounds against `n_var` variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundsDimensionMismatch`] or [`Error::InvalidBounds`]
    /// when a range is empty, inverted or not finite.
    pub fn validate(&self, n_var: usize) -> Result<()> {
        if self.ranges.len() != n_var {
            return Err(Error::BoundsDimensionMismatch {
                expected: n_var,
                got: self.ranges.len(),
            });
        }
        for (dim, &(low, high)) in self.ranges.iter().enumerate() {
            if !(low.is_finite() && high.is_finite() && low < high) {
                return Err(Error::InvalidBounds { dim, low, high });
            }
        }
        Ok(())
    }
}

/// Everything a run needs besides the problem itself.
///
/// Construct through [`Config::builder`]; fields are public for reading
/// and for external loaders, and [`Config::validate`] re-checks a value
/// assembled by hand.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Number of objectives.
    pub n_obj: usize,
    /// Number of decision variables.
    pub n_var: usize,
    /// Box constraints.
    pub bounds: Bounds,
    /// Weight-vector layout; fixes the population size.
    pub weights: WeightScheme,
    /// Neighborhood size `T`, `None` for `min(20, n_pop)`.
    pub neighborhood_size: Option<usize>,
    /// Probability of mating and replacing within the neighborhood.
    pub delta: f64,
    /// Replacement cap `nr` per offspring.
    pub max_replacements: usize,
    /// Evaluation budget, initial population included.
    pub n_eval: usize,
    /// Scalarizing function.
    pub decomposition: Decomposition,
    /// Replacement policy.
    pub update: UpdateMethod,
    /// Mutation sequence, applied in order.
    pub mutations: Vec<MutationStage>,
    /// Boundary repair after every mutation stage.
    pub repair: Repair,
    /// Resource allocation.
    pub priority: PriorityScheme,
    /// Range `[betal, betau]` of the self-adapted Levy stability index.
    pub beta_bounds: (f64, f64),
    /// Step scale of the Levy flight proposing new `beta` values.
    pub alpha_for_param: f64,
    /// Stability index of the Levy flight proposing new `beta` values.
    pub beta_for_param: f64,
    /// Generations each `beta` candidate is assessed for.
    pub n_step: usize,
    /// Adaptive weight adjustment, disabled when `None`.
    pub awa: Option<AwaConfig>,
    /// Maximum external archive size, unbounded when `None`.
    pub archive_capacity: Option<usize>,
    /// Seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Config {
    /// Start a configuration for `n_obj` objectives over `n_var` variables.
    #[must_use]
    pub fn builder(n_obj: usize, n_var: usize) -> ConfigBuilder {
        ConfigBuilder::new(n_obj, n_var)
    }

    /// Generate the weight vectors this configuration describes.
    ///
    /// # Errors
    ///
    /// See [`weights::generate`].
    pub fn weight_vectors(&self) -> Result<Vec<Vec<f64>>> {
        weights::generate(self.n_obj, &self.weights)
    }

    /// Population size implied by the weight scheme.
    ///
    /// # Errors
    ///
    /// See [`weights::generate`].
    pub fn n_pop(&self) -> Result<usize> {
        self.weight_vectors().map(|w| w.len())
    }

    /// Neighborhood size for a population of `n_pop`.
    #[must_use]
    pub fn resolved_neighborhood(&self, n_pop: usize) -> usize {
        self.neighborhood_size
            .unwrap_or_else(|| DEFAULT_NEIGHBORHOOD.min(n_pop))
    }

    /// Check every field and return the population size.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found.
    pub fn validate(&self) -> Result<usize> {
        if self.n_obj < 2 {
            return Err(Error::invalid(
                "n_obj",
                format!("{} objectives given, at least 2 are required", self.n_obj),
            ));
        }
        if self.n_var == 0 {
            return Err(Error::invalid("n_var", "at least one variable is required"));
        }
        self.bounds.validate(self.n_var)?;

        let n_pop = self.n_pop()?;
        let t = self.resolved_neighborhood(n_pop);
        if t == 0 {
            return Err(Error::invalid("neighborhood_size", "must be at least 1"));
        }
        if t > n_pop {
            return Err(Error::NeighborhoodTooLarge { t, n_pop });
        }

        if !(0.0..=1.0).contains(&self.delta) {
            return Err(Error::invalid(
                "delta",
                format!("{} must be in [0, 1]", self.delta),
            ));
        }
        if self.max_replacements == 0 {
            return Err(Error::invalid("nr", "must be at least 1"));
        }
        if self.n_eval == 0 {
            return Err(Error::InvalidBudget);
        }

        self.decomposition.validate()?;
        if let UpdateMethod::Probabilistic { temperature } = self.update
            && !(temperature.is_finite() && temperature > 0.0)
        {
            return Err(Error::invalid(
                "temperature",
                format!("{temperature} must be positive"),
            ));
        }
        for stage in &self.mutations {
            stage.validate()?;
        }
        self.priority.validate()?;

        let (betal, betau) = self.beta_bounds;
        if !(betal > 0.0 && betal <= betau && betau <= 2.0) {
            return Err(Error::invalid(
                "beta_bounds",
                format!("[{betal}, {betau}] must satisfy 0 < betal <= betau <= 2"),
            ));
        }
        if !(self.alpha_for_param.is_finite() && self.alpha_for_param >= 0.0) {
            return Err(Error::invalid(
                "alpha_for_param",
                format!("{} must be non-negative", self.alpha_for_param),
            ));
        }
        if !(self.beta_for_param > 0.0 && self.beta_for_param <= 2.0) {
            return Err(Error::invalid(
                "beta_for_param",
                format!("{} must be in (0, 2]", self.beta_for_param),
            ));
        }
        if self.n_step == 0 {
            return Err(Error::invalid("n_step", "must be at least 1"));
        }
        if let Some(awa) = &self.awa {
            awa.validate()?;
        }
        if self.archive_capacity == Some(0) {
            return Err(Error::invalid("archive_capacity", "must be at least 1"));
        }
        Ok(n_pop)
    }
}

/// Fluent builder for [`Config`].
///
/// Scheme names are resolved when set, so most builder errors surface in
/// [`build`](Self::build) as the first recorded failure.
#[derive(Debug)]
pub struct ConfigBuilder {
    config: Config,
    error: Option<Error>,
}

impl ConfigBuilder {
    /// A builder with every default filled in and `[0, 1]` bounds.
    #[must_use]
    pub fn new(n_obj: usize, n_var: usize) -> Self {
        let weights = if n_obj == 2 {
            WeightScheme::SimplexLattice { divisions: 99 }
        } else {
            WeightScheme::Auto { target: 100 }
        };
        Self {
            config: Config {
                n_obj,
                n_var,
                bounds: Bounds::uniform(n_var, 0.0, 1.0),
                weights,
                neighborhood_size: None,
                delta: 0.9,
                max_replacements: 2,
                n_eval: 10_000,
                decomposition: Decomposition::default(),
                update: UpdateMethod::default(),
                mutations: vec![
                    MutationStage::LevyFlight {
                        alpha: 1.0,
                        sampler: StableSampler::Mantegna,
                    },
                    MutationStage::Polynomial {
                        eta: 20.0,
                        probability: None,
                    },
                ],
                repair: Repair::default(),
                priority: PriorityScheme::default(),
                beta_bounds: (0.5, 2.0),
                alpha_for_param: 0.1,
                beta_for_param: 1.5,
                n_step: 10,
                awa: None,
                archive_capacity: None,
                seed: None,
            },
            error: None,
        }
    }

    fn record(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Set the box constraints.
    #[must_use]
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.config.bounds = bounds;
        self
    }

    /// Set the weight-vector scheme.
    #[must_use]
    pub fn weights(mut self, scheme: WeightScheme) -> Self {
        self.config.weights = scheme;
        self
    }

    /// Set the neighborhood size `T`.
    #[must_use]
    pub fn neighborhood_size(mut self, t: usize) -> Self {
        self.config.neighborhood_size = Some(t);
        self
    }

    /// Set the probability of neighborhood-restricted mating.
    #[must_use]
    pub fn delta(mut self, delta: f64) -> Self {
        self.config.delta = delta;
        self
    }

    /// Set the replacement cap `nr`.
    #[must_use]
    pub fn max_replacements(mut self, nr: usize) -> Self {
        self.config.max_replacements = nr;
        self
    }

    /// Set the evaluation budget.
    #[must_use]
    pub fn n_eval(mut self, n_eval: usize) -> Self {
        self.config.n_eval = n_eval;
        self
    }

    /// Set the scalarizing function.
    #[must_use]
    pub fn decomposition(mut self, decomposition: Decomposition) -> Self {
        self.config.decomposition = decomposition;
        self
    }

    /// Set the scalarizing function by name.
    #[must_use]
    pub fn decomposition_name(mut self, name: &str) -> Self {
        match name.parse() {
            Ok(d) => self.config.decomposition = d,
            Err(e) => self.record(e),
        }
        self
    }

    /// Set the replacement policy.
    #[must_use]
    pub fn update(mut self, update: UpdateMethod) -> Self {
        self.config.update = update;
        self
    }

    /// Set the replacement policy by name.
    #[must_use]
    pub fn update_name(mut self, name: &str) -> Self {
        match name.parse() {
            Ok(u) => self.config.update = u,
            Err(e) => self.record(e),
        }
        self
    }

    /// Set the mutation sequence.
    #[must_use]
    pub fn mutations(mut self, stages: Vec<MutationStage>) -> Self {
        self.config.mutations = stages;
        self
    }

    /// Set the mutation sequence from named specs.
    #[must_use]
    pub fn mutation_specs(mut self, specs: &[MutationSpec]) -> Self {
        match specs.iter().map(MutationStage::try_from).collect() {
            Ok(stages) => self.config.mutations = stages,
            Err(e) => self.record(e),
        }
        self
    }

    /// Set the boundary repair.
    #[must_use]
    pub fn repair(mut self, repair: Repair) -> Self {
        self.config.repair = repair;
        self
    }

    /// Set the resource allocation scheme.
    #[must_use]
    pub fn priority(mut self, priority: PriorityScheme) -> Self {
        self.config.priority = priority;
        self
    }

    /// Set the `[betal, betau]` range of the adapted stability index.
    #[must_use]
    pub fn beta_bounds(mut self, betal: f64, betau: f64) -> Self {
        self.config.beta_bounds = (betal, betau);
        self
    }

    /// Set the Levy flight used to propose new stability indices.
    #[must_use]
    pub fn parameter_flight(mut self, alpha: f64, beta: f64) -> Self {
        self.config.alpha_for_param = alpha;
        self.config.beta_for_param = beta;
        self
    }

    /// Set the number of generations each stability index is assessed for.
    #[must_use]
    pub fn n_step(mut self, n_step: usize) -> Self {
        self.config.n_step = n_step;
        self
    }

    /// Enable adaptive weight adjustment.
    #[must_use]
    pub fn awa(mut self, awa: AwaConfig) -> Self {
        self.config.awa = Some(awa);
        self
    }

    /// Bound the external archive.
    #[must_use]
    pub fn archive_capacity(mut self, capacity: usize) -> Self {
        self.config.archive_capacity = Some(capacity);
        self
    }

    /// Seed the random number generator for reproducible runs.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validate and return the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first name-resolution error recorded by a setter, or
    /// the first failure of [`Config::validate`].
    pub fn build(self) -> Result<Config> {
        if let Some(err) = self.error {
            return Err(err);
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_build() {
        let config = Config::builder(2, 3).build().unwrap();
        assert_eq!(config.n_pop().unwrap(), 100);
        assert_eq!(config.resolved_neighborhood(100), 20);
        assert_eq!(config.mutations.len(), 2);
    }

    #[test]
    fn test_default_neighborhood_shrinks_with_population() {
        let config = Config::builder(2, 1)
            .weights(WeightScheme::SimplexLattice { divisions: 4 })
            .build()
            .unwrap();
        assert_eq!(config.resolved_neighborhood(5), 5);
    }

    #[test]
    fn test_bounds_validation() {
        assert!(matches!(
            Bounds::uniform(2, 1.0, 1.0).validate(2),
            Err(Error::InvalidBounds { dim: 0, .. })
        ));
        assert!(matches!(
            Bounds::uniform(2, 0.0, 1.0).validate(3),
            Err(Error::BoundsDimensionMismatch {
                expected: 3,
                got: 2
            })
        ));
        assert!(Bounds::from_arrays(&[0.0], &[1.0, 2.0]).is_err());
        let b = Bounds::from_arrays(&[0.0, -1.0], &[1.0, 2.0]).unwrap();
        assert_eq!(b.get(1), (-1.0, 2.0));
        assert_eq!(b.lower(), vec![0.0, -1.0]);
        assert_eq!(b.upper(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_first_setter_error_wins() {
        let err = Config::builder(2, 2)
            .update_name("elitist")
            .decomposition_name("nope")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownScheme { ref name, .. } if name == "elitist"));
    }

    #[test]
    fn test_beta_bounds_checked() {
        let err = Config::builder(2, 2).beta_bounds(1.5, 2.5).build().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter {
                name: "beta_bounds",
                ..
            }
        ));
    }
}
