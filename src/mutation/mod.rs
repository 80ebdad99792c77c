//! Mutation operators and boundary repair.
//!
//! Offspring are produced by running the parent through a configured
//! sequence of [`MutationStage`]s. Each stage consumes the previous stage's
//! output, and every stage is followed by [`Repair`] so later stages always
//! receive in-bound coordinates.
//!
//! | Stage | Effect |
//! |-------|--------|
//! | [`LevyFlight`](MutationStage::LevyFlight) | `xᵢ + α * step * (xᵢ - xⱼ)`, `step` drawn from a stable law with index `β` |
//! | [`Polynomial`](MutationStage::Polynomial) | Deb's polynomial mutation with index `η` |
//!
//! The stability index `β` is per subproblem and self-adapted during the
//! run, so it is passed explicitly to [`mutate`] rather than stored on the
//! stage.
//!
//! # Examples
//!
//! ```
//! use amoead::config::Bounds;
//! use amoead::mutation::{MutationStage, Repair, StableSampler, mutate};
//!
//! let stages = [
//!     MutationStage::LevyFlight { alpha: 0.5, sampler: StableSampler::Mantegna },
//!     MutationStage::Polynomial { eta: 20.0, probability: None },
//! ];
//! let bounds = Bounds::uniform(3, 0.0, 1.0);
//! let mut rng = fastrand::Rng::with_seed(42);
//! let child = mutate(&mut rng, &stages, &[0.2, 0.5, 0.9], &[0.4, 0.1, 0.3], 1.5, &bounds, Repair::Clip);
//! assert!(child.iter().all(|v| (0.0..=1.0).contains(v)));
//! ```

pub mod levy;
mod polynomial;

use core::str::FromStr;
use std::collections::HashMap;

pub use levy::StableSampler;

use crate::config::Bounds;
use crate::error::{Error, Result, SchemeKind};

/// One step of the mutation sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationStage {
    /// Levy-flight perturbation relative to a donor individual.
    LevyFlight {
        /// Scale factor applied to every step.
        alpha: f64,
        /// Stable-law sampler.
        sampler: StableSampler,
    },
    /// Polynomial mutation.
    Polynomial {
        /// Distribution index; larger values give smaller perturbations.
        eta: f64,
        /// Per-coordinate mutation probability. Default: `1 / n_var`.
        probability: Option<f64>,
    },
}

impl MutationStage {
    /// Validate stage parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for a non-positive `alpha`, a
    /// negative `eta`, or a probability outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::LevyFlight { alpha, .. } => {
                if !(alpha.is_finite() && alpha > 0.0) {
                    return Err(Error::invalid("alpha", format!("{alpha} must be positive")));
                }
            }
            Self::Polynomial { eta, probability } => {
                if !(eta.is_finite() && eta >= 0.0) {
                    return Err(Error::invalid("etam", format!("{eta} must be non-negative")));
                }
                if let Some(p) = probability
                    && !(0.0..=1.0).contains(&p)
                {
                    return Err(Error::invalid("probability", format!("{p} must be in [0, 1]")));
                }
            }
        }
        Ok(())
    }
}

/// A named mutation with numeric parameters, as found in configuration.
///
/// | Name | Parameters |
/// |------|-----------|
/// | `levy`, `levy-flight` | `alpha` (default 1.0) |
/// | `levy-cms` | `alpha` (default 1.0), Chambers-Mallows-Stuck sampler |
/// | `polynomial` | `etam` (default 20.0), `probability` (default `1/n_var`) |
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MutationSpec {
    /// Mutation name.
    pub name: String,
    /// Numeric parameters by name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: HashMap<String, f64>,
}

impl MutationSpec {
    /// A spec without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: HashMap::new(),
        }
    }

    /// Add a parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: f64) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

impl TryFrom<&MutationSpec> for MutationStage {
    type Error = Error;

    fn try_from(spec: &MutationSpec) -> Result<Self> {
        let get = |key: &str, default: f64| spec.params.get(key).copied().unwrap_or(default);
        let stage = match spec.name.as_str() {
            "levy" | "levy-flight" => Self::LevyFlight {
                alpha: get("alpha", 1.0),
                sampler: StableSampler::Mantegna,
            },
            "levy-cms" => Self::LevyFlight {
                alpha: get("alpha", 1.0),
                sampler: StableSampler::ChambersMallowsStuck,
            },
            "polynomial" => Self::Polynomial {
                eta: get("etam", 20.0),
                probability: spec.params.get("probability").copied(),
            },
            other => return Err(Error::unknown(SchemeKind::Mutation, other)),
        };
        stage.validate()?;
        Ok(stage)
    }
}

/// How out-of-bound coordinates are brought back into range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Repair {
    /// Clamp to the violated bound.
    #[default]
    Clip,
    /// Mirror at the violated bound; values that overshoot the whole range
    /// are clamped.
    Reflect,
}

impl Repair {
    /// Repair every coordinate of `x` in place.
    pub fn apply(self, x: &mut [f64], bounds: &Bounds) {
        for (d, v) in x.iter_mut().enumerate() {
            let (low, high) = bounds.get(d);
            if v.is_nan() {
                *v = low;
                continue;
            }
            *v = match self {
                Self::Clip => v.clamp(low, high),
                Self::Reflect => {
                    let r = if *v < low {
                        low + (low - *v)
                    } else if *v > high {
                        high - (*v - high)
                    } else {
                        *v
                    };
                    r.clamp(low, high)
                }
            };
        }
    }
}

impl FromStr for Repair {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "clip" => Ok(Self::Clip),
            "reflect" => Ok(Self::Reflect),
            other => Err(Error::unknown(SchemeKind::Repair, other)),
        }
    }
}

/// Run `parent` through every stage, repairing after each one.
///
/// `donor` is the mating partner used by Levy flights and `beta` the
/// stability index of the parent's subproblem.
#[allow(clippy::cast_precision_loss)]
pub fn mutate(
    rng: &mut fastrand::Rng,
    stages: &[MutationStage],
    parent: &[f64],
    donor: &[f64],
    beta: f64,
    bounds: &Bounds,
    repair: Repair,
) -> Vec<f64> {
    let mut x = parent.to_vec();
    for stage in stages {
        match *stage {
            MutationStage::LevyFlight { alpha, sampler } => {
                for (v, &xj) in x.iter_mut().zip(donor) {
                    let step = levy::levy_step(rng, beta, sampler);
                    *v += alpha * step * (*v - xj);
                }
            }
            MutationStage::Polynomial { eta, probability } => {
                let p = probability.unwrap_or(1.0 / x.len().max(1) as f64);
                polynomial::mutate(rng, &mut x, bounds, eta, p);
            }
        }
        repair.apply(&mut x, bounds);
    }
    x
}
