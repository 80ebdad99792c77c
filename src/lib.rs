#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Adaptive MOEA/D: a decomposition-based multi-objective evolutionary
//! optimizer for black-box, box-constrained continuous problems.
//!
//! The problem is split into scalar subproblems, one per weight vector on
//! the objective simplex. Each subproblem keeps one solution, mates within
//! its neighborhood and hands improvements on to its neighbors. On top of
//! the classic algorithm, every subproblem self-adapts the stability index
//! of its Levy-flight mutation, and the evaluation budget can be rationed
//! across subproblems through priorities.
//!
//! # Getting Started
//!
//! ```
//! use amoead::prelude::*;
//!
//! // ZDT1 with 5 variables
//! let zdt1 = |x: &[f64]| {
//!     let g = 1.0 + 9.0 * x[1..].iter().sum::<f64>() / 4.0;
//!     Ok::<_, String>(vec![x[0], g * (1.0 - (x[0] / g).sqrt())])
//! };
//!
//! let config = Config::builder(2, 5)
//!     .weights(WeightScheme::SimplexLattice { divisions: 29 })
//!     .neighborhood_size(6)
//!     .n_eval(3_000)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let mut moead = Moead::new(config, zdt1).unwrap();
//! let result = moead.run().unwrap();
//! println!(
//!     "{} non-dominated solutions after {} generations",
//!     result.archive.len(),
//!     result.generation
//! );
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Moead`] | Drive the run: sweep subproblems, adapt, report snapshots. |
//! | [`Config`] | Immutable run configuration, built with [`ConfigBuilder`]. |
//! | [`Problem`] | The objective function; closures implement it. |
//! | [`Snapshot`] | Population, weights, archive and counters at a generation boundary. |
//! | [`ExternalArchive`] | Every non-dominated solution found so far. |
//!
//! # Strategies
//!
//! | Concern | Type | Variants |
//! |---------|------|----------|
//! | Weight layout | [`WeightScheme`](weights::WeightScheme) | simplex lattice, two-layer, auto |
//! | Scalarization | [`Decomposition`](decomposition::Decomposition) | Tchebycheff, modified Tchebycheff, weighted sum, PBI, angular PBI |
//! | Replacement | [`UpdateMethod`](update::UpdateMethod) | greedy, strict, probabilistic |
//! | Mutation | [`MutationStage`](mutation::MutationStage) | Levy flight, polynomial |
//! | Repair | [`Repair`](mutation::Repair) | clip, reflect |
//! | Budget allocation | [`PriorityScheme`](priority::PriorityScheme) | uniform, fixed, index power, random rank, improvement |
//!
//! Every strategy also resolves from its configuration name; unknown names
//! fail with [`Error::UnknownScheme`].
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on public types, [`Snapshot::to_json`]/[`Snapshot::from_json`] | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at run and generation boundaries | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod adaptation;
pub mod archive;
pub mod awa;
pub mod config;
pub mod decomposition;
mod error;
pub mod mutation;
pub mod neighborhood;
pub mod optimizer;
pub mod pareto;
pub mod population;
pub mod priority;
pub mod problem;
pub mod reference;
mod rng_util;
pub mod selection;
pub mod snapshot;
pub mod update;
pub mod weights;

pub use archive::ExternalArchive;
pub use config::{Bounds, Config, ConfigBuilder};
pub use error::{Error, Result, SchemeKind};
pub use optimizer::{GenerationStats, Moead};
pub use problem::Problem;
pub use snapshot::Snapshot;

/// Convenient wildcard import for the most common types.
///
/// ```
/// use amoead::prelude::*;
/// ```
pub mod prelude {
    pub use crate::archive::ExternalArchive;
    pub use crate::awa::AwaConfig;
    pub use crate::config::{Bounds, Config, ConfigBuilder};
    pub use crate::decomposition::Decomposition;
    pub use crate::error::{Error, Result, SchemeKind};
    pub use crate::mutation::{MutationSpec, MutationStage, Repair, StableSampler};
    pub use crate::optimizer::{GenerationStats, Moead};
    pub use crate::population::Population;
    pub use crate::priority::PriorityScheme;
    pub use crate::problem::Problem;
    pub use crate::snapshot::Snapshot;
    pub use crate::update::UpdateMethod;
    pub use crate::weights::WeightScheme;
}
