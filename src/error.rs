use core::fmt;

/// The family of a named strategy, used to report unknown names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchemeKind {
    /// A weight-vector generation scheme.
    Weights,
    /// A decomposition (scalarization) method.
    Decomposition,
    /// A neighborhood replacement policy.
    Update,
    /// A mutation stage.
    Mutation,
    /// A resource-allocation priority scheme.
    Priority,
    /// A boundary repair strategy.
    Repair,
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Weights => "weight scheme",
            Self::Decomposition => "decomposition method",
            Self::Update => "update method",
            Self::Mutation => "mutation",
            Self::Priority => "priority function",
            Self::Repair => "boundary repair",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a strategy name is not recognized.
    #[error("unknown {kind}: '{name}'")]
    UnknownScheme {
        /// The strategy family that was looked up.
        kind: SchemeKind,
        /// The name that failed to resolve.
        name: String,
    },

    /// Returned when a lower bound is not strictly below its upper bound.
    #[error("invalid bounds for variable {dim}: low ({low}) must be less than high ({high})")]
    InvalidBounds {
        /// The decision variable index.
        dim: usize,
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when per-variable bounds do not match the number of variables.
    #[error("bounds dimension mismatch: expected {expected} bounds but got {got}")]
    BoundsDimensionMismatch {
        /// The number of decision variables.
        expected: usize,
        /// The number of bounds provided.
        got: usize,
    },

    /// Returned when the neighborhood is larger than the population.
    #[error("neighborhood size {t} exceeds population size {n_pop}")]
    NeighborhoodTooLarge {
        /// The requested neighborhood size.
        t: usize,
        /// The population size derived from the weight vectors.
        n_pop: usize,
    },

    /// Returned when the evaluation budget is zero.
    #[error("evaluation budget must be positive")]
    InvalidBudget,

    /// Returned when a numeric parameter is outside its valid range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The name of the parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Returned when a required named parameter is absent from a scheme spec.
    #[error("{kind} '{scheme}' requires parameter '{param}'")]
    MissingParameter {
        /// The strategy family.
        kind: SchemeKind,
        /// The scheme name.
        scheme: String,
        /// The missing parameter name.
        param: &'static str,
    },

    /// Returned when the weight scheme yields no usable weight vectors.
    #[error("weight scheme produced {got} weight vectors, at least 2 are required")]
    TooFewWeights {
        /// The number of weight vectors produced.
        got: usize,
    },

    /// Returned when the objective function fails for a decision vector.
    #[error("evaluation failed at x = {x:?}: {message}")]
    Evaluation {
        /// The decision vector that was being evaluated.
        x: Vec<f64>,
        /// The error reported by the problem.
        message: String,
    },

    /// Returned when the objective returns the wrong number of values.
    #[error("objective dimension mismatch: expected {expected} values, got {got}")]
    ObjectiveDimensionMismatch {
        /// The expected number of objective values.
        expected: usize,
        /// The actual number of objective values returned.
        got: usize,
    },
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub(crate) fn unknown(kind: SchemeKind, name: &str) -> Self {
        Self::UnknownScheme {
            kind,
            name: name.to_owned(),
        }
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
