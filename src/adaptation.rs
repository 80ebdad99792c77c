//! Self-adaptation of the per-subproblem Levy stability index.
//!
//! Each subproblem owns a two-slot buffer: a *parent* `beta` and an
//! *offspring* `beta`, each with the improvement indicator it earned. The
//! adapter alternates between two phases of `n_step` generations:
//!
//! 1. **Parent phase**: mutations use the parent `beta`; improvements are
//!    credited to the parent indicator. At the end, an offspring `beta` is
//!    proposed for every subproblem by a Levy flight from the parent
//!    towards the best-scoring neighbour's parent `beta`.
//! 2. **Offspring phase**: mutations use the offspring `beta`; improvements
//!    are credited to the offspring indicator. At the end, the offspring
//!    replaces the parent if its indicator is strictly larger. Both
//!    indicators are reset.
//!
//! Proposed values are clipped to `[betal, betau]`.

use crate::mutation::StableSampler;
use crate::mutation::levy;
use crate::neighborhood::NeighborTable;
use crate::rng_util;

/// Differences below this are treated as "no direction" when proposing.
const DIRECTION_EPS: f64 = 1e-12;

/// Which slot of the buffer is being assessed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Parent `beta` values are in use.
    Parent,
    /// Offspring `beta` values are in use.
    Offspring,
}

/// What happened at a phase boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseBoundary {
    /// The phase that just completed.
    pub completed: Phase,
    /// Indicators earned during the completed phase, one per subproblem.
    pub improvements: Vec<f64>,
    /// Offspring values that replaced their parent. Always 0 after a
    /// parent phase.
    pub promoted: usize,
}

/// Parameters of the adaptation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdaptationParams {
    /// Lower bound `betal`.
    pub beta_low: f64,
    /// Upper bound `betau`.
    pub beta_high: f64,
    /// Step scale of the proposal flight.
    pub alpha: f64,
    /// Stability index of the proposal flight.
    pub beta: f64,
    /// Phase length in generations.
    pub n_step: usize,
}

/// One side of a subproblem's buffer: a stability index and the
/// improvement it earned while in use.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    /// Levy stability index.
    pub beta: f64,
    /// Accumulated relative improvement.
    pub indicator: f64,
}

impl Slot {
    fn fresh(beta: f64) -> Self {
        Self {
            beta,
            indicator: 0.0,
        }
    }
}

impl Phase {
    /// Buffer index of the slot this phase assesses.
    fn slot(self) -> usize {
        match self {
            Self::Parent => PARENT,
            Self::Offspring => OFFSPRING,
        }
    }
}

const PARENT: usize = 0;
const OFFSPRING: usize = 1;

/// Two-slot parent/offspring buffer of stability indices.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StabilityAdapter {
    slots: Vec<[Slot; 2]>,
    phase: Phase,
    generations_in_phase: usize,
    params: AdaptationParams,
}

impl StabilityAdapter {
    /// Draw one parent `beta` per subproblem uniformly in the bounds.
    pub fn new(rng: &mut fastrand::Rng, n_pop: usize, params: AdaptationParams) -> Self {
        let slots = (0..n_pop)
            .map(|_| {
                let beta = rng_util::f64_range(rng, params.beta_low, params.beta_high);
                [Slot::fresh(beta); 2]
            })
            .collect();
        Self {
            slots,
            phase: Phase::Parent,
            generations_in_phase: 0,
            params,
        }
    }

    /// Number of subproblems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if there are no subproblems.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The phase currently being assessed.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The `[parent, offspring]` buffer of subproblem `i`.
    #[must_use]
    pub fn slots(&self, i: usize) -> &[Slot; 2] {
        &self.slots[i]
    }

    /// `beta` subproblem `i` mutates with in the current phase.
    #[must_use]
    pub fn beta(&self, i: usize) -> f64 {
        self.slots[i][self.phase.slot()].beta
    }

    /// Parent `beta` of every subproblem.
    #[must_use]
    pub fn parent_betas(&self) -> Vec<f64> {
        self.slots.iter().map(|s| s[PARENT].beta).collect()
    }

    /// Credit `improvement` to subproblem `i` in the current phase.
    pub fn record(&mut self, i: usize, improvement: f64) {
        self.slots[i][self.phase.slot()].indicator += improvement;
    }

    /// Indicators accumulated so far in the current phase.
    #[must_use]
    pub fn current_indicators(&self) -> Vec<f64> {
        let k = self.phase.slot();
        self.slots.iter().map(|s| s[k].indicator).collect()
    }

    /// Close a generation; every `n_step` generations the phase flips and
    /// the boundary is reported.
    pub fn end_generation(
        &mut self,
        table: &NeighborTable,
        rng: &mut fastrand::Rng,
    ) -> Option<PhaseBoundary> {
        self.generations_in_phase += 1;
        if self.generations_in_phase < self.params.n_step {
            return None;
        }
        self.generations_in_phase = 0;

        let completed = self.phase;
        let improvements = self.current_indicators();
        let promoted = match completed {
            Phase::Parent => {
                self.propose(table, rng);
                self.phase = Phase::Offspring;
                0
            }
            Phase::Offspring => {
                self.phase = Phase::Parent;
                self.select()
            }
        };
        Some(PhaseBoundary {
            completed,
            improvements,
            promoted,
        })
    }

    /// Propose an offspring `beta` for every subproblem.
    fn propose(&mut self, table: &NeighborTable, rng: &mut fastrand::Rng) {
        let AdaptationParams {
            beta_low,
            beta_high,
            alpha,
            beta,
            ..
        } = self.params;

        for i in 0..self.slots.len() {
            let best = table
                .neighbors(i)
                .iter()
                .copied()
                .max_by(|&a, &b| {
                    self.slots[a][PARENT]
                        .indicator
                        .total_cmp(&self.slots[b][PARENT].indicator)
                })
                .unwrap_or(i);
            let parent = self.slots[i][PARENT].beta;
            let mut direction = self.slots[best][PARENT].beta - parent;
            if direction.abs() < DIRECTION_EPS {
                direction = beta_high - beta_low;
            }
            let step = levy::levy_step(rng, beta, StableSampler::Mantegna);
            self.slots[i][OFFSPRING].beta =
                (parent + alpha * step * direction).clamp(beta_low, beta_high);
        }
    }

    /// Promote winning offspring and reset both indicators.
    fn select(&mut self) -> usize {
        let mut promoted = 0;
        for [parent, offspring] in &mut self.slots {
            if offspring.indicator > parent.indicator {
                parent.beta = offspring.beta;
                promoted += 1;
            }
            *parent = Slot::fresh(parent.beta);
            *offspring = *parent;
        }
        promoted
    }

    pub(crate) fn remove(&mut self, i: usize) {
        self.slots.remove(i);
    }

    /// Append a subproblem with a fresh parent `beta`. Its offspring slot
    /// mirrors the parent until the next proposal.
    pub(crate) fn push(&mut self, rng: &mut fastrand::Rng) {
        let beta = rng_util::f64_range(rng, self.params.beta_low, self.params.beta_high);
        self.slots.push([Slot::fresh(beta); 2]);
    }
}
