//! Mating-partner and replacement-pool selection.

use crate::neighborhood::NeighborTable;

/// The mating partner and replacement pool chosen for one subproblem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Index of the donor used by the mutation stages.
    pub partner: usize,
    /// Slots the offspring may replace.
    pub pool: Vec<usize>,
    /// Whether the pool is the neighborhood (`true`) or the whole population.
    pub local: bool,
}

/// Pick the pool and partner for subproblem `i`.
///
/// With probability `delta` the pool is `table.neighbors(i)`, otherwise
/// every slot of the population. The partner is drawn uniformly from the
/// pool, skipping `i` itself whenever the pool has another member: a
/// donor equal to the parent makes the Levy flight a no-op.
pub fn select(
    rng: &mut fastrand::Rng,
    i: usize,
    table: &NeighborTable,
    n_pop: usize,
    delta: f64,
) -> Selection {
    let local = rng.f64() < delta;
    let pool: Vec<usize> = if local {
        table.neighbors(i).to_vec()
    } else {
        (0..n_pop).collect()
    };

    let candidates = pool.iter().filter(|&&k| k != i).count();
    let partner = if candidates == 0 {
        i
    } else {
        let pick = rng.usize(0..candidates);
        pool.iter()
            .copied()
            .filter(|&k| k != i)
            .nth(pick)
            .unwrap_or(i)
    };

    Selection {
        partner,
        pool,
        local,
    }
}
