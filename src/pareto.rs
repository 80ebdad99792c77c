//! Pareto dominance and front quality.
//!
//! All objectives are minimized. The archive uses [`dominates`] for its
//! acceptance test and [`crowding_distance`] for eviction when bounded;
//! [`hypervolume`] reports front quality.
//!
//! | Function | Purpose |
//! |---|---|
//! | [`dominates`] | Pareto dominance between two objective vectors |
//! | [`pareto_front_indices`] | Non-dominated members of a set |
//! | [`crowding_distance`] | Spread of each member within a front |
//! | [`hypervolume`] | Volume dominated by a front, bounded by a reference point |
//!
//! # Example
//!
//! ```
//! use amoead::pareto::{crowding_distance, hypervolume, pareto_front_indices};
//!
//! let solutions = vec![
//!     vec![1.0, 5.0],
//!     vec![5.0, 1.0],
//!     vec![3.0, 3.0],
//!     vec![4.0, 4.0], // dominated by (3, 3)
//! ];
//!
//! let front = pareto_front_indices(&solutions);
//! assert_eq!(front, vec![0, 1, 2]);
//!
//! let front_values: Vec<_> = front.iter().map(|&i| solutions[i].clone()).collect();
//! assert_eq!(hypervolume(&front_values, &[6.0, 6.0]), 13.0);
//! assert!(crowding_distance(&front_values)[0].is_infinite());
//! ```

use core::cmp::Ordering;

/// Returns `true` if `a` Pareto-dominates `b`: no worse in every
/// objective and strictly better in at least one.
#[must_use]
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    let mut better = false;
    for (av, bv) in a.iter().zip(b) {
        match av.partial_cmp(bv) {
            Some(Ordering::Less) => better = true,
            Some(Ordering::Equal) => {}
            _ => return false,
        }
    }
    better
}

/// Indices of the members of `values` that no other member dominates,
/// in ascending order. Duplicates are all kept.
#[must_use]
pub fn pareto_front_indices(values: &[Vec<f64>]) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !values.iter().any(|other| dominates(other, v)))
        .map(|(i, _)| i)
        .collect()
}

/// Crowding distance of every member of `front`, in the same order.
///
/// Boundary members (best or worst in any objective) get
/// [`f64::INFINITY`]; interior members get the normalized sum of the gaps
/// between their neighbors along each objective.
#[must_use]
pub fn crowding_distance(front: &[Vec<f64>]) -> Vec<f64> {
    let n = front.len();
    let mut distances = vec![0.0_f64; n];
    if n <= 2 {
        distances.fill(f64::INFINITY);
        return distances;
    }

    let mut order: Vec<usize> = (0..n).collect();
    for obj in 0..front[0].len() {
        order.sort_by(|&a, &b| front[a][obj].total_cmp(&front[b][obj]));
        let (first, last) = (order[0], order[n - 1]);
        distances[first] = f64::INFINITY;
        distances[last] = f64::INFINITY;

        let span = front[last][obj] - front[first][obj];
        if span <= 0.0 {
            continue;
        }
        for w in order.windows(3) {
            distances[w[1]] += (front[w[2]][obj] - front[w[0]][obj]) / span;
        }
    }
    distances
}

/// Hypervolume of `front` with respect to `reference_point`.
///
/// Members that do not strictly dominate the reference point contribute
/// nothing. Two objectives use a sweep; more objectives slice along the
/// last objective and recurse.
#[must_use]
pub fn hypervolume(front: &[Vec<f64>], reference_point: &[f64]) -> f64 {
    let inside: Vec<&[f64]> = front
        .iter()
        .map(Vec::as_slice)
        .filter(|p| p.iter().zip(reference_point).all(|(v, r)| v < r))
        .collect();
    slice_volume(inside, reference_point)
}

fn slice_volume(mut points: Vec<&[f64]>, reference: &[f64]) -> f64 {
    let d = reference.len();
    match (d, points.len()) {
        (_, 0) => 0.0,
        (1, _) => points.iter().map(|p| reference[0] - p[0]).fold(0.0, f64::max),
        (_, 1) => points[0].iter().zip(reference).map(|(p, r)| r - p).product(),
        (2, _) => {
            points.sort_by(|a, b| a[0].total_cmp(&b[0]));
            let mut volume = 0.0;
            let mut ceiling = reference[1];
            for p in points {
                if p[1] < ceiling {
                    volume += (reference[0] - p[0]) * (ceiling - p[1]);
                    ceiling = p[1];
                }
            }
            volume
        }
        _ => {
            points.sort_by(|a, b| a[d - 1].total_cmp(&b[d - 1]));
            let mut volume = 0.0;
            for k in 0..points.len() {
                let top = points.get(k + 1).map_or(reference[d - 1], |p| p[d - 1]);
                let depth = top - points[k][d - 1];
                if depth > 0.0 {
                    let base: Vec<&[f64]> = points[..=k].iter().map(|p| &p[..d - 1]).collect();
                    volume += depth * slice_volume(base, &reference[..d - 1]);
                }
            }
            volume
        }
    }
}
