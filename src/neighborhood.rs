//! Neighbor tables over weight vectors.

use crate::error::{Error, Result};

/// For each subproblem, the indices of its `T` nearest weight vectors.
///
/// Rows are sorted ascending by Euclidean distance with ties broken by
/// index, so row `i` always starts with `i` itself (distance 0).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborTable {
    rows: Vec<Vec<usize>>,
}

impl NeighborTable {
    /// Compute `T`-nearest neighborhoods for a weight set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NeighborhoodTooLarge`] if `t > weights.len()` and
    /// [`Error::InvalidParameter`] if `t == 0`.
    pub fn build(weights: &[Vec<f64>], t: usize) -> Result<Self> {
        let n = weights.len();
        if t > n {
            return Err(Error::NeighborhoodTooLarge { t, n_pop: n });
        }
        if t == 0 {
            return Err(Error::invalid("neighborhood_size", "must be positive"));
        }

        let rows = weights
            .iter()
            .enumerate()
            .map(|(i, wi)| {
                let mut distances: Vec<(usize, f64)> = weights
                    .iter()
                    .enumerate()
                    .map(|(j, wj)| (j, if i == j { 0.0 } else { euclidean(wi, wj) }))
                    .collect();
                // Stable sort keeps index order among equal distances.
                distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(core::cmp::Ordering::Equal));
                // A duplicated weight vector can tie with `i` at distance 0.
                if let Some(pos) = distances.iter().position(|&(j, _)| j == i) {
                    let own = distances.remove(pos);
                    distances.insert(0, own);
                }
                distances.into_iter().take(t).map(|(idx, _)| idx).collect()
            })
            .collect();

        Ok(Self { rows })
    }

    /// The neighbors of subproblem `i`, nearest first.
    #[must_use]
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.rows[i]
    }

    /// Number of rows (equals the population size).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Neighborhood size `T`.
    #[must_use]
    pub fn size(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Iterate over all rows in subproblem order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

pub(crate) fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::das_dennis;

    #[test]
    fn test_build_neighborhoods() {
        let weights = vec![vec![1.0, 0.0], vec![0.5, 0.5], vec![0.0, 1.0]];
        let table = NeighborTable::build(&weights, 2).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.iter().all(|row| row.len() == 2));
        assert_eq!(table.neighbors(0), &[0, 1]);
        assert_eq!(table.neighbors(2), &[2, 1]);
    }

    #[test]
    fn test_ties_broken_by_index() {
        let weights = vec![vec![1.0, 0.0], vec![0.5, 0.5], vec![0.0, 1.0]];
        let table = NeighborTable::build(&weights, 3).unwrap();
        // 0 and 2 are equidistant from 1
        assert_eq!(table.neighbors(1), &[1, 0, 2]);
    }

    #[test]
    fn test_rows_ascending_by_distance() {
        let weights = das_dennis(3, 6);
        let table = NeighborTable::build(&weights, 7).unwrap();
        for (i, row) in table.iter().enumerate() {
            assert_eq!(row[0], i);
            let d: Vec<f64> = row.iter().map(|&j| euclidean(&weights[i], &weights[j])).collect();
            assert!(d.windows(2).all(|p| p[0] <= p[1]), "row {i} not sorted: {d:?}");
        }
    }

    #[test]
    fn test_duplicate_weight_keeps_self_first() {
        let weights = vec![vec![0.5, 0.5], vec![0.5, 0.5], vec![1.0, 0.0]];
        let table = NeighborTable::build(&weights, 2).unwrap();
        assert_eq!(table.neighbors(1), &[1, 0]);
    }

    #[test]
    fn test_too_large() {
        let weights = das_dennis(2, 3);
        let err = NeighborTable::build(&weights, 5).unwrap_err();
        assert!(matches!(err, Error::NeighborhoodTooLarge { t: 5, n_pop: 4 }));
    }
}
