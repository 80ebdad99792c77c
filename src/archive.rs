//! External archive of non-dominated solutions.
//!
//! The archive keeps every objective vector found during a run that no
//! other archived vector dominates. Membership is checked before anything
//! is modified, so a rejected insert leaves the archive untouched.
//! Insertion is a linear scan over the members.
//!
//! When a capacity is set and an insert overflows it, the member with the
//! smallest crowding distance is evicted. Boundary members have infinite
//! crowding distance and are evicted last.

use crate::pareto;

/// A Pareto non-dominated set of `(x, y)` pairs.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalArchive {
    x: Vec<Vec<f64>>,
    y: Vec<Vec<f64>>,
    capacity: Option<usize>,
}

impl ExternalArchive {
    /// An empty archive, bounded when `capacity` is `Some`.
    #[must_use]
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            capacity,
        }
    }

    /// The non-dominated subset of a population, duplicates collapsed.
    #[must_use]
    pub fn from_population(x: &[Vec<f64>], y: &[Vec<f64>], capacity: Option<usize>) -> Self {
        let mut archive = Self::new(capacity);
        for (xi, yi) in x.iter().zip(y) {
            archive.insert(xi, yi);
        }
        archive
    }

    /// Offer `(x, y)` to the archive.
    ///
    /// Rejected when an existing member dominates `y` or has exactly the
    /// same objective vector. Otherwise every member `y` dominates is
    /// dropped and the pair is stored. Returns `true` if the pair is a
    /// member afterwards.
    pub fn insert(&mut self, x: &[f64], y: &[f64]) -> bool {
        if self
            .y
            .iter()
            .any(|member| member.as_slice() == y || pareto::dominates(member, y))
        {
            return false;
        }

        let mut k = 0;
        while k < self.y.len() {
            if pareto::dominates(y, &self.y[k]) {
                self.x.swap_remove(k);
                self.y.swap_remove(k);
            } else {
                k += 1;
            }
        }

        self.x.push(x.to_vec());
        self.y.push(y.to_vec());

        match self.capacity {
            Some(cap) if self.y.len() > cap => {
                let evicted = self.evict_most_crowded();
                evicted != self.y.len()
            }
            _ => true,
        }
    }

    /// Remove the member with the smallest crowding distance and return the
    /// index it had.
    fn evict_most_crowded(&mut self) -> usize {
        let distances = pareto::crowding_distance(&self.y);
        let victim = distances
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map_or(0, |(k, _)| k);
        self.x.remove(victim);
        self.y.remove(victim);
        victim
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Returns `true` if the archive has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// The size bound, if any.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Decision vectors of the members.
    #[must_use]
    pub fn decisions(&self) -> &[Vec<f64>] {
        &self.x
    }

    /// Objective vectors of the members.
    #[must_use]
    pub fn objectives(&self) -> &[Vec<f64>] {
        &self.y
    }

    /// Iterate over `(x, y)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], &[f64])> {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(x, y)| (x.as_slice(), y.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dominance_free(archive: &ExternalArchive) -> bool {
        let y = archive.objectives();
        y.iter().enumerate().all(|(i, a)| {
            y.iter()
                .enumerate()
                .all(|(j, b)| i == j || (!pareto::dominates(a, b) && a != b))
        })
    }

    #[test]
    fn test_init_keeps_non_dominated_subset() {
        let x = vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0], vec![4.0]];
        let y = vec![
            vec![1.0, 5.0],
            vec![4.0, 4.0],
            vec![3.0, 3.0],
            vec![1.0, 5.0],
            vec![5.0, 1.0],
        ];
        let archive = ExternalArchive::from_population(&x, &y, None);
        assert_eq!(archive.len(), 3);
        assert!(dominance_free(&archive));
        assert!(archive.decisions().contains(&vec![0.0]));
        assert!(!archive.decisions().contains(&vec![3.0]));
    }

    #[test]
    fn test_dominated_insert_is_rejected_without_change() {
        let mut archive = ExternalArchive::from_population(&[vec![0.0]], &[vec![1.0, 1.0]], None);
        let before = archive.clone();
        assert!(!archive.insert(&[9.0], &[2.0, 1.0]));
        assert_eq!(archive, before);
    }

    #[test]
    fn test_duplicate_insert_is_idempotent() {
        let mut archive = ExternalArchive::new(None);
        assert!(archive.insert(&[0.1], &[1.0, 2.0]));
        assert!(!archive.insert(&[0.7], &[1.0, 2.0]));
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.decisions()[0], vec![0.1]);
    }

    #[test]
    fn test_dominating_insert_drops_members() {
        let mut archive = ExternalArchive::from_population(
            &[vec![0.0], vec![1.0], vec![2.0]],
            &[vec![1.0, 4.0], vec![2.0, 2.0], vec![4.0, 1.0]],
            None,
        );
        assert!(archive.insert(&[5.0], &[1.5, 1.5]));
        assert_eq!(archive.len(), 3);
        assert!(!archive.objectives().contains(&vec![2.0, 2.0]));
        assert!(dominance_free(&archive));
    }

    #[test]
    fn test_capacity_evicts_crowded_member() {
        let mut archive = ExternalArchive::new(Some(3));
        archive.insert(&[0.0], &[0.0, 4.0]);
        archive.insert(&[1.0], &[4.0, 0.0]);
        archive.insert(&[2.0], &[1.0, 3.0]);
        archive.insert(&[3.0], &[3.0, 1.0]);
        assert_eq!(archive.len(), 3);
        // Extremes always survive.
        assert!(archive.objectives().contains(&vec![0.0, 4.0]));
        assert!(archive.objectives().contains(&vec![4.0, 0.0]));
    }

    #[test]
    fn test_random_inserts_stay_dominance_free() {
        let mut rng = fastrand::Rng::with_seed(31);
        let mut archive = ExternalArchive::new(None);
        for _ in 0..500 {
            let y = vec![rng.f64(), rng.f64(), rng.f64()];
            archive.insert(&[0.0], &y);
            assert!(dominance_free(&archive));
        }
    }
}
