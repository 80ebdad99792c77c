//! The ideal (reference) point anchoring every scalarization.

/// Component-wise best objective values seen so far.
///
/// Only ever decreases: [`update`](Self::update) takes the minimum per
/// objective. It anchors scalarization and is never itself a solution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferencePoint {
    z: Vec<f64>,
}

impl ReferencePoint {
    /// Component-wise minimum over a set of objective vectors.
    ///
    /// An empty set yields an empty point.
    #[must_use]
    pub fn from_objectives(y: &[Vec<f64>]) -> Self {
        let n_obj = y.first().map_or(0, Vec::len);
        let mut z = vec![f64::INFINITY; n_obj];
        for yi in y {
            for (zk, &v) in z.iter_mut().zip(yi) {
                if v < *zk {
                    *zk = v;
                }
            }
        }
        Self { z }
    }

    /// Lower each component to `y_k` if `y_k` is smaller.
    ///
    /// Returns `true` if any component changed.
    pub fn update(&mut self, y: &[f64]) -> bool {
        let mut changed = false;
        for (zk, &v) in self.z.iter_mut().zip(y) {
            if v < *zk {
                *zk = v;
                changed = true;
            }
        }
        changed
    }

    /// The current reference values.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_objectives_is_componentwise_min() {
        let z = ReferencePoint::from_objectives(&[vec![3.0, 1.0], vec![2.0, 5.0], vec![4.0, 4.0]]);
        assert_eq!(z.as_slice(), &[2.0, 1.0]);
    }

    #[test]
    fn test_update_never_increases() {
        let mut z = ReferencePoint::from_objectives(&[vec![1.0, 1.0]]);
        let mut rng = fastrand::Rng::with_seed(5);
        let mut prev = z.as_slice().to_vec();
        for _ in 0..200 {
            let y = vec![rng.f64() * 2.0 - 0.5, rng.f64() * 2.0 - 0.5];
            z.update(&y);
            for (now, before) in z.as_slice().iter().zip(&prev) {
                assert!(now <= before);
            }
            prev = z.as_slice().to_vec();
        }
    }

    #[test]
    fn test_update_reports_change() {
        let mut z = ReferencePoint::from_objectives(&[vec![1.0, 1.0]]);
        assert!(!z.update(&[2.0, 1.0]));
        assert!(z.update(&[2.0, 0.5]));
        assert_eq!(z.as_slice(), &[1.0, 0.5]);
    }
}
