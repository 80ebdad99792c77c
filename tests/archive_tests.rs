//! Archive behavior through the public API.

use amoead::ExternalArchive;
use amoead::pareto::{dominates, hypervolume, pareto_front_indices};

fn assert_dominance_free(archive: &ExternalArchive) {
    let y = archive.objectives();
    for (i, a) in y.iter().enumerate() {
        for (j, b) in y.iter().enumerate() {
            if i != j {
                assert!(!dominates(a, b), "{a:?} dominates {b:?}");
                assert_ne!(a, b, "duplicate member {a:?}");
            }
        }
    }
}

#[test]
fn test_archive_matches_pareto_front_of_everything_inserted() {
    let mut rng = fastrand::Rng::with_seed(12);
    let mut archive = ExternalArchive::new(None);
    let mut all = Vec::new();
    for k in 0..300 {
        let y = vec![rng.f64(), rng.f64()];
        archive.insert(&[f64::from(k)], &y);
        all.push(y);
        assert_dominance_free(&archive);
    }

    let mut expected: Vec<Vec<f64>> = pareto_front_indices(&all)
        .into_iter()
        .map(|i| all[i].clone())
        .collect();
    let mut members = archive.objectives().to_vec();
    expected.sort_by(|a, b| a[0].total_cmp(&b[0]));
    members.sort_by(|a, b| a[0].total_cmp(&b[0]));
    assert_eq!(members, expected);
}

#[test]
fn test_pairs_stay_aligned() {
    let mut archive = ExternalArchive::new(None);
    archive.insert(&[1.0], &[1.0, 3.0]);
    archive.insert(&[2.0], &[3.0, 1.0]);
    archive.insert(&[3.0], &[0.5, 0.5]);
    let pairs: Vec<(Vec<f64>, Vec<f64>)> = archive
        .iter()
        .map(|(x, y)| (x.to_vec(), y.to_vec()))
        .collect();
    assert_eq!(pairs, vec![(vec![3.0], vec![0.5, 0.5])]);
}

#[test]
fn test_bounded_archive_never_exceeds_capacity() {
    let mut rng = fastrand::Rng::with_seed(4);
    let mut archive = ExternalArchive::new(Some(20));
    for _ in 0..1_000 {
        let a = rng.f64();
        // Points on the line f1 + f2 = 1 are mutually non-dominated.
        archive.insert(&[a], &[a, 1.0 - a]);
        assert!(archive.len() <= 20);
        assert_dominance_free(&archive);
    }
    assert_eq!(archive.len(), 20);
    assert_eq!(archive.capacity(), Some(20));

    // Crowding eviction keeps the spread: the extremes found are near 0 and 1.
    let min_f1 = archive
        .objectives()
        .iter()
        .map(|y| y[0])
        .fold(f64::INFINITY, f64::min);
    assert!(min_f1 < 0.01);
    assert!(hypervolume(archive.objectives(), &[1.0, 1.0]) > 0.4);
}
