#[path = "../benches/test_functions.rs"]
#[allow(dead_code)]
mod test_functions;

use std::f64::consts::PI;

use test_functions::*;

const TOL: f64 = 1e-10;

#[test]
fn schaffer_pareto_set() {
    let f = schaffer(&[1.0]);
    assert!((f[0] - 1.0).abs() < TOL);
    assert!((f[1] - 1.0).abs() < TOL);
}

#[test]
fn zdt1_on_front() {
    for x0 in [0.0, 0.25, 0.5, 1.0] {
        let mut x = vec![0.0; 30];
        x[0] = x0;
        let f = zdt1(&x);
        assert!((f[1] - (1.0 - f64::sqrt(x0))).abs() < TOL);
    }
}

#[test]
fn dtlz2_on_unit_sphere() {
    let x = [0.3, 0.8, 0.5, 0.5, 0.5, 0.5];
    let f = dtlz2(&x, 3);
    assert_eq!(f.len(), 3);
    let norm: f64 = f.iter().map(|v| v * v).sum();
    assert!((norm - 1.0).abs() < TOL);
}

#[test]
fn dtlz7_g_is_one_on_front() {
    let x = [0.0, 0.0, 0.0, 0.0];
    let f = dtlz7(&x, 2);
    // h = 2 - 0 when f1 = 0, so f2 = (1 + 1) * 2
    assert!((f[1] - 4.0).abs() < TOL);
}

#[test]
fn uf9_sums_to_one_on_front() {
    let n = 10;
    let (x1, x2) = (0.2, 0.4);
    let mut x = vec![x1, x2];
    for j in 3..=n {
        let phase = 2.0 * PI * x1 + j as f64 * PI / n as f64;
        x.push(2.0 * x2 * phase.sin());
    }
    let f = uf9(&x);
    assert!((f.iter().sum::<f64>() - 1.0).abs() < 1e-9);
}
