//! Text output of run snapshots.

#[path = "../benches/test_functions.rs"]
#[allow(dead_code)]
mod test_functions;

use amoead::prelude::*;

fn finished_run() -> Snapshot {
    let config = Config::builder(2, 4)
        .weights(WeightScheme::SimplexLattice { divisions: 5 })
        .neighborhood_size(3)
        .n_eval(60)
        .seed(11)
        .build()
        .unwrap();
    let mut moead = Moead::new(config, |x: &[f64]| {
        Ok::<_, String>(test_functions::zdt1(x))
    })
    .unwrap();
    moead.run().unwrap()
}

#[test]
fn test_population_rows_are_objectives_then_decisions() {
    let snapshot = finished_run();
    let mut buf = Vec::new();
    snapshot.write_population(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    let rows: Vec<Vec<f64>> = text
        .lines()
        .map(|line| line.split(' ').map(|v| v.parse().unwrap()).collect())
        .collect();
    assert_eq!(rows.len(), 6);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), 2 + 4);
        assert_eq!(&row[..2], snapshot.population.y(i));
        assert_eq!(&row[2..], snapshot.population.x(i));
    }
    for token in text.split_whitespace() {
        let (mantissa, exponent) = token.split_once('e').unwrap();
        assert_eq!(mantissa.trim_start_matches('-').len(), 20);
        assert!(exponent.starts_with('+') || exponent.starts_with('-'));
    }
}

#[test]
fn test_info_holds_both_counters() {
    let snapshot = finished_run();
    let mut buf = Vec::new();
    snapshot.write_info(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let values: Vec<&str> = text.lines().collect();
    assert_eq!(values[0], "6.000000000000000000e+01");
    let generation: f64 = values[1].parse().unwrap();
    #[allow(clippy::cast_precision_loss)]
    let expected = snapshot.generation as f64;
    assert_eq!(generation, expected);
    assert_eq!(values.len(), 2);
}
