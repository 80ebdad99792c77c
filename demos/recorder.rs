//! Recording a run: dump the population at every generation boundary.
//!
//! Each generation writes `pop_<generation>.txt` (objective columns, then
//! decision columns) and `info_<generation>.txt` (evaluations, generation)
//! into a temporary directory. The recorder stops the run after 25
//! generations.
//!
//! Run with: `cargo run --example recorder`

use core::ops::ControlFlow;
use std::fs::File;
use std::io::BufWriter;

use amoead::prelude::*;

fn dtlz2(x: &[f64]) -> Vec<f64> {
    use std::f64::consts::FRAC_PI_2;
    let g: f64 = x[2..].iter().map(|v| (v - 0.5).powi(2)).sum();
    vec![
        (1.0 + g) * (x[0] * FRAC_PI_2).cos() * (x[1] * FRAC_PI_2).cos(),
        (1.0 + g) * (x[0] * FRAC_PI_2).cos() * (x[1] * FRAC_PI_2).sin(),
        (1.0 + g) * (x[0] * FRAC_PI_2).sin(),
    ]
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join("amoead_recorder");
    std::fs::create_dir_all(&dir)?;

    let config = Config::builder(3, 12)
        .weights(WeightScheme::SimplexLattice { divisions: 12 })
        .decomposition(Decomposition::Pbi { theta: 5.0 })
        .n_eval(30_000)
        .awa(AwaConfig {
            start_generation: 10,
            period: 5,
            fraction: 0.05,
        })
        .seed(7)
        .build()?;
    let mut moead = Moead::new(config, |x: &[f64]| Ok::<_, String>(dtlz2(x)))?;

    let mut io_error = None;
    let last = moead.run_with(|snapshot| {
        let generation = snapshot.generation;
        let written = File::create(dir.join(format!("pop_{generation}.txt")))
            .and_then(|f| snapshot.write_population(BufWriter::new(f)))
            .and_then(|()| File::create(dir.join(format!("info_{generation}.txt"))))
            .and_then(|f| snapshot.write_info(BufWriter::new(f)));
        if let Err(e) = written {
            io_error = Some(e);
            return ControlFlow::Break(());
        }
        if generation >= 25 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })?;
    if let Some(e) = io_error {
        return Err(e.into());
    }

    println!(
        "stopped at generation {} after {} evaluations; files in {}",
        last.generation,
        last.evaluations,
        dir.display()
    );
    println!("archive holds {} solutions", last.archive.len());
    Ok(())
}
