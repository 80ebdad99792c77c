//! Two-objective optimization: approximate the ZDT1 front.
//!
//! The population size follows the weight vectors; here 50 subproblems
//! spread evenly along the front.
//!
//! Run with: `cargo run --example two_objective`

use amoead::prelude::*;

fn zdt1(x: &[f64]) -> Vec<f64> {
    let g = 1.0 + 9.0 * x[1..].iter().sum::<f64>() / (x.len() - 1) as f64;
    vec![x[0], g * (1.0 - (x[0] / g).sqrt())]
}

fn main() -> amoead::Result<()> {
    let config = Config::builder(2, 10)
        .weights(WeightScheme::SimplexLattice { divisions: 49 })
        .neighborhood_size(10)
        .n_eval(20_000)
        .priority(PriorityScheme::Improvement { floor: 0.1 })
        .seed(42)
        .build()?;

    let mut moead = Moead::new(config, |x: &[f64]| Ok::<_, String>(zdt1(x)))?;
    let result = moead.run()?;

    println!(
        "{} evaluations over {} generations, archive holds {} solutions",
        result.evaluations,
        result.generation,
        result.archive.len()
    );
    println!("hypervolume at (1.1, 1.1): {:.4}", result.hypervolume(&[1.1, 1.1]));

    let mut front = result.archive.objectives().to_vec();
    front.sort_by(|a, b| a[0].total_cmp(&b[0]));
    for y in front.iter().step_by((front.len() / 5).max(1)) {
        println!("  f1={:.4}, f2={:.4}", y[0], y[1]);
    }

    // Stability indices the subproblems settled on.
    let betas = moead.adapter().parent_betas();
    let mean = betas.iter().sum::<f64>() / betas.len() as f64;
    println!("mean Levy stability index: {mean:.3}");

    Ok(())
}
