//! Heavy-tailed steps from symmetric stable distributions.
//!
//! The stability index `beta ∈ (0, 2]` controls tail weight: `beta = 2` is
//! Gaussian, smaller values give increasingly extreme jumps.

use crate::rng_util;

/// Number of redraws before a non-finite step is replaced by zero.
const MAX_REDRAWS: usize = 64;

/// Mantegna's approximation breaks down above this index.
const MANTEGNA_MAX_BETA: f64 = 1.99;

/// Algorithm used to draw Levy-stable steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StableSampler {
    /// Mantegna's algorithm: `u / |v|^(1/β)` with `u ~ N(0, σᵤ²)`,
    /// `v ~ N(0, 1)`. Falls back to Chambers-Mallows-Stuck for `β > 1.99`.
    #[default]
    Mantegna,
    /// Chambers-Mallows-Stuck: exact symmetric stable variates for every
    /// `β ∈ (0, 2]`.
    ChambersMallowsStuck,
}

/// Draw one finite Levy step with stability index `beta`.
///
/// Non-finite draws are rejected and redrawn; if every redraw fails the
/// step is `0.0`, which leaves the coordinate unchanged.
pub(crate) fn levy_step(rng: &mut fastrand::Rng, beta: f64, sampler: StableSampler) -> f64 {
    for _ in 0..MAX_REDRAWS {
        let step = match sampler {
            StableSampler::Mantegna if beta <= MANTEGNA_MAX_BETA => mantegna(rng, beta),
            _ => chambers_mallows_stuck(rng, beta),
        };
        if step.is_finite() {
            return step;
        }
    }
    0.0
}

fn mantegna(rng: &mut fastrand::Rng, beta: f64) -> f64 {
    let u = rng_util::standard_normal(rng) * mantegna_sigma(beta);
    let v = rng_util::standard_normal(rng);
    u / v.abs().powf(1.0 / beta)
}

/// Scale `σᵤ` of the numerator in Mantegna's algorithm.
pub(crate) fn mantegna_sigma(beta: f64) -> f64 {
    let num = gamma(1.0 + beta) * (core::f64::consts::PI * beta / 2.0).sin();
    let den = gamma((1.0 + beta) / 2.0) * beta * 2.0_f64.powf((beta - 1.0) / 2.0);
    (num / den).powf(1.0 / beta)
}

fn chambers_mallows_stuck(rng: &mut fastrand::Rng, alpha: f64) -> f64 {
    use core::f64::consts::FRAC_PI_2;

    let v = rng_util::f64_range(rng, -FRAC_PI_2, FRAC_PI_2);
    // Exp(1) via inversion, 1 - U keeps the argument positive.
    let w = -(1.0 - rng.f64()).ln();
    if (alpha - 1.0).abs() < 1e-12 {
        return v.tan();
    }
    let a = (alpha * v).sin() / v.cos().powf(1.0 / alpha);
    let b = ((v - alpha * v).cos() / w).powf((1.0 - alpha) / alpha);
    a * b
}

/// Gamma function via the Lanczos approximation (g = 7, n = 9).
#[allow(clippy::unreadable_literal)]
pub(crate) fn gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEF: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula
        let pi = core::f64::consts::PI;
        return pi / ((pi * x).sin() * gamma(1.0 - x));
    }

    let x = x - 1.0;
    let mut acc = COEF[0];
    for (i, &c) in COEF.iter().enumerate().skip(1) {
        #[allow(clippy::cast_precision_loss)]
        let denom = x + i as f64;
        acc += c / denom;
    }
    let t = x + G + 0.5;
    (2.0 * core::f64::consts::PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * acc
}
