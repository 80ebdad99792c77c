use crate::rng_util;

/// Polynomial mutation for each coordinate, each mutated with
/// probability `probability`.
pub(crate) fn mutate(
    rng: &mut fastrand::Rng,
    x: &mut [f64],
    bounds: &crate::config::Bounds,
    eta: f64,
    probability: f64,
) {
    for (d, value) in x.iter_mut().enumerate() {
        if rng_util::f64_range(rng, 0.0, 1.0) >= probability {
            continue;
        }
        let (low, high) = bounds.get(d);
        *value = polynomial_mutation_f64(rng, *value, low, high, eta);
    }
}

/// Polynomial mutation for a single float value.
pub(crate) fn polynomial_mutation_f64(
    rng: &mut fastrand::Rng,
    x: f64,
    low: f64,
    high: f64,
    eta: f64,
) -> f64 {
    let u: f64 = rng_util::f64_range(rng, 0.0, 1.0);
    let range = high - low;
    if range <= 0.0 {
        return x;
    }

    let delta1 = (x - low) / range;
    let delta2 = (high - x) / range;

    let delta_q = if u < 0.5 {
        let xy = 1.0 - delta1;
        let val = 2.0 * u + (1.0 - 2.0 * u) * xy.powf(eta + 1.0);
        val.powf(1.0 / (eta + 1.0)) - 1.0
    } else {
        let xy = 1.0 - delta2;
        let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * xy.powf(eta + 1.0);
        1.0 - val.powf(1.0 / (eta + 1.0))
    };

    x + delta_q * range
}
