use crate::helpers::log_sum_exp;

/// Stationary distribution of a birth-death chain on states `0..=last`.
///
/// `birth(n)` is the rate n -> n+1 and `death(n)` the rate n -> n-1. Each
/// `death(n)` for n >= 1 must be positive. Terms are accumulated as
/// logarithms and normalised with log-sum-exp, so long chains at heavy load
/// stay finite.
pub fn stationary<F, G>(last: usize, birth: F, death: G) -> Vec<f64>
    where F: Fn(usize) -> f64, G: Fn(usize) -> f64
{
    let mut log_terms = Vec::with_capacity(last + 1);
    log_terms.push(0.);
    for n in 1..=last {
        let prev = log_terms[n - 1];
        log_terms.push(prev + birth(n - 1).ln() - death(n).ln());
    }

    // log_terms[0] = 0, so the total is finite
    let log_total = log_sum_exp(&log_terms);
    log_terms.iter().map(|l| (l - log_total).exp()).collect()
}

/// Σ n·P_n
pub fn mean(probabilities: &[f64]) -> f64 {
    probabilities.iter().enumerate().map(|(n, p)| n as f64 * p).sum()
}

/// Σ min(n, s)·P_n
pub fn busy_servers(probabilities: &[f64], servers: usize) -> f64 {
    probabilities.iter().enumerate().map(|(n, p)| n.min(servers) as f64 * p).sum()
}
