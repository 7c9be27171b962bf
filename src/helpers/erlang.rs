//! Erlang formulas for s exponential servers at offered load a = λ/μ.
//!
//! a^s/s! overflows long before an M/M/s queue becomes unusual, so nothing
//! here forms it directly: Erlang B comes from its recursion and P0 from a
//! log-sum-exp over the terms.

use num_traits::pow;

use crate::helpers::log_sum_exp;

/// ln(a^n / n!)
pub fn ln_poisson_term(a: f64, n: usize) -> f64 {
    (1..=n).map(|k| (a / k as f64).ln()).sum()
}

/// Erlang B: B_0 = 1, B_n = a·B_{n-1} / (n + a·B_{n-1}).
pub fn erlang_b(a: f64, servers: usize) -> f64 {
    (1..=servers).fold(1., |b, n| a * b / (n as f64 + a * b))
}

/// Probability that an arrival has to wait (Erlang C), ρ = a/s < 1.
pub fn erlang_c(a: f64, servers: usize, rho: f64) -> f64 {
    let b = erlang_b(a, servers);
    b / (1. - rho * (1. - b))
}

/// ln P0 of M/M/s: -ln(Σ_{n<s} a^n/n! + a^s/(s!(1-ρ))).
pub fn ln_mms_p0(a: f64, servers: usize, rho: f64) -> f64 {
    let mut logs = Vec::with_capacity(servers + 1);
    let mut ln_term = 0.;
    for n in 0..servers {
        logs.push(ln_term);
        ln_term += (a / (n + 1) as f64).ln();
    }
    logs.push(ln_term - (1. - rho).ln());
    -log_sum_exp(&logs)
}

pub fn mms_p0(a: f64, servers: usize, rho: f64) -> f64 {
    ln_mms_p0(a, servers, rho).exp()
}

/// P_n of M/M/s: P0·a^n/n! up to s, then P_s·ρ^(n-s).
pub fn mms_state_probability(a: f64, servers: usize, rho: f64, n: usize) -> f64 {
    let head = (ln_mms_p0(a, servers, rho) + ln_poisson_term(a, n.min(servers))).exp();
    if n <= servers {
        head
    } else {
        head * pow(rho, n - servers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_systems() {
        assert!((ln_poisson_term(2., 3).exp() - 8. / 6.).abs() < 1e-12);
        assert_eq!(ln_poisson_term(0., 0), 0.);
        assert!((erlang_b(2., 2) - 0.4).abs() < 1e-12);

        // M/M/3 at a = 2: P0 = 1/9, C = 4/9
        assert!((mms_p0(2., 3, 2. / 3.) - 1. / 9.).abs() < 1e-12);
        assert!((erlang_c(2., 3, 2. / 3.) - 4. / 9.).abs() < 1e-12);
        assert!((mms_state_probability(2., 3, 2. / 3., 2) - 2. / 9.).abs() < 1e-12);
        assert!((mms_state_probability(2., 3, 2. / 3., 5) - 4. / 27. * 4. / 9.).abs() < 1e-12);
    }

    #[test]
    fn single_server_erlang_c_is_rho() {
        assert!((erlang_c(0.4, 1, 0.4) - 0.4).abs() < 1e-12);
        assert!((mms_p0(0.4, 1, 0.4) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn no_load() {
        assert_eq!(erlang_c(0., 4, 0.), 0.);
        assert!((mms_p0(0., 4, 0.) - 1.).abs() < 1e-12);
        assert_eq!(mms_state_probability(0., 4, 0., 2), 0.);
    }

    #[test]
    fn thousand_servers_stay_finite() {
        let (a, s, rho) = (800., 1000, 0.8);
        let c = erlang_c(a, s, rho);
        assert!(c.is_finite() && c >= 0. && c < 1e-6);
        assert!(ln_mms_p0(a, s, rho).is_finite());

        let total: f64 = (0..3000).map(|n| mms_state_probability(a, s, rho, n)).sum();
        assert!((total - 1.).abs() < 1e-8);
    }
}
