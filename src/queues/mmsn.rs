use tracing::debug;

use crate::error::{QueueError, Result};
use crate::helpers::birth_death::{busy_servers, mean, stationary};
use crate::helpers::{check_arrival_rate, check_servers, check_service_rate, per_arrival};
use crate::metrics::MetricsResult;
use crate::queues::QueueModel;

/// M/M/1/N and M/M/s/N: a closed population of N customers, each arriving at
/// rate λ while outside the system.
#[derive(Debug, Clone)]
pub struct MMSN {
    lambda: f64,
    mu: f64,
    servers: usize,
    population: usize,
    probabilities: Vec<f64>,
}

impl MMSN {
    pub fn new (lambda_per_customer: f64, mu: f64, servers: usize, population: usize) -> Result<MMSN> {
        check_arrival_rate("per-customer arrival rate λ", lambda_per_customer)?;
        check_service_rate(mu)?;
        check_servers(servers)?;

        let probabilities = stationary(population,
                                       |n| (population - n) as f64 * lambda_per_customer,
                                       |n| n.min(servers) as f64 * mu);
        debug!(lambda = lambda_per_customer, mu, servers, population, p0 = probabilities[0], "built M/M/s/N");

        Ok(MMSN { lambda: lambda_per_customer, mu, servers, population, probabilities })
    }

    pub fn single_server (lambda_per_customer: f64, mu: f64, population: usize) -> Result<MMSN> {
        MMSN::new(lambda_per_customer, mu, 1, population)
    }

    pub fn servers (&self) -> usize {
        self.servers
    }

    pub fn population (&self) -> usize {
        self.population
    }

    /// P_0 ..= P_N
    pub fn state_probabilities (&self) -> &[f64] {
        &self.probabilities
    }

    pub fn state_probability (&self, n: usize) -> Result<f64> {
        self.probabilities.get(n).copied()
            .ok_or_else(|| QueueError::invalid(format!("state n = {} is above population N = {}", n, self.population)))
    }

    /// Σ (N - n)·λ·P_n
    pub fn effective_arrival_rate (&self) -> f64 {
        self.probabilities.iter().enumerate()
            .map(|(n, p)| (self.population - n) as f64 * self.lambda * p)
            .sum()
    }

    /// Fraction of time a server is busy.
    pub fn server_utilization (&self) -> f64 {
        busy_servers(&self.probabilities, self.servers) / self.servers as f64
    }

    /// Mean number of customers outside the system, N - L.
    pub fn operational_customers (&self) -> f64 {
        self.population as f64 - mean(&self.probabilities)
    }

    /// Probability that at least one server is idle.
    pub fn prob_idle_server (&self) -> f64 {
        self.probabilities.iter().take(self.servers).sum()
    }

    pub fn compute_metrics (&self) -> MetricsResult {
        let lambda_eff = self.effective_arrival_rate();
        let l = mean(&self.probabilities);
        let lq = l - busy_servers(&self.probabilities, self.servers);
        let wq = per_arrival(lq, lambda_eff);
        let w = if lambda_eff > 0. { l / lambda_eff } else { 1. / self.mu };

        MetricsResult::new(self.server_utilization(), self.probabilities[0], l, lq, w, wq)
            .with_effective_arrival_rate(lambda_eff)
            .with_distribution(self.probabilities.clone())
    }
}

impl QueueModel for MMSN {
    fn name (&self) -> String {
        format!("M/M/{}/N (N={})", self.servers, self.population)
    }

    fn metrics (&self) -> MetricsResult {
        self.compute_metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close (a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn two_machines_one_repairer() {
        let q = MMSN::single_server(0.1, 0.125, 2).unwrap();
        let m = q.compute_metrics();
        assert!(close(m.p0, 0.25773195876288657));
        assert!(close(m.mean_number_in_system, 1.0721649484536084));
        assert!(close(m.mean_number_in_queue, 0.329896907216495));
        assert!(close(m.mean_time_in_system, 11.555555555555559));
        assert!(close(m.mean_time_in_queue, 3.5555555555555576));
        assert!(close(q.effective_arrival_rate(), 0.1 * (2. - m.mean_number_in_system)));
        assert!(close(q.operational_customers(), 2. - m.mean_number_in_system));
    }

    #[test]
    fn two_repairers() {
        let q = MMSN::new(0.01, 0.1, 2, 4).unwrap();
        let m = q.compute_metrics();
        assert!(close(m.p0, 0.6819886789879288));
        assert!(close(m.mean_number_in_system, 0.3677282957102912));
        assert!(close(m.mean_number_in_queue, 0.004501125281320295));
        assert!(close(m.mean_time_in_system, 10.123920390536988));
        assert!(close(q.prob_idle_server(), 0.9547841505831003));
        assert!(close(m.utilization, 0.18161358521448545));
    }

    #[test]
    fn more_servers_than_customers() {
        let q = MMSN::new(1., 1., 5, 3).unwrap();
        let m = q.compute_metrics();
        assert!(close(m.mean_number_in_queue, 0.));
        assert!(close(q.prob_idle_server(), 1.));
    }

    #[test]
    fn empty_population() {
        let q = MMSN::new(1., 2., 1, 0).unwrap();
        let m = q.compute_metrics();
        assert_eq!(q.state_probabilities(), &[1.]);
        assert_eq!(m.mean_number_in_system, 0.);
        assert_eq!(m.effective_arrival_rate, Some(0.));
        assert!(close(m.mean_time_in_system, 0.5));
        assert!(q.state_probability(1).is_err());
    }

    #[test]
    fn distribution_sums_to_one() {
        let q = MMSN::new(0.3, 0.7, 3, 12).unwrap();
        let total: f64 = q.state_probabilities().iter().sum();
        assert!(close(total, 1.));
    }

    #[test]
    fn large_population_stays_normalised() {
        let q = MMSN::single_server(1., 1., 200).unwrap();
        let m = q.compute_metrics();
        let total: f64 = q.state_probabilities().iter().sum();
        assert!(close(total, 1.));
        assert!(m.mean_number_in_system.is_finite());
        // one repairer, always busy: λ(N - L) = μ
        assert!(close(q.operational_customers(), 1.));
        assert!(close(q.effective_arrival_rate(), 1.));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(MMSN::new(0.1, 0., 1, 2).is_err());
        assert!(MMSN::new(0.1, 1., 0, 2).is_err());
        assert!(MMSN::new(f64::NAN, 1., 1, 2).is_err());
    }
}
