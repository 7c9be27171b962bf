use tracing::debug;

use crate::error::{QueueError, Result};
use crate::helpers::birth_death::{busy_servers, mean, stationary};
use crate::helpers::{check_arrival_rate, check_servers, check_service_rate, per_arrival};
use crate::metrics::MetricsResult;
use crate::queues::QueueModel;

/// M/M/1/K and M/M/s/K: at most K customers in the system, arrivals that
/// find it full are lost. Defined for any load.
#[derive(Debug, Clone)]
pub struct MMSK {
    lambda: f64,
    mu: f64,
    servers: usize,
    capacity: usize,
    probabilities: Vec<f64>,
}

impl MMSK {
    pub fn new (lambda: f64, mu: f64, servers: usize, capacity: usize) -> Result<MMSK> {
        check_arrival_rate("arrival rate λ", lambda)?;
        check_service_rate(mu)?;
        check_servers(servers)?;
        if capacity < servers {
            return Err(QueueError::invalid(format!("capacity K ({}) must be >= server count s ({})", capacity, servers)));
        }

        let probabilities = stationary(capacity, |_| lambda, |n| n.min(servers) as f64 * mu);
        debug!(lambda, mu, servers, capacity, p0 = probabilities[0], "built M/M/s/K");

        Ok(MMSK { lambda, mu, servers, capacity, probabilities })
    }

    pub fn single_server (lambda: f64, mu: f64, capacity: usize) -> Result<MMSK> {
        MMSK::new(lambda, mu, 1, capacity)
    }

    pub fn servers (&self) -> usize {
        self.servers
    }

    pub fn capacity (&self) -> usize {
        self.capacity
    }

    /// Offered utilization λ/(sμ); may exceed 1.
    pub fn utilization (&self) -> f64 {
        self.lambda / (self.servers as f64 * self.mu)
    }

    /// P_0 ..= P_K
    pub fn state_probabilities (&self) -> &[f64] {
        &self.probabilities
    }

    pub fn state_probability (&self, n: usize) -> Result<f64> {
        self.probabilities.get(n).copied()
            .ok_or_else(|| QueueError::invalid(format!("state n = {} is above capacity K = {}", n, self.capacity)))
    }

    /// P_K: by PASTA, the probability an arrival is turned away.
    pub fn blocking_probability (&self) -> f64 {
        self.probabilities[self.capacity]
    }

    /// λ(1 - P_K)
    pub fn effective_arrival_rate (&self) -> f64 {
        self.lambda * (1. - self.blocking_probability())
    }

    pub fn compute_metrics (&self) -> MetricsResult {
        let lambda_eff = self.effective_arrival_rate();
        let l = mean(&self.probabilities);
        let lq = l - busy_servers(&self.probabilities, self.servers);
        let wq = per_arrival(lq, lambda_eff);
        let w = if lambda_eff > 0. { l / lambda_eff } else { 1. / self.mu };

        MetricsResult::new(self.utilization(), self.probabilities[0], l, lq, w, wq)
            .with_blocking(self.blocking_probability())
            .with_effective_arrival_rate(lambda_eff)
            .with_distribution(self.probabilities.clone())
    }
}

impl QueueModel for MMSK {
    fn name (&self) -> String {
        format!("M/M/{}/{}", self.servers, self.capacity)
    }

    fn metrics (&self) -> MetricsResult {
        self.compute_metrics()
    }
}
