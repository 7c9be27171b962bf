use tracing::{debug, warn};

use crate::error::{QueueError, Result};
use crate::helpers::erlang::{erlang_b, erlang_c, mms_p0};
use crate::helpers::{check_class_rates, check_servers, check_service_rate, check_stable, prefix_sums};
use crate::metrics::{ClassMetrics, MetricsResult, PriorityMetricsResult};
use crate::queues::PriorityModel;

/// Largest server count the priority formulas are offered for.
pub const MAX_PRIORITY_SERVERS: usize = 3;

/// M/M/s shared by priority classes with a common service rate, either
/// preemptive (resume) or non-preemptive. Class 1 is the highest.
///
/// Non-preemptive, for every s:
///
/// ```text
/// Wq_k = 1 / (A (1 - Λ_{k-1}/sμ) (1 - Λ_k/sμ)),   A = (sμ - Λ)(1/B_s - 1) + sμ
/// ```
///
/// with Λ_k = λ_1 + ... + λ_k and B_s the Erlang B value of the whole load.
/// Preemptive on one server, W_k = μ / ((μ - Λ_{k-1})(μ - Λ_k)). Preemptive
/// on several servers, classes 1..=k together see an M/M/s at rate Λ_k, and
/// W_k is what is left of Λ_k·W(Λ_k) once the higher classes are removed.
#[derive(Debug, Clone)]
pub struct MMSPriority {
    rates: Vec<f64>,
    mu: f64,
    servers: usize,
    preemptive: bool,
    cumulative: Vec<f64>,
}

/// Sojourn time of class k under preemptive resume on a single server, given
/// the rates of classes 1..k-1 and 1..=k.
pub(crate) fn preemptive_resume_sojourn (mu: f64, prev: f64, cum: f64) -> f64 {
    mu / ((mu - prev) * (mu - cum))
}

/// Builds per-class and aggregate results from the class sojourn times.
pub(crate) fn assemble (rates: &[f64], mu: f64, servers: usize, sojourn: &[f64]) -> PriorityMetricsResult {
    let capacity = servers as f64 * mu;
    let total: f64 = rates.iter().sum();
    let rho = total / capacity;
    let p0 = mms_p0(total / mu, servers, rho);

    let cumulative = prefix_sums(rates);
    let classes: Vec<ClassMetrics> = rates.iter().zip(sojourn).zip(cumulative.iter()).enumerate()
        .map(|(i, ((&lambda, &w), &cum))| {
            let wq = (w - 1. / mu).max(0.);
            ClassMetrics {
                priority: i + 1,
                arrival_rate: lambda,
                cumulative_utilization: cum / capacity,
                metrics: MetricsResult::new(lambda / capacity, p0, lambda * w, lambda * wq, w, wq),
            }
        })
        .collect();

    let l: f64 = classes.iter().map(|c| c.metrics.mean_number_in_system).sum();
    let lq: f64 = classes.iter().map(|c| c.metrics.mean_number_in_queue).sum();
    let (w, wq) = if total > 0. { (l / total, lq / total) } else { (1. / mu, 0.) };

    PriorityMetricsResult {
        classes,
        aggregate: MetricsResult::new(rho, p0, l, lq, w, wq),
    }
}

impl MMSPriority {
    pub fn new (rates: Vec<f64>, mu: f64, servers: usize, preemptive: bool) -> Result<MMSPriority> {
        check_class_rates(&rates)?;
        check_service_rate(mu)?;
        check_servers(servers)?;
        if servers > MAX_PRIORITY_SERVERS {
            return Err(QueueError::invalid(format!(
                "priority classes are supported on at most {} servers, got {}", MAX_PRIORITY_SERVERS, servers)));
        }

        let cumulative = prefix_sums(&rates);
        let total = cumulative[cumulative.len() - 1];
        let rho = total / (servers as f64 * mu);
        if let Err(e) = check_stable(rho) {
            warn!(lambda = total, mu, servers, rho, "rejecting unstable M/M/s with priorities");
            return Err(e);
        }

        debug!(classes = rates.len(), mu, servers, preemptive, rho, "built M/M/s with priorities");
        Ok(MMSPriority { rates, mu, servers, preemptive, cumulative })
    }

    pub fn servers (&self) -> usize {
        self.servers
    }

    pub fn is_preemptive (&self) -> bool {
        self.preemptive
    }

    pub fn total_arrival_rate (&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    pub fn utilization (&self) -> f64 {
        self.total_arrival_rate() / self.capacity()
    }

    fn capacity (&self) -> f64 {
        self.servers as f64 * self.mu
    }

    fn previous (&self, k: usize) -> f64 {
        if k == 0 { 0. } else { self.cumulative[k - 1] }
    }

    /// L of a plain M/M/s fed at `lambda`.
    fn pooled_number_in_system (&self, lambda: f64) -> f64 {
        let a = lambda / self.mu;
        let rho = lambda / self.capacity();
        let wq = erlang_c(a, self.servers, rho) / (self.capacity() - lambda);
        lambda * (wq + 1. / self.mu)
    }

    fn non_preemptive_sojourn (&self) -> Vec<f64> {
        let total = self.total_arrival_rate();
        if total <= 0. {
            return vec![1. / self.mu; self.rates.len()];
        }

        let capacity = self.capacity();
        let b = erlang_b(total / self.mu, self.servers);
        let base = (capacity - total) * (1. / b - 1.) + capacity;

        (0..self.rates.len())
            .map(|k| {
                let wq = 1. / (base * (1. - self.previous(k) / capacity) * (1. - self.cumulative[k] / capacity));
                wq + 1. / self.mu
            })
            .collect()
    }

    fn preemptive_sojourn (&self) -> Vec<f64> {
        if self.servers == 1 {
            return (0..self.rates.len())
                .map(|k| preemptive_resume_sojourn(self.mu, self.previous(k), self.cumulative[k]))
                .collect();
        }

        (0..self.rates.len())
            .map(|k| {
                let (prev, cum) = (self.previous(k), self.cumulative[k]);
                if self.rates[k] > 0. {
                    (self.pooled_number_in_system(cum) - self.pooled_number_in_system(prev)) / self.rates[k]
                } else {
                    // an empty class: marginal sojourn of one more customer at this level
                    let h = 1e-6 * (self.capacity() - cum);
                    (self.pooled_number_in_system(cum + h) - self.pooled_number_in_system(cum)) / h
                }
            })
            .collect()
    }

    /// Mean time in system of each class, highest priority first.
    pub fn class_sojourn_times (&self) -> Vec<f64> {
        if self.preemptive {
            self.preemptive_sojourn()
        } else {
            self.non_preemptive_sojourn()
        }
    }

    pub fn compute (&self) -> PriorityMetricsResult {
        assemble(&self.rates, self.mu, self.servers, &self.class_sojourn_times())
    }
}

impl PriorityModel for MMSPriority {
    fn name (&self) -> String {
        let discipline = if self.preemptive { "preemptive" } else { "non-preemptive" };
        format!("M/M/{} with {} {} priority classes", self.servers, self.rates.len(), discipline)
    }

    fn priority_metrics (&self) -> Result<PriorityMetricsResult> {
        Ok(self.compute())
    }
}
