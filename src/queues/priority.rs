use tracing::{debug, warn};

use crate::error::{QueueError, Result};
use crate::helpers::{check_class_rates, check_service_rate, prefix_sums};
use crate::metrics::{ClassMetrics, MetricsResult, PriorityMetricsResult};
use crate::queues::mms_priority::{assemble, preemptive_resume_sojourn};
use crate::queues::PriorityModel;

/// Single exponential server shared by several priority classes, where a
/// higher class is never delayed by a lower one.
///
/// Class k waits
///
/// ```text
/// Wq_k = (Σ_j λ_j / μ²) / ((1 - ρ_{k-1}) (1 - ρ_k))
/// ```
///
/// where ρ_k is the utilization of classes 1..=k together (ρ_0 = 0).
#[derive(Debug, Clone)]
pub struct MM1Preemptive {
    rates: Vec<f64>,
    mu: f64,
    cumulative: Vec<f64>,
}

impl MM1Preemptive {
    /// `rates[0]` is the highest priority class.
    pub fn new (rates: Vec<f64>, mu: f64) -> Result<MM1Preemptive> {
        check_class_rates(&rates)?;
        check_service_rate(mu)?;

        let cumulative: Vec<f64> = prefix_sums(&rates).into_iter().map(|l| l / mu).collect();
        if let Some((k, &rho)) = cumulative.iter().enumerate().find(|&(_, &r)| r >= 1.) {
            warn!(class = k + 1, rho, "classes up to this priority saturate the server");
            return Err(QueueError::UnstableSystem { rho });
        }

        debug!(classes = rates.len(), mu, rho = cumulative[cumulative.len() - 1], "built preemptive M/M/1");
        Ok(MM1Preemptive { rates, mu, cumulative })
    }

    pub fn classes (&self) -> usize {
        self.rates.len()
    }

    /// ρ_1, ..., ρ_k as cumulative utilizations.
    pub fn cumulative_utilizations (&self) -> &[f64] {
        &self.cumulative
    }

    pub fn total_arrival_rate (&self) -> f64 {
        self.rates.iter().sum()
    }

    pub fn compute (&self) -> PriorityMetricsResult {
        let mu = self.mu;
        let total_lambda = self.total_arrival_rate();
        let rho_total = total_lambda / mu;
        let residual = total_lambda / (mu * mu);

        let mut prev = 0.;
        let mut classes = Vec::with_capacity(self.rates.len());
        for (i, (&lambda, &cum)) in self.rates.iter().zip(self.cumulative.iter()).enumerate() {
            let wq = residual / ((1. - prev) * (1. - cum));
            let w = wq + 1. / mu;
            classes.push(ClassMetrics {
                priority: i + 1,
                arrival_rate: lambda,
                cumulative_utilization: cum,
                metrics: MetricsResult::new(lambda / mu, 1. - rho_total, lambda * w, lambda * wq, w, wq),
            });
            prev = cum;
        }

        let l: f64 = classes.iter().map(|c| c.metrics.mean_number_in_system).sum();
        let lq: f64 = classes.iter().map(|c| c.metrics.mean_number_in_queue).sum();
        let (w, wq) = if total_lambda > 0. {
            (l / total_lambda, lq / total_lambda)
        } else {
            (1. / mu, 0.)
        };

        PriorityMetricsResult {
            classes,
            aggregate: MetricsResult::new(rho_total, 1. - rho_total, l, lq, w, wq),
        }
    }
}

impl MM1Preemptive {
    /// Preemptive-resume figures for the same classes:
    /// W_k = μ / ((μ - Λ_{k-1})(μ - Λ_k)), Λ_k = λ_1 + ... + λ_k.
    pub fn preemptive_resume (&self) -> PriorityMetricsResult {
        let mut prev = 0.;
        let sojourn: Vec<f64> = self.rates.iter()
            .map(|&lambda| {
                let w = preemptive_resume_sojourn(self.mu, prev, prev + lambda);
                prev += lambda;
                w
            })
            .collect();
        assemble(&self.rates, self.mu, 1, &sojourn)
    }
}

impl PriorityModel for MM1Preemptive {
    fn name (&self) -> String {
        format!("M/M/1 with {} preemptive priority classes", self.rates.len())
    }

    fn priority_metrics (&self) -> Result<PriorityMetricsResult> {
        Ok(self.compute())
    }
}
