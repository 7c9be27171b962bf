use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::distribution::ServiceDistribution;
use crate::error::{QueueError, Result};
use crate::helpers::{check_arrival_rate, check_class_rates, check_service_rate, check_stable, check_variance, per_arrival, prefix_sums};
use crate::metrics::{ClassMetrics, MetricsResult, PriorityMetricsResult, ServiceMoments};
use crate::queues::{PriorityModel, QueueModel};

/// Construction parameters of an M/G/1 queue.
///
/// When `priority_arrival_rates` is set (highest priority first) the total
/// arrival rate is their sum and `arrival_rate` is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MG1Config {
    pub arrival_rate: f64,
    pub service_rate: f64,
    pub service: ServiceDistribution,
    #[serde(default)]
    pub priority_arrival_rates: Option<Vec<f64>>,
    /// Preemption between classes. Defaults to false (non-preemptive).
    #[serde(default)]
    pub preemptive: bool,
}

impl MG1Config {
    pub fn new (arrival_rate: f64, service_rate: f64, variance: f64) -> Self {
        MG1Config::with_distribution(arrival_rate, service_rate, ServiceDistribution::General(variance))
    }

    pub fn with_distribution (arrival_rate: f64, service_rate: f64, service: ServiceDistribution) -> Self {
        MG1Config {
            arrival_rate,
            service_rate,
            service,
            priority_arrival_rates: None,
            preemptive: false,
        }
    }

    pub fn priorities (mut self, rates: Vec<f64>) -> Self {
        self.priority_arrival_rates = Some(rates);
        self
    }

    pub fn preemptive (mut self, preemptive: bool) -> Self {
        self.preemptive = preemptive;
        self
    }
}

#[derive(Debug, Clone)]
pub struct MG1 {
    lambda: f64,
    mu: f64,
    variance: f64,
    rho: f64,
    class_rates: Option<Vec<f64>>,
    preemptive: bool,
}

/// Pollaczek-Khinchine mean values for a stream of rate `lambda` on a server
/// whose total utilization is `load`.
fn pollaczek_khinchine (lambda: f64, mu: f64, variance: f64, load: f64) -> MetricsResult {
    let rho = lambda / mu;
    let lq = (lambda * lambda * variance + rho * rho) / (2. * (1. - load));
    let l = rho + lq;
    let wq = per_arrival(lq, lambda);
    let w = wq + 1. / mu;

    MetricsResult::new(rho, 1. - load, l, lq, w, wq)
}

impl MG1 {
    pub fn new (config: MG1Config) -> Result<MG1> {
        check_service_rate(config.service_rate)?;
        let variance = config.service.variance(config.service_rate);
        check_variance(variance)?;

        let lambda = match config.priority_arrival_rates {
            Some(ref rates) => {
                check_class_rates(rates)?;
                rates.iter().sum()
            },
            None => {
                check_arrival_rate("arrival rate λ", config.arrival_rate)?;
                config.arrival_rate
            }
        };

        let rho = lambda / config.service_rate;
        if let Err(e) = check_stable(rho) {
            warn!(lambda, mu = config.service_rate, rho, "rejecting unstable M/G/1");
            return Err(e);
        }

        if config.preemptive && config.priority_arrival_rates.is_some() {
            warn!("preemption is not modelled for M/G/1; classes are evaluated without it");
        }

        debug!(lambda, mu = config.service_rate, variance, rho, "built M/G/1");

        Ok(MG1 {
            lambda,
            mu: config.service_rate,
            variance,
            rho,
            class_rates: config.priority_arrival_rates,
            preemptive: config.preemptive,
        })
    }

    pub fn utilization (&self) -> f64 {
        self.rho
    }

    pub fn arrival_rate (&self) -> f64 {
        self.lambda
    }

    pub fn variance (&self) -> f64 {
        self.variance
    }

    pub fn is_preemptive (&self) -> bool {
        self.preemptive
    }

    pub fn class_rates (&self) -> Option<&[f64]> {
        self.class_rates.as_deref()
    }

    /// E[S]
    pub fn service_mean (&self) -> f64 {
        1. / self.mu
    }

    /// E[S²] = Var(S) + E[S]²
    pub fn service_second_moment (&self) -> f64 {
        self.variance + self.service_mean() * self.service_mean()
    }

    /// Squared coefficient of variation of the service time.
    pub fn service_scv (&self) -> f64 {
        self.variance * self.mu * self.mu
    }

    pub fn service_moments (&self) -> ServiceMoments {
        ServiceMoments {
            mean: self.service_mean(),
            second_moment: self.service_second_moment(),
            scv: self.service_scv(),
        }
    }

    pub fn compute_metrics (&self) -> MetricsResult {
        pollaczek_khinchine(self.lambda, self.mu, self.variance, self.rho)
            .with_service(self.service_moments())
    }

    /// Applies the single-class formula to each class rate, sharing μ and σ².
    /// The numerator uses the class's own λ_k and ρ_k; the denominator uses
    /// the load of the whole server, 2(1 - ρ). There is no residual-work term
    /// between classes.
    pub fn compute_priority_metrics (&self) -> Result<PriorityMetricsResult> {
        let rates = self.class_rates.as_ref()
            .ok_or_else(|| QueueError::invalid("M/G/1 was built without priority arrival rates"))?;

        let cumulative = prefix_sums(rates);
        let classes = rates.iter().zip(cumulative.iter()).enumerate()
            .map(|(i, (&lambda_i, &cum))| ClassMetrics {
                priority: i + 1,
                arrival_rate: lambda_i,
                cumulative_utilization: cum / self.mu,
                metrics: pollaczek_khinchine(lambda_i, self.mu, self.variance, self.rho),
            })
            .collect();

        Ok(PriorityMetricsResult {
            classes,
            aggregate: self.compute_metrics(),
        })
    }
}

impl QueueModel for MG1 {
    fn name (&self) -> String {
        "M/G/1".to_string()
    }

    fn metrics (&self) -> MetricsResult {
        self.compute_metrics()
    }
}

impl PriorityModel for MG1 {
    fn name (&self) -> String {
        format!("M/G/1 with priorities ({})", if self.preemptive { "preemptive" } else { "non-preemptive" })
    }

    fn priority_metrics (&self) -> Result<PriorityMetricsResult> {
        self.compute_priority_metrics()
    }
}
