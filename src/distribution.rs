use serde::{Deserialize, Serialize};

use crate::error::{QueueError, Result};

/// Service-time law of an M/G/1 server, reduced to the variance the
/// Pollaczek-Khinchine formula needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "variance")]
pub enum ServiceDistribution {
    /// Var(S) = E[S]², i.e. M/M/1.
    Exponential,
    /// Var(S) = 0, i.e. M/D/1.
    Deterministic,
    /// Var(S) = E[S].
    Poisson,
    General(f64),
}

impl ServiceDistribution {
    pub fn variance(&self, service_rate: f64) -> f64 {
        let mean = 1. / service_rate;
        match *self {
            ServiceDistribution::Exponential => mean * mean,
            ServiceDistribution::Deterministic => 0.,
            ServiceDistribution::Poisson => mean,
            ServiceDistribution::General(v) => v,
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "exponential" => Ok(ServiceDistribution::Exponential),
            "deterministic" => Ok(ServiceDistribution::Deterministic),
            "poisson" => Ok(ServiceDistribution::Poisson),
            other => Err(QueueError::invalid(format!(
                "unknown service distribution '{}' (expected exponential, deterministic or poisson)",
                other
            ))),
        }
    }
}
