//! Named model configurations, as read from JSON scenario files.
//!
//! ```json
//! [
//!   { "name": "doctors", "model": "mm",
//!     "params": { "arrival_rate": 2.0, "service_rate": 3.0, "server_count": 2 } },
//!   { "name": "printer", "model": "mg1",
//!     "params": { "arrival_rate": 0.2, "service_rate": 0.25, "service_distribution": "deterministic" } }
//! ]
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::distribution::ServiceDistribution;
use crate::error::{QueueError, Result};
use crate::metrics::{MetricsResult, PriorityMetricsResult};
use crate::queues::{MG1Config, MM1Preemptive, MMSPriority, PriorityModel, QueueModel, MG1, MMS, MMSK, MMSN};
use crate::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Mg1,
    Mg1Priority,
    Mm,
    Mmsk,
    Mmsn,
    Mm1Preemptive,
    MmsPriority,
}

/// Every parameter any model takes. Unused fields are ignored by a model;
/// a missing required one is an `InvalidParameter`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// λ, or λ per customer for finite-population models.
    pub arrival_rate: Option<f64>,
    pub service_rate: Option<f64>,
    pub service_variance: Option<f64>,
    /// "exponential", "deterministic" or "poisson"; used when no variance is given.
    pub service_distribution: Option<String>,
    /// Defaults to 1.
    pub server_count: Option<usize>,
    pub system_capacity: Option<usize>,
    pub population_size: Option<usize>,
    /// λ_i, highest priority first.
    pub priority_arrival_rates: Option<Vec<f64>>,
    pub preemptive: bool,
}

fn require<T: Copy> (value: Option<T>, model: ModelKind, field: &str) -> Result<T> {
    value.ok_or_else(|| QueueError::invalid(format!("{:?} model requires '{}'", model, field)))
}

impl ModelParameters {
    fn servers (&self) -> usize {
        self.server_count.unwrap_or(1)
    }

    fn service (&self, kind: ModelKind) -> Result<ServiceDistribution> {
        match (self.service_variance, self.service_distribution.as_deref()) {
            (Some(v), _) => Ok(ServiceDistribution::General(v)),
            (None, Some(name)) => ServiceDistribution::from_name(name),
            (None, None) => Err(QueueError::invalid(format!(
                "{:?} model requires 'service_variance' or 'service_distribution'", kind))),
        }
    }

    fn class_rates (&self, kind: ModelKind) -> Result<Vec<f64>> {
        self.priority_arrival_rates.clone()
            .ok_or_else(|| QueueError::invalid(format!("{:?} model requires 'priority_arrival_rates'", kind)))
    }

    pub fn build (&self, kind: ModelKind) -> Result<Evaluator> {
        let mu = require(self.service_rate, kind, "service_rate")?;
        match kind {
            ModelKind::Mg1 => {
                let lambda = require(self.arrival_rate, kind, "arrival_rate")?;
                let config = MG1Config::with_distribution(lambda, mu, self.service(kind)?);
                Ok(Evaluator::MG1(MG1::new(config)?))
            },
            ModelKind::Mg1Priority => {
                let config = MG1Config::with_distribution(0., mu, self.service(kind)?)
                    .priorities(self.class_rates(kind)?)
                    .preemptive(self.preemptive);
                Ok(Evaluator::MG1(MG1::new(config)?))
            },
            ModelKind::Mm => {
                let lambda = require(self.arrival_rate, kind, "arrival_rate")?;
                Ok(Evaluator::MMS(MMS::new(lambda, mu, self.servers())?))
            },
            ModelKind::Mmsk => {
                let lambda = require(self.arrival_rate, kind, "arrival_rate")?;
                let capacity = require(self.system_capacity, kind, "system_capacity")?;
                Ok(Evaluator::MMSK(MMSK::new(lambda, mu, self.servers(), capacity)?))
            },
            ModelKind::Mmsn => {
                let lambda = require(self.arrival_rate, kind, "arrival_rate")?;
                let population = require(self.population_size, kind, "population_size")?;
                Ok(Evaluator::MMSN(MMSN::new(lambda, mu, self.servers(), population)?))
            },
            ModelKind::Mm1Preemptive => {
                Ok(Evaluator::MM1Preemptive(MM1Preemptive::new(self.class_rates(kind)?, mu)?))
            },
            ModelKind::MmsPriority => {
                let model = MMSPriority::new(self.class_rates(kind)?, mu, self.servers(), self.preemptive)?;
                Ok(Evaluator::MMSPriority(model))
            },
        }
    }
}

/// A validated model of any kind.
#[derive(Debug, Clone)]
pub enum Evaluator {
    MG1(MG1),
    MMS(MMS),
    MMSK(MMSK),
    MMSN(MMSN),
    MM1Preemptive(MM1Preemptive),
    MMSPriority(MMSPriority),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Evaluation {
    Single(MetricsResult),
    Priority(PriorityMetricsResult),
}

impl Evaluation {
    pub fn overall (&self) -> &MetricsResult {
        match *self {
            Evaluation::Single(ref m) => m,
            Evaluation::Priority(ref p) => &p.aggregate,
        }
    }
}

impl Evaluator {
    pub fn evaluate (&self) -> Result<Evaluation> {
        match *self {
            Evaluator::MG1(ref q) if q.class_rates().is_some() => q.priority_metrics().map(Evaluation::Priority),
            Evaluator::MG1(ref q) => Ok(Evaluation::Single(q.compute_metrics())),
            Evaluator::MMS(ref q) => Ok(Evaluation::Single(q.metrics())),
            Evaluator::MMSK(ref q) => Ok(Evaluation::Single(q.metrics())),
            Evaluator::MMSN(ref q) => Ok(Evaluation::Single(q.metrics())),
            Evaluator::MM1Preemptive(ref q) => Ok(Evaluation::Priority(q.compute())),
            Evaluator::MMSPriority(ref q) => Ok(Evaluation::Priority(q.compute())),
        }
    }
}

impl Report for Evaluator {
    fn title (&self) -> String {
        match *self {
            Evaluator::MG1(ref q) => q.title(),
            Evaluator::MMS(ref q) => q.title(),
            Evaluator::MMSK(ref q) => q.title(),
            Evaluator::MMSN(ref q) => q.title(),
            Evaluator::MM1Preemptive(ref q) => q.title(),
            Evaluator::MMSPriority(ref q) => q.title(),
        }
    }

    fn write_body (&self, out: &mut String) -> Result<()> {
        match *self {
            Evaluator::MG1(ref q) => q.write_body(out),
            Evaluator::MMS(ref q) => q.write_body(out),
            Evaluator::MMSK(ref q) => q.write_body(out),
            Evaluator::MMSN(ref q) => q.write_body(out),
            Evaluator::MM1Preemptive(ref q) => q.write_body(out),
            Evaluator::MMSPriority(ref q) => q.write_body(out),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub model: ModelKind,
    #[serde(default)]
    pub params: ModelParameters,
}

impl Scenario {
    pub fn new<S: Into<String>> (name: S, model: ModelKind, params: ModelParameters) -> Self {
        Scenario { name: name.into(), model, params }
    }

    pub fn build (&self) -> Result<Evaluator> {
        self.params.build(self.model)
    }

    pub fn evaluate (&self) -> Result<Evaluation> {
        self.build()?.evaluate()
    }
}

pub fn parse_scenarios (json: &str) -> anyhow::Result<Vec<Scenario>> {
    serde_json::from_str(json).context("scenario file must be a JSON array of scenarios")
}

pub fn load_scenarios<P: AsRef<Path>> (path: P) -> anyhow::Result<Vec<Scenario>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file {}", path.display()))?;
    parse_scenarios(&text).with_context(|| format!("failed to parse {}", path.display()))
}
