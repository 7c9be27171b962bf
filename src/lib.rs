//! Closed-form steady-state metrics for classic queueing models: M/G/1,
//! M/M/1, M/M/s, finite capacity (M/M/s/K), finite population (M/M/s/N) and
//! priority classes on one to three servers.
//!
//! Every evaluator validates its parameters when it is built and is
//! immutable afterwards. Use the [`report`] module to render a result, or a
//! rejected configuration, as text.

pub mod distribution;
pub mod error;
pub mod exercises;
pub mod helpers;
pub mod logging;
pub mod metrics;
pub mod queues;
pub mod report;
pub mod scenario;

pub use distribution::ServiceDistribution;
pub use error::{QueueError, Result};
pub use metrics::{ClassMetrics, MetricsResult, PriorityMetricsResult, ServiceMoments};
pub use queues::{MG1Config, MM1Preemptive, MMSPriority, PriorityModel, QueueModel, MG1, MMS, MMSK, MMSN};
pub use report::Report;
pub use scenario::{Evaluation, Evaluator, ModelKind, ModelParameters, Scenario};
