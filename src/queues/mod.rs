pub mod mg1;
pub mod mms;
pub mod mmsk;
pub mod mmsn;
pub mod mms_priority;
pub mod priority;

use crate::error::Result;
use crate::metrics::{MetricsResult, PriorityMetricsResult};

pub use self::mg1::{MG1Config, MG1};
pub use self::mms::MMS;
pub use self::mmsk::MMSK;
pub use self::mmsn::MMSN;
pub use self::mms_priority::MMSPriority;
pub use self::priority::MM1Preemptive;

/// A model whose steady state is described by one set of metrics.
///
/// Parameters are validated when the model is built, so evaluation cannot fail.
pub trait QueueModel {
    fn name (&self) -> String;
    fn metrics (&self) -> MetricsResult;
}

/// A model that reports one set of metrics per priority class.
pub trait PriorityModel {
    fn name (&self) -> String;
    fn priority_metrics (&self) -> Result<PriorityMetricsResult>;
}
