use serde::Serialize;

/// Steady-state figures of one queue (or one priority class of a queue).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsResult {
    pub utilization: f64,
    /// Probability that the system is empty.
    pub p0: f64,
    pub mean_number_in_system: f64,
    pub mean_number_in_queue: f64,
    pub mean_time_in_system: f64,
    pub mean_time_in_queue: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_arrival_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_probabilities: Option<Vec<f64>>,
    /// E[S], E[S²] and c_s² of a general service time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceMoments>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ServiceMoments {
    pub mean: f64,
    pub second_moment: f64,
    /// Squared coefficient of variation.
    pub scv: f64,
}

impl MetricsResult {
    pub fn new(utilization: f64, p0: f64, l: f64, lq: f64, w: f64, wq: f64) -> Self {
        MetricsResult {
            utilization,
            p0,
            mean_number_in_system: l,
            mean_number_in_queue: lq,
            mean_time_in_system: w,
            mean_time_in_queue: wq,
            blocking_probability: None,
            effective_arrival_rate: None,
            state_probabilities: None,
            service: None,
        }
    }

    pub fn with_blocking(mut self, blocking_probability: f64) -> Self {
        self.blocking_probability = Some(blocking_probability);
        self
    }

    pub fn with_effective_arrival_rate(mut self, lambda_eff: f64) -> Self {
        self.effective_arrival_rate = Some(lambda_eff);
        self
    }

    pub fn with_service(mut self, moments: ServiceMoments) -> Self {
        self.service = Some(moments);
        self
    }

    pub fn with_distribution(mut self, probabilities: Vec<f64>) -> Self {
        self.state_probabilities = Some(probabilities);
        self
    }
}

/// Metrics of a single priority class. `priority` starts at 1 (highest).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub priority: usize,
    pub arrival_rate: f64,
    /// Utilization offered by this class and every class above it.
    pub cumulative_utilization: f64,
    pub metrics: MetricsResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityMetricsResult {
    pub classes: Vec<ClassMetrics>,
    pub aggregate: MetricsResult,
}

impl PriorityMetricsResult {
    pub fn class(&self, priority: usize) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.priority == priority)
    }
}
