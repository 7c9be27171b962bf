use thiserror::Error;

/// Failures raised by the queue evaluators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueueError {
    /// A parameter violates a precondition of the model.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Utilization reached 1 on a model with no capacity limit: there is no steady state.
    #[error("system is unstable (ρ = {rho:.4} >= 1)")]
    UnstableSystem { rho: f64 },
}

impl QueueError {
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        QueueError::InvalidParameter(msg.into())
    }

    pub fn is_unstable(&self) -> bool {
        matches!(self, QueueError::UnstableSystem { .. })
    }
}

pub type Result<T> = std::result::Result<T, QueueError>;
