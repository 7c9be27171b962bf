//! Human-readable rendering of evaluator results.
//!
//! This is the only place where a `QueueError` is turned into text instead of
//! being returned to the caller.

use tracing::warn;

use crate::error::{QueueError, Result};
use crate::metrics::{MetricsResult, PriorityMetricsResult};
use crate::queues::{MM1Preemptive, MMSPriority, PriorityModel, QueueModel, MG1, MMS, MMSK, MMSN};

pub trait Report {
    fn title (&self) -> String;
    fn write_body (&self, out: &mut String) -> Result<()>;

    fn format_report (&self) -> String {
        let mut out = format!("--- {} ---\n", self.title());
        if let Err(e) = self.write_body(&mut out) {
            warn!(model = %self.title(), error = %e, "evaluation failed");
            out.push_str(&diagnostic(&e));
        }
        out
    }

    fn print_report (&self) {
        print!("{}", self.format_report());
    }
}

/// Renders a model that may have failed validation.
pub fn render<M: Report> (model: Result<M>) -> String {
    match model {
        Ok(m) => m.format_report(),
        Err(e) => {
            warn!(error = %e, "model rejected");
            diagnostic(&e)
        }
    }
}

pub fn diagnostic (err: &QueueError) -> String {
    match *err {
        QueueError::InvalidParameter(ref msg) => format!("Cannot evaluate the model: {}\n", msg),
        QueueError::UnstableSystem { rho } => format!(
            "The system is unstable (ρ = {:.4} >= 1): the queue grows without bound. \
             Lower the arrival rate or add service capacity.\n", rho),
    }
}

fn line (out: &mut String, label: &str, value: f64) {
    out.push_str(&format!("{:<42} {:.4}\n", label, value));
}

fn write_metrics (out: &mut String, m: &MetricsResult) {
    line(out, "Utilization (ρ):", m.utilization);
    line(out, "Probability of empty system (P0):", m.p0);
    if let Some(pk) = m.blocking_probability {
        line(out, "Blocking probability (PK):", pk);
    }
    if let Some(lambda_eff) = m.effective_arrival_rate {
        line(out, "Effective arrival rate (λ_eff):", lambda_eff);
    }
    line(out, "Mean number in system (L):", m.mean_number_in_system);
    line(out, "Mean number in queue (Lq):", m.mean_number_in_queue);
    line(out, "Mean time in system (W):", m.mean_time_in_system);
    line(out, "Mean time in queue (Wq):", m.mean_time_in_queue);
}

fn write_classes (out: &mut String, res: &PriorityMetricsResult) {
    for class in &res.classes {
        let k = class.priority;
        let m = &class.metrics;
        out.push_str(&format!("\nPriority {} (λ_{} = {}, cumulative ρ = {:.4}):\n",
                              k, k, class.arrival_rate, class.cumulative_utilization));
        line(out, &format!("  Mean number in system (L_{}):", k), m.mean_number_in_system);
        line(out, &format!("  Mean number in queue (Lq_{}):", k), m.mean_number_in_queue);
        line(out, &format!("  Mean time in system (W_{}):", k), m.mean_time_in_system);
        line(out, &format!("  Mean time in queue (Wq_{}):", k), m.mean_time_in_queue);
    }
}

impl Report for MG1 {
    fn title (&self) -> String {
        match self.class_rates() {
            Some(_) => PriorityModel::name(self),
            None => QueueModel::name(self),
        }
    }

    fn write_body (&self, out: &mut String) -> Result<()> {
        if self.class_rates().is_none() {
            write_metrics(out, &self.compute_metrics());
            line(out, "Mean service time (E[S]):", self.service_mean());
            line(out, "Service time variance (σ²):", self.variance());
            line(out, "Second moment of service (E[S²]):", self.service_second_moment());
            line(out, "Squared coefficient of variation (c_s²):", self.service_scv());
            return Ok(());
        }

        let res = self.compute_priority_metrics()?;
        line(out, "Total utilization (ρ):", res.aggregate.utilization);
        write_classes(out, &res);
        Ok(())
    }
}

impl Report for MMS {
    fn title (&self) -> String {
        self.name()
    }

    fn write_body (&self, out: &mut String) -> Result<()> {
        write_metrics(out, &self.metrics());
        if self.servers() > 1 {
            line(out, "Probability of waiting (Erlang C):", self.erlang_c());
        }
        Ok(())
    }
}

impl Report for MMSK {
    fn title (&self) -> String {
        self.name()
    }

    fn write_body (&self, out: &mut String) -> Result<()> {
        write_metrics(out, &self.compute_metrics());
        Ok(())
    }
}

impl Report for MMSN {
    fn title (&self) -> String {
        self.name()
    }

    fn write_body (&self, out: &mut String) -> Result<()> {
        write_metrics(out, &self.compute_metrics());
        line(out, "Customers outside the system (N - L):", self.operational_customers());
        line(out, "Probability a server is idle:", self.prob_idle_server());
        Ok(())
    }
}

impl Report for MM1Preemptive {
    fn title (&self) -> String {
        self.name()
    }

    fn write_body (&self, out: &mut String) -> Result<()> {
        let res = self.compute();
        out.push_str("Overall:\n");
        write_metrics(out, &res.aggregate);
        write_classes(out, &res);

        let resume = self.preemptive_resume();
        out.push_str("\nUnder preemptive resume:\n");
        for class in &resume.classes {
            line(out, &format!("  Mean time in system (W_{}):", class.priority), class.metrics.mean_time_in_system);
        }
        Ok(())
    }
}

impl Report for MMSPriority {
    fn title (&self) -> String {
        self.name()
    }

    fn write_body (&self, out: &mut String) -> Result<()> {
        let res = self.compute();
        out.push_str("Overall:\n");
        write_metrics(out, &res.aggregate);
        write_classes(out, &res);
        Ok(())
    }
}
