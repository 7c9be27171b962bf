pub mod birth_death;
pub mod erlang;

use crate::error::{QueueError, Result};

pub fn check_arrival_rate(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0. {
        return Err(QueueError::invalid(format!("{} must be a finite rate >= 0, got {}", name, value)));
    }
    Ok(())
}

pub fn check_service_rate(mu: f64) -> Result<()> {
    if !mu.is_finite() || mu <= 0. {
        return Err(QueueError::invalid(format!("service rate μ must be finite and > 0, got {}", mu)));
    }
    Ok(())
}

pub fn check_variance(variance: f64) -> Result<()> {
    if !variance.is_finite() || variance < 0. {
        return Err(QueueError::invalid(format!("service time variance must be finite and >= 0, got {}", variance)));
    }
    Ok(())
}

pub fn check_servers(servers: usize) -> Result<()> {
    if servers < 1 {
        return Err(QueueError::invalid("server count s must be >= 1"));
    }
    Ok(())
}

pub fn check_stable(rho: f64) -> Result<()> {
    if rho >= 1. {
        return Err(QueueError::UnstableSystem { rho });
    }
    Ok(())
}

/// Validates per-class rates, highest priority first.
pub fn check_class_rates(rates: &[f64]) -> Result<()> {
    if rates.is_empty() {
        return Err(QueueError::invalid("at least one priority class arrival rate is required"));
    }
    for (i, &rate) in rates.iter().enumerate() {
        check_arrival_rate(&format!("λ_{}", i + 1), rate)?;
    }
    Ok(())
}

/// Running totals: `out[i] = values[0] + ... + values[i]`.
pub fn prefix_sums(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0., |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// `num / den`, or 0 when nothing arrives (no arrivals means no wait).
pub fn per_arrival(num: f64, rate: f64) -> f64 {
    if rate > 0. { num / rate } else { 0. }
}

/// ln(Σ e^x) over `logs`, shifted by the largest term so nothing overflows.
pub fn log_sum_exp(logs: &[f64]) -> f64 {
    let peak = logs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if peak == f64::NEG_INFINITY {
        return peak;
    }
    peak + logs.iter().map(|l| (l - peak).exp()).sum::<f64>().ln()
}
