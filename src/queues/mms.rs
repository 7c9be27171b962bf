use tracing::{debug, warn};

use crate::error::{QueueError, Result};
use crate::helpers::erlang::{erlang_c, mms_p0, mms_state_probability};
use crate::helpers::{check_arrival_rate, check_servers, check_service_rate, check_stable, per_arrival};
use crate::metrics::MetricsResult;
use crate::queues::QueueModel;

/// M/M/1 and M/M/s with unlimited waiting room.
#[derive(Debug, Clone)]
pub struct MMS {
    lambda: f64,
    mu: f64,
    servers: usize,
    rho: f64,
}

impl MMS {
    pub fn new (lambda: f64, mu: f64, servers: usize) -> Result<MMS> {
        check_arrival_rate("arrival rate λ", lambda)?;
        check_service_rate(mu)?;
        check_servers(servers)?;

        let rho = lambda / (servers as f64 * mu);
        if let Err(e) = check_stable(rho) {
            warn!(lambda, mu, servers, rho, "rejecting unstable M/M/s");
            return Err(e);
        }

        debug!(lambda, mu, servers, rho, "built M/M/s");
        Ok(MMS { lambda, mu, servers, rho })
    }

    pub fn single_server (lambda: f64, mu: f64) -> Result<MMS> {
        MMS::new(lambda, mu, 1)
    }

    pub fn servers (&self) -> usize {
        self.servers
    }

    pub fn utilization (&self) -> f64 {
        self.rho
    }

    /// a = λ/μ, the mean number of busy servers.
    pub fn offered_load (&self) -> f64 {
        self.lambda / self.mu
    }

    pub fn mm1 (&self) -> Result<MetricsResult> {
        if self.servers != 1 {
            return Err(QueueError::invalid(format!("M/M/1 formulas need one server, model has {}", self.servers)));
        }
        let rho = self.rho;
        let l = rho / (1. - rho);
        let lq = l - rho;
        let w = 1. / (self.mu - self.lambda);
        let wq = w - 1. / self.mu;

        Ok(MetricsResult::new(rho, 1. - rho, l, lq, w, wq))
    }

    pub fn mms (&self) -> MetricsResult {
        let a = self.offered_load();
        let s = self.servers;
        let rho = self.rho;

        let p0 = mms_p0(a, s, rho);
        // P0·a^s·ρ / (s!(1-ρ)²) written through Erlang C
        let lq = erlang_c(a, s, rho) * rho / (1. - rho);
        let l = lq + a;
        let wq = per_arrival(lq, self.lambda);
        let w = wq + 1. / self.mu;

        MetricsResult::new(rho, p0, l, lq, w, wq)
    }

    /// P_n, probability of exactly n customers in the system.
    pub fn state_probability (&self, n: usize) -> f64 {
        mms_state_probability(self.offered_load(), self.servers, self.rho, n)
    }

    /// Probability that an arrival finds every server busy.
    pub fn erlang_c (&self) -> f64 {
        erlang_c(self.offered_load(), self.servers, self.rho)
    }

    /// P(Wq > t)
    pub fn prob_wait_exceeds (&self, t: f64) -> Result<f64> {
        check_time(t)?;
        let s = self.servers as f64;
        Ok(self.erlang_c() * (-(1. - self.rho) * s * self.mu * t).exp())
    }

    /// P(W > t)
    pub fn prob_sojourn_exceeds (&self, t: f64) -> Result<f64> {
        check_time(t)?;
        let c = self.erlang_c();
        let gap = (self.servers as f64 - 1.) - self.offered_load();
        let inner = if gap.abs() < 1e-8 {
            c * self.mu * t
        } else {
            c * (1. - (-self.mu * t * gap).exp()) / gap
        };
        Ok((-self.mu * t).exp() * (1. + inner))
    }
}

fn check_time (t: f64) -> Result<()> {
    if !t.is_finite() || t < 0. {
        return Err(QueueError::invalid(format!("time threshold t must be finite and >= 0, got {}", t)));
    }
    Ok(())
}

impl QueueModel for MMS {
    fn name (&self) -> String {
        format!("M/M/{}", self.servers)
    }

    fn metrics (&self) -> MetricsResult {
        if self.servers > 1 {
            return self.mms();
        }
        self.mm1().unwrap_or_else(|_| self.mms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close (a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn mm1_scenario() {
        let m = MMS::single_server(2., 5.).unwrap().mm1().unwrap();
        assert!(close(m.utilization, 0.4));
        assert!(close(m.mean_number_in_system, 0.4 / 0.6));
        assert!(close(m.mean_number_in_queue, 0.16 / 0.6));
        assert!(close(m.mean_time_in_system, 1. / 3.));
        assert!(close(m.mean_time_in_queue, 1. / 3. - 0.2));
    }

    #[test]
    fn mms_with_one_server_equals_mm1() {
        let q = MMS::single_server(3., 4.).unwrap();
        let a = q.mm1().unwrap();
        let b = q.mms();
        assert!(close(a.p0, b.p0));
        assert!(close(a.mean_number_in_system, b.mean_number_in_system));
        assert!(close(a.mean_number_in_queue, b.mean_number_in_queue));
        assert!(close(a.mean_time_in_system, b.mean_time_in_system));
        assert!(close(a.mean_time_in_queue, b.mean_time_in_queue));
    }

    #[test]
    fn two_doctors() {
        let m = MMS::new(2., 3., 2).unwrap().mms();
        assert!(close(m.utilization, 1. / 3.));
        assert!(close(m.p0, 0.5));
        assert!(close(m.mean_number_in_system, 0.75));
        assert!(close(m.mean_number_in_queue, 1. / 12.));
        assert!(close(m.mean_time_in_queue, 1. / 24.));
        assert!(close(m.mean_time_in_system, 0.375));
    }

    #[test]
    fn mm1_needs_one_server() {
        assert!(MMS::new(2., 3., 2).unwrap().mm1().is_err());
    }

    #[test]
    fn state_probabilities() {
        let q = MMS::single_server(2., 5.).unwrap();
        assert!(close(q.state_probability(0), 0.6));
        assert!(close(q.state_probability(2), 0.6 * 0.16));

        let q = MMS::new(2., 3., 2).unwrap();
        let total: f64 = (0..200).map(|n| q.state_probability(n)).sum();
        assert!(close(total, 1.));
    }

    #[test]
    fn waiting_time_tails() {
        let q = MMS::single_server(2., 5.).unwrap();
        assert!(close(q.prob_sojourn_exceeds(1.).unwrap(), (-3f64).exp()));
        assert!(close(q.prob_wait_exceeds(1.).unwrap(), 0.4 * (-3f64).exp()));
        assert!(close(q.prob_wait_exceeds(0.).unwrap(), q.erlang_c()));

        let q = MMS::new(2., 3., 2).unwrap();
        assert!(close(q.erlang_c(), 1. / 6.));
        assert!((q.prob_wait_exceeds(0.5).unwrap() - 0.022555880539435448).abs() < 1e-12);
        assert!((q.prob_sojourn_exceeds(0.5).unwrap() - 0.26702759860433833).abs() < 1e-12);
        assert!(q.prob_wait_exceeds(-1.).is_err());
    }

    #[test]
    fn sojourn_tail_when_gap_vanishes() {
        // s - 1 - a = 0: P(W > t) = e^(-μt)·(1 + C·μt)
        let q = MMS::new(1., 1., 2).unwrap();
        assert!(close(q.erlang_c(), 1. / 3.));
        for &t in &[0., 0.5, 1., 2.] {
            let expected = (-t as f64).exp() * (1. + t / 3.);
            assert!(close(q.prob_sojourn_exceeds(t).unwrap(), expected));
        }
        assert!((q.prob_sojourn_exceeds(2.).unwrap() - 0.22555880539435452).abs() < 1e-12);
    }

    #[test]
    fn many_servers_stay_finite() {
        let q = MMS::new(800., 1., 1000).unwrap();
        let m = q.metrics();
        assert!(m.mean_number_in_system.is_finite());
        assert!(m.mean_number_in_queue.is_finite() && m.mean_number_in_queue >= 0.);
        assert!((m.mean_number_in_system - m.mean_number_in_queue - 800.).abs() < 1e-6);
        assert!((m.mean_time_in_system - m.mean_time_in_queue - 1.).abs() < 1e-9);
        assert!(q.erlang_c() < 1e-6);

        let total: f64 = (0..3000).map(|n| q.state_probability(n)).sum();
        assert!((total - 1.).abs() < 1e-8);
        assert!(q.state_probability(800) > 0.01);
    }

    #[test]
    fn idle_system() {
        let m = MMS::new(0., 3., 3).unwrap().metrics();
        assert_eq!(m.mean_number_in_queue, 0.);
        assert_eq!(m.mean_time_in_queue, 0.);
        assert!(close(m.mean_time_in_system, 1. / 3.));
        assert!(close(m.p0, 1.));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(MMS::new(2., 0., 1), Err(QueueError::InvalidParameter(_))));
        assert!(matches!(MMS::new(2., 1., 0), Err(QueueError::InvalidParameter(_))));
        assert!(MMS::new(4., 2., 2).unwrap_err().is_unstable());
        assert!(MMS::single_server(6., 5.).unwrap_err().is_unstable());
    }
}
