//! Worked textbook exercises with their published answers.

use std::fmt;

use crate::error::Result;
use crate::scenario::{Evaluation, ModelKind, ModelParameters, Scenario};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Utilization,
    P0,
    L,
    Lq,
    W,
    Wq,
    /// Mean time in system of a priority class (1 = highest).
    ClassW(usize),
}

impl Metric {
    pub fn read (&self, eval: &Evaluation) -> Option<f64> {
        let overall = eval.overall();
        match *self {
            Metric::Utilization => Some(overall.utilization),
            Metric::P0 => Some(overall.p0),
            Metric::L => Some(overall.mean_number_in_system),
            Metric::Lq => Some(overall.mean_number_in_queue),
            Metric::W => Some(overall.mean_time_in_system),
            Metric::Wq => Some(overall.mean_time_in_queue),
            Metric::ClassW(k) => match *eval {
                Evaluation::Priority(ref p) => p.class(k).map(|c| c.metrics.mean_time_in_system),
                Evaluation::Single(_) => None,
            },
        }
    }
}

impl fmt::Display for Metric {
    fn fmt (&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Metric::Utilization => write!(f, "ρ"),
            Metric::P0 => write!(f, "P0"),
            Metric::L => write!(f, "L"),
            Metric::Lq => write!(f, "Lq"),
            Metric::W => write!(f, "W"),
            Metric::Wq => write!(f, "Wq"),
            Metric::ClassW(k) => write!(f, "W_{}", k),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Exercise {
    pub scenario: Scenario,
    pub expected: Vec<(Metric, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub metric: Metric,
    pub expected: f64,
    pub actual: Option<f64>,
}

impl Check {
    /// Published answers are rounded, so compare to three decimals relative to the value.
    pub fn passed (&self) -> bool {
        match self.actual {
            Some(a) => (a - self.expected).abs() <= 1e-3 * self.expected.abs().max(1.),
            None => false,
        }
    }
}

impl Exercise {
    fn new (name: &str, model: ModelKind, params: ModelParameters, expected: Vec<(Metric, f64)>) -> Self {
        Exercise { scenario: Scenario::new(name, model, params), expected }
    }

    pub fn check (&self) -> Result<Vec<Check>> {
        let eval = self.scenario.evaluate()?;
        Ok(self.expected.iter()
           .map(|&(metric, expected)| Check { metric, expected, actual: metric.read(&eval) })
           .collect())
    }
}

fn mm (lambda: f64, mu: f64, servers: usize) -> ModelParameters {
    ModelParameters {
        arrival_rate: Some(lambda),
        service_rate: Some(mu),
        server_count: Some(servers),
        ..Default::default()
    }
}

fn mg1 (lambda: f64, mu: f64, variance: f64) -> ModelParameters {
    ModelParameters {
        arrival_rate: Some(lambda),
        service_rate: Some(mu),
        service_variance: Some(variance),
        ..Default::default()
    }
}

fn priorities (rates: Vec<f64>, mu: f64, variance: Option<f64>) -> ModelParameters {
    ModelParameters {
        service_rate: Some(mu),
        service_variance: variance,
        priority_arrival_rates: Some(rates),
        ..Default::default()
    }
}

fn preemptive (rates: Vec<f64>, mu: f64, servers: usize) -> ModelParameters {
    ModelParameters {
        server_count: Some(servers),
        preemptive: true,
        ..priorities(rates, mu, None)
    }
}

fn mmsk (lambda: f64, mu: f64, servers: usize, capacity: usize) -> ModelParameters {
    ModelParameters { system_capacity: Some(capacity), ..mm(lambda, mu, servers) }
}

fn mmsn (lambda: f64, mu: f64, servers: usize, population: usize) -> ModelParameters {
    ModelParameters { population_size: Some(population), ..mm(lambda, mu, servers) }
}

pub fn catalogue () -> Vec<Exercise> {
    use self::Metric::*;
    use crate::scenario::ModelKind::*;

    vec![
        // 3 trucks/h, 15 min each
        Exercise::new("Ex. 5 (M/M/1) loading dock", Mm, mm(3., 4., 1),
                      vec![(Lq, 2.25), (L, 3.), (Wq, 0.75), (W, 1.)]),
        Exercise::new("Ex. 7 (M/M/1) one doctor", Mm, mm(2., 3., 1),
                      vec![(Utilization, 2. / 3.), (L, 2.), (Lq, 4. / 3.), (P0, 1. / 3.), (Wq, 2. / 3.), (W, 1.)]),
        Exercise::new("Ex. 7 (M/M/2) two doctors", Mm, mm(2., 3., 2),
                      vec![(Utilization, 1. / 3.), (L, 0.75), (Lq, 1. / 12.), (P0, 0.5), (Wq, 1. / 24.), (W, 0.375)]),
        Exercise::new("Ex. 15a (M/M/4) current load", Mm, mm(2., 1., 4), vec![(Lq, 0.1739)]),
        Exercise::new("Ex. 15b (M/M/4) load in one year", Mm, mm(3., 1., 4), vec![(Lq, 1.5283)]),

        Exercise::new("Ex. 1 (M/G/1) σ = 4", Mg1, mg1(0.2, 0.25, 16.),
                      vec![(Lq, 3.2), (L, 4.), (Wq, 16.), (W, 20.)]),
        Exercise::new("Ex. 1 (M/G/1) σ = 3", Mg1, mg1(0.2, 0.25, 9.),
                      vec![(Lq, 2.5), (L, 3.3), (Wq, 12.5), (W, 16.5)]),
        Exercise::new("Ex. 1 (M/G/1) σ = 2", Mg1, mg1(0.2, 0.25, 4.),
                      vec![(Lq, 2.), (L, 2.8), (Wq, 10.), (W, 14.)]),
        Exercise::new("Ex. 1 (M/G/1) σ = 1", Mg1, mg1(0.2, 0.25, 1.),
                      vec![(Lq, 1.7), (L, 2.5), (Wq, 8.5), (W, 12.5)]),
        Exercise::new("Ex. 1 (M/G/1) σ = 0", Mg1, mg1(0.2, 0.25, 0.),
                      vec![(Lq, 1.6), (L, 2.4), (Wq, 8.), (W, 12.)]),
        Exercise::new("Ex. 6a (M/M/1) first come first served", Mm, mm(8., 10., 1), vec![(W, 0.5)]),
        Exercise::new("Ex. 6b (M/M/1) three priority classes", Mm1Preemptive, priorities(vec![2., 4., 2.], 10., None),
                      vec![(ClassW(1), 0.2), (ClassW(2), 0.35), (ClassW(3), 1.1), (W, 0.5)]),
        Exercise::new("Ex. 6c (M/M/1) preemptive priority classes", MmsPriority, preemptive(vec![2., 4., 2.], 10., 1),
                      vec![(ClassW(1), 0.125), (ClassW(2), 0.3125), (ClassW(3), 1.25), (W, 0.5)]),
        Exercise::new("M/G/1 with three equal priority classes", Mg1Priority, priorities(vec![1., 1., 1.], 6., Some(0.05)),
                      vec![(ClassW(1), 0.2444), (ClassW(2), 0.2444), (ClassW(3), 0.2444), (Lq, 0.7), (W, 0.4)]),

        // 2 per minute, 15 s each, room for 5
        Exercise::new("Ex. 1 (M/M/1/5)", Mmsk, mmsk(2., 4., 1, 5),
                      vec![(P0, 0.5079), (L, 0.9048), (Lq, 0.4127), (W, 0.4597), (Wq, 0.2097)]),
        Exercise::new("Ex. 4 (M/M/2/4)", Mmsk, mmsk(0.25, 1. / 3., 2, 4), vec![(Lq, 0.0848), (Wq, 0.3455)]),
        Exercise::new("Ex. 5 (M/M/2/4)", Mmsk, mmsk(1., 1. / 0.75, 2, 4), vec![(L, 0.8212), (Wq, 0.0864)]),

        // time between failures 10 h, repair 8 h
        Exercise::new("Ex. 3 (M/M/1/N) two machines", Mmsn, mmsn(0.1, 0.125, 1, 2),
                      vec![(P0, 0.2577), (L, 1.072), (Lq, 0.330), (W, 11.556), (Wq, 3.556)]),
        Exercise::new("Ex. 4d (M/M/2/N) three machines", Mmsn, mmsn(1. / 9., 0.5, 2, 3), vec![(L, 0.5528)]),
        Exercise::new("Ex. 6 (M/M/2/N) four machines", Mmsn, mmsn(0.01, 0.1, 2, 4),
                      vec![(P0, 0.6820), (L, 0.3677), (Lq, 0.0045), (W, 10.1239), (Wq, 0.1239)]),
    ]
}
