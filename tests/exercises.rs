mod common;

use common::assert_close;
use queue_calc::exercises::{catalogue, Metric};
use queue_calc::report::Report;
use queue_calc::Evaluation;

#[test]
fn every_published_answer_is_reproduced() {
    for exercise in catalogue() {
        let checks = exercise.check()
            .unwrap_or_else(|e| panic!("{} failed to evaluate: {}", exercise.scenario.name, e));
        for c in checks {
            assert!(c.passed(), "{}: {} expected {} got {:?}",
                    exercise.scenario.name, c.metric, c.expected, c.actual);
        }
    }
}

#[test]
fn every_exercise_renders_a_report() {
    for exercise in catalogue() {
        let text = exercise.scenario.build().unwrap().format_report();
        assert!(text.starts_with("--- "), "{}", text);
        assert!(!text.contains("Cannot evaluate"), "{}", text);
    }
}

#[test]
fn loading_dock_worked_example() {
    let dock = catalogue().into_iter()
        .find(|e| e.scenario.name.contains("loading dock"))
        .unwrap();
    let eval = dock.scenario.evaluate().unwrap();
    assert_close(Metric::Lq.read(&eval).unwrap(), 2.25, 1e-12);
    assert_close(Metric::W.read(&eval).unwrap(), 1., 1e-12);
    assert_eq!(Metric::ClassW(1).read(&eval), None);
}

#[test]
fn priority_exercise_reports_each_class() {
    let ex = catalogue().into_iter()
        .find(|e| e.scenario.name.contains("three priority classes"))
        .unwrap();
    match ex.scenario.evaluate().unwrap() {
        Evaluation::Priority(res) => {
            assert_eq!(res.classes.len(), 3);
            assert_close(res.class(3).unwrap().metrics.mean_time_in_system, 1.1, 1e-9);
        },
        other => panic!("expected per-class results, got {:?}", other),
    }
}

#[test]
fn variance_sweep_grows_the_queue() {
    let lq: Vec<f64> = catalogue().iter()
        .filter(|e| e.scenario.name.starts_with("Ex. 1 (M/G/1)"))
        .map(|e| e.scenario.evaluate().unwrap().overall().mean_number_in_queue)
        .collect();
    assert_eq!(lq.len(), 5);
    for pair in lq.windows(2) {
        assert!(pair[0] > pair[1]);
    }
}

#[test]
fn every_exercise_carries_answers() {
    for exercise in catalogue() {
        assert!(!exercise.expected.is_empty(), "{} has nothing to check", exercise.scenario.name);
    }
}

#[test]
fn preemptive_resume_exercise_favours_the_top_class() {
    let ex = catalogue().into_iter()
        .find(|e| e.scenario.name.contains("preemptive priority classes"))
        .unwrap();
    match ex.scenario.evaluate().unwrap() {
        Evaluation::Priority(res) => {
            assert_close(res.class(1).unwrap().metrics.mean_time_in_system, 0.125, 1e-12);
            assert_close(res.class(3).unwrap().metrics.mean_time_in_system, 1.25, 1e-12);
            assert_close(res.aggregate.mean_time_in_system, 0.5, 1e-12);
        },
        other => panic!("expected per-class results, got {:?}", other),
    }
}
