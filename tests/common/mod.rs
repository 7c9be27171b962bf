#![allow(dead_code)]

pub const EPS: f64 = 1e-9;

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!((actual - expected).abs() <= tol,
            "expected {} but got {} (tolerance {})", expected, actual, tol);
}

/// Relative comparison for values that span several orders of magnitude.
pub fn assert_rel(actual: f64, expected: f64, rel: f64) {
    let scale = expected.abs().max(1.);
    assert!((actual - expected).abs() <= rel * scale,
            "expected {} but got {} (relative tolerance {})", expected, actual, rel);
}
