//! Allocation helpers (probabilities, softmax).
//!
//! Deterministic utilities for turning per-arm scores into a probability
//! distribution, e.g. for traffic splitting on posterior means.

/// Stable softmax over index-aligned scores.
///
/// - `temperature` controls sharpness (must be finite and > 0, else 1.0).
/// - Uses the max-trick for numerical stability.
/// - Returns a distribution that sums to 1 (or empty if input is empty).
pub fn softmax(scores: &[f64], temperature: f64) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let t = if temperature.is_finite() && temperature > 0.0 {
        temperature
    } else {
        1.0
    };

    let max_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut out: Vec<f64> = scores.iter().map(|&v| ((v - max_score) / t).exp()).collect();
    let denom: f64 = out.iter().sum();
    if denom <= 0.0 || !denom.is_finite() {
        // Degenerate: uniform.
        let n = scores.len() as f64;
        return vec![1.0 / n; scores.len()];
    }

    for v in &mut out {
        *v /= denom;
    }
    out
}

/// Index of the largest value; lowest index on ties. `None` if empty.
pub fn argmax(xs: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut best_x = f64::NEG_INFINITY;
    for (i, &x) in xs.iter().enumerate() {
        if best.is_none() || x > best_x {
            best = Some(i);
            best_x = x;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn softmax_sums_to_one() {
        let p = softmax(&[0.0, 1.0, -2.0], 1.0);
        let s: f64 = p.iter().sum();
        assert!((s - 1.0).abs() < 1e-9, "sum={}", s);
        assert!(p[1] > p[0] && p[0] > p[2]);
    }

    #[test]
    fn softmax_bad_temperature_falls_back() {
        let a = softmax(&[0.2, 0.8], f64::NAN);
        let b = softmax(&[0.2, 0.8], 1.0);
        assert_eq!(a, b);
        assert!(softmax(&[], 1.0).is_empty());
    }

    #[test]
    fn softmax_non_finite_scores_go_uniform() {
        let p = softmax(&[f64::NAN, 1.0], 1.0);
        assert_eq!(p, vec![0.5, 0.5]);
    }

    #[test]
    fn argmax_prefers_lowest_index() {
        assert_eq!(argmax(&[0.1, 0.9, 0.9]), Some(1));
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[0.3]), Some(0));
    }

    proptest! {
        #[test]
        fn softmax_is_a_distribution(
            xs in proptest::collection::vec(-50.0f64..50.0, 1..16),
            t in 0.01f64..10.0,
        ) {
            let p = softmax(&xs, t);
            prop_assert_eq!(p.len(), xs.len());
            let s: f64 = p.iter().sum();
            prop_assert!((s - 1.0).abs() < 1e-9);
            prop_assert!(p.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }
}
