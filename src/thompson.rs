//! Thompson sampling over per-arm Beta posteriors.
//!
//! Each call draws one fresh sample per arm from Beta(alpha_i, beta_i) and
//! picks the largest. Nothing is cached between calls, so a run of `n` rounds
//! over `N` arms costs `n * N` Beta draws.
//!
//! Notes:
//! - Ties go to the lowest index (strict `>` in a left-to-right scan).
//! - The policy holds no RNG; the caller's generator drives every draw, so a
//!   seeded caller gets reproducible choices.

use rand::RngCore;

use crate::error::{BanditError, Result};
use crate::policy::ArmPolicy;
use crate::posterior::PosteriorState;

/// Outcome of one Thompson draw: the chosen arm and the sampled vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ThompsonDraw {
    pub chosen: usize,
    pub samples: Vec<f64>,
}

/// Stateless Thompson-sampling selection rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThompsonPolicy;

impl ThompsonPolicy {
    /// Sample every arm's posterior and return the argmax index.
    pub fn sample_arm(&self, posterior: &PosteriorState, rng: &mut dyn RngCore) -> Result<usize> {
        self.sample_arm_with_draws(posterior, rng).map(|d| d.chosen)
    }

    /// Like [`sample_arm`][Self::sample_arm], also returning the sampled vector.
    pub fn sample_arm_with_draws(
        &self,
        posterior: &PosteriorState,
        rng: &mut dyn RngCore,
    ) -> Result<ThompsonDraw> {
        if posterior.is_empty() {
            return Err(BanditError::NoArms);
        }
        let mut samples = Vec::with_capacity(posterior.len());
        let mut best = 0usize;
        let mut best_sample = f64::NEG_INFINITY;
        for i in 0..posterior.len() {
            let x = posterior.sample(i, rng)?;
            if x > best_sample {
                best_sample = x;
                best = i;
            }
            samples.push(x);
        }
        tracing::trace!(chosen = best, ?samples, "thompson draw");
        Ok(ThompsonDraw {
            chosen: best,
            samples,
        })
    }

    /// Monte-Carlo estimate of `P(arm i yields the largest posterior draw)`.
    ///
    /// This is the probability that the next [`sample_arm`][Self::sample_arm]
    /// call picks each arm. The result sums to 1.
    pub fn win_probabilities(
        &self,
        posterior: &PosteriorState,
        rng: &mut dyn RngCore,
        draws: usize,
    ) -> Result<Vec<f64>> {
        if posterior.is_empty() {
            return Err(BanditError::NoArms);
        }
        if draws == 0 {
            return Err(BanditError::InvalidCount { what: "draws" });
        }
        let mut wins = vec![0u64; posterior.len()];
        for _ in 0..draws {
            let i = self.sample_arm(posterior, rng)?;
            wins[i] += 1;
        }
        let n = draws as f64;
        Ok(wins.into_iter().map(|w| w as f64 / n).collect())
    }
}

impl ArmPolicy for ThompsonPolicy {
    fn select(&mut self, posterior: &PosteriorState, rng: &mut dyn RngCore) -> Result<usize> {
        self.sample_arm(posterior, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn skewed() -> PosteriorState {
        let mut s = PosteriorState::uniform(3);
        for _ in 0..50 {
            s.update(1, 1, 0.0).unwrap();
            s.update(0, 0, 0.0).unwrap();
            s.update(2, 0, 0.0).unwrap();
        }
        s
    }

    #[test]
    fn empty_posterior_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        let s = PosteriorState::uniform(0);
        assert_eq!(
            ThompsonPolicy.sample_arm(&s, &mut rng).unwrap_err(),
            BanditError::NoArms
        );
    }

    #[test]
    fn single_arm_is_always_chosen() {
        let mut rng = StdRng::seed_from_u64(9);
        let s = PosteriorState::uniform(1);
        for _ in 0..20 {
            assert_eq!(ThompsonPolicy.sample_arm(&s, &mut rng).unwrap(), 0);
        }
    }

    #[test]
    fn chosen_index_is_the_argmax_of_the_samples() {
        let mut rng = StdRng::seed_from_u64(11);
        let s = PosteriorState::uniform(5);
        for _ in 0..50 {
            let d = ThompsonPolicy.sample_arm_with_draws(&s, &mut rng).unwrap();
            assert_eq!(d.samples.len(), 5);
            let max = d.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(d.samples[d.chosen], max);
            // Lowest index among equal maxima.
            assert!(d.samples[..d.chosen].iter().all(|&x| x < max));
        }
    }

    #[test]
    fn deterministic_given_same_seed_and_state() {
        let s = skewed();
        let mut r1 = StdRng::seed_from_u64(42);
        let mut r2 = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(
                ThompsonPolicy.sample_arm_with_draws(&s, &mut r1).unwrap(),
                ThompsonPolicy.sample_arm_with_draws(&s, &mut r2).unwrap()
            );
        }
    }

    #[test]
    fn resamples_on_every_call() {
        let s = PosteriorState::uniform(2);
        let mut rng = StdRng::seed_from_u64(5);
        let a = ThompsonPolicy.sample_arm_with_draws(&s, &mut rng).unwrap();
        let b = ThompsonPolicy.sample_arm_with_draws(&s, &mut rng).unwrap();
        assert_ne!(a.samples, b.samples);
    }

    #[test]
    fn strong_posterior_dominates_selection() {
        let s = skewed();
        let mut rng = StdRng::seed_from_u64(1);
        let picks = (0..200)
            .filter(|_| ThompsonPolicy.sample_arm(&s, &mut rng).unwrap() == 1)
            .count();
        assert!(picks > 190, "picks={picks}");
    }

    #[test]
    fn win_probabilities_sum_to_one_and_favor_the_leader() {
        let s = skewed();
        let mut rng = StdRng::seed_from_u64(2);
        let w = ThompsonPolicy.win_probabilities(&s, &mut rng, 2_000).unwrap();
        let sum: f64 = w.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum={sum}");
        assert!(w[1] > 0.9);
        assert!(matches!(
            ThompsonPolicy.win_probabilities(&s, &mut rng, 0),
            Err(BanditError::InvalidCount { .. })
        ));
    }
}
