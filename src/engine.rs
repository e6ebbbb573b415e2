//! The select → pull → update loop and its diagnostics.
//!
//! [`BanditEngine`] owns the arms, the [`PosteriorState`], the running
//! success/failure counters and a seeded RNG. Every round:
//!
//! 1. the policy picks an arm from the *current* posterior,
//! 2. that arm is pulled once,
//! 3. the reward is folded into the counters and the arm's Beta parameters.
//!
//! Rounds are strictly sequential and state carries across `update` calls.
//! Ground truth (`p_true`) is read once at construction and only feeds the
//! regret/error diagnostics.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, trace};

use crate::alloc::{argmax, softmax};
use crate::arm::RewardSource;
use crate::error::{BanditError, Result};
use crate::policy::ArmPolicy;
use crate::posterior::{validate_eta, PosteriorState};
use crate::summary::{ArmReport, Summary};
use crate::thompson::ThompsonPolicy;

/// Ground truth used for arms that do not expose one.
pub const DEFAULT_TRUTH: f64 = 0.5;

/// Configuration for [`BanditEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BanditConfig {
    /// Exploration parameter: each observation adds `1 + eta` to alpha or beta.
    ///
    /// - `0.0` is plain Beta-Bernoulli conjugacy.
    /// - `> 0` weights observations more (greedier sooner).
    /// - `(-1, 0)` weights them less (flatter posteriors, more exploration).
    pub eta: f64,
    /// Prior alpha (must be finite and > 0).
    pub alpha0: f64,
    /// Prior beta (must be finite and > 0).
    pub beta0: f64,
    /// Seed for the engine's RNG (drives both selection and pulls).
    pub seed: u64,
    /// Rounds between progress callbacks in
    /// [`update_with_progress`][BanditEngine::update_with_progress].
    pub progress_every: u64,
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            eta: 0.0,
            alpha0: 1.0,
            beta0: 1.0,
            seed: 0,
            progress_every: 100,
        }
    }
}

impl BanditConfig {
    pub fn validate(&self) -> Result<()> {
        validate_eta(self.eta)?;
        if !(self.alpha0.is_finite() && self.beta0.is_finite())
            || self.alpha0 <= 0.0
            || self.beta0 <= 0.0
        {
            return Err(BanditError::InvalidPrior {
                alpha: self.alpha0,
                beta: self.beta0,
            });
        }
        if self.progress_every == 0 {
            return Err(BanditError::InvalidConfig("progress_every must be >= 1"));
        }
        Ok(())
    }
}

/// Result of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    pub arm: usize,
    pub reward: u8,
}

/// Progress signal passed to the observer of
/// [`update_with_progress`][BanditEngine::update_with_progress].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Rounds completed in the current call.
    pub done: u64,
    /// Rounds requested in the current call.
    pub requested: u64,
    /// Lifetime pulls after this round.
    pub n_total: u64,
    /// Lifetime successes after this round.
    pub n_success: u64,
}

/// Beta-Bernoulli bandit: arms, posterior, counters and RNG.
///
/// # Example
///
/// ```rust
/// use betabandit::BanditEngine;
///
/// let mut bb = BanditEngine::bernoulli(&[0.2, 0.8], 0.0).unwrap();
/// bb.update(500).unwrap();
/// assert_eq!(bb.n_total(), 500);
/// println!("{}", bb.summary());
/// ```
#[derive(Debug)]
pub struct BanditEngine<P = ThompsonPolicy> {
    cfg: BanditConfig,
    arms: Vec<Box<dyn RewardSource>>,
    posterior: PosteriorState,
    policy: P,
    p_true: Vec<f64>,
    n_success: u64,
    n_failure: u64,
    rng: StdRng,
}

impl BanditEngine<ThompsonPolicy> {
    /// Thompson-sampling engine with the given `eta` and default config.
    pub fn new(arms: Vec<Box<dyn RewardSource>>, eta: f64) -> Result<Self> {
        Self::with_config(
            arms,
            BanditConfig {
                eta,
                ..BanditConfig::default()
            },
        )
    }

    /// Thompson-sampling engine with an explicit config.
    pub fn with_config(arms: Vec<Box<dyn RewardSource>>, cfg: BanditConfig) -> Result<Self> {
        Self::with_policy(arms, cfg, ThompsonPolicy)
    }

    /// Convenience: one [`BernoulliArm`][crate::BernoulliArm] per probability.
    pub fn bernoulli(probs: &[f64], eta: f64) -> Result<Self> {
        let arms = crate::arm::BernoulliArm::from_probs(probs)?;
        Self::new(crate::arm::boxed(arms), eta)
    }
}

impl<P: ArmPolicy> BanditEngine<P> {
    /// Engine driven by an arbitrary selection policy.
    ///
    /// Fails on an empty arm list, duplicate arm ids or an invalid config.
    pub fn with_policy(
        arms: Vec<Box<dyn RewardSource>>,
        cfg: BanditConfig,
        policy: P,
    ) -> Result<Self> {
        cfg.validate()?;
        if arms.is_empty() {
            return Err(BanditError::NoArms);
        }
        let mut ids = BTreeSet::new();
        if !arms.iter().all(|a| ids.insert(a.id())) {
            return Err(BanditError::InvalidConfig("arm ids must be unique"));
        }

        let p_true = arms
            .iter()
            .map(|a| a.ground_truth().unwrap_or(DEFAULT_TRUTH))
            .collect();
        let posterior = PosteriorState::with_prior(arms.len(), cfg.alpha0, cfg.beta0)?;
        debug!(n_arms = arms.len(), eta = cfg.eta, seed = cfg.seed, "bandit engine created");

        Ok(Self {
            cfg,
            arms,
            posterior,
            policy,
            p_true,
            n_success: 0,
            n_failure: 0,
            rng: StdRng::seed_from_u64(cfg.seed),
        })
    }

    /// Run exactly one round and report what happened.
    ///
    /// Either the whole round applies (choice, pull, counters, posterior) or,
    /// on error, nothing changes.
    pub fn step(&mut self) -> Result<Round> {
        let arm = self.policy.select(&self.posterior, &mut self.rng)?;
        let source = self.arms.get(arm).ok_or(BanditError::ArmOutOfRange {
            index: arm,
            len: self.arms.len(),
        })?;
        let reward = source.pull(&mut self.rng);
        self.posterior.update(arm, reward, self.cfg.eta)?;
        if reward == 1 {
            self.n_success += 1;
        } else {
            self.n_failure += 1;
        }
        trace!(arm, reward, "round");
        Ok(Round { arm, reward })
    }

    /// Run `n` sequential rounds. `update(0)` is a no-op.
    pub fn update(&mut self, n: u64) -> Result<()> {
        self.run(n, None)
    }

    /// Like [`update`][Self::update], calling `observer` every
    /// `progress_every` rounds and after the last one.
    pub fn update_with_progress<F>(&mut self, n: u64, mut observer: F) -> Result<()>
    where
        F: FnMut(Progress),
    {
        self.run(n, Some(&mut observer))
    }

    fn run(&mut self, n: u64, mut observer: Option<&mut dyn FnMut(Progress)>) -> Result<()> {
        for done in 1..=n {
            self.step()?;
            if let Some(obs) = observer.as_deref_mut() {
                if done % self.cfg.progress_every == 0 || done == n {
                    obs(Progress {
                        done,
                        requested: n,
                        n_total: self.n_total(),
                        n_success: self.n_success,
                    });
                }
            }
        }
        debug!(
            rounds = n,
            n_total = self.n_total(),
            regret = self.regret(),
            "bandit update finished"
        );
        Ok(())
    }

    pub fn config(&self) -> &BanditConfig {
        &self.cfg
    }

    pub fn eta(&self) -> f64 {
        self.cfg.eta
    }

    pub fn n_arms(&self) -> usize {
        self.arms.len()
    }

    pub fn arms(&self) -> &[Box<dyn RewardSource>] {
        &self.arms
    }

    pub fn posterior(&self) -> &PosteriorState {
        &self.posterior
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Posterior mean per arm, `alpha / (alpha + beta)`.
    pub fn p_hat(&self) -> Vec<f64> {
        self.posterior.means()
    }

    /// Effective pull count per arm, `alpha + beta - (alpha0 + beta0)`.
    pub fn pull_count(&self) -> Vec<f64> {
        self.posterior.pull_counts()
    }

    /// Ground truth per arm (diagnostics only).
    pub fn p_true(&self) -> &[f64] {
        &self.p_true
    }

    /// `p_true - p_hat` per arm.
    pub fn p_err(&self) -> Vec<f64> {
        self.p_true
            .iter()
            .zip(self.posterior.iter())
            .map(|(t, p)| t - p.mean())
            .collect()
    }

    /// Mean squared estimation error over arms.
    pub fn mse(&self) -> f64 {
        let errs = self.p_err();
        errs.iter().map(|e| e * e).sum::<f64>() / errs.len() as f64
    }

    pub fn n_success(&self) -> u64 {
        self.n_success
    }

    pub fn n_failure(&self) -> u64 {
        self.n_failure
    }

    pub fn n_total(&self) -> u64 {
        self.n_success + self.n_failure
    }

    /// Weighted successes, `sum(alpha - alpha0)`. Equals `n_success` when `eta == 0`.
    pub fn reward(&self) -> f64 {
        self.posterior.weighted_successes()
    }

    /// `max(p_true) * n_total - n_success`. Not clamped: a lucky run goes negative.
    pub fn regret(&self) -> f64 {
        let best = self.p_true.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        best * self.n_total() as f64 - self.n_success as f64
    }

    /// Regret per pull; `None` before the first pull.
    pub fn regret_ratio(&self) -> Option<f64> {
        match self.n_total() {
            0 => None,
            n => Some(self.regret() / n as f64),
        }
    }

    /// Index of the arm with the highest ground truth.
    pub fn best_true_arm(&self) -> usize {
        argmax(&self.p_true).unwrap_or(0)
    }

    /// Index of the arm with the highest posterior mean.
    pub fn best_estimated_arm(&self) -> usize {
        argmax(&self.p_hat()).unwrap_or(0)
    }

    /// Softmax over posterior means (traffic-splitting view of the posterior).
    pub fn allocation_softmax(&self, temperature: f64) -> Vec<f64> {
        softmax(&self.p_hat(), temperature)
    }

    /// Monte-Carlo estimate of each arm's chance of winning the next Thompson draw.
    ///
    /// Uses the caller's RNG so the engine's own stream is left untouched.
    pub fn win_probabilities(&self, rng: &mut dyn RngCore, draws: usize) -> Result<Vec<f64>> {
        ThompsonPolicy.win_probabilities(&self.posterior, rng, draws)
    }

    fn arm_report(&self, index: usize) -> ArmReport {
        ArmReport {
            index,
            p_true: self.p_true.get(index).copied().unwrap_or(DEFAULT_TRUTH),
            p_hat: self.posterior.mean(index).unwrap_or(0.5),
        }
    }

    /// Totals, regret, estimation error and best-arm comparison.
    pub fn summary(&self) -> Summary {
        Summary {
            n_arms: self.n_arms(),
            n_total: self.n_total(),
            n_success: self.n_success,
            n_failure: self.n_failure,
            regret: self.regret(),
            regret_ratio: self.regret_ratio(),
            mse: self.mse(),
            true_best: self.arm_report(self.best_true_arm()),
            estimated_best: self.arm_report(self.best_estimated_arm()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arm::{boxed, BernoulliArm};

    /// Always picks the same arm.
    #[derive(Debug)]
    struct Fixed(usize);

    impl ArmPolicy for Fixed {
        fn select(&mut self, _p: &PosteriorState, _rng: &mut dyn RngCore) -> Result<usize> {
            Ok(self.0)
        }
    }

    fn arms(probs: &[f64]) -> Vec<Box<dyn RewardSource>> {
        boxed(BernoulliArm::from_probs(probs).unwrap())
    }

    #[test]
    fn fresh_engine_reports_uniform_estimates() {
        let bb = BanditEngine::bernoulli(&[0.2, 0.5, 0.7], 0.0).unwrap();
        assert_eq!(bb.p_hat(), vec![0.5; 3]);
        assert_eq!(bb.pull_count(), vec![0.0; 3]);
        assert_eq!(bb.n_total(), 0);
        assert_eq!(bb.regret(), 0.0);
        assert_eq!(bb.regret_ratio(), None);
        assert_eq!(bb.best_true_arm(), 2);
        assert_eq!(bb.best_estimated_arm(), 0);
    }

    #[test]
    fn construction_rejects_bad_config() {
        assert_eq!(
            BanditEngine::bernoulli(&[0.5], -1.0).unwrap_err(),
            BanditError::InvalidEta(-1.0)
        );
        assert_eq!(
            BanditEngine::new(Vec::new(), 0.0).unwrap_err(),
            BanditError::NoArms
        );
        let cfg = BanditConfig {
            progress_every: 0,
            ..BanditConfig::default()
        };
        assert!(BanditEngine::with_config(arms(&[0.5]), cfg).is_err());
        let cfg = BanditConfig {
            alpha0: -2.0,
            ..BanditConfig::default()
        };
        assert!(matches!(
            BanditEngine::with_config(arms(&[0.5]), cfg),
            Err(BanditError::InvalidPrior { .. })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let a = BernoulliArm::new(1, 0.3).unwrap();
        let b = BernoulliArm::new(1, 0.6).unwrap();
        assert_eq!(
            BanditEngine::new(boxed(vec![a, b]), 0.0).unwrap_err(),
            BanditError::InvalidConfig("arm ids must be unique")
        );
    }

    #[test]
    fn step_updates_only_the_chosen_arm() {
        let mut bb =
            BanditEngine::with_policy(arms(&[1.0, 0.0]), BanditConfig::default(), Fixed(0)).unwrap();
        let r = bb.step().unwrap();
        assert_eq!(r, Round { arm: 0, reward: 1 });
        assert_eq!(bb.posterior().params(0).unwrap().alpha, 2.0);
        assert_eq!(bb.posterior().params(1).unwrap().alpha, 1.0);
        assert_eq!(bb.posterior().params(1).unwrap().beta, 1.0);
        assert_eq!(bb.n_success(), 1);
    }

    #[test]
    fn policy_out_of_range_aborts_round_without_changes() {
        let mut bb =
            BanditEngine::with_policy(arms(&[0.5, 0.5]), BanditConfig::default(), Fixed(7)).unwrap();
        assert_eq!(
            bb.step().unwrap_err(),
            BanditError::ArmOutOfRange { index: 7, len: 2 }
        );
        assert_eq!(bb.n_total(), 0);
        assert_eq!(bb.pull_count(), vec![0.0, 0.0]);
    }

    #[test]
    fn update_accumulates_across_calls() {
        let mut bb = BanditEngine::bernoulli(&[0.3, 0.6], 0.0).unwrap();
        bb.update(10).unwrap();
        bb.update(0).unwrap();
        bb.update(15).unwrap();
        assert_eq!(bb.n_total(), 25);
        let total: f64 = bb.pull_count().iter().sum();
        assert!((total - 25.0).abs() < 1e-9);
        assert!((bb.reward() - bb.n_success() as f64).abs() < 1e-9);
    }

    #[test]
    fn same_seed_same_trajectory() {
        let cfg = BanditConfig {
            seed: 99,
            ..BanditConfig::default()
        };
        let mut a = BanditEngine::with_config(arms(&[0.4, 0.5, 0.6]), cfg).unwrap();
        let mut b = BanditEngine::with_config(arms(&[0.4, 0.5, 0.6]), cfg).unwrap();
        for _ in 0..100 {
            assert_eq!(a.step().unwrap(), b.step().unwrap());
        }
    }

    #[test]
    fn progress_fires_periodically_and_on_last_round() {
        let cfg = BanditConfig {
            progress_every: 4,
            ..BanditConfig::default()
        };
        let mut bb = BanditEngine::with_config(arms(&[0.5, 0.5]), cfg).unwrap();
        let mut seen = Vec::new();
        bb.update_with_progress(10, |p| seen.push(p.done)).unwrap();
        assert_eq!(seen, vec![4, 8, 10]);
    }

    #[test]
    fn deterministic_arms_give_exact_regret() {
        let mut bb =
            BanditEngine::with_policy(arms(&[0.0, 1.0]), BanditConfig::default(), Fixed(0)).unwrap();
        bb.update(20).unwrap();
        assert_eq!(bb.n_failure(), 20);
        assert_eq!(bb.regret(), 20.0);
        assert_eq!(bb.regret_ratio(), Some(1.0));
        let s = bb.summary();
        assert_eq!(s.true_best.index, 1);
        assert_eq!(s.estimated_best.index, 1);
        assert!((s.true_best.p_hat - 0.5).abs() < 1e-12);
    }

    #[test]
    fn allocation_softmax_is_a_distribution() {
        let bb = BanditEngine::bernoulli(&[0.1, 0.9], 0.0).unwrap();
        let p = bb.allocation_softmax(0.1);
        assert_eq!(p, vec![0.5, 0.5]);
    }
}
