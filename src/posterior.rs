//! Beta posterior state, one `(alpha, beta)` pair per arm.

use rand::RngCore;
use rand_distr::{Beta, Distribution};

use crate::error::{BanditError, Result};

/// Beta posterior for one arm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BetaParams {
    pub alpha: f64,
    pub beta: f64,
    /// Raw number of observations folded in (unweighted by `eta`).
    pub pulls: u64,
    /// Raw number of successes folded in (unweighted by `eta`).
    pub successes: u64,
}

impl BetaParams {
    /// Posterior mean `alpha / (alpha + beta)`.
    pub fn mean(&self) -> f64 {
        let denom = self.alpha + self.beta;
        if denom <= 0.0 {
            0.5
        } else {
            self.alpha / denom
        }
    }
}

/// Per-arm Beta posteriors under Bernoulli observations.
///
/// Parameters only ever grow: each observation adds `1 + eta` (strictly
/// positive) to exactly one of `alpha`/`beta`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PosteriorState {
    alpha0: f64,
    beta0: f64,
    arms: Vec<BetaParams>,
}

/// Check the exploration parameter: finite and `> -1`.
pub fn validate_eta(eta: f64) -> Result<()> {
    if eta.is_finite() && eta > -1.0 {
        Ok(())
    } else {
        Err(BanditError::InvalidEta(eta))
    }
}

impl PosteriorState {
    /// `n` arms, all at the uniform prior Beta(1, 1).
    pub fn uniform(n: usize) -> Self {
        Self {
            alpha0: 1.0,
            beta0: 1.0,
            arms: vec![
                BetaParams {
                    alpha: 1.0,
                    beta: 1.0,
                    pulls: 0,
                    successes: 0,
                };
                n
            ],
        }
    }

    /// `n` arms, all at the prior Beta(alpha0, beta0).
    pub fn with_prior(n: usize, alpha0: f64, beta0: f64) -> Result<Self> {
        if !(alpha0.is_finite() && beta0.is_finite()) || alpha0 <= 0.0 || beta0 <= 0.0 {
            return Err(BanditError::InvalidPrior {
                alpha: alpha0,
                beta: beta0,
            });
        }
        let mut s = Self::uniform(n);
        s.alpha0 = alpha0;
        s.beta0 = beta0;
        for p in &mut s.arms {
            p.alpha = alpha0;
            p.beta = beta0;
        }
        Ok(s)
    }

    pub fn len(&self) -> usize {
        self.arms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }

    /// Prior shapes `(alpha0, beta0)`.
    pub fn prior(&self) -> (f64, f64) {
        (self.alpha0, self.beta0)
    }

    pub fn params(&self, arm: usize) -> Result<BetaParams> {
        self.arms
            .get(arm)
            .copied()
            .ok_or(BanditError::ArmOutOfRange {
                index: arm,
                len: self.arms.len(),
            })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &BetaParams> + '_ {
        self.arms.iter()
    }

    pub fn alpha(&self, arm: usize) -> Result<f64> {
        self.params(arm).map(|p| p.alpha)
    }

    pub fn beta(&self, arm: usize) -> Result<f64> {
        self.params(arm).map(|p| p.beta)
    }

    /// Posterior mean for one arm.
    pub fn mean(&self, arm: usize) -> Result<f64> {
        self.params(arm).map(|p| p.mean())
    }

    /// Posterior means for all arms.
    pub fn means(&self) -> Vec<f64> {
        self.arms.iter().map(BetaParams::mean).collect()
    }

    /// Effective (eta-weighted) pull count: `alpha + beta - (alpha0 + beta0)`.
    pub fn pull_count(&self, arm: usize) -> Result<f64> {
        let (a0, b0) = self.prior();
        self.params(arm).map(|p| p.alpha + p.beta - a0 - b0)
    }

    pub fn pull_counts(&self) -> Vec<f64> {
        let (a0, b0) = self.prior();
        self.arms.iter().map(|p| p.alpha + p.beta - a0 - b0).collect()
    }

    /// Raw pull count for one arm.
    pub fn pulls(&self, arm: usize) -> Result<u64> {
        self.params(arm).map(|p| p.pulls)
    }

    /// Raw success count for one arm.
    pub fn successes(&self, arm: usize) -> Result<u64> {
        self.params(arm).map(|p| p.successes)
    }

    /// Weighted successes summed over arms: `sum(alpha - alpha0)`.
    pub fn weighted_successes(&self) -> f64 {
        self.arms.iter().map(|p| p.alpha - self.alpha0).sum()
    }

    /// Fold one binary observation into `arm`.
    ///
    /// `reward == 1` adds `1 + eta` to alpha, `reward == 0` adds it to beta.
    /// Nothing is modified if any argument is invalid.
    pub fn update(&mut self, arm: usize, reward: u8, eta: f64) -> Result<()> {
        validate_eta(eta)?;
        if reward > 1 {
            return Err(BanditError::InvalidReward(reward));
        }
        let len = self.arms.len();
        let p = self
            .arms
            .get_mut(arm)
            .ok_or(BanditError::ArmOutOfRange { index: arm, len })?;
        let step = 1.0 + eta;
        if reward == 1 {
            p.alpha += step;
            p.successes = p.successes.saturating_add(1);
        } else {
            p.beta += step;
        }
        p.pulls = p.pulls.saturating_add(1);
        Ok(())
    }

    /// Draw one value from `arm`'s current Beta posterior.
    pub fn sample(&self, arm: usize, rng: &mut dyn RngCore) -> Result<f64> {
        let p = self.params(arm)?;
        let dist = Beta::new(p.alpha, p.beta).map_err(|_| BanditError::InvalidPrior {
            alpha: p.alpha,
            beta: p.beta,
        })?;
        Ok(dist.sample(rng))
    }
}
