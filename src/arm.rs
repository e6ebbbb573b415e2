//! Reward sources ("arms").
//!
//! An arm is a stateless source of binary rewards. Randomness is always passed
//! in by the caller, so an arm owns no generator and successive pulls are
//! independent draws from whatever RNG the caller holds.
//!
//! Two shapes are provided:
//! - [`BernoulliArm`]: fixed success probability `p`, exposed as ground truth.
//! - [`DistArm`]: any `Distribution<bool>`, with an optional ground-truth
//!   parameter for diagnostics.

use std::fmt;

use rand::RngCore;
use rand_distr::{Bernoulli, Distribution};

use crate::error::{BanditError, Result};

/// A source of iid binary rewards.
pub trait RewardSource: fmt::Debug + Send + Sync {
    /// Stable identifier of this arm.
    fn id(&self) -> usize;

    /// Draw one reward.
    fn draw(&self, rng: &mut dyn RngCore) -> bool;

    /// Pull once, returning `0` or `1`.
    fn pull(&self, rng: &mut dyn RngCore) -> u8 {
        u8::from(self.draw(rng))
    }

    /// Pull `n` times (`n >= 1`), returning `n` iid rewards in `{0, 1}`.
    fn pull_n(&self, rng: &mut dyn RngCore, n: usize) -> Result<Vec<u8>> {
        if n == 0 {
            return Err(BanditError::InvalidCount { what: "pull count" });
        }
        Ok((0..n).map(|_| self.pull(rng)).collect())
    }

    /// Ground-truth success probability, if the source knows it.
    ///
    /// Only used for diagnostics (error and regret); selection never reads it.
    fn ground_truth(&self) -> Option<f64> {
        None
    }
}

/// Box a homogeneous arm list for [`BanditEngine`][crate::BanditEngine].
pub fn boxed<A: RewardSource + 'static>(arms: Vec<A>) -> Vec<Box<dyn RewardSource>> {
    arms.into_iter()
        .map(|a| Box::new(a) as Box<dyn RewardSource>)
        .collect()
}

/// Arm with a fixed, hidden success probability.
#[derive(Debug, Clone, Copy)]
pub struct BernoulliArm {
    id: usize,
    p: f64,
    dist: Bernoulli,
}

impl BernoulliArm {
    /// Create an arm. Fails if `p` is not in `[0, 1]`.
    pub fn new(id: usize, p: f64) -> Result<Self> {
        let dist = Bernoulli::new(p).map_err(|_| BanditError::InvalidProbability { id, p })?;
        Ok(Self { id, p, dist })
    }

    /// Build one arm per probability, with ids `0..probs.len()`.
    pub fn from_probs(probs: &[f64]) -> Result<Vec<Self>> {
        probs
            .iter()
            .enumerate()
            .map(|(id, &p)| Self::new(id, p))
            .collect()
    }

    /// The arm's success probability.
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl RewardSource for BernoulliArm {
    fn id(&self) -> usize {
        self.id
    }

    fn draw(&self, rng: &mut dyn RngCore) -> bool {
        self.dist.sample(rng)
    }

    fn ground_truth(&self) -> Option<f64> {
        Some(self.p)
    }
}

impl fmt::Display for BernoulliArm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Arm {}> bernoulli{{p: {:.3}}}", self.id, self.p)
    }
}

/// Arm backed by an arbitrary boolean-valued distribution.
///
/// The ground truth is whatever the caller attaches with [`DistArm::with_truth`];
/// without it the engine treats the arm's truth as `0.5`.
#[derive(Debug, Clone)]
pub struct DistArm<D> {
    id: usize,
    dist: D,
    truth: Option<f64>,
}

impl<D> DistArm<D>
where
    D: Distribution<bool> + fmt::Debug + Send + Sync,
{
    pub fn new(id: usize, dist: D) -> Self {
        Self {
            id,
            dist,
            truth: None,
        }
    }

    /// Attach a ground-truth success probability (must be in `[0, 1]`).
    pub fn with_truth(mut self, p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(BanditError::InvalidProbability { id: self.id, p });
        }
        self.truth = Some(p);
        Ok(self)
    }

    pub fn dist(&self) -> &D {
        &self.dist
    }
}

impl<D> RewardSource for DistArm<D>
where
    D: Distribution<bool> + fmt::Debug + Send + Sync,
{
    fn id(&self) -> usize {
        self.id
    }

    fn draw(&self, rng: &mut dyn RngCore) -> bool {
        self.dist.sample(rng)
    }

    fn ground_truth(&self) -> Option<f64> {
        self.truth
    }
}

impl<D> fmt::Display for DistArm<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.truth {
            Some(p) => write!(f, "<Arm {}> dist{{p: {:.3}}}", self.id, p),
            None => write!(f, "<Arm {}> dist", self.id),
        }
    }
}
