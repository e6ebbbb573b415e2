//! `betabandit`: Beta-Bernoulli Thompson sampling for binary-reward arms.
//!
//! You have a fixed set of independent arms, each paying out `1` with some
//! unknown probability. [`BanditEngine`] repeatedly:
//!
//! 1. draws one sample per arm from its Beta(alpha, beta) posterior and picks
//!    the largest ([`ThompsonPolicy`]),
//! 2. pulls that arm ([`RewardSource`]),
//! 3. adds `1 + eta` to alpha (reward 1) or beta (reward 0) in
//!    [`PosteriorState`].
//!
//! **Goals:**
//! - **Deterministic by default**: the engine owns a seeded `StdRng`; same
//!   seed + same arms → same trajectory.
//! - **Explicit exploration control**: `eta > -1` scales how far each
//!   observation moves the posterior. Positive values exploit sooner, negative
//!   values keep posteriors flat for longer.
//! - **Diagnostics without leakage**: ground truth is read once at
//!   construction for regret and estimation error; selection never sees it.
//!
//! **Non-goals:**
//! - Non-binary rewards, non-stationary arms, persistence of bandit state.
//!
//! # Quick start
//!
//! ```rust
//! use betabandit::{BanditConfig, BanditEngine, BernoulliArm, boxed};
//!
//! let arms = BernoulliArm::from_probs(&[0.9, 0.1]).unwrap();
//! let cfg = BanditConfig { seed: 7, ..BanditConfig::default() };
//! let mut bb = BanditEngine::with_config(boxed(arms), cfg).unwrap();
//!
//! bb.update(1_000).unwrap();
//! let pulls = bb.pull_count();
//! assert!(pulls[0] > pulls[1]);
//! assert_eq!(bb.n_total(), 1_000);
//! ```
//!
//! # Metrics
//!
//! All metrics are pure reads of the current state and are defined before the
//! first pull (every `p_hat` is `0.5` under the uniform prior):
//!
//! - `p_hat[i] = alpha_i / (alpha_i + beta_i)`
//! - `pull_count[i] = alpha_i + beta_i - 2` (eta-weighted)
//! - `p_err[i] = p_true[i] - p_hat[i]`
//! - `regret = max_i p_true[i] * n_total - n_success`, not clamped at zero
//!
//! # On negative `eta`
//!
//! Each update adds `1 + eta`, which is strictly positive whenever
//! `eta > -1`, to exactly one parameter. Starting from a positive prior,
//! alpha and beta therefore never decrease and no clamping floor is needed,
//! however many one-sided observations arrive.

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod arm;
pub use arm::*;

mod posterior;
pub use posterior::*;

mod policy;
pub use policy::ArmPolicy;

mod thompson;
pub use thompson::*;

mod alloc;
pub use alloc::*;

mod summary;
pub use summary::*;

mod engine;
pub use engine::*;
