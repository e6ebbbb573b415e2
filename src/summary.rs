//! Read-only report over an engine's current state.

use std::fmt;

/// One arm's truth and estimate, as shown in a [`Summary`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmReport {
    pub index: usize,
    pub p_true: f64,
    pub p_hat: f64,
}

/// Snapshot of totals, regret and estimation quality.
///
/// Produced by [`BanditEngine::summary`][crate::BanditEngine::summary]; building
/// it never mutates the engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    pub n_arms: usize,
    pub n_total: u64,
    pub n_success: u64,
    pub n_failure: u64,
    /// `max(p_true) * n_total - n_success`. Can be negative on a lucky run.
    pub regret: f64,
    /// `regret / n_total`, absent before the first pull.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub regret_ratio: Option<f64>,
    /// Mean over arms of `(p_true - p_hat)^2`.
    pub mse: f64,
    pub true_best: ArmReport,
    pub estimated_best: ArmReport,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[ Bayesian binomial bandit with {} arms ]", self.n_arms)?;
        writeln!(
            f,
            "- Pulled {} times, with {} successes and {} failures.",
            self.n_total, self.n_success, self.n_failure
        )?;
        if let Some(ratio) = self.regret_ratio {
            writeln!(f, "- Regret: {:.3} ({:.4} per pull)", self.regret, ratio)?;
        }
        writeln!(f, "- Mean squared estimation error: {:.3}", self.mse)?;
        let t = self.true_best;
        writeln!(
            f,
            "- true best arm: {}, p_true {:.3}, p_hat {:.3}",
            t.index, t.p_true, t.p_hat
        )?;
        let e = self.estimated_best;
        write!(
            f,
            "- estd best arm: {}, p_true {:.3}, p_hat {:.3}",
            e.index, e.p_true, e.p_hat
        )
    }
}
