//! `ArmPolicy`: the selection seam between [`BanditEngine`][crate::BanditEngine]
//! and whatever chooses the next arm.
//!
//! [`ThompsonPolicy`][crate::ThompsonPolicy] is the production implementation.
//! The trait exists so harnesses and tests can drive the engine with a
//! scripted or deterministic rule without touching the update logic.

use rand::RngCore;

use crate::error::Result;
use crate::posterior::PosteriorState;

/// Chooses an arm index from the current posterior.
///
/// # Example
///
/// ```rust
/// use betabandit::{ArmPolicy, PosteriorState, ThompsonPolicy};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// fn pick<P: ArmPolicy>(p: &mut P, post: &PosteriorState) -> usize {
///     let mut rng = StdRng::seed_from_u64(0);
///     p.select(post, &mut rng).unwrap()
/// }
///
/// let post = PosteriorState::uniform(3);
/// assert!(pick(&mut ThompsonPolicy, &post) < 3);
/// ```
pub trait ArmPolicy {
    /// Return a valid index into `posterior`.
    ///
    /// Must fail (not return a sentinel) when `posterior` is empty.
    fn select(&mut self, posterior: &PosteriorState, rng: &mut dyn RngCore) -> Result<usize>;
}

impl<P: ArmPolicy + ?Sized> ArmPolicy for Box<P> {
    fn select(&mut self, posterior: &PosteriorState, rng: &mut dyn RngCore) -> Result<usize> {
        (**self).select(posterior, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BanditError;
    use crate::ThompsonPolicy;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixed(usize);

    impl ArmPolicy for Fixed {
        fn select(&mut self, posterior: &PosteriorState, _rng: &mut dyn RngCore) -> Result<usize> {
            if posterior.is_empty() {
                return Err(BanditError::NoArms);
            }
            Ok(self.0.min(posterior.len() - 1))
        }
    }

    fn run_generic<P: ArmPolicy>(p: &mut P, n: usize) -> Vec<usize> {
        let post = PosteriorState::uniform(n);
        let mut rng = StdRng::seed_from_u64(0);
        (0..10).map(|_| p.select(&post, &mut rng).unwrap()).collect()
    }

    #[test]
    fn thompson_implements_arm_policy() {
        let picks = run_generic(&mut ThompsonPolicy, 4);
        assert!(picks.iter().all(|&i| i < 4));
    }

    #[test]
    fn boxed_policies_dispatch() {
        let mut p: Box<dyn ArmPolicy> = Box::new(Fixed(1));
        assert_eq!(run_generic(&mut p, 3), vec![1; 10]);
    }
}
