//! Binomial bandit demo: 100 arms, uniform random success probabilities.
//!
//! Builds the arms, runs 250 + 250 + 2500 Thompson rounds and prints the
//! summary after each stage. Regret per pull should shrink as the posterior
//! concentrates on the best arms.
//!
//! Run with:
//!   cargo run --example binomial_demo -- [n_arms] [eta] [seed]
//!
//! Set `RUST_LOG=betabandit=debug` to see engine events.

use betabandit::{boxed, BanditConfig, BanditEngine, BernoulliArm, Progress};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

fn arg<T: std::str::FromStr>(i: usize, default: T) -> T {
    std::env::args()
        .nth(i)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let n_arms: usize = arg(1, 100);
    let eta: f64 = arg(2, 0.0);
    let seed: u64 = arg(3, 0);

    println!("Initializing {n_arms} arms");
    // Separate RNG for the ground truth; the engine owns its own.
    let mut env = StdRng::seed_from_u64(seed.wrapping_add(1));
    let p_true: Vec<f64> = (0..n_arms).map(|_| env.random::<f64>()).collect();
    let shown: Vec<String> = p_true.iter().map(|p| format!("{p:.3}")).collect();
    println!("True probabilities:\n[{}]\n", shown.join(" "));

    let arms = BernoulliArm::from_probs(&p_true)?;
    println!("Initializing Binomial Bandit");
    let cfg = BanditConfig {
        eta,
        seed,
        progress_every: 250,
        ..BanditConfig::default()
    };
    let mut bb = BanditEngine::with_config(boxed(arms), cfg)?;
    println!("{}", bb.summary());

    let progress = |p: Progress| {
        eprintln!(
            "  {:>5}/{:<5} total={} successes={}",
            p.done, p.requested, p.n_total, p.n_success
        );
    };

    println!("\nUpdating 250 times...\n");
    bb.update_with_progress(250, progress)?;
    println!("{}", bb.summary());

    println!("\nUpdating another 250 times...\n");
    bb.update_with_progress(250, progress)?;
    println!("{}", bb.summary());

    println!("\nLet's see if the success probability increases now...\n");
    bb.update_with_progress(2_500, progress)?;
    println!("{}", bb.summary());

    Ok(())
}
