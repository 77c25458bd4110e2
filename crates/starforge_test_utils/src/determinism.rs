//! Determinism testing utilities.
//!
//! Provides a harness for verifying that turn processing produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! Saved games and replays depend on construction being 100% deterministic.
//! Sources of non-determinism include:
//!
//! - **Floating-point math**: ratios use [`starforge_core::math::Fixed`].
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Centers, designs and civilizations live in `BTreeMap`s and are always
//!   visited in id order.
//!
//! - **Observers**: listeners see changes but never feed back into state.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use starforge_core::context::GameContext;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of turns processed.
    pub turns: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic run).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Turn processing is non-deterministic!\n\
                 Runs: {}\n\
                 Turns: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.turns,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a state machine multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `turns` - Number of steps per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one turn
/// * `hash` - Function to compute the state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    turns: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..turns {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        turns,
    }
}

/// Run a context twice from identical setups and compare final hashes.
pub fn verify_context_determinism<F>(setup_fn: F, turns: u64) -> DeterminismResult
where
    F: Fn() -> GameContext,
{
    verify_determinism(
        2,
        turns,
        &setup_fn,
        |ctx| {
            ctx.process_turn();
        },
        GameContext::state_hash,
    )
}

/// Run N contexts on scoped threads and collect their final hashes.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn run_parallel_contexts<F>(setup_fn: F, runs: usize, turns: u64) -> DeterminismResult
where
    F: Fn() -> GameContext + Sync,
{
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..runs)
            .map(|_| {
                s.spawn(|| {
                    let mut ctx = setup_fn();
                    for _ in 0..turns {
                        ctx.process_turn();
                    }
                    ctx.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("worker thread panicked"))
            .collect()
    });

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    DeterminismResult {
        is_deterministic,
        hashes,
        turns,
    }
}

/// Compare two runs turn by turn, finding the first divergence.
///
/// # Returns
///
/// `None` if the runs match throughout, `Some(turn)` if they diverge at
/// that turn.
pub fn find_first_divergence<F>(setup_fn: F, turns: u64) -> Option<u64>
where
    F: Fn() -> GameContext,
{
    let mut a = setup_fn();
    let mut b = setup_fn();

    if a.state_hash() != b.state_hash() {
        return Some(0);
    }

    for turn in 1..=turns {
        a.process_turn();
        b.process_turn();

        if a.state_hash() != b.state_hash() {
            tracing::warn!(turn, "Contexts diverged");
            return Some(turn);
        }
    }

    None
}

/// Verify that saving and loading mid-game changes nothing.
///
/// The context is run for `turns`, saved, restored, then both copies run
/// `turns` more and must still agree.
pub fn verify_save_determinism<F>(setup_fn: F, turns: u64) -> bool
where
    F: Fn() -> GameContext,
{
    let mut ctx = setup_fn();
    for _ in 0..turns {
        ctx.process_turn();
    }

    let Ok(bytes) = ctx.save() else {
        return false;
    };
    let Ok(mut restored) = GameContext::load(&bytes) else {
        return false;
    };
    if restored.state_hash() != ctx.state_hash() {
        return false;
    }

    for _ in 0..turns {
        ctx.process_turn();
        restored.process_turn();
    }
    restored.state_hash() == ctx.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{busy_context, sample_context, EARTH, FRIGATE};
    use starforge_core::config::BuildRules;

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, 100, || 0u64, |n| *n += 1, |n| *n);

        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![100, 100, 100]);
    }

    #[test]
    fn test_idle_context_determinism() {
        verify_context_determinism(|| sample_context(BuildRules::default()), 20)
            .assert_deterministic();
    }

    #[test]
    fn test_busy_context_determinism() {
        verify_context_determinism(|| busy_context(BuildRules::default()), 40)
            .assert_deterministic();
    }

    #[test]
    fn test_parallel_contexts_match() {
        let result = run_parallel_contexts(|| busy_context(BuildRules::default()), 4, 30);
        result.assert_deterministic();
        assert_eq!(result.hashes.len(), 4);
    }

    #[test]
    fn test_no_divergence() {
        assert!(find_first_divergence(|| busy_context(BuildRules::default()), 25).is_none());
    }

    #[test]
    fn test_save_load_preserves_outcome() {
        assert!(verify_save_determinism(
            || {
                let mut ctx = busy_context(BuildRules::default());
                ctx.rush_project(EARTH, 0).unwrap();
                ctx.queue_project(EARTH, 1, FRIGATE, Some(7)).unwrap();
                ctx
            },
            6,
        ));
    }

    #[test]
    fn test_compute_hash_is_stable() {
        assert_eq!(compute_hash(&(1, "a")), compute_hash(&(1, "a")));
        assert_ne!(compute_hash(&1u8), compute_hash(&2u8));
    }
}
