//! Injectable randomness for simulated failures.
//!
//! Both the request validator and the mock carrier fail at random to imitate
//! real-world behavior. The decision goes through [`FailureInjector`] so that
//! callers can force either branch, and `test_mode` always disables it.

use std::sync::Arc;

use rand::Rng;

/// Source of yes/no decisions with a given probability of "yes".
pub trait Chance: Send + Sync {
    /// Returns true with the given probability in `[0, 1]`.
    fn roll(&self, probability: f64) -> bool;
}

/// Thread-local RNG backed chance.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomChance;

impl Chance for RandomChance {
    fn roll(&self, probability: f64) -> bool {
        rand::rng().random_bool(normalize(probability))
    }
}

fn normalize(probability: f64) -> f64 {
    if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    }
}

/// Chance that always yields the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedChance(pub bool);

impl Chance for FixedChance {
    fn roll(&self, _probability: f64) -> bool {
        self.0
    }
}

/// Decides whether a simulated failure should happen.
#[derive(Clone)]
pub struct FailureInjector {
    probability: f64,
    chance: Arc<dyn Chance>,
}

impl FailureInjector {
    /// Fails at random with the given probability, clamped to `[0, 1]`.
    pub fn random(probability: f64) -> Self {
        Self::with_chance(probability, RandomChance)
    }

    /// Uses a custom decision source.
    pub fn with_chance(probability: f64, chance: impl Chance + 'static) -> Self {
        Self {
            probability: normalize(probability),
            chance: Arc::new(chance),
        }
    }

    /// Never fails.
    pub fn never() -> Self {
        Self::with_chance(0.0, FixedChance(false))
    }

    /// Fails on every call outside of test mode.
    pub fn always() -> Self {
        Self::with_chance(1.0, FixedChance(true))
    }

    /// Returns the configured failure probability.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Returns true if the current call should fail.
    pub fn should_fail(&self, test_mode: bool) -> bool {
        !test_mode && self.chance.roll(self.probability)
    }
}

impl std::fmt::Debug for FailureInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailureInjector")
            .field("probability", &self.probability)
            .finish_non_exhaustive()
    }
}
