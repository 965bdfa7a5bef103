//! Random stream behind the "liveliness" of reactions: extra bubbles, a stray glow,
//! the coin flip between a fizz and silence. Identical inputs may therefore give
//! different outcomes from run to run. That is the intended behaviour of the lab.
//!
//! Any `rand` generator is a `RandomSource`, so sessions can run on a seeded `StdRng`.
//! `FixedRoll` and `ScriptedRolls` pin every draw for tests.
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Source of uniform draws in [0, 1)
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// true with probability `1 - threshold`: the draw must exceed the threshold
    fn exceeds(&mut self, threshold: f64) -> bool {
        self.next_unit() > threshold
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Generator for a session: seeded when a seed is given, from OS entropy otherwise
pub fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Returns the same value on every draw
#[derive(Debug, Clone, Copy)]
pub struct FixedRoll(pub f64);

impl RandomSource for FixedRoll {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Replays a sequence of draws, starting over when it runs out
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    values: Vec<f64>,
    position: usize,
}

impl ScriptedRolls {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            position: 0,
        }
    }

    /// number of draws made so far
    pub fn draws(&self) -> usize {
        self.position
    }
}

impl RandomSource for ScriptedRolls {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}
