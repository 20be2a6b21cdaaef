//! Uniform random selection from fixed pools.

use rand::Rng;
use rand::rngs::{StdRng, ThreadRng};

/// Source of uniform indices. Production uses the thread RNG; tests script it.
pub trait RandomSource {
    /// Returns an index in `0..len`. `len` is never zero.
    fn next_index(&mut self, len: usize) -> usize;
}

impl RandomSource for ThreadRng {
    fn next_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

impl RandomSource for StdRng {
    fn next_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Pick one element uniformly at random.
///
/// # Panics
///
/// Panics if `items` is empty. Pools are static data, so an empty one is an
/// authoring bug rather than a runtime condition.
pub fn pick<'a, T, R: RandomSource + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    assert!(!items.is_empty(), "pick from an empty pool");
    let index = rng.next_index(items.len()).min(items.len() - 1);
    &items[index]
}

/// Replays a fixed list of indices, wrapping each into range. Falls back to 0
/// once the script runs out.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    script: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(script: &[usize]) -> Self {
        Self {
            script: script.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn next_index(&mut self, len: usize) -> usize {
        self.script.pop_front().unwrap_or(0) % len
    }
}
