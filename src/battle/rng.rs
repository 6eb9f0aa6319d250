//! Injectable randomness for the ground skirmish loop
//!
//! The resolver only ever shuffles attacking units and draws accessibility
//! counts. Any `rand` generator works; tests seed a `ChaCha8Rng` so a given
//! seed always replays the same battle.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

pub trait BattleRng {
    fn shuffle<T>(&mut self, items: &mut [T]);

    /// Uniform integer in `0..bound`, 0 when `bound` is 0
    fn random_int(&mut self, bound: u32) -> u32;

    /// Uniform integer in `min..=max`
    fn random_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        min + self.random_int(max - min + 1)
    }
}

impl<R: RngCore> BattleRng for R {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }

    fn random_int(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.gen_range(0..bound)
    }
}
