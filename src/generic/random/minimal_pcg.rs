//! A simple pseudorandom number generator.
//!
//! Specifically, the *really* minimal C PCG32 implementation from <https://www.pcg-random.org/>, implemented to satisfy the [RngCore] trait.
//!
//! PCG(32) was chosen as the source of (pseudo)random numbers as it is simple, fast, and has some nice supporting documentation.
//!
//! Each [ring](crate::ring) owns a generator, seeded from the configured seed and the id of the ring, so rings diverge from one another while a solve remains reproducible for a fixed seed and thread count.

use rand::SeedableRng;
use rand_core::{impls, RngCore};

/// State and increment
#[derive(Clone, Debug, Default)]
pub struct MinimalPCG32 {
    state: u64,
    inc: u64,
}

impl RngCore for MinimalPCG32 {
    fn next_u32(&mut self) -> u32 {
        let old_state = self.state;

        self.state = old_state
            .wrapping_mul(6364136223846793005_u64)
            .wrapping_add(self.inc);

        let xorshifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    // Two words, as samplers over u64 ranges use the high bits.
    fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        let low = self.next_u32() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }
}

impl SeedableRng for MinimalPCG32 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        /// The stream, which must be odd.
        const INCREMENT: u64 = (3215534235932367344 << 1) | 1;
        let mut pcg = Self {
            state: 0,
            inc: INCREMENT,
        };
        pcg.next_u32();
        pcg.state = pcg.state.wrapping_add(u64::from_le_bytes(seed));
        pcg.next_u32();
        pcg
    }
}

#[cfg(test)]
mod pcg_tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn seeds_are_reproducible() {
        let mut a = MinimalPCG32::seed_from_u64(2);
        let mut b = MinimalPCG32::seed_from_u64(2);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn seeds_diverge() {
        let mut a = MinimalPCG32::seed_from_u64(2);
        let mut b = MinimalPCG32::seed_from_u64(73);
        let a_words: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let b_words: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(a_words, b_words);
    }

    #[test]
    fn ranges_are_covered() {
        let mut pcg = MinimalPCG32::seed_from_u64(11);
        let mut seen = [false; 5];
        for _ in 0..200 {
            seen[pcg.random_range(0..5_usize)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
