/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

use rand::{RngCore, SeedableRng};

const TWO_POW_32: f64 = 4_294_967_296.0;

/// Fixed-width xorshift32 generator.
///
/// Fully deterministic: the same seed followed by the same sequence of
/// [`entropy`](Xorshift32::entropy) calls and draws reproduces the same
/// outputs. The seed is never zero, since zero maps to itself under the
/// xorshift triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xorshift32 {
    seed: u32,
}

impl Default for Xorshift32 {
    fn default() -> Self {
        Self { seed: 1 }
    }
}

impl Xorshift32 {
    /// A seed of zero is replaced by one.
    pub fn new(seed: u32) -> Self {
        Self {
            seed: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Mix an external value into the seed.
    pub fn entropy(&mut self, e: u32) {
        self.seed = self.seed.wrapping_add(e);
        if self.seed == 0 {
            self.seed = 1;
        }
    }

    /// Advance the state and return it.
    pub fn next32(&mut self) -> u32 {
        assert_ne!(self.seed, 0, "xorshift32 seed reached zero");
        let mut x = self.seed;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.seed = x;
        x
    }

    /// Integer in `[0, count)`, with the usual small modulo bias.
    pub fn next_bounded(&mut self, count: u32) -> u32 {
        assert!(count > 0, "bound must be positive");
        self.next32() % count
    }

    /// Float in `[0, max)`. A `max` of zero always yields zero.
    pub fn next_float_bounded(&mut self, max: f64) -> f64 {
        self.next32() as f64 * max / TWO_POW_32
    }
}

impl RngCore for Xorshift32 {
    fn next_u32(&mut self) -> u32 {
        self.next32()
    }

    fn next_u64(&mut self) -> u64 {
        let low = self.next32() as u64;
        let high = self.next32() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for Xorshift32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_known_sequence() {
        // xorshift32 from seed 1
        let mut rng = Xorshift32::default();
        assert_eq!(rng.next32(), 270_369);
        assert_eq!(rng.next32(), 67_634_689);
        assert_eq!(rng.next32(), 2_647_435_461);
    }

    #[test]
    fn test_repeatability() {
        let mut a = Xorshift32::new(12345);
        let mut b = Xorshift32::new(12345);
        for step in 0..1000u32 {
            if step % 7 == 0 {
                a.entropy(step * 31);
                b.entropy(step * 31);
            }
            assert_eq!(a.next32(), b.next32());
            assert_eq!(a.next_bounded(6), b.next_bounded(6));
            assert_eq!(a.next_float_bounded(3.5), b.next_float_bounded(3.5));
        }
    }

    #[test]
    fn test_entropy_never_leaves_zero() {
        let mut rng = Xorshift32::new(1);
        rng.entropy(u32::MAX);
        assert_eq!(rng.seed(), 1);

        let mut rng = Xorshift32::new(0);
        assert_eq!(rng.seed(), 1);
        rng.entropy(0);
        assert_eq!(rng.seed(), 1);

        let mut source = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..100_000 {
            let seed: u32 = source.random();
            let e: u32 = source.random();
            let mut rng = Xorshift32::new(seed);
            rng.entropy(e);
            assert_ne!(rng.seed(), 0);
            rng.entropy(rng.seed().wrapping_neg());
            assert_eq!(rng.seed(), 1);
        }
    }

    #[test]
    fn test_bounded_ranges() {
        let mut rng = Xorshift32::new(7);
        for _ in 0..10_000 {
            assert!(rng.next_bounded(6) < 6);
            let value = rng.next_float_bounded(15.75);
            assert!((0.0..15.75).contains(&value));
        }
        assert_eq!(rng.next_float_bounded(0.0), 0.0);
    }

    #[test]
    fn test_seedable() {
        let mut a = Xorshift32::from_seed(99u32.to_le_bytes());
        let mut b = Xorshift32::new(99);
        assert_eq!(a.next_u64(), {
            let low = b.next32() as u64;
            let high = b.next32() as u64;
            (high << 32) | low
        });
        assert_eq!(Xorshift32::from_seed([0; 4]).seed(), 1);

        let mut bytes = [0u8; 6];
        let mut c = Xorshift32::new(99);
        c.fill_bytes(&mut bytes);
        let mut d = Xorshift32::new(99);
        let first = d.next32().to_le_bytes();
        let second = d.next32().to_le_bytes();
        assert_eq!(&bytes[..4], &first);
        assert_eq!(&bytes[4..], &second[..2]);
    }
}
