//! SplitMix64 generator for trial construction.
//! Deterministic: same seed produces the same sequence. Not cryptographically secure.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }

    /// Value in `0..bound`. `bound` must be non-zero.
    #[inline]
    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }

    /// Fisher-Yates shuffle driven by this generator.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for index in (1..items.len()).rev() {
            let swap_index = self.below(index + 1);
            items.swap(index, swap_index);
        }
    }
}

/// Seed for attempt `index`: the `index`-th output of the SplitMix64 stream started at
/// `base_seed`, computed directly from the counter.
#[inline]
pub fn seed_at(base_seed: u64, index: usize) -> u64 {
    Rng::new(base_seed.wrapping_add(SPLITMIX64_GOLDEN.wrapping_mul(index as u64))).next_u64()
}

/// Per-attempt seeds derived from one base seed.
pub fn derive_seeds(base_seed: u64, count: usize) -> Vec<u64> {
    (0..count).map(|index| seed_at(base_seed, index)).collect()
}
