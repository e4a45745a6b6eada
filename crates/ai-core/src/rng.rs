//! Deterministic, non-cryptographic random numbers for reproducible AI decisions.

pub trait DeterministicRng {
    fn next_u64(&mut self) -> u64;

    /// Uniform float in `[0, 1)` built from the top 24 bits.
    fn next_unit_f32(&mut self) -> f32 {
        let bits = (self.next_u64() >> 40) as u32;
        bits as f32 / (1u32 << 24) as f32
    }

    /// Uniform index in `0..len`. Returns `0` for empty ranges.
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_u64() % len as u64) as usize
    }
}

/// SplitMix64 generator. Small state, good avalanche, fine for seeding and tie breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl DeterministicRng for SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(Self::GAMMA);
        mix64(self.state)
    }
}

pub fn mix64(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Derive an independent stream seed, e.g. per querier and per query.
pub fn derive_seed(base_seed: u64, owner_id: u64, stream: u64) -> u64 {
    mix64(base_seed ^ mix64(owner_id.wrapping_add(SplitMix64::GAMMA)) ^ mix64(stream))
}
