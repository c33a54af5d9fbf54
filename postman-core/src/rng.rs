//! Random source construction for the pipeline stages.
//!
//! Every stage takes an owned or borrowed [`SmallRng`]; nothing reads a
//! process-global generator. A `Some(seed)` makes a stage reproducible, while
//! `None` draws a fresh stream from operating-system entropy.

use rand::{SeedableRng, rngs::SmallRng};

/// SplitMix64 increment (the 64-bit golden ratio) used for attempt seed
/// derivation.
const ATTEMPT_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

/// Builds a random source from an optional seed.
///
/// # Examples
/// ```
/// use postman_core::seeded_rng;
/// use rand::Rng;
///
/// let mut left = seeded_rng(Some(7));
/// let mut right = seeded_rng(Some(7));
/// assert_eq!(left.gen_range(0..100), right.gen_range(0..100));
/// ```
#[must_use]
pub fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

/// Derives the seed for resampling attempt `attempt` from `base_seed`.
///
/// Attempt `0` always uses `base_seed` unchanged so a single-attempt run is
/// identical to calling the stages directly with the same seed.
#[must_use]
pub fn derive_attempt_seed(base_seed: u64, attempt: usize) -> u64 {
    if attempt == 0 {
        return base_seed;
    }
    splitmix64(base_seed ^ (attempt as u64).wrapping_mul(ATTEMPT_SEED_SPACING))
}

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(ATTEMPT_SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}
