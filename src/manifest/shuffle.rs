//! Order randomizer
//!
//! Applies a uniform random permutation to the manifest sequence.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::ManifestEntry;

/// Shuffle manifest entries in place.
///
/// Whole entries are permuted, so the entry at any new position still
/// carries its own original labels. The random source is passed in
/// explicitly; pair with [`rng_from_seed`] for reproducible runs.
pub fn shuffle_entries<R: Rng>(entries: &mut [ManifestEntry], rng: &mut R) {
    entries.shuffle(rng);
}

/// Build the shuffle RNG: seeded when a seed is given, from OS entropy
/// otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
