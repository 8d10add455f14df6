//! Uniform measurement generation
//!
//! The coordinator draws `data_count` independent f32 values uniformly from
//! `[min_meas, max_meas)` before the scatter. Values are generated in a single
//! pass in partition order, so chunk `i` of the output is exactly what
//! participant `i` will classify.
//!
//! # Performance
//!
//! Uses the xoshiro256++ PRNG, which is fast and has good statistical
//! properties. A fixed seed reproduces the full dataset bit-for-bit, which the
//! deterministic tests and the `--seed` flag rely on.

use crate::config::Params;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Generate the full dataset for a run
///
/// `seed` of `None` draws the PRNG state from the OS; `Some` makes the run
/// reproducible. With a zero-width range (`min_meas == max_meas`) every value
/// is `min_meas`, since there is nothing to draw from.
pub fn generate(params: &Params, seed: Option<u64>) -> Vec<f32> {
    let mut rng = match seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_entropy(),
    };
    draw(&mut rng, params.data_count, params.min_meas, params.max_meas)
}

fn draw(rng: &mut Xoshiro256PlusPlus, count: usize, min_meas: f32, max_meas: f32) -> Vec<f32> {
    // gen_range panics on an empty range; the degenerate zero-width case is
    // defined to produce the single representable value.
    if min_meas >= max_meas {
        return vec![min_meas; count];
    }
    (0..count).map(|_| rng.gen_range(min_meas..max_meas)).collect()
}
