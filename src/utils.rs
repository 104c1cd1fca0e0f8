//! Small shared helpers.

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// RNG used by every engine in the crate. An explicit seed gives
/// deterministic replay for tests; `None` pulls entropy from the host
/// (`getrandom` with the `js` feature on wasm).
pub fn session_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}
