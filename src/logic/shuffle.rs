//! Fisher-Yates shuffle with an injected random source.

use rand::Rng;

/// Uniformly permute `items` in place. The rng is a parameter so the web
/// binary can pass `thread_rng()` while tests seed a `StdRng` for
/// reproducible drafts. Slices of length 0 or 1 are left unchanged.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
