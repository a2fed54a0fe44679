//! Queue shuffling
//!
//! Uniform Fisher-Yates shuffle that keeps the currently playing track
//! identifiable, so the cursor can follow it into the new order.

use rand::seq::SliceRandom;
use rand::Rng;

/// Produce a uniformly random play order over `0..len`
///
/// Returns a permutation of the authored indices.
pub fn shuffled_order<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}

/// Position of `authored_index` inside a play order
pub fn position_of(order: &[usize], authored_index: usize) -> Option<usize> {
    order.iter().position(|&i| i == authored_index)
}
