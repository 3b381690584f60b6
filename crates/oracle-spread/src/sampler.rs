//! Uniform sampling of distinct cards from a deck.
//!
//! Sampling shuffles an index vector with a partial Fisher–Yates pass and
//! takes the shuffled prefix, so every `count`-subset is equally likely and
//! the deck itself is never reordered.

use rand::Rng;
use rand::seq::SliceRandom;

use oracle_core::Card;

use crate::error::{SpreadError, SpreadResult};

/// Draw `count` distinct cards uniformly at random from `deck`.
pub fn sample<R: Rng + ?Sized>(
    deck: &[Card],
    count: usize,
    rng: &mut R,
) -> SpreadResult<Vec<Card>> {
    let pool: Vec<&Card> = deck.iter().collect();
    sample_from(&pool, count, rng)
}

/// Like [`sample`], but cards whose id is in `exclude` are never chosen.
pub fn sample_excluding<R: Rng + ?Sized>(
    deck: &[Card],
    count: usize,
    exclude: &[&str],
    rng: &mut R,
) -> SpreadResult<Vec<Card>> {
    let pool: Vec<&Card> = deck
        .iter()
        .filter(|c| !exclude.contains(&c.id.as_str()))
        .collect();
    sample_from(&pool, count, rng)
}

fn sample_from<R: Rng + ?Sized>(
    pool: &[&Card],
    count: usize,
    rng: &mut R,
) -> SpreadResult<Vec<Card>> {
    if count > pool.len() {
        return Err(SpreadError::InvalidArgument(format!(
            "cannot sample {count} cards from a pool of {}",
            pool.len()
        )));
    }
    let mut indices: Vec<usize> = (0..pool.len()).collect();
    let (chosen, _) = indices.partial_shuffle(rng, count);
    Ok(chosen.iter().map(|&i| pool[i].clone()).collect())
}
