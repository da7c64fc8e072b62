//! Shuffle stage — pluggable permutation of the accepted deck.
//!
//! Carried in `AppState` and `RenderOptions` as `Arc<dyn DeckShuffler>`, so
//! tests can swap in `KeepOrder` or a seeded `RandomShuffler` and assert the
//! exact card order.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::deck::quote::Quote;

/// Applies one permutation to a whole deck. Called once per document.
pub trait DeckShuffler: Send + Sync {
    fn shuffle(&self, deck: &mut [Quote]);

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Uniform Fisher–Yates shuffle.
///
/// With a seed, every call starts from the same RNG state, so each document of
/// a batch gets an independent, reproducible order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomShuffler {
    seed: Option<u64>,
}

impl RandomShuffler {
    pub fn from_entropy() -> Self {
        RandomShuffler { seed: None }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomShuffler { seed: Some(seed) }
    }
}

impl DeckShuffler for RandomShuffler {
    fn shuffle(&self, deck: &mut [Quote]) {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        deck.shuffle(&mut rng);
    }

    fn name(&self) -> &'static str {
        if self.seed.is_some() {
            "seeded"
        } else {
            "random"
        }
    }
}

/// Identity permutation: cards are placed in file order.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepOrder;

impl DeckShuffler for KeepOrder {
    fn shuffle(&self, _deck: &mut [Quote]) {}

    fn name(&self) -> &'static str {
        "file-order"
    }
}
