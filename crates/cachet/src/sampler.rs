// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Samplers: which keys become eviction candidates.
//!
//! Ranking every stored entry on each overflow is exact but grows linearly
//! with the cache. A sampler narrows the field first: given the size of the
//! current keyset it returns the positions of the entries the eviction
//! policy will rank, in candidate order.

use std::fmt::Debug;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{SeedableRng, seq::index};

/// Selects the candidate subset of the keyset for eviction.
///
/// `sample` receives the population size and returns candidate positions
/// within `0..population`, in the order the eviction policy will see them.
/// A sampler must be deterministic given its input and its random source.
pub trait Sampler: Debug + Send + Sync {
    /// Returns the positions of the eviction candidates.
    fn sample(&self, population: usize) -> Vec<usize>;
}

/// Considers every stored entry. The default, and exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FullSampler;

impl Sampler for FullSampler {
    fn sample(&self, population: usize) -> Vec<usize> {
        (0..population).collect()
    }
}

/// Considers up to `k` entries chosen uniformly without replacement.
///
/// Approximates the eviction policy's exact choice at constant cost per
/// overflow. The random source is injectable through
/// [`with_seed`](Self::with_seed) so tests get reproducible candidate sets.
///
/// # Examples
///
/// ```
/// use cachet::sampler::{RandomSampler, Sampler};
///
/// let sampler = RandomSampler::with_seed(2, 7);
/// let picks = sampler.sample(10);
/// assert_eq!(picks.len(), 2);
/// assert!(picks.iter().all(|&p| p < 10));
/// ```
pub struct RandomSampler {
    amount: usize,
    rng: Mutex<StdRng>,
}

impl RandomSampler {
    /// Creates a sampler drawing up to `amount` candidates per overflow,
    /// seeded from system entropy.
    #[must_use]
    pub fn new(amount: usize) -> Self {
        Self {
            amount,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates a sampler with a fixed seed, for reproducible candidate sets.
    #[must_use]
    pub fn with_seed(amount: usize, seed: u64) -> Self {
        Self {
            amount,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Sampler for RandomSampler {
    fn sample(&self, population: usize) -> Vec<usize> {
        let amount = self.amount.min(population);
        let mut rng = self.rng.lock();
        index::sample(&mut *rng, population, amount).into_vec()
    }
}

impl Debug for RandomSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSampler")
            .field("amount", &self.amount)
            .finish_non_exhaustive()
    }
}
