// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Eviction policies: which entry makes room when the cache is full.
//!
//! When an insertion would push a bounded cache past its capacity, the
//! engine samples the keyset, fetches each candidate's metadata, and asks
//! the eviction policy to pick the single victim. Policies are pure ranking
//! functions over [`EntryMetadata`]; they hold no state and see no values.

use std::fmt::Debug;

use cachet_store::EntryMetadata;

/// Picks the eviction victim among sampled candidates.
///
/// `select_victim` returns the victim's index within the candidate slice,
/// whose order is the sampler's candidate order. Ties must resolve to the
/// first-encountered candidate. `None` is only meaningful for an empty
/// candidate slice.
pub trait EvictionPolicy: Debug + Send + Sync {
    /// Returns the index of the entry to evict, or `None` if there are no
    /// candidates.
    fn select_victim(&self, candidates: &[EntryMetadata]) -> Option<usize>;
}

/// First in, first out: evicts the entry created earliest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fifo;

impl EvictionPolicy for Fifo {
    fn select_victim(&self, candidates: &[EntryMetadata]) -> Option<usize> {
        min_by_key(candidates, |meta| meta.created_at)
    }
}

/// First in, last out: evicts the entry created most recently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Filo;

impl EvictionPolicy for Filo {
    fn select_victim(&self, candidates: &[EntryMetadata]) -> Option<usize> {
        max_by_key(candidates, |meta| meta.created_at)
    }
}

/// Least recently used: evicts the entry read longest ago.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lru;

impl EvictionPolicy for Lru {
    fn select_victim(&self, candidates: &[EntryMetadata]) -> Option<usize> {
        min_by_key(candidates, |meta| meta.accessed_at)
    }
}

/// Most recently used: evicts the entry read most recently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mru;

impl EvictionPolicy for Mru {
    fn select_victim(&self, candidates: &[EntryMetadata]) -> Option<usize> {
        max_by_key(candidates, |meta| meta.accessed_at)
    }
}

/// Least frequently used: evicts the entry with the fewest reads, breaking
/// ties toward the entry read longest ago.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lfu;

impl EvictionPolicy for Lfu {
    fn select_victim(&self, candidates: &[EntryMetadata]) -> Option<usize> {
        min_by_key(candidates, |meta| (meta.hit_count, meta.accessed_at))
    }
}

/// Most frequently used: evicts the entry with the most reads, breaking
/// ties toward the entry read most recently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mfu;

impl EvictionPolicy for Mfu {
    fn select_victim(&self, candidates: &[EntryMetadata]) -> Option<usize> {
        max_by_key(candidates, |meta| (meta.hit_count, meta.accessed_at))
    }
}

// Strict comparisons keep the first-encountered candidate on ties.

fn min_by_key<R: Ord>(
    candidates: &[EntryMetadata],
    key: impl Fn(&EntryMetadata) -> R,
) -> Option<usize> {
    let mut best: Option<(usize, R)> = None;
    for (index, meta) in candidates.iter().enumerate() {
        let rank = key(meta);
        match &best {
            Some((_, current)) if rank >= *current => {}
            _ => best = Some((index, rank)),
        }
    }
    best.map(|(index, _)| index)
}

fn max_by_key<R: Ord>(
    candidates: &[EntryMetadata],
    key: impl Fn(&EntryMetadata) -> R,
) -> Option<usize> {
    let mut best: Option<(usize, R)> = None;
    for (index, meta) in candidates.iter().enumerate() {
        let rank = key(meta);
        match &best {
            Some((_, current)) if rank <= *current => {}
            _ => best = Some((index, rank)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cachet_store::Timestamp;

    fn meta(created: u64, accessed: u64, hits: u64) -> EntryMetadata {
        EntryMetadata {
            created_at: Timestamp::from_unix_micros(created),
            accessed_at: Timestamp::from_unix_micros(accessed),
            updated_at: Timestamp::from_unix_micros(created),
            hit_count: hits,
            expires_at: Timestamp::FAR_FUTURE,
        }
    }

    #[test]
    fn empty_candidates_yield_no_victim() {
        assert_eq!(Fifo.select_victim(&[]), None);
        assert_eq!(Lru.select_victim(&[]), None);
        assert_eq!(Mfu.select_victim(&[]), None);
    }

    #[test]
    fn fifo_picks_earliest_creation() {
        let candidates = [meta(30, 0, 0), meta(10, 50, 0), meta(20, 5, 0)];
        assert_eq!(Fifo.select_victim(&candidates), Some(1));
    }

    #[test]
    fn filo_picks_latest_creation() {
        let candidates = [meta(30, 0, 0), meta(10, 50, 0), meta(20, 5, 0)];
        assert_eq!(Filo.select_victim(&candidates), Some(0));
    }

    #[test]
    fn lru_picks_stalest_access() {
        let candidates = [meta(0, 30, 0), meta(0, 10, 0), meta(0, 20, 0)];
        assert_eq!(Lru.select_victim(&candidates), Some(1));
    }

    #[test]
    fn mru_picks_freshest_access() {
        let candidates = [meta(0, 30, 0), meta(0, 10, 0), meta(0, 20, 0)];
        assert_eq!(Mru.select_victim(&candidates), Some(0));
    }

    #[test]
    fn lfu_picks_fewest_hits() {
        let candidates = [meta(0, 0, 3), meta(0, 1, 1), meta(0, 2, 2)];
        assert_eq!(Lfu.select_victim(&candidates), Some(1));
    }

    #[test]
    fn lfu_breaks_ties_by_stalest_access() {
        let candidates = [meta(0, 20, 1), meta(0, 10, 1), meta(0, 30, 5)];
        assert_eq!(Lfu.select_victim(&candidates), Some(1));
    }

    #[test]
    fn mfu_picks_most_hits() {
        let candidates = [meta(0, 0, 3), meta(0, 1, 1), meta(0, 2, 7)];
        assert_eq!(Mfu.select_victim(&candidates), Some(2));
    }

    #[test]
    fn mfu_breaks_ties_by_freshest_access() {
        let candidates = [meta(0, 20, 5), meta(0, 40, 5), meta(0, 30, 1)];
        assert_eq!(Mfu.select_victim(&candidates), Some(1));
    }

    #[test]
    fn full_ties_resolve_to_first_candidate() {
        let identical = [meta(10, 10, 2), meta(10, 10, 2), meta(10, 10, 2)];
        assert_eq!(Fifo.select_victim(&identical), Some(0));
        assert_eq!(Filo.select_victim(&identical), Some(0));
        assert_eq!(Lru.select_victim(&identical), Some(0));
        assert_eq!(Mru.select_victim(&identical), Some(0));
        assert_eq!(Lfu.select_victim(&identical), Some(0));
        assert_eq!(Mfu.select_victim(&identical), Some(0));
    }

    #[test]
    fn single_candidate_is_always_the_victim() {
        let one = [meta(1, 2, 3)];
        assert_eq!(Lru.select_victim(&one), Some(0));
        assert_eq!(Mfu.select_victim(&one), Some(0));
    }
}
