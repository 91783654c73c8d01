//! Transposition cache for minimax results.
//!
//! Entries are keyed by the packed board, the side to move, the remaining
//! depth and the side whose perspective the score is expressed in. Scores
//! produced by an alpha-beta window are stored with their bound kind so a
//! later probe only reuses them when they are valid for its own window.
//!
//! The first value stored for a key is kept until the cache is cleared, so
//! repeated lookups of an unchanged key always agree. The cache is bounded:
//! when it reaches capacity it is cleared before the next insert.

use std::collections::HashMap;

use crate::board::{Board, BoardKey, Side};

/// How a stored score relates to the true minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search completed inside its window.
    Exact,
    /// True value >= score (search failed high).
    Lower,
    /// True value <= score (search failed low).
    Upper,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    board: BoardKey,
    to_move: Side,
    depth: u32,
    perspective: Side,
}

impl CacheKey {
    pub fn new(board: &Board, to_move: Side, depth: u32, perspective: Side) -> Self {
        Self {
            board: board.key(),
            to_move,
            depth,
            perspective,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub score: i32,
    pub bound: Bound,
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
    pub clears: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.probes == 0 {
            0.0
        } else {
            self.hits as f64 / self.probes as f64 * 100.0
        }
    }
}

pub struct TranspositionCache {
    entries: HashMap<CacheKey, CacheEntry>,
    capacity: usize,
    stats: CacheStats,
}

impl TranspositionCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            stats: CacheStats::default(),
        }
    }

    /// Raw lookup, regardless of window.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.get(key).copied()
    }

    /// Return a score usable for the window `(alpha, beta)`, if any.
    pub fn probe(&mut self, key: &CacheKey, alpha: i32, beta: i32) -> Option<i32> {
        self.stats.probes += 1;
        let entry = self.entries.get(key)?;
        let usable = match entry.bound {
            Bound::Exact => true,
            Bound::Lower => entry.score >= beta,
            Bound::Upper => entry.score <= alpha,
        };
        if usable {
            self.stats.hits += 1;
            Some(entry.score)
        } else {
            None
        }
    }

    /// Store a result. Existing entries are never overwritten.
    pub fn store(&mut self, key: CacheKey, score: i32, bound: Bound) {
        if self.entries.contains_key(&key) {
            return;
        }
        if self.entries.len() >= self.capacity {
            log::debug!("transposition cache full ({} entries), clearing", self.entries.len());
            self.clear();
        }
        self.stats.stores += 1;
        self.entries.insert(key, CacheEntry { score, bound });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.clears += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
