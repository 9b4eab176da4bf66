//! Position history used to detect repetitions

use crate::board::Board;

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Canonical key of a position
///
/// It contains 64 characters, one per square, from `a8` to `h1` rank by rank. An occupied square
/// is represented by the FEN letter of its piece, and an empty one by `.`.
///
/// Only piece placement takes part in the key: the side to move, the en passant target and the
/// movement flags of pieces are ignored. So, two positions that differ only in whether the king
/// has already moved are considered the same for repetition purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PositionKey(String);

impl PositionKey {
    pub fn new(b: &Board) -> PositionKey {
        let mut s = String::with_capacity(64);
        s.extend(b.cells().iter().map(|p| p.map_or('.', |p| p.as_char())));
        PositionKey(s)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.0)
    }
}

/// Ordered record of positions reached in a game
///
/// Positions are appended in the order they occur, and the number of occurrences of each key
/// is maintained alongside, so counting repetitions doesn't require a scan over the history.
/// Entries are never removed.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PositionLedger {
    history: Vec<PositionKey>,
    counts: HashMap<PositionKey, usize>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the position of board `b`
    pub fn push(&mut self, b: &Board) {
        self.push_key(b.position_key());
    }

    pub fn push_key(&mut self, key: PositionKey) {
        *self.counts.entry(key.clone()).or_insert(0) += 1;
        self.history.push(key);
    }

    /// Returns how many times the position of board `b` occurs in the ledger
    pub fn count(&self, b: &Board) -> usize {
        self.count_key(&b.position_key())
    }

    pub fn count_key(&self, key: &PositionKey) -> usize {
        *self.counts.get(key).unwrap_or(&0)
    }

    /// Returns the highest number of occurrences among all the positions
    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    #[inline]
    pub fn last(&self) -> Option<&PositionKey> {
        self.history.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionKey> + '_ {
        self.history.iter()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.counts.clear();
    }
}
