/*
  Mantis, a UCI-compatible chess engine.
  Copyright (C) 2024 The Mantis Authors (see AUTHORS.md file)

  Mantis is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Mantis is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! The transposition table: a fixed-size cache from position hash to the best
//! move and score found for it in a previous search, used to shortcut
//! re-searching positions reached by a different move order.
//!
//! Entries live in a flat, power-of-two-sized `Vec`, indexed by the low bits
//! of the position's Zobrist hash. Each slot holds at most one entry; a
//! colliding write overwrites the resident entry whenever the new search went
//! at least as deep, which keeps the table biased toward its most valuable
//! information without any separate aging pass.

use mantis_base::Move;

/// What an entry's stored score means relative to the alpha-beta window it
/// was computed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// The slot has never been written.
    None,
    /// `score` is the exact minimax value of the position.
    Exact,
    /// The true value is at least `score` (a beta cutoff occurred).
    Lower,
    /// The true value is at most `score` (no move raised alpha).
    Upper,
}

#[derive(Clone, Copy, Debug)]
/// A single transposition table slot.
pub struct Entry {
    /// The full 64-bit Zobrist hash of the position this entry describes,
    /// stored alongside the score so that index collisions (two different
    /// positions sharing the low bits) can be detected.
    pub key: u64,
    /// The search depth, in plies, that produced this entry.
    pub depth: u8,
    /// The score, in centipawns from the side-to-move's perspective, as
    /// described by `bound`.
    pub score: i32,
    /// The best move found in this position, or `Move::NONE` if none was
    /// recorded (e.g. the position had no legal moves).
    pub best_move: Move,
    /// What kind of bound `score` represents.
    pub bound: Bound,
}

impl Entry {
    const EMPTY: Entry = Entry {
        key: 0,
        depth: 0,
        score: 0,
        best_move: Move::NONE,
        bound: Bound::None,
    };
}

/// A fixed-capacity hash table mapping position hashes to search results.
pub struct TranspositionTable {
    entries: Vec<Entry>,
    /// `entries.len() - 1`. `entries.len()` is always a power of two, so
    /// `hash & mask` is a fast substitute for `hash % entries.len()`.
    mask: u64,
}

impl TranspositionTable {
    /// Build a table sized to approximately `size_mb` megabytes, rounding
    /// down to the nearest power-of-two entry count.
    #[must_use]
    pub fn with_size_mb(size_mb: usize) -> TranspositionTable {
        let entry_size = std::mem::size_of::<Entry>();
        let byte_budget = size_mb.max(1) * 1024 * 1024;
        let capacity = (byte_budget / entry_size).next_power_of_two().max(1);
        // `next_power_of_two` can overshoot the budget by up to 2x; step back
        // down if it did, so long as we don't go below one entry.
        let capacity = if capacity > 1 && capacity * entry_size > byte_budget {
            capacity / 2
        } else {
            capacity
        };
        TranspositionTable {
            entries: vec![Entry::EMPTY; capacity],
            mask: (capacity - 1) as u64,
        }
    }

    #[inline(always)]
    fn index(&self, hash: u64) -> usize {
        (hash & self.mask) as usize
    }

    /// Look up `hash`. Returns `None` unless a slot exists whose stored key
    /// exactly matches (a index collision without a key match is a miss, not
    /// a hit with stale data).
    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<&Entry> {
        let entry = &self.entries[self.index(hash)];
        if entry.bound != Bound::None && entry.key == hash {
            Some(entry)
        } else {
            None
        }
    }

    /// Record a search result for `hash`. Overwrites the resident entry at
    /// this index if it describes a different position or was computed at a
    /// shallower or equal depth; otherwise the deeper, still-relevant entry
    /// already present is kept.
    pub fn store(&mut self, hash: u64, depth: u8, score: i32, best_move: Move, bound: Bound) {
        let idx = self.index(hash);
        let resident = &self.entries[idx];
        if resident.key != hash || depth >= resident.depth {
            self.entries[idx] = Entry {
                key: hash,
                depth,
                score,
                best_move,
                bound,
            };
        }
    }

    /// Zero every entry, discarding all cached search results. Used on
    /// `ucinewgame`, since entries from a previous game are meaningless (and
    /// at best misleading) for the next one.
    pub fn clear(&mut self) {
        self.entries.fill(Entry::EMPTY);
    }

    /// The number of slots in the table.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// The fraction of slots currently occupied, in parts per mille, as
    /// reported by the UCI `hashfull` info field. Sampled over a fixed prefix
    /// of the table rather than the whole table, matching how engines
    /// typically report this (an exact full scan would cost time
    /// proportional to table size on every `info` line).
    #[must_use]
    pub fn fill_permille(&self) -> u16 {
        let sample_size = self.entries.len().min(1000);
        if sample_size == 0 {
            return 0;
        }
        let filled = self.entries[..sample_size]
            .iter()
            .filter(|e| e.bound != Bound::None)
            .count();
        ((filled * 1000) / sample_size) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mantis_base::Square;

    #[test]
    fn fresh_table_misses_every_probe() {
        let tt = TranspositionTable::with_size_mb(1);
        assert!(tt.probe(0xDEAD_BEEF).is_none());
    }

    #[test]
    fn stored_entry_is_found_by_its_exact_key() {
        let mut tt = TranspositionTable::with_size_mb(1);
        let m = Move::normal(Square::E2, Square::E4);
        tt.store(12345, 4, 37, m, Bound::Exact);
        let entry = tt.probe(12345).expect("entry should be present");
        assert_eq!(entry.best_move, m);
        assert_eq!(entry.score, 37);
        assert_eq!(entry.depth, 4);
        assert_eq!(entry.bound, Bound::Exact);
    }

    #[test]
    fn index_collision_with_different_key_is_a_miss() {
        let mut tt = TranspositionTable::with_size_mb(1);
        let capacity = tt.capacity() as u64;
        let m = Move::normal(Square::A2, Square::A4);
        tt.store(5, 2, 10, m, Bound::Exact);
        // Same low bits as 5 modulo capacity, but a different full key.
        let colliding_key = 5 + capacity;
        assert!(tt.probe(colliding_key).is_none());
    }

    #[test]
    fn shallower_search_does_not_overwrite_a_deeper_entry() {
        let mut tt = TranspositionTable::with_size_mb(1);
        let deep_move = Move::normal(Square::D2, Square::D4);
        let shallow_move = Move::normal(Square::D2, Square::D3);
        tt.store(99, 10, 500, deep_move, Bound::Exact);
        tt.store(99, 2, -500, shallow_move, Bound::Exact);
        let entry = tt.probe(99).unwrap();
        assert_eq!(entry.best_move, deep_move);
        assert_eq!(entry.depth, 10);
    }

    #[test]
    fn equal_depth_overwrites_the_resident_entry() {
        let mut tt = TranspositionTable::with_size_mb(1);
        let first = Move::normal(Square::G1, Square::F3);
        let second = Move::normal(Square::B1, Square::C3);
        tt.store(7, 5, 0, first, Bound::Exact);
        tt.store(7, 5, 0, second, Bound::Exact);
        assert_eq!(tt.probe(7).unwrap().best_move, second);
    }

    #[test]
    fn clear_empties_every_slot() {
        let mut tt = TranspositionTable::with_size_mb(1);
        tt.store(1, 1, 0, Move::NONE, Bound::Exact);
        tt.clear();
        assert!(tt.probe(1).is_none());
        assert_eq!(tt.fill_permille(), 0);
    }

    #[test]
    fn capacity_is_a_power_of_two() {
        let tt = TranspositionTable::with_size_mb(4);
        assert!(tt.capacity().is_power_of_two());
    }
}
