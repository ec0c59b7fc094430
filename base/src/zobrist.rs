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

//! Zobrist hash keys for incremental position hashing.
//!
//! Every key in this table is generated once, deterministically, from a
//! fixed seed via splitmix64. Determinism means a fresh binary always hashes
//! a given position identically, which keeps `perft` and transposition-table
//! tests reproducible across runs.

use once_cell::sync::Lazy;

use super::{CastlingRights, Color, Piece, Square};

/// The full set of Zobrist keys used to incrementally hash a `Position`:
/// one key per (color, piece, square) triple, one per possible en passant
/// file, one per castling rights byte, and one for the side to move.
pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

/// A table of random-looking, but fully deterministic, 64-bit keys.
pub struct ZobristKeys {
    piece_square: [[[u64; 64]; Piece::NUM_TYPES]; 2],
    en_passant: [u64; 64],
    castling: [u64; 16],
    side_to_move: u64,
}

impl ZobristKeys {
    #[allow(clippy::new_without_default)]
    #[must_use]
    fn new() -> ZobristKeys {
        let mut state = 0x9E37_79B9_7F4A_7C15_u64;

        let mut piece_square = [[[0u64; 64]; Piece::NUM_TYPES]; 2];
        for color_table in &mut piece_square {
            for piece_table in color_table.iter_mut() {
                for key in piece_table.iter_mut() {
                    *key = next_key(&mut state);
                }
            }
        }

        let mut en_passant = [0u64; 64];
        for key in &mut en_passant {
            *key = next_key(&mut state);
        }

        let mut castling = [0u64; 16];
        for key in &mut castling {
            *key = next_key(&mut state);
        }

        let side_to_move = next_key(&mut state);

        ZobristKeys {
            piece_square,
            en_passant,
            castling,
            side_to_move,
        }
    }

    #[inline(always)]
    #[must_use]
    /// Get the key for a piece of the given color standing on `sq`.
    pub fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.piece_square[color as usize][piece as usize][sq as usize]
    }

    #[inline(always)]
    #[must_use]
    /// Get the key for an en passant target square. Callers should not look
    /// this up when there is no en passant square.
    pub fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant[sq as usize]
    }

    #[inline(always)]
    #[must_use]
    /// Get the key for a given castling rights byte.
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.0 as usize]
    }

    #[inline(always)]
    #[must_use]
    /// Get the key that is toggled in or out whenever the side to move
    /// changes.
    pub fn side_to_move(&self) -> u64 {
        self.side_to_move
    }
}

/// Advance a splitmix64 generator and return its next output.
fn next_key(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_across_instances() {
        let a = ZobristKeys::new();
        let b = ZobristKeys::new();
        assert_eq!(
            a.piece(Color::White, Piece::Pawn, Square::E2),
            b.piece(Color::White, Piece::Pawn, Square::E2)
        );
        assert_eq!(a.side_to_move(), b.side_to_move());
    }

    #[test]
    fn distinct_lookups_are_very_likely_distinct() {
        let k = ZobristKeys::new();
        assert_ne!(
            k.piece(Color::White, Piece::Pawn, Square::E2),
            k.piece(Color::Black, Piece::Pawn, Square::E2)
        );
        assert_ne!(
            k.piece(Color::White, Piece::Pawn, Square::E2),
            k.piece(Color::White, Piece::Knight, Square::E2)
        );
        assert_ne!(
            k.piece(Color::White, Piece::Pawn, Square::E2),
            k.piece(Color::White, Piece::Pawn, Square::E4)
        );
    }

    #[test]
    fn static_table_is_reachable() {
        let _ = ZOBRIST.side_to_move();
    }
}
