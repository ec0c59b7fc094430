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

//! Performance testing ("perft"): counting the leaf nodes of the legal move
//! tree to a fixed depth. Used to verify the correctness of move generation
//! and `make_move`, since a single missing or spurious move anywhere in the
//! tree throws off the count at every depth below it.

use crate::{fen, movegen::generate_all, Position};

#[must_use]
/// Count the number of leaf positions reachable from `pos` in exactly
/// `depth` plies of legal play. `perft(pos, 0) == 1` (the empty line).
pub fn perft(pos: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_all(pos);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut total = 0;
    for m in &moves {
        let mut child = *pos;
        child.make_move(m);
        total += perft(&child, depth - 1);
    }
    total
}

#[must_use]
/// Like [`perft`], but also returns the per-root-move breakdown ("divide"),
/// sorted by UCI move string. Useful for isolating which root move a move
/// generator bug is hiding under.
pub fn perft_divide(pos: &Position, depth: u8) -> (u64, Vec<(String, u64)>) {
    let moves = generate_all(pos);
    let mut breakdown = Vec::with_capacity(moves.len());
    let mut total = 0;
    for m in &moves {
        let mut child = *pos;
        child.make_move(m);
        let count = perft(&child, depth.saturating_sub(1));
        breakdown.push((m.to_uci(), count));
        total += count;
    }
    breakdown.sort_by(|a, b| a.0.cmp(&b.0));
    (total, breakdown)
}

#[must_use]
/// Parse `fen` and run [`perft`] on the resulting position.
///
/// # Panics
///
/// Panics if `fen` does not describe a legal position.
pub fn perft_fen(fen: &str, depth: u8) -> u64 {
    let pos = self::fen::parse(fen).expect("perft_fen given an illegal FEN");
    perft(&pos, depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_perft_matches_known_values() {
        let pos = Position::new();
        assert_eq!(perft(&pos, 0), 1);
        assert_eq!(perft(&pos, 1), 20);
        assert_eq!(perft(&pos, 2), 400);
        assert_eq!(perft(&pos, 3), 8_902);
        assert_eq!(perft(&pos, 4), 197_281);
    }

    #[test]
    #[ignore = "depth 5+ is accurate but slow for routine test runs"]
    fn startpos_perft_deep_matches_known_values() {
        let pos = Position::new();
        assert_eq!(perft(&pos, 5), 4_865_609);
        assert_eq!(perft(&pos, 6), 119_060_324);
    }

    #[test]
    fn kiwipete_perft_matches_known_values() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        assert_eq!(perft_fen(fen, 1), 48);
        assert_eq!(perft_fen(fen, 2), 2_039);
    }

    #[test]
    fn endgame_position_perft_matches_known_values() {
        // https://www.chessprogramming.org/Perft_Results#Position_3
        let fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
        assert_eq!(perft_fen(fen, 1), 14);
        assert_eq!(perft_fen(fen, 2), 191);
        assert_eq!(perft_fen(fen, 3), 2_812);
    }

    #[test]
    fn divide_breakdown_sums_to_total() {
        let pos = Position::new();
        let (total, breakdown) = perft_divide(&pos, 3);
        assert_eq!(total, 8_902);
        assert_eq!(breakdown.iter().map(|(_, c)| c).sum::<u64>(), total);
        assert_eq!(breakdown.len(), 20);
    }
}
