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

//! Static evaluation of positions: material counting plus piece-square
//! tables. No king safety, mobility, or pawn-structure terms; the intent is
//! a fast, simple baseline rather than a strong standalone evaluator.

use std::{
    fmt::{Display, Formatter},
    ops::{Add, AddAssign, Neg, Sub},
};

use crate::{Color, Piece, Position};

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
/// A wrapper for the evaluation of a position, in centipawns.
/// The higher an evaluation is, the better the position is for White. An
/// evaluation of 0 is a draw.
///
/// Mate scoring is handled separately by the search, in its own wider `i32`
/// range; this type only ever holds a static material-plus-position score.
///
/// # Examples
///
/// ```
/// use mantis_base::Eval;
/// let up_a_pawn = Eval::centipawns(100);
/// let draw_eval = Eval::DRAW;
/// assert!(up_a_pawn > draw_eval);
/// ```
pub struct Eval(i16);

impl Eval {
    /// The evaluation of a drawn position.
    pub const DRAW: Eval = Eval(0);

    /// The value of one pawn.
    const PAWN_VALUE: i16 = 100;

    #[inline(always)]
    #[must_use]
    /// Construct an `Eval` with the given value in centipawns.
    pub const fn centipawns(x: i16) -> Eval {
        Eval(x)
    }

    #[inline(always)]
    #[must_use]
    /// Get the value in centipawns of this evaluation.
    pub const fn centipawn_val(self) -> i16 {
        self.0
    }

    #[inline(always)]
    #[must_use]
    /// Put this evaluation into the perspective of the given player. In
    /// essence, if the player is Black, the evaluation will be inverted, but
    /// if the player is White, the evaluation will remain the same. This
    /// function is an involution: calling it twice with the same player
    /// yields the original evaluation.
    pub const fn in_perspective(self, player: Color) -> Eval {
        match player {
            Color::White => self,
            Color::Black => Eval(-self.0),
        }
    }
}

impl Display for Eval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            write!(f, "00.00")
        } else {
            write!(f, "{:+2.2}", self.0 as f32 / Eval::PAWN_VALUE as f32)
        }
    }
}

impl AddAssign<Eval> for Eval {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Eval) {
        self.0 += rhs.0;
    }
}

impl Add<Eval> for Eval {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Eval) -> Eval {
        Eval(self.0 + rhs.0)
    }
}

impl Sub<Eval> for Eval {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Eval) -> Eval {
        Eval(self.0 - rhs.0)
    }
}

impl Neg for Eval {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Eval {
        Eval(-self.0)
    }
}

/// The material value of one piece, in centipawns. Kings do not
/// contribute, since both sides always have exactly one.
const fn material_value(piece: Piece) -> i16 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 320,
        Piece::Bishop => 330,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King | Piece::NoPiece => 0,
    }
}

/// A piece-square table: one flat bonus per square, with no midgame/endgame
/// taper. Indexed under the conventional A1=0 mapping (so `PST[p][0]` is
/// the bonus for `p` on A1, `PST[p][63]` is the bonus on H8).
type Pst = [[i16; 64]; Piece::NUM_TYPES];

#[rustfmt::skip]
/// Piece-square bonuses, in centipawns. A White piece looks up its square
/// after flipping it to the A1=0 convention this table is authored under
/// ([`crate::Square::opposite`]); a Black piece looks its square up
/// directly, since the two flips cancel (see [`evaluate`]).
static PST: Pst = [
    [ // Pawn
          0,   0,   0,   0,   0,   0,   0,   0,
          3,  -2,  -1,  12, -11,  -8,   2,   3,
         41,  49,  30,  59,  50,  46,  51,  40,
         10,  14,  15,  24,  29,  17,  10,   7,
         -9,   0,  10,  33,  27,  -4, -10, -16,
        -10,  -5,   0,  -9,   6, -12,   7, -10,
         -3,  14,  -1, -38,   2,  32,  34,  -3,
          0,   0,   0,   0,   0,   0,   0,   0,
    ],
    [ // Knight
        -175, -95, -44, -18,  -3, -12, -36, -89,
         -55, -15, -31, -35, -27, -21, -42, -43,
         -68, -67,  -7,  17,  40, -14,  69, -52,
         -52, -16,  38,  14,  59,  68, -12, -40,
         -50,   0,  13,  17,  44,  54,  34, -19,
         -52, -24,  41,   6,  71, -15,  35, -93,
         -32, -39,   9,   0,  15,  47,  -4, -43,
         -95, -42, -45, -10,  33,  23,  -9,-108,
    ],
    [ // Bishop
        -60, -25,  -6, -21,   0, -14, -36, -28,
        -16,   0,  -1, -17,  -5,  11,   2, -10,
         -3,   5,   6, -17,  15, -54,  -4, -53,
        -58,  -7,  38,  32,  24,  22,-111, -53,
        -56,   2,  32,   8,  24,  -1, -86, -30,
         -8, -20,  -8,   0,  16, -84, -11,-105,
        -34,  24,  12, -14,  10,  44, -32, -37,
        -62, -21, -14,  -5,   3,  29,  -3,  -8,
    ],
    [ // Rook
        -36, -47, -31, -12,  -8,   1,  15,  -5,
         15, -12,   0,   0,   3, -11,   0, -11,
        -22, -34, -20, -15, -14,  14,  25,  22,
         -8, -26, -22,  -8,   5,  14,  40,  12,
          2, -27, -24, -22,  -2,  14,  35,  -4,
         -4, -32, -30, -24,  -6,   2,  37,  -5,
         -3, -23, -19, -23,  -2,  23,  44, -22,
         -8, -19,  -8, -26,  -3,  28,  42,  15,
    ],
    [ // Queen
        -40,-109, -46,  -5, -20, -22, -29,  -6,
         -7,   0, -11,  -3,   0,  -4, -12,  -6,
        -47, -62,  -2, -21,  -7,  -4, -20,  17,
         15,  -4,  -7,   0,  30,  24,   8,  25,
        -33,  -7,  -5,   8,  28,  65,  35,  52,
        -63,  -7,  10,  -1,  35,  93, 108,  53,
         -9, -13,   2,   5,  18, 114,  63,  44,
        -30,  -5,  -8,   7,  48,  76,  95,  52,
    ],
    [ // King
        0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0,
    ],
];

#[must_use]
/// Evaluate `position` from the side to move's perspective: material plus
/// piece-square bonuses for White, minus the same for Black, negated if
/// Black is to move.
///
/// # Examples
///
/// ```
/// use mantis_base::{evaluate, Eval, Position};
/// assert_eq!(evaluate(&Position::new()), Eval::DRAW);
/// ```
pub fn evaluate(position: &Position) -> Eval {
    let mut white_score = Eval::DRAW;
    let mut black_score = Eval::DRAW;

    for &piece in &Piece::ALL_TYPES {
        let value = Eval::centipawns(material_value(piece));

        for sq in position.piece_bb(Color::White, piece) {
            white_score += value + Eval::centipawns(PST[piece as usize][sq.opposite() as usize]);
        }
        for sq in position.piece_bb(Color::Black, piece) {
            black_score += value + Eval::centipawns(PST[piece as usize][sq as usize]);
        }
    }

    (white_score - black_score).in_perspective(position.side_to_move())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Move, Square};

    #[test]
    fn centipawns_round_trips_through_centipawn_val() {
        assert_eq!(Eval::centipawns(57).centipawn_val(), 57);
    }

    #[test]
    fn in_perspective_is_an_involution() {
        let e = Eval::centipawns(42);
        assert_eq!(e.in_perspective(Color::Black).in_perspective(Color::Black), e);
        assert_eq!(e.in_perspective(Color::White), e);
    }

    #[test]
    fn startpos_is_a_dead_even_score() {
        assert_eq!(evaluate(&Position::new()), Eval::DRAW);
    }

    #[test]
    fn capturing_a_queen_swings_the_score_by_roughly_a_queen() {
        // 1. e4 Nf6 2. Qh5 Nxh5: Black wins White's queen outright.
        let mut pos = Position::new();
        pos.make_move(Move::normal(Square::E2, Square::E4));
        pos.make_move(Move::normal(Square::G8, Square::F6));
        pos.make_move(Move::normal(Square::D1, Square::H5));
        let before = evaluate(&pos);
        pos.make_move(Move::normal(Square::F6, Square::H5));
        let after = evaluate(&pos);
        // `after` is scored from Black's new perspective; flip it back to
        // compare on the same (White-relative) scale as `before`.
        assert!((-after).centipawn_val() - before.centipawn_val() > 800);
    }

    #[test]
    fn black_pawn_mirrors_white_pawn_advance_bonus() {
        let mut white_adv = Position::empty();
        white_adv.add_piece(Color::White, Piece::King, Square::A1);
        white_adv.add_piece(Color::Black, Piece::King, Square::A8);
        white_adv.add_piece(Color::White, Piece::Pawn, Square::E5);
        white_adv.recompute_derived();
        white_adv.hash = white_adv.fresh_hash();

        let mut black_adv = Position::empty();
        black_adv.add_piece(Color::White, Piece::King, Square::A1);
        black_adv.add_piece(Color::Black, Piece::King, Square::A8);
        black_adv.add_piece(Color::Black, Piece::Pawn, Square::E4);
        black_adv.recompute_derived();
        black_adv.hash = black_adv.fresh_hash();

        // Both are White to move, so these scores are directly comparable:
        // a pawn advanced toward its own promotion square is worth the same
        // to either side.
        assert_eq!(evaluate(&white_adv), evaluate(&black_adv));
    }
}
