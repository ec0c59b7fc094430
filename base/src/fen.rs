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

//! Parsing and formatting positions as Forsyth-Edwards Notation strings.

use std::fmt::{self, Display, Formatter};

use super::{CastlingRights, Color, Piece, Position, Square};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Why a FEN string failed to parse.
pub enum FenError {
    /// The piece-placement field ended before all 64 squares were filled.
    TruncatedBoard,
    /// A character in the piece-placement field was not a piece code, digit,
    /// or rank separator.
    BadPieceChar(char),
    /// A rank in the piece-placement field did not sum to exactly 8 files.
    BadRankLength,
    /// The string ran out of fields before all six were read.
    MissingField(&'static str),
    /// The side-to-move field was neither `w` nor `b`.
    BadSideToMove,
    /// The castling-rights field contained an unrecognized character.
    BadCastlingChar(char),
    /// The en passant field was not `-` or a valid algebraic square.
    BadEnPassantSquare,
    /// A numeric field (halfmove clock or fullmove number) failed to parse.
    BadNumber(&'static str),
    /// The board parsed, but does not describe a physically valid position
    /// (e.g. a missing or duplicated king).
    IllegalPosition,
}

impl Display for FenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TruncatedBoard => write!(f, "FEN board section ended before all 64 squares were filled"),
            FenError::BadPieceChar(c) => write!(f, "unrecognized piece character '{c}' in FEN"),
            FenError::BadRankLength => write!(f, "a FEN rank did not describe exactly 8 files"),
            FenError::MissingField(name) => write!(f, "FEN ended before its {name} field"),
            FenError::BadSideToMove => write!(f, "FEN side-to-move field was not 'w' or 'b'"),
            FenError::BadCastlingChar(c) => write!(f, "unrecognized castling character '{c}' in FEN"),
            FenError::BadEnPassantSquare => write!(f, "FEN en passant field was not '-' or a square"),
            FenError::BadNumber(name) => write!(f, "FEN {name} field was not a valid number"),
            FenError::IllegalPosition => write!(f, "FEN describes a physically impossible position"),
        }
    }
}

impl std::error::Error for FenError {}

#[must_use]
/// The FEN of the standard chess starting position.
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parse a FEN string into a `Position`.
///
/// # Errors
///
/// Returns a [`FenError`] describing the first malformed field encountered,
/// or [`FenError::IllegalPosition`] if the board parses but is not a legal
/// chess position (e.g. a side with no king).
pub fn parse(fen: &str) -> Result<Position, FenError> {
    let mut fields = fen.split_ascii_whitespace();

    let board_field = fields.next().ok_or(FenError::MissingField("piece placement"))?;
    let mut pos = Position::empty();
    let mut rank = 7usize;
    let mut file = 0usize;
    for part in board_field.split('/') {
        file = 0;
        for c in part.chars() {
            if let Some(n) = c.to_digit(10) {
                file += n as usize;
            } else {
                let piece = Piece::from_code(c.to_ascii_uppercase()).ok_or(FenError::BadPieceChar(c))?;
                let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
                let sq = Square::new(rank, file).ok_or(FenError::BadRankLength)?;
                pos.add_piece(color, piece, sq);
                file += 1;
            }
        }
        if file != 8 {
            return Err(FenError::BadRankLength);
        }
        if rank == 0 {
            break;
        }
        rank -= 1;
    }
    if rank != 0 || file != 8 {
        return Err(FenError::TruncatedBoard);
    }

    let side_field = fields.next().ok_or(FenError::MissingField("side to move"))?;
    pos.side_to_move = match side_field {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(FenError::BadSideToMove),
    };

    let castle_field = fields.next().ok_or(FenError::MissingField("castling rights"))?;
    let mut castling = CastlingRights::NO_RIGHTS;
    if castle_field != "-" {
        for c in castle_field.chars() {
            castling |= match c {
                'K' => CastlingRights::king_castle(Color::White),
                'Q' => CastlingRights::queen_castle(Color::White),
                'k' => CastlingRights::king_castle(Color::Black),
                'q' => CastlingRights::queen_castle(Color::Black),
                _ => return Err(FenError::BadCastlingChar(c)),
            };
        }
    }
    pos.castling = castling;

    let ep_field = fields.next().ok_or(FenError::MissingField("en passant target"))?;
    pos.ep_square = if ep_field == "-" {
        None
    } else {
        Some(Square::from_algebraic(ep_field).map_err(|_| FenError::BadEnPassantSquare)?)
    };

    // The last two fields are optional; many perft and puzzle FENs omit them.
    pos.halfmove_clock = match fields.next() {
        Some(s) => s.parse().map_err(|_| FenError::BadNumber("halfmove clock"))?,
        None => 0,
    };
    pos.fullmove_number = match fields.next() {
        Some(s) => s.parse().map_err(|_| FenError::BadNumber("fullmove number"))?,
        None => 1,
    };

    pos.recompute_derived();
    pos.hash = pos.fresh_hash();

    if !pos.is_valid() {
        return Err(FenError::IllegalPosition);
    }

    Ok(pos)
}

#[must_use]
/// Format `position` as a FEN string.
pub fn to_fen(position: &Position) -> String {
    let mut s = String::with_capacity(64);

    for rank in (0..8).rev() {
        let mut blanks = 0u32;
        for file in 0..8 {
            let sq = Square::new(rank, file).unwrap();
            match position.color_at(sq) {
                None => blanks += 1,
                Some(color) => {
                    if blanks > 0 {
                        s.push_str(&blanks.to_string());
                        blanks = 0;
                    }
                    let code = position.piece_at(sq).code();
                    s.push_str(if color == Color::White { code } else { &code.to_lowercase() });
                }
            }
        }
        if blanks > 0 {
            s.push_str(&blanks.to_string());
        }
        if rank != 0 {
            s.push('/');
        }
    }

    s.push(' ');
    s.push(if position.side_to_move() == Color::White { 'w' } else { 'b' });

    s.push(' ');
    let castling = position.castling();
    if castling == CastlingRights::NO_RIGHTS {
        s.push('-');
    } else {
        if castling.is_kingside_castle_legal(Color::White) {
            s.push('K');
        }
        if castling.is_queenside_castle_legal(Color::White) {
            s.push('Q');
        }
        if castling.is_kingside_castle_legal(Color::Black) {
            s.push('k');
        }
        if castling.is_queenside_castle_legal(Color::Black) {
            s.push('q');
        }
    }

    s.push(' ');
    match position.ep_square() {
        Some(sq) => s.push_str(&sq.to_string()),
        None => s.push('-'),
    }

    s.push_str(&format!(" {} {}", position.halfmove_clock(), position.fullmove_number()));

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Move;

    #[test]
    fn startpos_fen_round_trips() {
        let pos = parse(STARTPOS_FEN).unwrap();
        assert_eq!(pos, Position::new());
        assert_eq!(to_fen(&pos), STARTPOS_FEN);
    }

    #[test]
    fn kiwipete_fen_parses_without_error() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let pos = parse(fen).unwrap();
        assert!(pos.is_valid());
        assert_eq!(pos.side_to_move(), Color::White);
    }

    #[test]
    fn missing_king_is_rejected() {
        let fen = "8/8/8/8/8/8/8/K7 w - - 0 1";
        assert_eq!(parse(fen), Err(FenError::IllegalPosition));
    }

    #[test]
    fn truncated_board_is_rejected() {
        assert_eq!(parse("8/8/8/8/8/8/8 w - - 0 1"), Err(FenError::TruncatedBoard));
    }

    #[test]
    fn en_passant_square_round_trips() {
        let mut pos = Position::new();
        pos.make_move(Move::normal(Square::E2, Square::E4));
        let fen = to_fen(&pos);
        assert!(fen.contains(" e3 "));
        assert_eq!(parse(&fen).unwrap(), pos);
    }

    #[test]
    fn missing_clocks_default_to_zero_and_one() {
        let pos = parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").unwrap();
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 1);
    }
}
