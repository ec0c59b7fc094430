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

//! Shared data types and useful basic definitions found across the entire
//! Mantis engine: board representation, move generation, and evaluation.
//! None of this crate knows about the UCI protocol or search control flow;
//! that lives in the `engine` crate.

// Many module elements are re-exported to make names more ergonomic to access.

mod bitboard;
pub use crate::bitboard::Bitboard;

mod castling;
pub use castling::CastlingRights;

mod color;
pub use color::Color;

mod direction;
use direction::Direction;

mod eval;
pub use eval::{evaluate, Eval};

mod fen;
pub use fen::{parse as parse_fen, to_fen, FenError, STARTPOS_FEN};

mod magic;
pub use magic::MAGIC;

mod movegen;
pub use movegen::{attacks_to, generate, generate_all, generate_captures, is_in_check, GenMode, MoveBuffer};

mod moves;
pub use moves::{Move, MoveType};

pub mod perft;

mod piece;
pub use piece::Piece;

mod position;
pub use position::Position;

mod square;
pub use square::Square;

mod zobrist;
