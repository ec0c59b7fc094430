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

//! Types for the Universal Chess Interface: the commands a GUI can send an
//! engine, and the messages an engine can send back.

use mantis_base::Move;

mod parse;
mod send;
pub use parse::parse_line;
pub use send::{EngineInfo, OptionType, UciMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A command sent from the GUI to the engine.
pub enum UciCommand {
    /// Identify the engine and its options; answered with `id`, `option`,
    /// and finally `uciok`.
    Uci,
    /// Turn on or off `info string` diagnostic output.
    Debug(bool),
    /// Ask whether the engine has processed all input so far; answered with
    /// `readyok`.
    IsReady,
    /// Set an engine parameter by name, with an optional value.
    SetOption { name: String, value: Option<String> },
    /// The next `position` describes a new game; discard transposition table
    /// contents from the previous one.
    NewGame,
    /// Set up the position to search: a FEN (or the start position) with a
    /// list of moves played from it.
    Position { fen: Option<String>, moves: Vec<Move> },
    /// Start searching the current position under the given options.
    Go(Vec<GoOption>),
    /// Stop the current search as soon as possible and report `bestmove`.
    Stop,
    /// The opponent played the predicted ponder move; not implemented, and
    /// parsed only so it does not surface as an "unrecognized command".
    PonderHit,
    /// Shut down.
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An option attached to a `go` command.
pub enum GoOption {
    /// Restrict the search to this set of root moves. Parsed, but not
    /// honored: the engine always searches every legal move.
    SearchMoves(Vec<Move>),
    /// Search in pondering mode. Treated as `Infinite`.
    Ponder,
    /// Milliseconds remaining on White's clock.
    WhiteTime(u32),
    /// Milliseconds remaining on Black's clock.
    BlackTime(u32),
    /// White's increment, in milliseconds.
    WhiteInc(u32),
    /// Black's increment, in milliseconds.
    BlackInc(u32),
    /// Moves remaining until the next time control.
    MovesToGo(u8),
    /// Search to exactly this many plies.
    Depth(u8),
    /// Search for a mate in this many moves. Parsed, but not honored: the
    /// engine does not special-case mate searches.
    Mate(u8),
    /// Search at most this many nodes. Parsed, but not honored.
    Nodes(u64),
    /// Search for exactly this many milliseconds.
    MoveTime(u32),
    /// Search until a `stop` is received, ignoring any time budget.
    Infinite,
}
