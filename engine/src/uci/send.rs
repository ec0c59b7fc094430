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

//! Formatting the messages the engine sends back to the GUI.

use std::fmt::{self, Display, Formatter};

use mantis_base::Move;

use crate::search::moves_to_mate;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A message sent from the engine to the GUI.
pub enum UciMessage<'a> {
    /// Identify the engine by name and author.
    Id { name: Option<&'a str>, author: Option<&'a str> },
    /// Sent once engine identification and options have been announced.
    UciOk,
    /// Sent in reply to `isready` once all prior input has been processed.
    ReadyOk,
    /// Announce an option the GUI can present to the user.
    Option { name: &'a str, opt: OptionType<'a> },
    /// The final result of a search.
    BestMove { m: Move, ponder: Option<Move> },
    /// Progress information about an ongoing or just-finished search.
    Info(&'a [EngineInfo<'a>]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// One field of an `info` line.
pub enum EngineInfo<'a> {
    /// The depth searched this iteration.
    Depth(u8),
    /// Milliseconds spent searching so far.
    TimeMs(u64),
    /// Nodes visited so far.
    Nodes(u64),
    /// Nodes visited per second.
    NodeSpeed(u64),
    /// The root evaluation, in centipawns from the side to move's
    /// perspective, unless it is a mate score.
    ScoreCentipawns(i32),
    /// The root evaluation is a mate in this many moves (negative if the
    /// side to move is the one getting mated).
    ScoreMate(i32),
    /// Fraction of the transposition table occupied, out of 1000.
    HashFull(u16),
    /// A free-form diagnostic string, sent only in debug mode. Must not
    /// contain a newline.
    String(&'a str),
}

impl<'a> EngineInfo<'a> {
    /// Build the correct `ScoreCentipawns`/`ScoreMate` variant for a raw
    /// engine score.
    #[must_use]
    pub fn score(raw_score: i32) -> EngineInfo<'static> {
        match moves_to_mate(raw_score) {
            Some(moves) => EngineInfo::ScoreMate(moves),
            None => EngineInfo::ScoreCentipawns(raw_score),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A kind of option the GUI can expose to the user.
pub enum OptionType<'a> {
    /// An integer within `[min, max]`.
    Spin { default: i64, min: i64, max: i64 },
    /// A checkbox.
    Check { default: bool },
}

impl<'a> Display for UciMessage<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            UciMessage::Id { name, author } => {
                write!(f, "id")?;
                if let Some(n) = name {
                    write!(f, " name {n}")?;
                }
                if let Some(a) = author {
                    if name.is_some() {
                        write!(f, "\nid")?;
                    }
                    write!(f, " author {a}")?;
                }
                Ok(())
            }
            UciMessage::UciOk => write!(f, "uciok"),
            UciMessage::ReadyOk => write!(f, "readyok"),
            UciMessage::Option { name, opt } => write_option(f, name, opt),
            UciMessage::BestMove { m, ponder } => {
                write!(f, "bestmove {}", m.to_uci())?;
                if let Some(p) = ponder {
                    write!(f, " ponder {}", p.to_uci())?;
                }
                Ok(())
            }
            UciMessage::Info(infos) => write_info(f, infos),
        }
    }
}

fn write_option(f: &mut Formatter, name: &str, opt: &OptionType) -> fmt::Result {
    write!(f, "option name {name} ")?;
    match opt {
        OptionType::Spin { default, min, max } => {
            write!(f, "type spin default {default} min {min} max {max}")
        }
        OptionType::Check { default } => write!(f, "type check default {default}"),
    }
}

fn write_info(f: &mut Formatter, infos: &[EngineInfo]) -> fmt::Result {
    write!(f, "info")?;
    for info in infos {
        match info {
            EngineInfo::Depth(d) => write!(f, " depth {d}")?,
            EngineInfo::TimeMs(t) => write!(f, " time {t}")?,
            EngineInfo::Nodes(n) => write!(f, " nodes {n}")?,
            EngineInfo::NodeSpeed(nps) => write!(f, " nps {nps}")?,
            EngineInfo::ScoreCentipawns(cp) => write!(f, " score cp {cp}")?,
            EngineInfo::ScoreMate(moves) => write!(f, " score mate {moves}")?,
            EngineInfo::HashFull(permille) => write!(f, " hashfull {permille}")?,
            EngineInfo::String(s) => write!(f, " string {s}")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mantis_base::Square;

    #[test]
    fn id_message_spans_two_lines() {
        assert_eq!(
            format!("{}", UciMessage::Id { name: Some("Mantis 0.1.0"), author: Some("The Mantis Authors") }),
            "id name Mantis 0.1.0\nid author The Mantis Authors"
        );
    }

    #[test]
    fn bestmove_with_ponder_formats_both_moves() {
        assert_eq!(
            format!(
                "{}",
                UciMessage::BestMove {
                    m: Move::normal(Square::E2, Square::E4),
                    ponder: Some(Move::normal(Square::E7, Square::E5)),
                }
            ),
            "bestmove e2e4 ponder e7e5"
        );
    }

    #[test]
    fn composed_info_line_matches_uci_field_order() {
        assert_eq!(
            format!(
                "{}",
                UciMessage::Info(&[
                    EngineInfo::Depth(6),
                    EngineInfo::ScoreCentipawns(214),
                    EngineInfo::Nodes(2124),
                    EngineInfo::TimeMs(1242),
                    EngineInfo::NodeSpeed(1710),
                ])
            ),
            "info depth 6 score cp 214 nodes 2124 time 1242 nps 1710"
        );
    }

    #[test]
    fn mate_score_formats_as_mate_field() {
        assert_eq!(format!("{}", UciMessage::Info(&[EngineInfo::score(crate::search::MATE - 3)])), "info score mate 2");
    }

    #[test]
    fn spin_option_formats_with_bounds() {
        assert_eq!(
            format!(
                "{}",
                UciMessage::Option { name: "Hash", opt: OptionType::Spin { default: 16, min: 1, max: 1024 } }
            ),
            "option name Hash type spin default 16 min 1 max 1024"
        );
    }
}
