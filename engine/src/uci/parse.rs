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

//! Parsing lines of UCI text into [`UciCommand`]s.

use mantis_base::{generate_all, parse_fen, Move, Position, STARTPOS_FEN};

use super::{GoOption, UciCommand};

/// The result of parsing one line of UCI input. Per the protocol, a
/// malformed line should be logged (or ignored) and not crash the engine, so
/// the error case is a human-readable message rather than a typed error.
pub type UciParseResult = Result<UciCommand, String>;

/// Parse one line of UCI input. `position` is the engine's current position,
/// needed to resolve the moves in a `position ... moves ...` or
/// `go searchmoves ...` line into [`Move`]s.
pub fn parse_line(line: &str, position: &Position) -> UciParseResult {
    let mut tokens = line.split_ascii_whitespace();
    let first = tokens.next().ok_or("line contains no tokens")?;
    match first {
        "uci" => Ok(UciCommand::Uci),
        "debug" => match tokens.next() {
            Some("on") | None => Ok(UciCommand::Debug(true)),
            Some("off") => Ok(UciCommand::Debug(false)),
            Some(other) => Err(format!("unrecognized debug option `{other}`")),
        },
        "isready" => Ok(UciCommand::IsReady),
        "setoption" => parse_set_option(&mut tokens),
        "ucinewgame" => Ok(UciCommand::NewGame),
        "position" => parse_position(&mut tokens),
        "go" => parse_go(&mut tokens, position),
        "stop" => Ok(UciCommand::Stop),
        "ponderhit" => Ok(UciCommand::PonderHit),
        "quit" => Ok(UciCommand::Quit),
        _ => Err(format!("unrecognized UCI command `{first}`")),
    }
}

/// Parse a `setoption` line. Assumes `setoption` has already been consumed.
fn parse_set_option(tokens: &mut dyn Iterator<Item = &str>) -> UciParseResult {
    let name_tok = tokens
        .next()
        .ok_or("reached end of line while looking for `name` in `setoption`")?;
    if name_tok != "name" {
        return Err(format!("expected `name` in `setoption`, got `{name_tok}`"));
    }

    let mut key = String::new();
    loop {
        match tokens.next() {
            None => {
                return Ok(UciCommand::SetOption { name: key, value: None });
            }
            Some("value") => break,
            Some(tok) => {
                if !key.is_empty() {
                    key.push(' ');
                }
                key.push_str(tok);
            }
        }
    }

    let mut value = String::new();
    for tok in tokens {
        if !value.is_empty() {
            value.push(' ');
        }
        value.push_str(tok);
    }
    Ok(UciCommand::SetOption { name: key, value: Some(value) })
}

/// Parse a `position` line. Assumes `position` has already been consumed.
fn parse_position(tokens: &mut dyn Iterator<Item = &str>) -> UciParseResult {
    let start_fen = match tokens
        .next()
        .ok_or_else(|| "reached end of line while parsing `position`".to_string())?
    {
        "fen" => {
            let mut fen = String::new();
            loop {
                match tokens.next() {
                    None => break,
                    Some("moves") => break,
                    Some(tok) => {
                        if !fen.is_empty() {
                            fen.push(' ');
                        }
                        fen.push_str(tok);
                    }
                }
            }
            Some(fen)
        }
        "startpos" => {
            // Consume the `moves` token, if present; `moves` may legally be
            // absent if no moves were played yet.
            None
        }
        other => return Err(format!("expected `fen` or `startpos`, got `{other}`")),
    };

    let mut position = parse_fen(start_fen.as_deref().unwrap_or(STARTPOS_FEN))
        .map_err(|e| format!("illegal FEN in `position`: {e}"))?;

    // A malformed or illegal move here should not abort the whole command;
    // we simply don't play it and move on to whatever comes after it.
    // `Move::from_uci` only checks that the token names a well-formed move,
    // not that it is legal in `position`, so every candidate is also checked
    // against the actual legal move list before being played.
    let mut moves = Vec::new();
    for tok in tokens {
        if tok == "moves" {
            continue;
        }
        let Ok(m) = Move::from_uci(tok, &position) else {
            continue;
        };
        if !generate_all(&position).as_slice().contains(&m) {
            continue;
        }
        position.make_move(m);
        moves.push(m);
    }

    Ok(UciCommand::Position { fen: start_fen, moves })
}

/// Parse a `go` line. Assumes `go` has already been consumed.
fn parse_go(tokens: &mut dyn Iterator<Item = &str>, position: &Position) -> UciParseResult {
    let mut opts = Vec::new();
    let mut peeks = tokens.peekable();
    while let Some(tok) = peeks.next() {
        opts.push(match tok {
            "searchmoves" => {
                let mut moves = Vec::new();
                while let Some(&peeked) = peeks.peek() {
                    match Move::from_uci(peeked, position) {
                        Ok(m) => {
                            moves.push(m);
                            peeks.next();
                        }
                        Err(_) => break,
                    }
                }
                GoOption::SearchMoves(moves)
            }
            "ponder" => GoOption::Ponder,
            "wtime" => GoOption::WhiteTime(parse_u32(peeks.next())?),
            "btime" => GoOption::BlackTime(parse_u32(peeks.next())?),
            "winc" => GoOption::WhiteInc(parse_u32(peeks.next())?),
            "binc" => GoOption::BlackInc(parse_u32(peeks.next())?),
            "movestogo" => GoOption::MovesToGo(parse_u32(peeks.next())? as u8),
            "depth" => GoOption::Depth(parse_u32(peeks.next())? as u8),
            "mate" => GoOption::Mate(parse_u32(peeks.next())? as u8),
            "nodes" => GoOption::Nodes(parse_u64(peeks.next())?),
            "movetime" => GoOption::MoveTime(parse_u32(peeks.next())?),
            "infinite" => GoOption::Infinite,
            other => return Err(format!("unrecognized `go` option `{other}`")),
        });
    }
    Ok(UciCommand::Go(opts))
}

fn parse_u32(tok: Option<&str>) -> Result<u32, String> {
    tok.ok_or_else(|| "reached end of line while parsing a number".to_string())?
        .parse()
        .map_err(|e| format!("not a valid number: {e}"))
}

fn parse_u64(tok: Option<&str>) -> Result<u64, String> {
    tok.ok_or_else(|| "reached end of line while parsing a number".to_string())?
        .parse()
        .map_err(|e| format!("not a valid number: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mantis_base::Square;

    #[test]
    fn starting_position_with_no_moves_parses() {
        assert_eq!(
            parse_line("position startpos\n", &Position::new()),
            Ok(UciCommand::Position { fen: None, moves: Vec::new() })
        );
    }

    #[test]
    fn position_fen_parses() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        assert_eq!(
            parse_line(&format!("position fen {fen} moves\n"), &Position::new()),
            Ok(UciCommand::Position { fen: Some(fen.to_string()), moves: Vec::new() })
        );
    }

    #[test]
    fn position_fen_then_moves_parses() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let line = format!("position fen {fen} moves c7c5 g1f3\n");
        assert_eq!(
            parse_line(&line, &Position::new()),
            Ok(UciCommand::Position {
                fen: Some(fen.to_string()),
                moves: vec![
                    Move::normal(Square::C7, Square::C5),
                    Move::normal(Square::G1, Square::F3),
                ],
            })
        );
    }

    #[test]
    fn setoption_with_no_value_parses() {
        assert_eq!(
            parse_line("setoption name MyOption\n", &Position::new()),
            Ok(UciCommand::SetOption { name: "MyOption".into(), value: None })
        );
    }

    #[test]
    fn setoption_with_multi_word_key_and_value_parses() {
        assert_eq!(
            parse_line("setoption name Hash Size value 64 MB\n", &Position::new()),
            Ok(UciCommand::SetOption {
                name: "Hash Size".into(),
                value: Some("64 MB".into()),
            })
        );
    }

    #[test]
    fn go_with_simple_options_parses() {
        assert_eq!(
            parse_line("go depth 7 nodes 25\n", &Position::new()),
            Ok(UciCommand::Go(vec![GoOption::Depth(7), GoOption::Nodes(25)]))
        );
    }

    #[test]
    fn go_searchmoves_does_not_swallow_later_options() {
        assert_eq!(
            parse_line("go searchmoves e2e4 infinite\n", &Position::new()),
            Ok(UciCommand::Go(vec![
                GoOption::SearchMoves(vec![Move::normal(Square::E2, Square::E4)]),
                GoOption::Infinite,
            ]))
        );
    }

    #[test]
    fn uci_and_isready_parse() {
        assert_eq!(parse_line("uci\n", &Position::new()), Ok(UciCommand::Uci));
        assert_eq!(parse_line("isready\n", &Position::new()), Ok(UciCommand::IsReady));
    }

    #[test]
    fn debug_on_and_off_parse() {
        assert_eq!(parse_line("debug on\n", &Position::new()), Ok(UciCommand::Debug(true)));
        assert_eq!(parse_line("debug off\n", &Position::new()), Ok(UciCommand::Debug(false)));
    }

    #[test]
    fn illegal_move_in_position_is_silently_skipped() {
        assert_eq!(
            parse_line("position startpos moves e2e5\n", &Position::new()),
            Ok(UciCommand::Position { fen: None, moves: Vec::new() })
        );
    }
}
