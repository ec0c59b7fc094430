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

//! The UCI command loop: reads one line at a time from stdin, and either
//! handles it immediately or spawns the single search worker thread.

use std::io::stdin;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use mantis_base::{parse_fen, to_fen, Move, Position, STARTPOS_FEN};
use mantis_engine::config::{SearchConfig, MAX_TT_SIZE_MB, MIN_TT_SIZE_MB};
use mantis_engine::limit::SearchControl;
use mantis_engine::search::iterative_deepen;
use mantis_engine::time::{time_for_clock, time_for_movetime};
use mantis_engine::transposition::TranspositionTable;
use mantis_engine::uci::{parse_line, EngineInfo, GoOption, OptionType, UciCommand, UciMessage};

const ENGINE_NAME: &str = "Mantis 0.1.0";
const ENGINE_AUTHOR: &str = "The Mantis Authors";

struct Engine {
    debug: bool,
    position: Position,
    config: SearchConfig,
    control: Arc<SearchControl>,
    ttable: Arc<Mutex<TranspositionTable>>,
    worker: Option<JoinHandle<()>>,
}

impl Engine {
    fn new() -> Engine {
        let config = SearchConfig::new();
        Engine {
            debug: false,
            position: Position::new(),
            ttable: Arc::new(Mutex::new(TranspositionTable::with_size_mb(config.tt_size_mb))),
            config,
            control: Arc::new(SearchControl::new()),
            worker: None,
        }
    }

    fn debug_info(&self, s: &str) {
        if self.debug {
            println!("{}", UciMessage::Info(&[EngineInfo::String(s)]));
        }
    }

    /// Ask any running search to stop, and block until its thread has
    /// printed its `bestmove` and exited.
    fn stop_and_join(&mut self) {
        self.control.request_stop();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                self.debug_info("search worker thread panicked");
            }
        }
    }

    fn handle_uci(&self) {
        let short_hash = &mantis_engine::GIT_HASH[..mantis_engine::GIT_HASH.len().min(8)];
        let name = format!("{ENGINE_NAME} ({short_hash})");
        println!("{}", UciMessage::Id { name: Some(&name), author: Some(ENGINE_AUTHOR) });
        println!(
            "{}",
            UciMessage::Option {
                name: "Hash",
                opt: OptionType::Spin {
                    default: self.config.tt_size_mb as i64,
                    min: MIN_TT_SIZE_MB as i64,
                    max: MAX_TT_SIZE_MB as i64,
                },
            }
        );
        println!("{}", UciMessage::UciOk);
    }

    fn handle_set_option(&mut self, name: &str, value: Option<&str>) {
        match name.to_ascii_lowercase().as_str() {
            "hash" => match value.and_then(|v| v.parse::<usize>().ok()) {
                Some(mb) => self.config.set_tt_size_mb(mb),
                None => self.debug_info("error: `Hash` requires an integer value"),
            },
            other => self.debug_info(&format!("error: unknown option `{other}`")),
        }
    }

    fn handle_new_game(&mut self) {
        self.stop_and_join();
        self.position = Position::new();
        self.ttable.lock().unwrap().clear();
    }

    fn handle_position(&mut self, fen: Option<String>, moves: Vec<Move>) {
        let mut position = match &fen {
            None => Position::new(),
            Some(fen) => match parse_fen(fen) {
                Ok(p) => p,
                Err(e) => {
                    self.debug_info(&format!("error: {e}; keeping previous position"));
                    return;
                }
            },
        };
        for m in moves {
            position.make_move(m);
        }
        self.position = position;
    }

    fn handle_go(&mut self, opts: &[GoOption]) {
        // A GUI is expected to send `stop` before the next `go`, but don't
        // rely on it: starting a second worker while the first is still
        // running would have them race over the same `SearchControl` and
        // transposition table, and over stdout.
        self.stop_and_join();

        let mut max_depth = self.config.max_depth;
        let mut movetime = None;
        let mut infinite = false;
        let (mut wtime, mut btime) = (None, None);
        let (mut winc, mut binc) = (0u32, 0u32);

        for opt in opts {
            match opt {
                GoOption::Depth(d) => max_depth = *d,
                GoOption::MoveTime(ms) => movetime = Some(*ms),
                GoOption::Infinite | GoOption::Ponder => infinite = true,
                GoOption::WhiteTime(t) => wtime = Some(*t),
                GoOption::BlackTime(t) => btime = Some(*t),
                GoOption::WhiteInc(inc) => winc = *inc,
                GoOption::BlackInc(inc) => binc = *inc,
                // Parsed for protocol completeness but intentionally not
                // honored: searchmoves restriction, exact node budgets, and
                // mate-search-specific cutoffs all add bookkeeping the
                // engine doesn't otherwise need.
                GoOption::SearchMoves(_) | GoOption::Nodes(_) | GoOption::Mate(_) | GoOption::MovesToGo(_) => {}
            }
        }

        let budget_ms = if infinite {
            None
        } else if let Some(mt) = movetime {
            Some(u64::from(time_for_movetime(mt)))
        } else {
            let (own_time, own_inc) = match self.position.side_to_move() {
                mantis_base::Color::White => (wtime, winc),
                _ => (btime, binc),
            };
            own_time.map(|t| u64::from(time_for_clock(t, own_inc)))
        };

        self.debug_info(&format!("search budget: {budget_ms:?} ms, max depth {max_depth}"));

        self.control.start(budget_ms);
        let control = Arc::clone(&self.control);
        let ttable = Arc::clone(&self.ttable);
        let position = self.position;
        let debug = self.debug;

        self.worker = Some(std::thread::spawn(move || {
            let mut guard = ttable.lock().unwrap();
            let result = iterative_deepen(&position, &mut guard, &control, max_depth, |info| {
                let elapsed = control.elapsed_ms().max(1);
                let nps = info.nodes * 1000 / elapsed;
                println!(
                    "{}",
                    UciMessage::Info(&[
                        EngineInfo::Depth(info.depth),
                        EngineInfo::score(info.score),
                        EngineInfo::Nodes(info.nodes),
                        EngineInfo::TimeMs(elapsed),
                        EngineInfo::NodeSpeed(nps),
                    ])
                );
            });
            drop(guard);
            if debug {
                println!("{}", UciMessage::Info(&[EngineInfo::String("search finished")]));
            }
            println!("{}", UciMessage::BestMove { m: result.best_move, ponder: None });
        }));
    }
}

fn main() {
    let mut engine = Engine::new();

    loop {
        let mut line = String::new();
        if stdin().read_line(&mut line).is_err() {
            engine.debug_info("failed to read a line from stdin");
            continue;
        }
        if line.is_empty() {
            // EOF: the GUI closed our stdin without sending `quit`.
            engine.stop_and_join();
            break;
        }

        let command = match parse_line(&line, &engine.position) {
            Ok(cmd) => cmd,
            Err(e) => {
                engine.debug_info(&format!("failed to parse line: {e}"));
                continue;
            }
        };

        match command {
            UciCommand::Uci => engine.handle_uci(),
            UciCommand::Debug(on) => engine.debug = on,
            UciCommand::IsReady => println!("{}", UciMessage::ReadyOk),
            UciCommand::SetOption { name, value } => engine.handle_set_option(&name, value.as_deref()),
            UciCommand::NewGame => engine.handle_new_game(),
            UciCommand::Position { fen, moves } => engine.handle_position(fen, moves),
            UciCommand::Go(opts) => engine.handle_go(&opts),
            UciCommand::Stop => engine.stop_and_join(),
            UciCommand::PonderHit => {}
            UciCommand::Quit => {
                engine.stop_and_join();
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_fen_round_trips_through_to_fen() {
        assert_eq!(to_fen(&parse_fen(STARTPOS_FEN).unwrap()), STARTPOS_FEN);
    }
}
