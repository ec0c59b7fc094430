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

//! Shared state between the UCI command loop and the search worker thread:
//! a stop flag the loop can raise from `stop` or a time budget, and the
//! running statistics the loop reads to answer `info`/`bestmove`.
//!
//! There is exactly one worker thread, so this struct's job is not to
//! coordinate many searchers, just to let one thread signal cancellation and
//! publish progress to another without a lock on the hot path.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU16, AtomicU64, AtomicU8, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use mantis_base::Move;

/// Sentinel `time_limit_ms` value meaning "no time limit" (`go infinite`, or
/// a depth-only search).
const NO_TIME_LIMIT: u64 = u64::MAX;

/// Shared, thread-safe search control block: a cancellation flag plus the
/// best result found so far, updated as the iterative deepening driver
/// completes each depth.
pub struct SearchControl {
    stop_flag: AtomicBool,
    nodes: AtomicU64,
    time_limit_ms: AtomicU64,
    start_time: Mutex<Option<Instant>>,
    best_depth_completed: AtomicU8,
    best_root_score: AtomicI32,
    best_move: AtomicU16,
}

impl SearchControl {
    #[must_use]
    pub fn new() -> SearchControl {
        SearchControl {
            stop_flag: AtomicBool::new(false),
            nodes: AtomicU64::new(0),
            time_limit_ms: AtomicU64::new(NO_TIME_LIMIT),
            start_time: Mutex::new(None),
            best_depth_completed: AtomicU8::new(0),
            best_root_score: AtomicI32::new(0),
            best_move: AtomicU16::new(Move::NONE.into_u16()),
        }
    }

    /// Reset all counters and arm the clock for a new search. `time_limit_ms`
    /// is `None` for an unbounded (`infinite`, or depth-only) search.
    pub fn start(&self, time_limit_ms: Option<u64>) {
        self.stop_flag.store(false, Ordering::Release);
        self.nodes.store(0, Ordering::Relaxed);
        self.best_depth_completed.store(0, Ordering::Relaxed);
        self.best_root_score.store(0, Ordering::Relaxed);
        self.best_move.store(Move::NONE.into_u16(), Ordering::Relaxed);
        self.time_limit_ms
            .store(time_limit_ms.unwrap_or(NO_TIME_LIMIT), Ordering::Relaxed);
        *self.start_time.lock().unwrap() = Some(Instant::now());
    }

    /// Ask the running search to stop as soon as it next checks in. Used by
    /// the UCI `stop` command and by `quit`.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    /// Whether the search should stop: either `request_stop` was called, or
    /// the time budget has elapsed.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        if self.stop_flag.load(Ordering::Acquire) {
            return true;
        }
        let limit = self.time_limit_ms.load(Ordering::Relaxed);
        if limit == NO_TIME_LIMIT {
            return false;
        }
        self.elapsed_ms() >= limit
    }

    /// Milliseconds elapsed since `start` was called. Zero if `start` has
    /// never been called.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        match *self.start_time.lock().unwrap() {
            Some(t) => t.elapsed().as_millis() as u64,
            None => 0,
        }
    }

    /// Add to the shared node counter. Called periodically by the search
    /// rather than on every node, to keep the atomic off the hottest path.
    pub fn add_nodes(&self, n: u64) {
        self.nodes.fetch_add(n, Ordering::Relaxed);
    }

    #[must_use]
    pub fn node_count(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    /// Publish the result of a completed iterative-deepening iteration.
    pub fn publish_result(&self, depth: u8, root_score: i32, best_move: Move) {
        self.best_depth_completed.store(depth, Ordering::Relaxed);
        self.best_root_score.store(root_score, Ordering::Relaxed);
        self.best_move.store(best_move.into_u16(), Ordering::Relaxed);
    }

    /// The deepest completed iteration's depth, score, and best move.
    #[must_use]
    pub fn best(&self) -> (u8, i32, Move) {
        (
            self.best_depth_completed.load(Ordering::Relaxed),
            self.best_root_score.load(Ordering::Relaxed),
            Move::from_u16(self.best_move.load(Ordering::Relaxed)),
        )
    }
}

impl Default for SearchControl {
    fn default() -> Self {
        SearchControl::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mantis_base::Square;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fresh_control_does_not_request_stop() {
        let control = SearchControl::new();
        control.start(None);
        assert!(!control.should_stop());
    }

    #[test]
    fn request_stop_is_observed() {
        let control = SearchControl::new();
        control.start(None);
        control.request_stop();
        assert!(control.should_stop());
    }

    #[test]
    fn time_limit_eventually_trips_should_stop() {
        let control = SearchControl::new();
        control.start(Some(10));
        thread::sleep(Duration::from_millis(30));
        assert!(control.should_stop());
    }

    #[test]
    fn published_result_is_read_back() {
        let control = SearchControl::new();
        control.start(None);
        let m = Move::normal(Square::E2, Square::E4);
        control.publish_result(6, 57, m);
        assert_eq!(control.best(), (6, 57, m));
    }

    #[test]
    fn start_resets_counters_from_a_previous_search() {
        let control = SearchControl::new();
        control.start(None);
        control.add_nodes(500);
        control.request_stop();
        control.start(None);
        assert_eq!(control.node_count(), 0);
        assert!(!control.should_stop());
    }
}
