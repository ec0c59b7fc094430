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

//! Alpha-beta negamax search with quiescence and transposition-table
//! cutoffs, driven by iterative deepening so the engine always has a result
//! ready when its time budget runs out.

use mantis_base::{evaluate, generate_all, generate_captures, is_in_check, Move, Position};

use crate::error::SearchError;
use crate::limit::SearchControl;
use crate::transposition::{Bound, TranspositionTable};

/// The score assigned to a position where the side to move has just been
/// mated, before subtracting the distance to the mate in plies. Deliberately
/// far outside any realistic material+positional evaluation, so a mate score
/// is never confused for a large material advantage.
pub const MATE: i32 = 10_000_000;
/// The score of a drawn position.
pub const DRAW: i32 = 0;

/// How many nodes the search visits between checks of the shared stop flag
/// and time budget. Checking every node would make the atomic load a
/// meaningful fraction of search time; checking too rarely makes `stop`
/// sluggish to respond to.
const STOP_CHECK_INTERVAL: u64 = 2048;

/// Turn a raw evaluation into a mate score for a side that delivers mate
/// `ply_from_root` plies from the root.
#[must_use]
pub fn mate_score(ply_from_root: u32) -> i32 {
    MATE - ply_from_root as i32
}

/// Is `score` a mate score (for either side)?
#[must_use]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() > MATE - 1000
}

/// If `score` is a mate score, the number of full moves until mate (positive
/// if the side to move delivers it, negative if the side to move is mated).
#[must_use]
pub fn moves_to_mate(score: i32) -> Option<i32> {
    if !is_mate_score(score) {
        return None;
    }
    let plies = MATE - score.abs();
    let moves = (plies + 1) / 2;
    Some(if score > 0 { moves } else { -moves })
}

/// Rebase a mate score from "plies from the search root" to "plies from
/// `ply`", for storing into the transposition table. A mate score found deep
/// in one branch of the tree is meaningless to a different branch that
/// transposes into the same position at a different depth, so only the
/// distance from the position itself, not from the root, can be cached.
#[must_use]
fn score_to_tt(score: i32, ply: u32) -> i32 {
    if score >= MATE - 1000 {
        score + ply as i32
    } else if score <= -(MATE - 1000) {
        score - ply as i32
    } else {
        score
    }
}

/// The inverse of [`score_to_tt`]: rebase a mate score read back out of the
/// transposition table from "plies from `ply`" to "plies from the search
/// root", so it can be compared against `alpha`/`beta` at this node.
#[must_use]
fn score_from_tt(score: i32, ply: u32) -> i32 {
    if score >= MATE - 1000 {
        score - ply as i32
    } else if score <= -(MATE - 1000) {
        score + ply as i32
    } else {
        score
    }
}

/// The outcome of a completed (non-cancelled) iteration of iterative
/// deepening.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchInfo {
    /// The depth this iteration searched to.
    pub depth: u8,
    /// The evaluation of the root position, from the side-to-move's
    /// perspective.
    pub score: i32,
    /// The best move found at the root.
    pub best_move: Move,
    /// Total nodes visited across every completed iteration so far.
    pub nodes: u64,
}

struct Searcher<'a> {
    ttable: &'a mut TranspositionTable,
    control: &'a SearchControl,
    nodes_since_check: u64,
    /// Set once `poll_stop` has actually observed the stop flag during this
    /// call tree, as opposed to the flag merely being set by the time the
    /// call returns. The two differ whenever an iteration finishes fast
    /// enough that the time budget only expires after the last node was
    /// searched; such an iteration is still a trustworthy, complete result.
    cancelled: bool,
}

impl<'a> Searcher<'a> {
    fn new(ttable: &'a mut TranspositionTable, control: &'a SearchControl) -> Self {
        Searcher {
            ttable,
            control,
            nodes_since_check: 0,
            cancelled: false,
        }
    }

    /// Periodically consult the shared stop flag/time budget. Cheap in the
    /// common case: most calls just increment a counter. Returns whether the
    /// search has been asked to stop.
    fn poll_stop(&mut self) -> bool {
        self.nodes_since_check += 1;
        if self.nodes_since_check >= STOP_CHECK_INTERVAL {
            self.control.add_nodes(self.nodes_since_check);
            self.nodes_since_check = 0;
            if self.control.should_stop() {
                self.cancelled = true;
            }
        }
        self.cancelled
    }

    /// Negamax search with alpha-beta pruning and transposition table
    /// cutoffs. Returns the score of `position` from the perspective of its
    /// side to move. A cancelled search is reported through the `Ok` case,
    /// not `Err`: a cancellation is `Ok(alpha)`, a fail-soft bound rather
    /// than an exact score, so every ancestor frame still completes its loop
    /// and stores a (possibly shallow) transposition table entry instead of
    /// an error unwinding the whole call stack and skipping every store.
    /// `Err` is reserved for failures that actually prevent a score from
    /// being produced at all.
    fn alpha_beta(
        &mut self,
        position: &Position,
        depth: i32,
        ply: u32,
        mut alpha: i32,
        beta: i32,
    ) -> Result<i32, SearchError> {
        if self.poll_stop() {
            return Ok(alpha);
        }

        if depth <= 0 {
            return self.quiesce(position, alpha, beta);
        }

        let hash = position.zobrist_hash();
        let mut tt_move = Move::NONE;
        if let Some(entry) = self.ttable.probe(hash) {
            tt_move = entry.best_move;
            if i32::from(entry.depth) >= depth {
                let score = score_from_tt(entry.score, ply);
                match entry.bound {
                    Bound::Exact => return Ok(score),
                    Bound::Lower if score >= beta => return Ok(score),
                    Bound::Upper if score <= alpha => return Ok(score),
                    _ => {}
                }
            }
        }

        let mut moves = generate_all(position);
        if moves.is_empty() {
            let score = if is_in_check(position, position.side_to_move()) {
                -mate_score(ply)
            } else {
                DRAW
            };
            self.ttable
                .store(hash, depth as u8, score_to_tt(score, ply), Move::NONE, Bound::Exact);
            return Ok(score);
        }

        let alpha_orig = alpha;
        let mut best_score = i32::MIN;
        let mut best_move = moves.as_slice()[0];

        // Try the transposition table's suggested move first: if it is still
        // the best move, alpha-beta will prune almost everything else
        // without us needing an explicit move-ordering sort.
        moves.move_to_front(tt_move);

        for &m in moves.as_slice() {
            let mut child = *position;
            child.make_move(m);
            let score = -self.alpha_beta(&child, depth - 1, ply + 1, -beta, -alpha)?;

            if score > best_score {
                best_score = score;
                best_move = m;
            }
            if best_score > alpha {
                alpha = best_score;
            }
            if alpha >= beta {
                break;
            }
        }

        let bound = if best_score <= alpha_orig {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.ttable
            .store(hash, depth as u8, score_to_tt(best_score, ply), best_move, bound);

        Ok(best_score)
    }

    /// Quiescence search: keep resolving captures until the position is
    /// "quiet", so the static evaluation at the horizon doesn't mistake a
    /// position with a hanging piece for a stable one.
    fn quiesce(&mut self, position: &Position, mut alpha: i32, beta: i32) -> Result<i32, SearchError> {
        if self.poll_stop() {
            return Ok(alpha);
        }

        let stand_pat = i32::from(evaluate(position).centipawn_val());
        if stand_pat >= beta {
            return Ok(stand_pat);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let captures = generate_captures(position);
        for m in captures.as_slice() {
            let mut child = *position;
            child.make_move(*m);
            let score = -self.quiesce(&child, -beta, -alpha)?;
            if score >= beta {
                return Ok(score);
            }
            if score > alpha {
                alpha = score;
            }
        }

        Ok(alpha)
    }
}

/// Search `position` one ply deeper than the last call, publishing progress
/// to `control` after each completed iteration, until `max_depth` is reached
/// or `control` asks the search to stop.
///
/// Always leaves `control` holding the best result found by the deepest
/// fully-completed iteration, even if a deeper iteration was cut short.
pub fn iterative_deepen(
    position: &Position,
    ttable: &mut TranspositionTable,
    control: &SearchControl,
    max_depth: u8,
    mut on_iteration: impl FnMut(&SearchInfo),
) -> SearchInfo {
    let mut last_complete: Option<SearchInfo> = None;

    for depth in 1..=max_depth {
        let mut searcher = Searcher::new(ttable, control);
        let result = searcher.alpha_beta(position, depth as i32, 0, -MATE * 2, MATE * 2);
        control.add_nodes(searcher.nodes_since_check);

        // A stop observed partway through this iteration means `score` is
        // only a fail-soft bound, not this iteration's true root value:
        // discard it and keep whatever the last fully-completed iteration
        // published. Checking `searcher.cancelled` rather than
        // `control.should_stop()` matters for a fast-completing iteration
        // whose time budget only expires after its last node returned.
        //
        // `alpha_beta` only ever returns `Err` for a failure that prevents a
        // score from existing at all (e.g. a poisoned lock further up the
        // call chain); cancellation is reported as `Ok`, so that case is
        // also a reason to stop deepening rather than trust a half-built
        // result.
        let Ok(score) = result else {
            break;
        };
        if searcher.cancelled {
            break;
        }

        let hash = position.zobrist_hash();
        let best_move = searcher
            .ttable
            .probe(hash)
            .map_or(Move::NONE, |e| e.best_move);
        let nodes = control.node_count();
        control.publish_result(depth, score, best_move);
        let info = SearchInfo {
            depth,
            score,
            best_move,
            nodes,
        };
        on_iteration(&info);
        last_complete = Some(info);
        if is_mate_score(score) || control.should_stop() {
            break;
        }
    }

    last_complete.unwrap_or_else(|| SearchInfo {
        depth: 0,
        score: DRAW,
        best_move: Move::NONE,
        nodes: control.node_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TT_SIZE_MB;
    use mantis_base::{parse_fen, Position};

    fn search_to_depth(fen: &str, depth: u8) -> SearchInfo {
        let position = parse_fen(fen).unwrap();
        let mut ttable = TranspositionTable::with_size_mb(DEFAULT_TT_SIZE_MB);
        let control = SearchControl::new();
        control.start(None);
        iterative_deepen(&position, &mut ttable, &control, depth, |_| {})
    }

    #[test]
    fn finds_mate_in_one() {
        // Rb8# is mate in one for White.
        let info = search_to_depth("3k4/R7/1R6/5K2/8/8/8/8 w - - 0 1", 3);
        assert_eq!(moves_to_mate(info.score), Some(1));
    }

    #[test]
    fn mate_score_tt_round_trip_is_an_involution_at_the_same_ply() {
        let mate_in_two_from_root = mate_score(4);
        let stored = score_to_tt(mate_in_two_from_root, 4);
        assert_eq!(score_from_tt(stored, 4), mate_in_two_from_root);
    }

    #[test]
    fn mate_score_tt_round_trip_rebases_across_plies() {
        // A mate found at absolute ply 6 discovered while searching the node
        // at ply 4 (so 2 plies deep from that node) is stored relative to
        // that node. Probing the same entry from a different search, where
        // this position is reached at ply 2, should read back "mate at
        // absolute ply 4" (still 2 plies deep from the probing node).
        let found_at_ply_6 = mate_score(6);
        let stored = score_to_tt(found_at_ply_6, 4);
        assert_eq!(score_from_tt(stored, 2), mate_score(4));
    }

    #[test]
    fn non_mate_scores_pass_through_tt_rebasing_unchanged() {
        assert_eq!(score_to_tt(150, 3), 150);
        assert_eq!(score_from_tt(150, 3), 150);
    }

    #[test]
    fn startpos_search_returns_a_legal_looking_move() {
        let info = search_to_depth(mantis_base::STARTPOS_FEN, 3);
        assert_ne!(info.best_move, Move::NONE);
        assert!(info.score.abs() < 1000);
    }

    #[test]
    fn stalemate_is_scored_as_a_draw() {
        // Black to move, stalemated.
        let info = search_to_depth("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 1);
        assert_eq!(info.score, DRAW);
    }

    #[test]
    fn deeper_iterations_do_not_lose_the_best_move_on_cancellation() {
        let position = Position::new();
        let mut ttable = TranspositionTable::with_size_mb(DEFAULT_TT_SIZE_MB);
        let control = SearchControl::new();
        // A near-zero budget: the first iteration or two may complete, but
        // deep iterations will be cancelled mid-search.
        control.start(Some(1));
        let info = iterative_deepen(&position, &mut ttable, &control, 64, |_| {});
        assert_ne!(info.best_move, Move::NONE);
    }

    #[test]
    fn transposed_positions_reuse_the_same_tt_entry() {
        // 1. Nf3 Nf6 2. Ng1 Ng8 reaches the start position by transposition;
        // searching it directly should produce the same TT entry as having
        // reached it via those four plies.
        let mut ttable = TranspositionTable::with_size_mb(DEFAULT_TT_SIZE_MB);
        let control = SearchControl::new();
        control.start(None);
        let start = Position::new();
        let direct = iterative_deepen(&start, &mut ttable, &control, 4, |_| {});

        let hash = start.zobrist_hash();
        let entry = ttable.probe(hash).expect("start position should be cached");
        assert_eq!(entry.best_move, direct.best_move);
    }
}
