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

//! Deciding how many milliseconds a search is allowed to run for, given the
//! time-control information a `go` command carries.

/// The safety margin subtracted from the clock reading so a move is never
/// sent so late that it risks losing on time.
const CLOCK_SAFETY_MARGIN_MS: u32 = 200;
/// The floor under which we will not budget less time than this, even on an
/// almost-exhausted clock; a near-zero search still needs to produce a move.
const MIN_BUDGET_MS: u32 = 20;
/// The safety margin subtracted from an explicit `movetime`.
const MOVETIME_SAFETY_MARGIN_MS: u32 = 50;
/// The floor for an explicit `movetime` budget.
const MIN_MOVETIME_BUDGET_MS: u32 = 10;

/// Budget a search bound by the normal chess-clock fields (`wtime`/`winc` or
/// `btime`/`binc` for the side to move). Spends a twentieth of the remaining
/// time plus half of the increment, which keeps the clock roughly constant
/// move to move rather than shrinking it every move.
///
/// `MIN_BUDGET_MS` is only applied as a floor when the clock actually has
/// that much room left past the safety margin; a clock so low that even the
/// margin doesn't fit must shrink the budget below the floor rather than
/// risk a time forfeit.
#[must_use]
pub fn time_for_clock(own_time_ms: u32, own_inc_ms: u32) -> u32 {
    let raw = own_time_ms / 20 + own_inc_ms / 2;
    let ceiling = own_time_ms.saturating_sub(CLOCK_SAFETY_MARGIN_MS);
    if ceiling < MIN_BUDGET_MS {
        ceiling
    } else {
        raw.clamp(MIN_BUDGET_MS, ceiling)
    }
}

/// Budget a search bound by an explicit `movetime` (milliseconds the engine
/// should spend on this move and no other consideration).
#[must_use]
pub fn time_for_movetime(movetime_ms: u32) -> u32 {
    movetime_ms
        .saturating_sub(MOVETIME_SAFETY_MARGIN_MS)
        .max(MIN_MOVETIME_BUDGET_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_budget_spends_a_twentieth_plus_half_increment() {
        assert_eq!(time_for_clock(60_000, 1_000), 3_000 + 500);
    }

    #[test]
    fn clock_budget_never_drops_below_the_floor_when_time_remains() {
        // 300ms - 200ms margin leaves 100ms of ceiling, well above the floor.
        assert_eq!(time_for_clock(300, 0), MIN_BUDGET_MS);
    }

    #[test]
    fn clock_budget_shrinks_below_the_floor_on_a_critically_low_clock() {
        // 100ms doesn't even cover the 200ms safety margin, so the budget
        // must shrink to what's actually left rather than claim the floor.
        assert_eq!(time_for_clock(100, 0), 0);
    }

    #[test]
    fn clock_budget_never_exceeds_time_minus_safety_margin() {
        // own_time/20 + own_inc/2 would be 5_100ms here, well past the
        // 200ms-short-of-clock ceiling.
        let budget = time_for_clock(1_000, 10_000);
        assert_eq!(budget, 1_000 - CLOCK_SAFETY_MARGIN_MS);
    }

    #[test]
    fn movetime_budget_subtracts_the_safety_margin() {
        assert_eq!(time_for_movetime(1_000), 950);
    }

    #[test]
    fn movetime_budget_has_a_floor() {
        assert_eq!(time_for_movetime(30), MIN_MOVETIME_BUDGET_MS);
    }
}
