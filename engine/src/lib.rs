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

//! Search control, the transposition table, and the UCI front end built on
//! top of the `mantis_base` board representation and move generator.

pub mod config;
pub mod error;
pub mod limit;
pub mod search;
pub mod time;
pub mod transposition;
pub mod uci;

/// The engine version and build's git commit hash, baked in by `build.rs`.
/// Reported to the GUI as part of `id name` when compiled with that
/// information available.
pub const GIT_HASH: &str = env!("GIT_HASH");
