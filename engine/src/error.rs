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

//! Errors that can terminate a search before it runs to completion.

use std::fmt::{self, Display, Formatter};
use std::sync::PoisonError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// The ways a search can fail to produce a result.
pub enum SearchError {
    /// The search was asked to stop (by the time budget or a UCI `stop`)
    /// before it could finish the current iteration.
    Timeout,
    /// A lock guarding shared search state was poisoned by a panic in another
    /// thread.
    Poison,
    /// The worker thread could not be joined.
    Join,
}

impl<T> From<PoisonError<T>> for SearchError {
    fn from(_: PoisonError<T>) -> Self {
        SearchError::Poison
    }
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Timeout => write!(f, "search was stopped before it completed"),
            SearchError::Poison => write!(f, "a search lock was poisoned"),
            SearchError::Join => write!(f, "the search worker thread could not be joined"),
        }
    }
}

impl std::error::Error for SearchError {}
