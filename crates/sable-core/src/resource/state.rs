// Copyright 2026 sable
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The resource lifecycle state machine.
//!
//! Every resource moves through a fixed set of states:
//!
//! ```text
//! Unloaded -> Loading -> { Loaded | Failed }
//! { Loaded | Failed } -> Unloading -> Unloaded
//! ```
//!
//! No other transition is legal. There is no terminal state; a resource that
//! has returned to [`ResourceState::Unloaded`] may be loaded again.

use crate::error::StateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

/// The lifecycle state of a resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceState {
    /// No payload is held; the resource is ready to be loaded.
    #[default]
    Unloaded,
    /// A load is in flight. At most one load per resource may be in flight.
    Loading,
    /// The payload is resident and usable.
    Loaded,
    /// The last load attempt failed; no partial payload remains.
    Failed,
    /// The payload is being released.
    Unloading,
}

impl ResourceState {
    /// Returns `true` if moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: ResourceState) -> bool {
        use ResourceState::*;
        matches!(
            (self, next),
            (Unloaded, Loading)
                | (Loading, Loaded)
                | (Loading, Failed)
                | (Loaded, Unloading)
                | (Failed, Unloading)
                | (Unloading, Unloaded)
        )
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceState::Unloaded => "Unloaded",
            ResourceState::Loading => "Loading",
            ResourceState::Loaded => "Loaded",
            ResourceState::Failed => "Failed",
            ResourceState::Unloading => "Unloading",
        };
        write!(f, "{name}")
    }
}

/// A thread-safe cell holding the current [`ResourceState`] of one resource.
///
/// All writes go through [`transition`](StateCell::transition), which rejects
/// illegal transitions without mutating the cell. Reads are snapshots; the
/// state may change between a read and a later transition, so callers that
/// need read-then-write atomicity must hold their own lock around both.
#[derive(Debug, Default)]
pub struct StateCell {
    state: Mutex<ResourceState>,
}

impl StateCell {
    /// Creates a cell in the [`ResourceState::Unloaded`] state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the current state.
    pub fn get(&self) -> ResourceState {
        *self.state.lock().unwrap()
    }

    /// Moves the cell to `next`, or rejects the move if it is not legal.
    pub fn transition(&self, next: ResourceState) -> Result<(), StateError> {
        let mut state = self.state.lock().unwrap();
        if !state.can_transition_to(next) {
            return Err(StateError::IllegalTransition { from: *state, to: next });
        }
        *state = next;
        Ok(())
    }
}
