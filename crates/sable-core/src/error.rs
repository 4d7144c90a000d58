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

//! Defines the hierarchy of error types for the resource subsystem.
//!
//! Expected conditions (missing loader, a name already loading, an unknown
//! name) never escape the manager as panics; they are converted into
//! `Option`/no-op results plus a log line at the manager boundary. The
//! types here carry the diagnostic detail for those log lines and for
//! callers that use the lower-level APIs directly.

use crate::resource::{ResourceState, ResourceTypeId};
use std::fmt;

/// An illegal move in the resource state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// The requested transition is not part of the lifecycle relation.
    IllegalTransition {
        /// The state the resource was in.
        from: ResourceState,
        /// The state that was requested.
        to: ResourceState,
    },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::IllegalTransition { from, to } => {
                write!(f, "Illegal resource state transition {from} -> {to}")
            }
        }
    }
}

impl std::error::Error for StateError {}

/// A failure while resolving or executing a load request.
#[derive(Debug)]
pub enum LoadError {
    /// No loader is registered for the requested resource type.
    NoLoader {
        /// The type id the request asked for.
        type_id: ResourceTypeId,
    },
    /// The name already has a load in flight; the caller must retry later.
    AlreadyLoading {
        /// The contested cache key.
        name: String,
    },
    /// The loader reported a fault (I/O, decode, native construction).
    LoaderFailed {
        /// The cache key of the failed resource.
        name: String,
        /// The loader's diagnostic message.
        details: String,
    },
    /// The state machine was violated; indicates a bug in the orchestration.
    State(StateError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NoLoader { type_id } => {
                write!(f, "No loader registered for resource type {type_id}")
            }
            LoadError::AlreadyLoading { name } => {
                write!(f, "Resource '{name}' already has a load in flight")
            }
            LoadError::LoaderFailed { name, details } => {
                write!(f, "Loader failed for resource '{name}': {details}")
            }
            LoadError::State(err) => {
                write!(f, "Resource lifecycle violation: {err}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::State(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StateError> for LoadError {
    fn from(err: StateError) -> Self {
        LoadError::State(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn state_error_display() {
        let err = StateError::IllegalTransition {
            from: ResourceState::Unloaded,
            to: ResourceState::Loaded,
        };
        assert_eq!(
            format!("{err}"),
            "Illegal resource state transition Unloaded -> Loaded"
        );
    }

    #[test]
    fn load_error_display() {
        let err = LoadError::NoLoader {
            type_id: ResourceTypeId::from_raw(999),
        };
        assert_eq!(format!("{err}"), "No loader registered for resource type #999");

        let err = LoadError::LoaderFailed {
            name: "brick".to_string(),
            details: "decode failed".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Loader failed for resource 'brick': decode failed"
        );
    }

    #[test]
    fn load_error_wraps_state_error_as_source() {
        let state_err = StateError::IllegalTransition {
            from: ResourceState::Loading,
            to: ResourceState::Loading,
        };
        let err: LoadError = state_err.into();
        assert!(err.source().is_some());
        assert_eq!(
            format!("{err}"),
            "Resource lifecycle violation: Illegal resource state transition Loading -> Loading"
        );
    }
}
