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

//! # Sable Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! for the resource lifecycle subsystem: the resource state machine, shared
//! ownership handles, the loader contract, and the error hierarchy.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resource;

pub use loader::{LoadCompletion, LoadTicket, ProgressFn, ResourceLoader};
pub use resource::{Resource, ResourceHandle, ResourceState, ResourceTypeId};
