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

//! The resource model: trait, embedded lifecycle core, handle, and ids.
//!
//! This module defines the "common language" for all resource-related
//! operations. A concrete resource type embeds a [`ResourceCore`] (metadata
//! plus the state machine), implements the [`Resource`] trait, and is shared
//! through [`ResourceHandle`]s. The module has no knowledge of how payloads
//! are produced; that belongs to the loader lanes.

mod handle;
mod metadata;
mod state;
mod type_id;

pub use handle::*;
pub use metadata::*;
pub use state::*;
pub use type_id::*;

use crate::error::StateError;
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// The embedded lifecycle base every concrete resource owns.
///
/// Name, path, and type id are fixed at construction. The state cell and the
/// load bookkeeping (`size_bytes`, `last_modified`) are the only mutable
/// parts; both are written exclusively while a load or unload is in flight,
/// under the orchestrating manager's serialization per name.
#[derive(Debug)]
pub struct ResourceCore {
    name: String,
    path: PathBuf,
    type_id: ResourceTypeId,
    state: StateCell,
    size_bytes: AtomicU64,
    last_modified: Mutex<Option<SystemTime>>,
}

impl ResourceCore {
    /// Creates a core in the [`ResourceState::Unloaded`] state.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, type_id: ResourceTypeId) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            type_id,
            state: StateCell::new(),
            size_bytes: AtomicU64::new(0),
            last_modified: Mutex::new(None),
        }
    }

    /// The cache key of this resource.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source path of this resource.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The subtype id used for loader dispatch.
    pub fn type_id(&self) -> ResourceTypeId {
        self.type_id
    }

    /// A snapshot of the current lifecycle state.
    pub fn state(&self) -> ResourceState {
        self.state.get()
    }

    /// Drives the state machine to `next`, rejecting illegal transitions.
    pub fn transition(&self, next: ResourceState) -> Result<(), StateError> {
        self.state.transition(next)
    }

    /// Size of the source data recorded by the last successful load.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes.load(Ordering::Relaxed)
    }

    /// Source modification time recorded by the last successful load.
    pub fn last_modified(&self) -> Option<SystemTime> {
        *self.last_modified.lock().unwrap()
    }

    /// Records load bookkeeping. Called by the loader on success.
    pub fn set_load_info(&self, size_bytes: u64, last_modified: Option<SystemTime>) {
        self.size_bytes.store(size_bytes, Ordering::Relaxed);
        *self.last_modified.lock().unwrap() = last_modified;
    }

    /// Resets load bookkeeping to defaults. Idempotent; called on unload.
    pub fn clear_load_info(&self) {
        self.size_bytes.store(0, Ordering::Relaxed);
        *self.last_modified.lock().unwrap() = None;
    }

    /// A serializable snapshot of the resource's identity and bookkeeping.
    pub fn metadata(&self) -> ResourceMetadata {
        ResourceMetadata {
            name: self.name.clone(),
            path: self.path.clone(),
            size_bytes: self.size_bytes(),
            last_modified: self.last_modified(),
        }
    }
}

/// The contract every managed resource type implements.
///
/// The supertraits enforce the guarantees the rest of the subsystem relies
/// on: `Send + Sync` so handles can be shared and loads can run off-thread,
/// and `'static` so resources can be cached for the lifetime of the process.
///
/// Implementors embed a [`ResourceCore`] and expose it through
/// [`core`](Resource::core); the metadata and state accessors are provided
/// on top of it. Payload accessors are subtype-specific and read-only;
/// payloads are only ever installed by the paired loader.
pub trait Resource: Send + Sync + 'static {
    /// The embedded lifecycle core.
    fn core(&self) -> &ResourceCore;

    /// Upcast for checked reference downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for checked shared-ownership downcasting.
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// The cache key of this resource.
    fn name(&self) -> &str {
        self.core().name()
    }

    /// The source path of this resource.
    fn path(&self) -> &Path {
        self.core().path()
    }

    /// The subtype id used for loader dispatch.
    fn resource_type_id(&self) -> ResourceTypeId {
        self.core().type_id()
    }

    /// A snapshot of the current lifecycle state.
    fn state(&self) -> ResourceState {
        self.core().state()
    }

    /// `true` if the resource currently holds a usable payload.
    fn is_loaded(&self) -> bool {
        self.state() == ResourceState::Loaded
    }

    /// Size of the source data recorded by the last successful load.
    fn size_bytes(&self) -> u64 {
        self.core().size_bytes()
    }

    /// Source modification time recorded by the last successful load.
    fn last_modified(&self) -> Option<SystemTime> {
        self.core().last_modified()
    }
}
