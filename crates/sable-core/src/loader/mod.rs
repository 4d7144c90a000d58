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

//! The per-type loader contract.
//!
//! A loader is the bridge between the resource manager and one concrete
//! resource subtype: one stateless loader instance services every resource
//! of that type. Loaders perform the actual I/O and payload construction;
//! they never touch the manager's cache or pending queue, and the lifecycle
//! state transitions are committed by the manager, not by the loader.

mod ticket;

pub use ticket::*;

use crate::resource::{Resource, ResourceHandle, ResourceTypeId};
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

/// Progress callback invoked by loaders at their discretion, possibly never.
///
/// The fraction lies in `[0, 1]`; the message is a short human-readable
/// phase description for UI and logs.
pub type ProgressFn = dyn Fn(f32, &str) + Send + Sync;

/// Invokes `progress` with a clamped fraction, if a callback was supplied.
pub fn report_progress(progress: Option<&Arc<ProgressFn>>, fraction: f32, message: &str) {
    if let Some(callback) = progress {
        callback(fraction.clamp(0.0, 1.0), message);
    }
}

/// The contract a per-type resource loader implements.
///
/// Implementations must be stateless with respect to individual resources:
/// everything a load produces lands in the resource itself, so the same
/// loader instance can serve concurrent loads of distinct resources.
pub trait ResourceLoader: Send + Sync + 'static {
    /// The subtype id of the resources this loader produces.
    fn resource_type_id(&self) -> ResourceTypeId;

    /// Creates an empty resource of this loader's subtype.
    ///
    /// The returned resource is in the `Unloaded` state and carries no
    /// payload; its first handle is the sole owner.
    fn create_resource(&self, name: &str, path: &Path) -> ResourceHandle;

    /// Blocking load: reads the source, constructs the payload, installs it
    /// on the resource, and records size/mtime bookkeeping.
    ///
    /// On failure the loader must clean up any partially constructed
    /// payload before returning; the caller commits the `Loaded`/`Failed`
    /// state transition based on the result.
    fn load_sync(
        &self,
        resource: &ResourceHandle,
        progress: Option<&Arc<ProgressFn>>,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Runs the equivalent of [`load_sync`](ResourceLoader::load_sync) on a
    /// worker thread, reporting completion through a [`LoadTicket`].
    ///
    /// This touches nothing but the resource itself; queueing and cache
    /// bookkeeping stay with the manager.
    fn load_async(
        self: Arc<Self>,
        resource: ResourceHandle,
        progress: Option<Arc<ProgressFn>>,
    ) -> LoadTicket<bool> {
        let (completion, ticket) = ticket::channel();
        std::thread::spawn(move || {
            let result = self.load_sync(&resource, progress.as_ref());
            if let Err(err) = &result {
                log::warn!("Async load of '{}' failed: {err}", resource.name());
            }
            completion.fulfill(result.is_ok());
        });
        ticket
    }

    /// Releases the resource's payload and clears its load bookkeeping.
    ///
    /// The manager only calls this on a loaded resource, but implementations
    /// must tolerate an already-released payload (idempotent no-op).
    fn unload(&self, resource: &ResourceHandle);

    /// Defensive liveness check: `true` if the payload is present and still
    /// usable (e.g., not invalidated by an external context reset).
    fn validate(&self, resource: &ResourceHandle) -> bool;
}
