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

//! The [`ResourceManager`]: name-keyed cache, loader registry, and load
//! orchestration.
//!
//! Any number of caller threads may use [`load_sync`](ResourceManager::load_sync),
//! [`get_resource`](ResourceManager::get_resource), and
//! [`unload_resource`](ResourceManager::unload_resource); one thread
//! (conventionally the owning one) drains queued async requests with
//! [`update`](ResourceManager::update). Cache and registry bookkeeping
//! happen under a single manager lock, but the lock is *not* held across a
//! loader's blocking I/O: a `Loading` cache marker inserted under the lock
//! keeps the at-most-one-load-per-name invariant while unrelated loads
//! proceed in parallel.

use crossbeam_channel::{Receiver, Sender};
use sable_core::error::{LoadError, StateError};
use sable_core::loader::{self, LoadCompletion, LoadTicket, ProgressFn, ResourceLoader};
use sable_core::resource::{Resource, ResourceHandle, ResourceState, ResourceTypeId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A queued async load request, executed by [`ResourceManager::update`].
struct PendingLoad {
    name: String,
    path: PathBuf,
    type_id: ResourceTypeId,
    progress: Option<Arc<ProgressFn>>,
    completion: LoadCompletion<Option<ResourceHandle>>,
}

/// Cache and registry state guarded by the manager lock.
struct ManagerInner {
    cache: HashMap<String, ResourceHandle>,
    loaders: HashMap<ResourceTypeId, Arc<dyn ResourceLoader>>,
}

impl ManagerInner {
    /// Winds an entry down and erases it. `evict_busy` controls whether a
    /// `Loading`/`Unloading` entry is forcibly evicted (shutdown) or left
    /// alone (normal unload, to keep the one-load-per-name invariant).
    fn unload_entry(&mut self, name: &str, evict_busy: bool) {
        let Some(resource) = self.cache.get(name).cloned() else {
            return;
        };
        match resource.state() {
            ResourceState::Loaded => {
                if let Err(err) = resource.core().transition(ResourceState::Unloading) {
                    log::error!("Unload of '{name}': {err}");
                } else {
                    match self.loaders.get(&resource.resource_type_id()) {
                        Some(loader) => loader.unload(&resource),
                        None => log::warn!(
                            "No loader registered for type {} while unloading '{name}'; skipping payload release",
                            resource.resource_type_id()
                        ),
                    }
                    if let Err(err) = resource.core().transition(ResourceState::Unloaded) {
                        log::error!("Unload of '{name}': {err}");
                    }
                }
            }
            ResourceState::Failed => {
                // Failed resources hold no payload; just wind the state down.
                let _ = resource.core().transition(ResourceState::Unloading);
                let _ = resource.core().transition(ResourceState::Unloaded);
            }
            ResourceState::Loading | ResourceState::Unloading => {
                if !evict_busy {
                    log::warn!(
                        "Ignoring unload of '{name}' while it is {}",
                        resource.state()
                    );
                    return;
                }
                log::warn!("Evicting '{name}' while it is {}", resource.state());
            }
            ResourceState::Unloaded => {}
        }
        self.cache.remove(name);
        log::info!("Unloaded resource '{name}'");
    }
}

/// Outcome of the cache/registry bookkeeping that precedes a load.
enum BeginLoad {
    /// The name is cached, loaded, and live; share the existing instance.
    AlreadyLoaded(ResourceHandle),
    /// A `Loading` marker is in the cache; the caller runs the loader.
    Started {
        resource: ResourceHandle,
        loader: Arc<dyn ResourceLoader>,
    },
}

/// Sole authority over the name→resource cache and type→loader registry.
///
/// The cache entry for a name is itself one ownership reference: a resource
/// is destroyed only after its entry is erased *and* every external handle
/// has been dropped.
pub struct ResourceManager {
    inner: Mutex<ManagerInner>,
    pending_tx: Sender<PendingLoad>,
    pending_rx: Receiver<PendingLoad>,
}

impl ResourceManager {
    /// Creates a manager with an empty cache and registry.
    #[must_use]
    pub fn new() -> Self {
        let (pending_tx, pending_rx) = crossbeam_channel::unbounded();
        Self {
            inner: Mutex::new(ManagerInner {
                cache: HashMap::new(),
                loaders: HashMap::new(),
            }),
            pending_tx,
            pending_rx,
        }
    }

    /// Registers a loader, taking ownership of it.
    ///
    /// Replacing an existing loader for the same type is allowed; subsequent
    /// loads of that type use the new loader.
    pub fn register_loader(&self, loader: impl ResourceLoader) {
        let loader: Arc<dyn ResourceLoader> = Arc::new(loader);
        let type_id = loader.resource_type_id();
        let mut inner = self.inner.lock().unwrap();
        if inner.loaders.insert(type_id, loader).is_some() {
            log::warn!("Replacing loader for resource type {type_id}");
        }
    }

    /// Blocking load of `name` from `path` via the loader registered for
    /// `type_id`.
    ///
    /// - cached and loaded: returns the existing instance unchanged;
    /// - cached and currently loading: returns `None` immediately (the
    ///   caller retries later);
    /// - no loader registered for `type_id`: returns `None`, cache untouched;
    /// - otherwise runs the loader; on success the resource is cached and
    ///   returned, on failure the cache entry is removed and `None` is
    ///   returned.
    pub fn load_sync(
        &self,
        name: &str,
        path: impl AsRef<Path>,
        type_id: ResourceTypeId,
        progress: Option<Arc<ProgressFn>>,
    ) -> Option<ResourceHandle> {
        match self.begin_load(name, path.as_ref(), type_id) {
            Ok(BeginLoad::AlreadyLoaded(handle)) => Some(handle),
            Ok(BeginLoad::Started { resource, loader }) => {
                self.finish_load(name, resource, loader, progress.as_ref())
            }
            Err(err @ LoadError::AlreadyLoading { .. }) => {
                log::debug!("{err}");
                None
            }
            Err(err) => {
                log::warn!("Load of '{name}' rejected: {err}");
                None
            }
        }
    }

    /// Enqueues a load request and returns its ticket immediately.
    ///
    /// The request is only *executed* when [`update`](ResourceManager::update)
    /// runs; until then [`get_resource`](ResourceManager::get_resource) does
    /// not see the name. There is no cancellation: every enqueued request
    /// runs to completion and fulfills its ticket, with `None` on failure.
    pub fn load_async(
        &self,
        name: &str,
        path: impl AsRef<Path>,
        type_id: ResourceTypeId,
        progress: Option<Arc<ProgressFn>>,
    ) -> LoadTicket<Option<ResourceHandle>> {
        let (completion, ticket) = loader::channel();
        let request = PendingLoad {
            name: name.to_string(),
            path: path.as_ref().to_path_buf(),
            type_id,
            progress,
            completion,
        };
        if self.pending_tx.send(request).is_err() {
            // Both channel ends live inside self, so this cannot happen
            // while the manager is alive.
            log::error!("Pending-load queue is disconnected; dropping request for '{name}'");
        }
        ticket
    }

    /// Drains the pending async queue in FIFO order on the calling thread,
    /// fulfilling each request's ticket with the load result.
    pub fn update(&self) {
        while let Ok(request) = self.pending_rx.try_recv() {
            let PendingLoad {
                name,
                path,
                type_id,
                progress,
                completion,
            } = request;
            let result = self.load_sync(&name, &path, type_id, progress);
            completion.fulfill(result);
        }
    }

    /// Cache lookup only; never triggers a load.
    #[must_use]
    pub fn get_resource(&self, name: &str) -> Option<ResourceHandle> {
        self.inner.lock().unwrap().cache.get(name).cloned()
    }

    /// Unloads `name` and erases its cache entry, releasing the cache's
    /// ownership reference; the resource survives iff external handles are
    /// still outstanding. No-op for unknown names.
    pub fn unload_resource(&self, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        if !inner.cache.contains_key(name) {
            log::debug!("Unload of unknown resource '{name}'");
            return;
        }
        inner.unload_entry(name, false);
    }

    /// Unloads and erases every cached entry.
    ///
    /// Failures are isolated per resource: an entry whose loader has been
    /// unregistered skips the payload release but is still removed, and no
    /// single entry stops the teardown of the rest.
    pub fn unload_all(&self) {
        let mut inner = self.inner.lock().unwrap();
        let mut names: Vec<String> = inner.cache.keys().cloned().collect();
        names.sort(); // deterministic teardown order for logs
        for name in names {
            inner.unload_entry(&name, true);
        }
        log::info!("Unloaded all resources");
    }

    /// Number of cached resources.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.inner.lock().unwrap().cache.len()
    }

    /// `true` if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().cache.is_empty()
    }

    /// Number of registered loaders.
    #[must_use]
    pub fn loader_count(&self) -> usize {
        self.inner.lock().unwrap().loaders.len()
    }

    /// Approximate number of queued async requests not yet executed.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending_rx.len()
    }

    /// Cache/registry bookkeeping before the loader runs; holds the lock.
    fn begin_load(
        &self,
        name: &str,
        path: &Path,
        type_id: ResourceTypeId,
    ) -> Result<BeginLoad, LoadError> {
        let mut inner = self.inner.lock().unwrap();
        let loader = inner
            .loaders
            .get(&type_id)
            .cloned()
            .ok_or(LoadError::NoLoader { type_id })?;

        let resource = match inner.cache.get(name).cloned() {
            Some(existing) => {
                if existing.resource_type_id() != type_id {
                    return Err(LoadError::LoaderFailed {
                        name: name.to_string(),
                        details: format!(
                            "already cached under resource type {}",
                            existing.resource_type_id()
                        ),
                    });
                }
                match existing.state() {
                    ResourceState::Loading | ResourceState::Unloading => {
                        return Err(LoadError::AlreadyLoading {
                            name: name.to_string(),
                        });
                    }
                    ResourceState::Loaded => {
                        if loader.validate(&existing) {
                            return Ok(BeginLoad::AlreadyLoaded(existing));
                        }
                        log::warn!("Cached resource '{name}' failed validation; reloading");
                        existing.core().transition(ResourceState::Unloading)?;
                        loader.unload(&existing);
                        existing.core().transition(ResourceState::Unloaded)?;
                        existing
                    }
                    // A prior failed or unloaded entry is reused for retry.
                    ResourceState::Unloaded | ResourceState::Failed => existing,
                }
            }
            None => loader.create_resource(name, path),
        };

        drive_to_loading(&resource)?;
        inner.cache.insert(name.to_string(), resource.clone());
        Ok(BeginLoad::Started { resource, loader })
    }

    /// Runs the loader without the manager lock, then commits the result.
    fn finish_load(
        &self,
        name: &str,
        resource: ResourceHandle,
        loader: Arc<dyn ResourceLoader>,
        progress: Option<&Arc<ProgressFn>>,
    ) -> Option<ResourceHandle> {
        let result = loader.load_sync(&resource, progress);

        let mut inner = self.inner.lock().unwrap();
        match result {
            Ok(()) => {
                if let Err(err) = resource.core().transition(ResourceState::Loaded) {
                    log::error!("Load of '{name}' could not be committed: {err}");
                    inner.cache.remove(name);
                    return None;
                }
                if !entry_is(&inner, name, &resource) {
                    log::debug!("Cache entry for '{name}' was evicted while its load was in flight");
                }
                log::info!("Loaded resource '{name}' ({} bytes)", resource.size_bytes());
                Some(resource)
            }
            Err(err) => {
                let err = LoadError::LoaderFailed {
                    name: name.to_string(),
                    details: err.to_string(),
                };
                log::warn!("{err}");
                if let Err(state_err) = resource.core().transition(ResourceState::Failed) {
                    log::error!("Load of '{name}': {state_err}");
                }
                if entry_is(&inner, name, &resource) {
                    inner.cache.remove(name);
                }
                None
            }
        }
    }
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

/// `true` if the cache entry for `name` is this exact resource instance.
fn entry_is(inner: &ManagerInner, name: &str, resource: &ResourceHandle) -> bool {
    inner
        .cache
        .get(name)
        .is_some_and(|entry| entry.ptr_eq(resource))
}

/// Drives a reused or fresh resource through the legal chain to `Loading`.
fn drive_to_loading(resource: &ResourceHandle) -> Result<(), StateError> {
    loop {
        match resource.state() {
            ResourceState::Unloaded => {
                return resource.core().transition(ResourceState::Loading);
            }
            ResourceState::Loaded | ResourceState::Failed => {
                resource.core().transition(ResourceState::Unloading)?;
            }
            ResourceState::Unloading => {
                resource.core().transition(ResourceState::Unloaded)?;
            }
            ResourceState::Loading => {
                return Err(StateError::IllegalTransition {
                    from: ResourceState::Loading,
                    to: ResourceState::Loading,
                });
            }
        }
    }
}
