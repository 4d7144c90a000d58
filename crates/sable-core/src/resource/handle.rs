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

use super::Resource;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A thread-safe, reference-counted handle to a managed resource.
///
/// This is the subsystem's smart pointer: cloning a handle increments the
/// shared count, dropping one decrements it, and moves never touch the
/// count. The resource is destroyed exactly when the last handle (including
/// the manager cache's own entry) is dropped; there is no tracing collector
/// and destruction timing is deterministic.
///
/// The count itself is a lock-free atomic and may be manipulated from any
/// thread. The pointed-to resource's other state is *not* synchronized by
/// the handle; that discipline belongs to the loader/manager protocol.
///
/// "Null" handles are not representable; every fallible lookup returns
/// `Option<ResourceHandle>` instead.
pub struct ResourceHandle(Arc<dyn Resource>);

impl ResourceHandle {
    /// Wraps a freshly created resource in its first handle.
    ///
    /// The returned handle is the sole owner: `ref_count() == 1` until it is
    /// cloned or handed to the cache.
    pub fn new<T: Resource>(resource: T) -> Self {
        Self(Arc::new(resource))
    }

    /// Wraps an already shared resource without changing its type.
    pub fn from_arc(resource: Arc<dyn Resource>) -> Self {
        Self(resource)
    }

    /// The number of live handles to this resource, the cache's included.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// `true` if both handles point at the same underlying resource.
    pub fn ptr_eq(&self, other: &ResourceHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Checked downcast to a concrete resource type.
    ///
    /// Returns `None` if the resource is not a `T`. The returned `Arc`
    /// shares ownership with this handle.
    pub fn downcast<T: Resource>(&self) -> Option<Arc<T>> {
        self.0.clone().as_any_arc().downcast::<T>().ok()
    }
}

impl Clone for ResourceHandle {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl Deref for ResourceHandle {
    type Target = dyn Resource;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("name", &self.0.name())
            .field("state", &self.0.state())
            .field("ref_count", &self.ref_count())
            .finish()
    }
}
