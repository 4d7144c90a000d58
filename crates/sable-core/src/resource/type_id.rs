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

//! Process-wide stable identifiers for resource subtypes.
//!
//! Loader dispatch is keyed by [`ResourceTypeId`] rather than by
//! [`std::any::TypeId`] directly, so the id is a small, ordered, displayable
//! value that can appear in logs and wire formats. Ids are handed out by a
//! monotonic counter on first use per type and are stable for the lifetime
//! of the process; they are not stable across runs.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, OnceLock};

/// A stable per-subtype identifier used to pair resources with their loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceTypeId(u32);

static NEXT_ID: AtomicU32 = AtomicU32::new(1);

fn registry() -> &'static Mutex<HashMap<TypeId, ResourceTypeId>> {
    static REGISTRY: OnceLock<Mutex<HashMap<TypeId, ResourceTypeId>>> = OnceLock::new();
    REGISTRY.get_or_init(Default::default)
}

impl ResourceTypeId {
    /// Returns the id for `T`, allocating one on first use.
    ///
    /// Every call with the same `T` returns the same id; distinct types get
    /// distinct ids.
    pub fn of<T: 'static>() -> Self {
        let mut map = registry().lock().unwrap();
        *map.entry(TypeId::of::<T>())
            .or_insert_with(|| ResourceTypeId(NEXT_ID.fetch_add(1, Ordering::Relaxed)))
    }

    /// Builds an id from its raw value.
    ///
    /// Intended for diagnostics and tests; an id built this way is only
    /// meaningful if it was previously produced by [`ResourceTypeId::of`].
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw numeric value of this id.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ResourceTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
