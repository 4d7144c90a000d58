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

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::SystemTime};

/// A serializable snapshot of a resource's identity and load bookkeeping.
///
/// This is the "identity card" of a resource: everything the manager and
/// tooling need to reason about a resource without touching its payload.
/// `size_bytes` and `last_modified` are recorded by the loader during a
/// successful load and cleared again on unload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    /// The cache key under which the resource is registered.
    pub name: String,

    /// The path to the source file the payload is produced from.
    pub path: PathBuf,

    /// Size of the source data in bytes; `0` while unloaded.
    pub size_bytes: u64,

    /// Modification time of the source file at load time, if the
    /// filesystem reported one.
    pub last_modified: Option<SystemTime>,
}

impl ResourceMetadata {
    /// Creates metadata for a resource that has never been loaded.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size_bytes: 0,
            last_modified: None,
        }
    }
}
