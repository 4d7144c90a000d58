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

//! Concrete resource subtypes and their paired loader lanes.
//!
//! Each lane services exactly one resource subtype and is the only place
//! that subtype's payload is ever constructed; callers consume payloads
//! through read-only accessors on the resource.

mod shader_loader_lane;
mod texture_loader_lane;

pub use shader_loader_lane::*;
pub use texture_loader_lane::*;
