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

//! # Sable Lanes
//!
//! Hot-path execution pipelines for resource loading: the concrete resource
//! subtypes (textures, shaders) and the loader lanes that decode them.

#![warn(missing_docs)]

pub mod resource_lane;

pub use resource_lane::{
    CpuTexture, ShaderLoaderLane, ShaderResource, ShaderSource, ShaderStage, TextureLoaderLane,
    TextureResource,
};
