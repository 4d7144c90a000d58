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

//! Shader source loading.

use anyhow::Context;
use sable_core::loader::{report_progress, ProgressFn, ResourceLoader};
use sable_core::resource::{Resource, ResourceCore, ResourceHandle, ResourceTypeId};
use std::any::Any;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// The pipeline stage a shader source targets, inferred from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex stage (`.vert`, `.vs`).
    Vertex,
    /// Fragment stage (`.frag`, `.fs`).
    Fragment,
    /// Compute stage (`.comp`, `.cs`).
    Compute,
    /// Extension did not identify a stage.
    Unknown,
}

impl ShaderStage {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("vert") | Some("vs") => ShaderStage::Vertex,
            Some("frag") | Some("fs") => ShaderStage::Fragment,
            Some("comp") | Some("cs") => ShaderStage::Compute,
            _ => ShaderStage::Unknown,
        }
    }
}

/// A loaded shader payload: the UTF-8 source and its inferred stage.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    /// The shader source text.
    pub source: String,
    /// The stage inferred from the file name.
    pub stage: ShaderStage,
}

/// A shader resource: lifecycle core plus an optional source payload.
///
/// Only ever constructed by [`ShaderLoaderLane`].
#[derive(Debug)]
pub struct ShaderResource {
    core: ResourceCore,
    shader: RwLock<Option<ShaderSource>>,
}

impl ShaderResource {
    pub(crate) fn new(name: &str, path: &Path) -> Self {
        Self {
            core: ResourceCore::new(name, path, ResourceTypeId::of::<ShaderResource>()),
            shader: RwLock::new(None),
        }
    }

    /// The stage of the resident payload, if one is loaded.
    pub fn stage(&self) -> Option<ShaderStage> {
        self.shader.read().unwrap().as_ref().map(|s| s.stage)
    }

    /// Runs `f` over the resident source text; `None` while unloaded.
    pub fn with_source<R>(&self, f: impl FnOnce(&str) -> R) -> Option<R> {
        self.shader.read().unwrap().as_ref().map(|s| f(&s.source))
    }

    fn install(&self, shader: ShaderSource) {
        *self.shader.write().unwrap() = Some(shader);
    }

    fn take(&self) -> Option<ShaderSource> {
        self.shader.write().unwrap().take()
    }
}

impl Resource for ShaderResource {
    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A lane dedicated to loading shader source files.
#[derive(Clone, Default)]
pub struct ShaderLoaderLane;

impl ResourceLoader for ShaderLoaderLane {
    fn resource_type_id(&self) -> ResourceTypeId {
        ResourceTypeId::of::<ShaderResource>()
    }

    fn create_resource(&self, name: &str, path: &Path) -> ResourceHandle {
        ResourceHandle::new(ShaderResource::new(name, path))
    }

    fn load_sync(
        &self,
        resource: &ResourceHandle,
        progress: Option<&Arc<ProgressFn>>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let shader = resource
            .downcast::<ShaderResource>()
            .ok_or("resource handed to ShaderLoaderLane is not a ShaderResource")?;

        report_progress(progress, 0.5, "reading");
        let path = resource.path().to_path_buf();
        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read shader source '{}'", path.display()))?;
        if source.trim().is_empty() {
            return Err(format!("Shader source '{}' is empty", path.display()).into());
        }
        let modified = fs::metadata(&path).ok().and_then(|m| m.modified().ok());

        let size = source.len() as u64;
        shader.install(ShaderSource {
            source,
            stage: ShaderStage::from_path(&path),
        });
        resource.core().set_load_info(size, modified);

        report_progress(progress, 1.0, "done");
        Ok(())
    }

    fn unload(&self, resource: &ResourceHandle) {
        if let Some(shader) = resource.downcast::<ShaderResource>() {
            if shader.take().is_some() {
                log::debug!("Released shader payload of '{}'", resource.name());
            }
            resource.core().clear_load_info();
        }
    }

    fn validate(&self, resource: &ResourceHandle) -> bool {
        resource
            .downcast::<ShaderResource>()
            .and_then(|s| s.with_source(|src| !src.is_empty()))
            .unwrap_or(false)
    }
}
