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

//! Texture loading and decoding.

use anyhow::Context;
use sable_core::loader::{report_progress, ProgressFn, ResourceLoader};
use sable_core::resource::{Resource, ResourceCore, ResourceHandle, ResourceTypeId};
use std::any::Any;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// A decoded, CPU-resident texture payload in RGBA8 layout.
#[derive(Debug, Clone)]
pub struct CpuTexture {
    /// Tightly packed RGBA8 pixel data, row-major.
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A texture resource: lifecycle core plus an optional decoded payload.
///
/// Only ever constructed by [`TextureLoaderLane`]; consumers read the
/// payload through the accessors below.
#[derive(Debug)]
pub struct TextureResource {
    core: ResourceCore,
    texture: RwLock<Option<CpuTexture>>,
}

impl TextureResource {
    pub(crate) fn new(name: &str, path: &Path) -> Self {
        Self {
            core: ResourceCore::new(name, path, ResourceTypeId::of::<TextureResource>()),
            texture: RwLock::new(None),
        }
    }

    /// `(width, height)` of the decoded payload, if one is resident.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.texture
            .read()
            .unwrap()
            .as_ref()
            .map(|t| (t.width, t.height))
    }

    /// Runs `f` over the resident pixel data; `None` while unloaded.
    pub fn with_pixels<R>(&self, f: impl FnOnce(&[u8]) -> R) -> Option<R> {
        self.texture.read().unwrap().as_ref().map(|t| f(&t.pixels))
    }

    fn install(&self, texture: CpuTexture) {
        *self.texture.write().unwrap() = Some(texture);
    }

    fn take(&self) -> Option<CpuTexture> {
        self.texture.write().unwrap().take()
    }
}

impl Resource for TextureResource {
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

/// A lane dedicated to loading and decoding texture files on the CPU.
#[derive(Clone, Default)]
pub struct TextureLoaderLane;

impl ResourceLoader for TextureLoaderLane {
    fn resource_type_id(&self) -> ResourceTypeId {
        ResourceTypeId::of::<TextureResource>()
    }

    fn create_resource(&self, name: &str, path: &Path) -> ResourceHandle {
        ResourceHandle::new(TextureResource::new(name, path))
    }

    fn load_sync(
        &self,
        resource: &ResourceHandle,
        progress: Option<&Arc<ProgressFn>>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let texture = resource
            .downcast::<TextureResource>()
            .ok_or("resource handed to TextureLoaderLane is not a TextureResource")?;

        report_progress(progress, 0.25, "reading");
        let path = resource.path().to_path_buf();
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read texture file '{}'", path.display()))?;
        let modified = fs::metadata(&path).ok().and_then(|m| m.modified().ok());

        report_progress(progress, 0.75, "decoding");
        let img = image::load_from_memory(&bytes).context("Failed to decode image from memory")?;

        // Convert to RGBA8 (keep in sRGB space)
        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        texture.install(CpuTexture {
            pixels: rgba_img.into_raw(),
            width,
            height,
        });
        resource.core().set_load_info(bytes.len() as u64, modified);

        report_progress(progress, 1.0, "done");
        Ok(())
    }

    fn unload(&self, resource: &ResourceHandle) {
        if let Some(texture) = resource.downcast::<TextureResource>() {
            if texture.take().is_some() {
                log::debug!("Released texture payload of '{}'", resource.name());
            }
            resource.core().clear_load_info();
        }
    }

    fn validate(&self, resource: &ResourceHandle) -> bool {
        resource
            .downcast::<TextureResource>()
            .and_then(|t| t.dimensions())
            .is_some_and(|(w, h)| w > 0 && h > 0)
    }
}
