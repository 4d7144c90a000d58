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

use anyhow::Result;
use sable_agents::ResourceManager;
use sable_core::loader::{ProgressFn, ResourceLoader};
use sable_core::resource::{Resource, ResourceCore, ResourceHandle, ResourceState, ResourceTypeId};
use sable_lanes::{ShaderLoaderLane, ShaderResource, ShaderStage, TextureLoaderLane, TextureResource};
use std::any::Any;
use std::error::Error;
use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};
use tempfile::tempdir;

fn write_test_png(path: &Path, width: u32, height: u32) -> Result<()> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn texture_type() -> ResourceTypeId {
    ResourceTypeId::of::<TextureResource>()
}

fn shader_type() -> ResourceTypeId {
    ResourceTypeId::of::<ShaderResource>()
}

#[test]
fn scenario_a_texture_sync_load_identity_and_unload() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("brick.png");
    write_test_png(&path, 8, 8)?;

    let manager = ResourceManager::new();
    manager.register_loader(TextureLoaderLane);

    let brick = manager
        .load_sync("brick", &path, texture_type(), None)
        .expect("texture load should succeed");
    assert_eq!(brick.state(), ResourceState::Loaded);
    assert_eq!(
        brick.downcast::<TextureResource>().unwrap().dimensions(),
        Some((8, 8))
    );

    let again = manager
        .load_sync("brick", &path, texture_type(), None)
        .expect("cached load should succeed");
    assert!(brick.ptr_eq(&again));

    manager.unload_resource("brick");
    assert!(manager.get_resource("brick").is_none());
    Ok(())
}

#[test]
fn scenario_b_async_load_is_driven_by_update() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("big.png");
    write_test_png(&path, 16, 16)?;

    let manager = ResourceManager::new();
    manager.register_loader(TextureLoaderLane);

    let ticket = manager.load_async("big", &path, texture_type(), None);
    assert!(manager.get_resource("big").is_none());
    assert!(!ticket.is_ready());

    manager.update();

    let handle = ticket
        .try_take()
        .expect("ticket must be fulfilled after update()")
        .expect("async load should succeed");
    assert_eq!(handle.state(), ResourceState::Loaded);
    let cached = manager.get_resource("big").expect("resource must be cached");
    assert!(cached.ptr_eq(&handle));
    Ok(())
}

#[test]
fn scenario_c_unknown_type_id_is_rejected_without_cache_mutation() {
    let manager = ResourceManager::new();
    manager.register_loader(TextureLoaderLane);

    let before = manager.resource_count();
    let result = manager.load_sync("missing", "x", ResourceTypeId::from_raw(999), None);
    assert!(result.is_none());
    assert_eq!(manager.resource_count(), before);
}

#[test]
fn ref_counts_track_cache_plus_external_holders() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("counted.png");
    write_test_png(&path, 2, 2)?;

    let manager = ResourceManager::new();
    manager.register_loader(TextureLoaderLane);

    let first = manager
        .load_sync("counted", &path, texture_type(), None)
        .unwrap();
    // one external handle plus the cache's own reference
    assert_eq!(first.ref_count(), 2);

    let second = first.clone();
    let third = manager.get_resource("counted").unwrap();
    assert_eq!(first.ref_count(), 4);

    drop(second);
    assert_eq!(first.ref_count(), 3);
    drop(third);

    manager.unload_resource("counted");
    assert_eq!(first.ref_count(), 1);
    assert_eq!(first.state(), ResourceState::Unloaded);
    Ok(())
}

#[test]
fn unload_all_empties_an_arbitrary_population() -> Result<()> {
    let dir = tempdir()?;
    let manager = ResourceManager::new();
    manager.register_loader(TextureLoaderLane);
    manager.register_loader(ShaderLoaderLane);

    for i in 0..5 {
        let path = dir.path().join(format!("tex{i}.png"));
        write_test_png(&path, 2, 2)?;
        manager
            .load_sync(&format!("tex{i}"), &path, texture_type(), None)
            .unwrap();
    }
    let shader_path = dir.path().join("basic.frag");
    std::fs::write(&shader_path, "void main() {}\n")?;
    let shader = manager
        .load_sync("basic", &shader_path, shader_type(), None)
        .unwrap();
    assert_eq!(manager.resource_count(), 6);

    manager.unload_all();
    assert!(manager.is_empty());
    // Survivors held externally are unloaded but alive.
    assert_eq!(shader.state(), ResourceState::Unloaded);
    assert!(shader
        .downcast::<ShaderResource>()
        .unwrap()
        .stage()
        .is_none());
    Ok(())
}

#[test]
fn shader_lane_loads_through_the_manager() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("basic.vert");
    std::fs::write(&path, "void main() { gl_Position = vec4(0.0); }\n")?;

    let manager = ResourceManager::new();
    manager.register_loader(ShaderLoaderLane);

    let handle = manager
        .load_sync("basic", &path, shader_type(), None)
        .expect("shader load should succeed");
    let shader = handle.downcast::<ShaderResource>().unwrap();
    assert_eq!(shader.stage(), Some(ShaderStage::Vertex));
    assert!(handle.size_bytes() > 0);
    Ok(())
}

#[test]
fn progress_callbacks_reach_the_caller() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("seen.png");
    write_test_png(&path, 2, 2)?;

    let manager = ResourceManager::new();
    manager.register_loader(TextureLoaderLane);

    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    let progress: Arc<ProgressFn> = Arc::new(move |fraction, message| {
        assert!((0.0..=1.0).contains(&fraction));
        sink.lock().unwrap().push(message.to_string());
    });

    manager
        .load_sync("seen", &path, texture_type(), Some(progress))
        .unwrap();
    assert!(!messages.lock().unwrap().is_empty());
    Ok(())
}

// --- Concurrency: a gated loader that blocks until released ---

struct GatedBlob {
    core: ResourceCore,
    payload: RwLock<Option<Vec<u8>>>,
}

impl Resource for GatedBlob {
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

struct GatedLoader {
    started_tx: crossbeam_channel::Sender<()>,
    release_rx: crossbeam_channel::Receiver<()>,
}

impl ResourceLoader for GatedLoader {
    fn resource_type_id(&self) -> ResourceTypeId {
        ResourceTypeId::of::<GatedBlob>()
    }

    fn create_resource(&self, name: &str, path: &Path) -> ResourceHandle {
        ResourceHandle::new(GatedBlob {
            core: ResourceCore::new(name, path, self.resource_type_id()),
            payload: RwLock::new(None),
        })
    }

    fn load_sync(
        &self,
        resource: &ResourceHandle,
        _progress: Option<&Arc<ProgressFn>>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.started_tx.send(()).ok();
        self.release_rx
            .recv()
            .map_err(|_| "gate closed before release")?;
        let blob = resource.downcast::<GatedBlob>().ok_or("not a GatedBlob")?;
        *blob.payload.write().unwrap() = Some(vec![1, 2, 3]);
        resource.core().set_load_info(3, None);
        Ok(())
    }

    fn unload(&self, resource: &ResourceHandle) {
        if let Some(blob) = resource.downcast::<GatedBlob>() {
            blob.payload.write().unwrap().take();
            resource.core().clear_load_info();
        }
    }

    fn validate(&self, resource: &ResourceHandle) -> bool {
        resource
            .downcast::<GatedBlob>()
            .is_some_and(|blob| blob.payload.read().unwrap().is_some())
    }
}

fn gated_type() -> ResourceTypeId {
    ResourceTypeId::of::<GatedBlob>()
}

#[test]
fn concurrent_load_of_same_name_returns_none_while_in_flight() {
    let (started_tx, started_rx) = crossbeam_channel::unbounded();
    let (release_tx, release_rx) = crossbeam_channel::unbounded();

    let manager = Arc::new(ResourceManager::new());
    manager.register_loader(GatedLoader {
        started_tx,
        release_rx,
    });

    let background = {
        let manager = manager.clone();
        std::thread::spawn(move || manager.load_sync("contested", "c.blob", gated_type(), None))
    };

    // Wait until the loader is inside its blocking phase, then re-enter.
    started_rx.recv().unwrap();
    let reentrant = manager.load_sync("contested", "c.blob", gated_type(), None);
    assert!(reentrant.is_none());

    release_tx.send(()).unwrap();
    let first = background.join().unwrap().expect("first load should win");
    assert_eq!(first.state(), ResourceState::Loaded);

    // Once the first load committed, the same instance is shared.
    let after = manager
        .load_sync("contested", "c.blob", gated_type(), None)
        .unwrap();
    assert!(first.ptr_eq(&after));
}

#[test]
fn unrelated_load_proceeds_while_another_is_blocked_on_io() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("free.png");
    write_test_png(&path, 2, 2)?;

    let (started_tx, started_rx) = crossbeam_channel::unbounded();
    let (release_tx, release_rx) = crossbeam_channel::unbounded();

    let manager = Arc::new(ResourceManager::new());
    manager.register_loader(GatedLoader {
        started_tx,
        release_rx,
    });
    manager.register_loader(TextureLoaderLane);

    let background = {
        let manager = manager.clone();
        std::thread::spawn(move || manager.load_sync("slow", "s.blob", gated_type(), None))
    };

    // The gated load is parked inside its I/O phase. If the manager held
    // its lock across the loader call, this texture load would deadlock.
    started_rx.recv().unwrap();
    let texture = manager.load_sync("free", &path, texture_type(), None);
    assert!(texture.is_some());

    release_tx.send(()).unwrap();
    assert!(background.join().unwrap().is_some());
    assert_eq!(manager.resource_count(), 2);
    Ok(())
}
