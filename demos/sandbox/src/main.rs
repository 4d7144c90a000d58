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

// Sable sandbox
// Generates a couple of throwaway asset files and drives them through the
// resource manager: sync load, cached re-load, queued async load, teardown.

use anyhow::{Context, Result};
use sable_agents::ResourceManager;
use sable_core::loader::ProgressFn;
use sable_core::resource::{Resource, ResourceTypeId};
use sable_lanes::{ShaderLoaderLane, ShaderResource, TextureLoaderLane, TextureResource};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

const SHADER_SRC: &str = "\
void main() {
    gl_FragColor = vec4(1.0, 0.5, 0.2, 1.0);
}
";

fn write_demo_png(path: &Path) -> Result<()> {
    let img = image::RgbaImage::from_fn(64, 64, |x, y| {
        let checker = ((x / 8 + y / 8) % 2) as u8;
        image::Rgba([200 * checker, 80, 255 - 200 * checker, 255])
    });
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let dir = tempfile::tempdir().context("Failed to create temp asset dir")?;
    log::info!("Sandbox asset dir: {}", dir.path().display());
    let texture_path = dir.path().join("checker.png");
    let shader_path = dir.path().join("tint.frag");
    write_demo_png(&texture_path)?;
    std::fs::write(&shader_path, SHADER_SRC)?;

    let manager = ResourceManager::new();
    manager.register_loader(TextureLoaderLane);
    manager.register_loader(ShaderLoaderLane);

    let progress: Arc<ProgressFn> = Arc::new(|fraction, message| {
        println!("  progress {:>3.0}% - {message}", fraction * 100.0);
    });

    // Blocking load, then a second request for the same name.
    println!("loading 'checker' synchronously:");
    let checker = manager
        .load_sync(
            "checker",
            &texture_path,
            ResourceTypeId::of::<TextureResource>(),
            Some(progress.clone()),
        )
        .context("texture load failed")?;
    let texture = checker
        .downcast::<TextureResource>()
        .context("not a texture resource")?;
    println!(
        "  '{}' loaded: {:?} px, {} source bytes, ref_count={}",
        checker.name(),
        texture.dimensions(),
        checker.size_bytes(),
        checker.ref_count()
    );

    let shared = manager
        .load_sync(
            "checker",
            &texture_path,
            ResourceTypeId::of::<TextureResource>(),
            None,
        )
        .context("cached load failed")?;
    println!(
        "  second request shares the instance: {} (ref_count={})",
        checker.ptr_eq(&shared),
        checker.ref_count()
    );

    // Queued async load, executed by update().
    println!("queueing 'tint' for async load:");
    let ticket = manager.load_async(
        "tint",
        &shader_path,
        ResourceTypeId::of::<ShaderResource>(),
        Some(progress),
    );
    println!("  before update(): cached = {}", manager.get_resource("tint").is_some());
    manager.update();
    let tint = ticket
        .try_take()
        .context("ticket not fulfilled after update()")?
        .context("shader load failed")?;
    let shader = tint
        .downcast::<ShaderResource>()
        .context("not a shader resource")?;
    println!(
        "  after update(): '{}' loaded, stage {:?}, {} bytes",
        tint.name(),
        shader.stage(),
        tint.size_bytes()
    );

    manager.unload_all();
    println!(
        "after unload_all(): cache empty = {}, checker state = {}",
        manager.is_empty(),
        checker.state()
    );
    Ok(())
}
