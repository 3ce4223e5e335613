use std::path::Path;

use anyhow::Result;

use crate::args::Args;
use crate::render::RenderSystem;
use crate::resource::gltf::file::{FileSystemGltfAsset, FileSystemGltfLoader};
use crate::resource::gltf::GltfAsset;

pub mod args;
pub mod error;
pub mod render;
pub mod resource;

pub fn run(args: Args) -> Result<()> {
    env_logger::init();

    let mut render_system = pollster::block_on(RenderSystem::headless())?;

    let asset = FileSystemGltfAsset::from_path(Path::new(&args.gltf))?;
    let scene_id = args.scene.unwrap_or_else(|| asset.default_scene_id());
    let mut gltf_loader = FileSystemGltfLoader::new(&asset);

    let scene = render_system.load_scene(&asset, scene_id, args.instances, &mut gltf_loader)?;

    let stats = render_system.primitive_stats();
    log::info!("Render primitive factory after loading: {stats:?}");
    println!(
        "{} primitive requests served by {} render primitives ({} reused)",
        scene.render_primitives.len(),
        stats.live,
        stats.reused
    );

    for handle in scene.render_primitives.iter().take(1) {
        match render_system.render_primitive(*handle) {
            Some(primitive) => log::info!(
                "Backend record of {handle:?}: {:?} over indices {:?}",
                primitive.topology,
                primitive.index_range()
            ),
            None => log::error!("No backend record for loaded render primitive {handle:?}"),
        }
    }

    render_system.unload_scene(scene);
    render_system.terminate();

    log::info!(
        "Render primitive factory after unloading: {:?}",
        render_system.primitive_stats()
    );

    Ok(())
}
