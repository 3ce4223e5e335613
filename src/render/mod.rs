use anyhow::Result;

use crate::render::factory::{PrimitiveFactory, PrimitiveFactoryStats};
use crate::render::handle::RenderPrimitiveHandle;
use crate::render::primitive::RenderPrimitive;
use crate::render::scene::{LoadedScene, SceneLoader};
use crate::render::state::RenderSystemState;
use crate::render::storage::RenderSystemStorage;
use crate::resource::gltf::{GltfAsset, GltfLoader};

pub mod buffer;
pub mod driver;
pub mod factory;
pub mod handle;
pub mod primitive;
pub mod scene;
pub mod state;
pub mod storage;

/// Owns the GPU device, every backend resource created on it, and the factory
/// that shares render primitives between callers.
pub struct RenderSystem {
    state: RenderSystemState,
    storage: RenderSystemStorage,
    primitive_factory: PrimitiveFactory,
}

impl RenderSystem {
    pub async fn headless() -> Result<Self> {
        let state = RenderSystemState::headless().await?;

        Ok(Self {
            state,
            storage: Default::default(),
            primitive_factory: PrimitiveFactory::new(),
        })
    }

    pub fn render_primitive(&self, handle: RenderPrimitiveHandle) -> Option<&RenderPrimitive> {
        self.storage.render_primitive(handle)
    }

    pub fn primitive_stats(&self) -> PrimitiveFactoryStats {
        self.primitive_factory.stats()
    }

    pub fn load_scene<T: GltfLoader>(
        &mut self,
        asset: &impl GltfAsset,
        scene_id: usize,
        instances: u32,
        gltf_loader: &mut T,
    ) -> Result<LoadedScene> {
        let scene = asset.get_scene(scene_id)?;

        SceneLoader::load(
            &self.state,
            &mut self.storage,
            &mut self.primitive_factory,
            gltf_loader,
            &scene,
            instances,
        )
    }

    pub fn unload_scene(&mut self, scene: LoadedScene) {
        scene.release(&mut self.storage, &mut self.primitive_factory);
    }

    pub fn terminate(&mut self) {
        self.primitive_factory.terminate();

        if !self.storage.render_primitive_registry.is_empty() {
            log::error!(
                "Render system terminated with {} backend render primitives",
                self.storage.render_primitive_registry.len()
            );
        }
    }
}
