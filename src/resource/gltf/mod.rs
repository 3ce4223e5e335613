use anyhow::Result;

use crate::error::Error;

pub mod file;

pub trait GltfAsset {
    fn gltf(&self) -> &gltf::Gltf;

    fn get_scene(&self, scene_id: usize) -> Result<gltf::Scene<'_>> {
        match self.gltf().scenes().nth(scene_id) {
            Some(scene) => Ok(scene),
            None => Err(Error::new(format!(
                "No scene exists with the given ID: {scene_id}"
            ))
            .into()),
        }
    }

    fn default_scene_id(&self) -> usize {
        self.gltf()
            .default_scene()
            .map(|scene| scene.index())
            .unwrap_or(0)
    }
}

pub trait GltfLoader {
    /// Returns the raw bytes an accessor covers, loading its buffer first if
    /// needed.
    fn load_bytes_from_accessor(&mut self, accessor_id: usize) -> Result<&[u8]>;
}
