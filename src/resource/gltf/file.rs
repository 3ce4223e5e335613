use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::Error;
use crate::resource::gltf::{GltfAsset, GltfLoader};

/// A `.gltf` or `.glb` file together with the directory its external
/// buffers are resolved against.
pub struct FileSystemGltfAsset {
    gltf: gltf::Gltf,
    pub root: PathBuf,
}

impl FileSystemGltfAsset {
    pub fn from_path(gltf_path: &Path) -> Result<Self> {
        let absolute_path = gltf_path.canonicalize()?;

        if !absolute_path.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("The given path is not a file: {}", gltf_path.display()),
            )
            .into());
        }

        let root = match absolute_path.parent() {
            Some(root) => root.to_path_buf(),
            None => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!(
                        "Unable to find the parent directory of the given path: {}",
                        gltf_path.display()
                    ),
                )
                .into())
            }
        };

        log::debug!("Opening glTF asset: {}", absolute_path.display());

        Ok(Self {
            gltf: gltf::Gltf::open(&absolute_path)?,
            root,
        })
    }
}

impl GltfAsset for FileSystemGltfAsset {
    fn gltf(&self) -> &gltf::Gltf {
        &self.gltf
    }
}

pub struct FileSystemGltfLoader<'a> {
    asset: &'a FileSystemGltfAsset,
    buffer_registry: HashMap<usize, Vec<u8>>,
}

impl<'a> FileSystemGltfLoader<'a> {
    pub fn new(asset: &'a FileSystemGltfAsset) -> Self {
        Self {
            asset,
            buffer_registry: HashMap::new(),
        }
    }

    fn get_buffer_read_info(&self, accessor_id: usize) -> Result<GltfBufferReadInfo> {
        let accessor = match self.asset.gltf().accessors().nth(accessor_id) {
            Some(accessor) => accessor,
            None => {
                return Err(
                    Error::new(format!("The given accessor ID is invalid: {accessor_id}")).into(),
                )
            }
        };

        let view = match accessor.view() {
            Some(view) => view,
            None => {
                return Err(Error::new(format!(
                    "The specified accessor has no buffer view: {accessor_id}"
                ))
                .into())
            }
        };

        if let Some(stride) = view.stride() {
            if stride != accessor.size() {
                return Err(Error::new(format!(
                    "Interleaved buffer views are not supported: accessor {accessor_id} has a stride of {stride}"
                ))
                .into());
            }
        }

        Ok(GltfBufferReadInfo {
            buffer: view.buffer().index(),
            offset: view.offset() + accessor.offset(),
            length: accessor.count() * accessor.size(),
        })
    }

    fn load_buffer_data(&mut self, buffer_id: usize) -> Result<()> {
        if self.buffer_registry.contains_key(&buffer_id) {
            return Ok(());
        }

        let buffer = match self.asset.gltf().buffers().nth(buffer_id) {
            Some(buffer) => buffer,
            None => {
                return Err(Error::new(format!("The given buffer ID is invalid: {buffer_id}")).into())
            }
        };

        let data = match buffer.source() {
            gltf::buffer::Source::Bin => match &self.asset.gltf().blob {
                Some(blob) => blob.clone(),
                None => {
                    return Err(Error::new(format!(
                        "Buffer {buffer_id} refers to a binary chunk the asset does not have"
                    ))
                    .into())
                }
            },
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                return Err(
                    Error::new(String::from("Loading data URI buffers is not supported.")).into(),
                )
            }
            gltf::buffer::Source::Uri(uri) => std::fs::read(self.asset.root.join(uri))?,
        };

        if data.len() < buffer.length() {
            return Err(Error::new(format!(
                "Buffer {buffer_id} is shorter than declared: {} < {}",
                data.len(),
                buffer.length()
            ))
            .into());
        }

        self.buffer_registry.insert(buffer_id, data);

        Ok(())
    }

    fn read_buffer_data(&self, buffer_id: usize, offset: usize, length: usize) -> Result<&[u8]> {
        let data = match self.buffer_registry.get(&buffer_id) {
            Some(data) => data,
            None => {
                return Err(Error::new(format!(
                    "The given buffer ID is not associated with a loaded buffer: {buffer_id}"
                ))
                .into())
            }
        };

        match data.get(offset..offset + length) {
            Some(bytes) => Ok(bytes),
            None => Err(Error::new(format!(
                "Read of {length} bytes at offset {offset} is out of bounds for buffer {buffer_id}"
            ))
            .into()),
        }
    }
}

impl<'a> GltfLoader for FileSystemGltfLoader<'a> {
    fn load_bytes_from_accessor(&mut self, accessor_id: usize) -> Result<&[u8]> {
        let buffer_read_info = self.get_buffer_read_info(accessor_id)?;
        self.load_buffer_data(buffer_read_info.buffer)?;

        self.read_buffer_data(
            buffer_read_info.buffer,
            buffer_read_info.offset,
            buffer_read_info.length,
        )
    }
}

struct GltfBufferReadInfo {
    buffer: usize,
    offset: usize,
    length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDICES_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "buffers": [{ "uri": "indices.bin", "byteLength": 8 }],
        "bufferViews": [{ "buffer": 0, "byteOffset": 2, "byteLength": 6 }],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5123,
            "count": 3,
            "type": "SCALAR"
        }]
    }"#;

    fn write_asset(name: &str) -> PathBuf {
        let directory = std::env::temp_dir().join(format!(
            "primitive_cache_{name}_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&directory).unwrap();

        let indices: [u16; 4] = [0xffff, 0, 1, 2];
        let bytes: Vec<u8> = indices.iter().flat_map(|index| index.to_le_bytes()).collect();
        std::fs::write(directory.join("indices.bin"), bytes).unwrap();

        let path = directory.join("asset.gltf");
        std::fs::write(&path, INDICES_GLTF).unwrap();
        path
    }

    #[test]
    fn reads_accessor_bytes_from_external_buffer() {
        let path = write_asset("external");
        let asset = FileSystemGltfAsset::from_path(&path).unwrap();
        let mut loader = FileSystemGltfLoader::new(&asset);

        let bytes = loader.load_bytes_from_accessor(0).unwrap();
        assert_eq!(bytes, &[0, 0, 1, 0, 2, 0]);
        assert_eq!(asset.default_scene_id(), 0);
    }

    #[test]
    fn unknown_accessors_and_scenes_are_errors() {
        let path = write_asset("unknown");
        let asset = FileSystemGltfAsset::from_path(&path).unwrap();
        let mut loader = FileSystemGltfLoader::new(&asset);

        assert!(loader.load_bytes_from_accessor(5).is_err());
        assert!(asset.get_scene(0).is_err());
    }

    #[test]
    fn missing_files_are_errors() {
        let path = std::env::temp_dir().join("primitive_cache_does_not_exist.gltf");
        assert!(FileSystemGltfAsset::from_path(&path).is_err());
    }
}
