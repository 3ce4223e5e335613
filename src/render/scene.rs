use std::collections::HashMap;

use anyhow::Result;

use crate::error::Error;
use crate::render::buffer::allocator::VertexBufferAllocator;
use crate::render::buffer::IndexBuffer;
use crate::render::driver::RenderPrimitiveDescriptor;
use crate::render::factory::PrimitiveFactory;
use crate::render::handle::{
    IndexBufferHandle, PrimitiveType, RenderPrimitiveHandle, VertexBufferHandle,
};
use crate::render::state::RenderSystemState;
use crate::render::storage::RenderSystemStorage;
use crate::resource::gltf::GltfLoader;

/// Every backend resource acquired while loading a scene. Handing it back to
/// [`LoadedScene::release`] returns all of them.
#[derive(Debug, Default)]
pub struct LoadedScene {
    pub vertex_buffers: Vec<VertexBufferHandle>,
    pub index_buffers: Vec<IndexBufferHandle>,
    pub render_primitives: Vec<RenderPrimitiveHandle>,
}

impl LoadedScene {
    pub fn release(
        self,
        storage: &mut RenderSystemStorage,
        primitive_factory: &mut PrimitiveFactory,
    ) {
        for handle in self.render_primitives {
            primitive_factory.destroy(storage, handle);
        }

        for handle in self.vertex_buffers {
            if let Some(vertex_buffer) = storage.remove_vertex_buffer(handle) {
                vertex_buffer.gpu_buffer.destroy();
            }
        }

        for handle in self.index_buffers {
            if let Some(index_buffer) = storage.remove_index_buffer(handle) {
                index_buffer.gpu_buffer.destroy();
            }
        }
    }
}

pub struct SceneLoader<'a, T: GltfLoader> {
    state: &'a RenderSystemState,
    storage: &'a mut RenderSystemStorage,
    primitive_factory: &'a mut PrimitiveFactory,
    gltf_loader: &'a mut T,
    geometry_registry: HashMap<(usize, usize), RenderPrimitiveDescriptor>,
    loaded: LoadedScene,
}

impl<'a, T: GltfLoader> SceneLoader<'a, T> {
    /// Instantiates `scene` `instances` times. Geometry is uploaded once; every
    /// node that references a mesh asks the factory for its primitives.
    pub fn load(
        state: &'a RenderSystemState,
        storage: &'a mut RenderSystemStorage,
        primitive_factory: &'a mut PrimitiveFactory,
        gltf_loader: &'a mut T,
        scene: &gltf::Scene,
        instances: u32,
    ) -> Result<LoadedScene> {
        let mut scene_loader = Self {
            state,
            storage,
            primitive_factory,
            gltf_loader,
            geometry_registry: HashMap::new(),
            loaded: Default::default(),
        };

        match scene_loader.load_scene(scene, instances) {
            Ok(_) => Ok(scene_loader.loaded),
            Err(error) => {
                scene_loader
                    .loaded
                    .release(scene_loader.storage, scene_loader.primitive_factory);
                Err(error)
            }
        }
    }

    fn load_scene(&mut self, scene: &gltf::Scene, instances: u32) -> Result<()> {
        for instance in 0..instances {
            log::debug!(
                "Loading glTF scene: {} - [{}], instance {instance}",
                scene.name().unwrap_or("<UNNAMED>"),
                scene.index(),
            );

            for node in scene.nodes() {
                self.load_node(&node)?;
            }
        }

        self.state.queue.submit([]);

        Ok(())
    }

    fn load_node(&mut self, node: &gltf::Node) -> Result<()> {
        for child in node.children() {
            self.load_node(&child)?;
        }

        let mesh = match node.mesh() {
            Some(mesh) => mesh,
            None => return Ok(()),
        };

        log::trace!(
            "Requesting primitives of mesh [{}] for node {} - [{}]",
            mesh.index(),
            node.name().unwrap_or("<UNNAMED>"),
            node.index()
        );

        for primitive in mesh.primitives() {
            let descriptor = self.load_geometry(&mesh, &primitive)?;
            let handle = self.primitive_factory.create(&mut *self.storage, &descriptor);
            self.loaded.render_primitives.push(handle);
        }

        Ok(())
    }

    fn load_geometry(
        &mut self,
        mesh: &gltf::Mesh,
        primitive: &gltf::Primitive,
    ) -> Result<RenderPrimitiveDescriptor> {
        let geometry_id = (mesh.index(), primitive.index());
        if let Some(descriptor) = self.geometry_registry.get(&geometry_id) {
            return Ok(*descriptor);
        }

        let label_prefix = format!(
            "MESH_{}_{}_PRIMITIVE_{}",
            mesh.name().unwrap_or("<UNNAMED>"),
            mesh.index(),
            primitive.index()
        );

        log::debug!("Uploading glTF primitive geometry: {label_prefix}");

        let type_ = PrimitiveType::try_from(primitive.mode())?;

        let vertex_count = match primitive.get(&gltf::Semantic::Positions) {
            Some(accessor) => accessor.count() as u32,
            None => {
                return Err(Error::new(format!(
                    "The given primitive has no position attribute: {label_prefix}"
                ))
                .into())
            }
        };

        let mut vertex_buffer_allocator =
            VertexBufferAllocator::new(format!("{label_prefix}_VERTEX_BUFFER"));

        for (semantic, accessor) in primitive.attributes() {
            match semantic {
                gltf::Semantic::Positions
                | gltf::Semantic::Normals
                | gltf::Semantic::Tangents
                | gltf::Semantic::Colors(_)
                | gltf::Semantic::TexCoords(_) => {
                    vertex_buffer_allocator.add_segment(
                        semantic,
                        accessor.index(),
                        accessor.count() * accessor.size(),
                    );
                }
                _ => log::info!("Ignoring unsupported vertex attribute type: {semantic:?}"),
            }
        }

        let vertex_buffer = vertex_buffer_allocator.finish(
            &self.state.device,
            &self.state.queue,
            &mut *self.gltf_loader,
        )?;

        let index_buffer_label = format!("{label_prefix}_INDEX_BUFFER");
        let index_buffer = match primitive.indices() {
            Some(accessor) => {
                let data_type = accessor.data_type();
                let data = self.gltf_loader.load_bytes_from_accessor(accessor.index())?;

                match data_type {
                    gltf::accessor::DataType::U16 => IndexBuffer::from_data(
                        &self.state.device,
                        &self.state.queue,
                        &index_buffer_label,
                        data,
                        wgpu::IndexFormat::Uint16,
                    ),
                    gltf::accessor::DataType::U32 => IndexBuffer::from_data(
                        &self.state.device,
                        &self.state.queue,
                        &index_buffer_label,
                        data,
                        wgpu::IndexFormat::Uint32,
                    ),
                    gltf::accessor::DataType::U8 => {
                        let widened: Vec<u16> = data.iter().map(|index| *index as u16).collect();
                        IndexBuffer::from_data(
                            &self.state.device,
                            &self.state.queue,
                            &index_buffer_label,
                            bytemuck::cast_slice(&widened),
                            wgpu::IndexFormat::Uint16,
                        )
                    }
                    _ => {
                        return Err(Error::new(format!(
                            "The index buffer for the given primitive uses an invalid data type: {data_type:?}"
                        ))
                        .into())
                    }
                }
            }
            None => {
                let sequential: Vec<u32> = (0..vertex_count).collect();
                IndexBuffer::from_data(
                    &self.state.device,
                    &self.state.queue,
                    &index_buffer_label,
                    bytemuck::cast_slice(&sequential),
                    wgpu::IndexFormat::Uint32,
                )
            }
        };

        let count = index_buffer.count;

        let vertex_buffer = self.storage.insert_vertex_buffer(vertex_buffer);
        self.loaded.vertex_buffers.push(vertex_buffer);
        let index_buffer = self.storage.insert_index_buffer(index_buffer);
        self.loaded.index_buffers.push(index_buffer);

        let descriptor = RenderPrimitiveDescriptor {
            vertex_buffer,
            index_buffer,
            type_,
            offset: 0,
            min_index: 0,
            max_index: vertex_count.saturating_sub(1),
            count,
        };
        self.geometry_registry.insert(geometry_id, descriptor);

        Ok(descriptor)
    }
}
