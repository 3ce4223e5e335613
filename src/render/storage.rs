use std::collections::HashMap;

use crate::render::buffer::{IndexBuffer, VertexBuffer};
use crate::render::driver::{PrimitiveDriver, RenderPrimitiveDescriptor};
use crate::render::handle::{IndexBufferHandle, RenderPrimitiveHandle, VertexBufferHandle};
use crate::render::primitive::RenderPrimitive;

/// Issues handle ids. Ids are never reused, so a stale handle can not alias a
/// newer resource.
#[derive(Default)]
pub struct HandleAllocator {
    next_id: u32,
}

impl HandleAllocator {
    pub fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct RenderSystemStorage {
    pub vertex_buffer_registry: HashMap<u32, VertexBuffer>,
    pub index_buffer_registry: HashMap<u32, IndexBuffer>,
    pub render_primitive_registry: HashMap<u32, RenderPrimitive>,
    handle_allocator: HandleAllocator,
}

impl RenderSystemStorage {
    pub fn insert_vertex_buffer(&mut self, vertex_buffer: VertexBuffer) -> VertexBufferHandle {
        let handle = VertexBufferHandle(self.handle_allocator.allocate());
        self.vertex_buffer_registry.insert(handle.id(), vertex_buffer);
        handle
    }

    pub fn insert_index_buffer(&mut self, index_buffer: IndexBuffer) -> IndexBufferHandle {
        let handle = IndexBufferHandle(self.handle_allocator.allocate());
        self.index_buffer_registry.insert(handle.id(), index_buffer);
        handle
    }

    pub fn remove_vertex_buffer(&mut self, handle: VertexBufferHandle) -> Option<VertexBuffer> {
        self.vertex_buffer_registry.remove(&handle.id())
    }

    pub fn remove_index_buffer(&mut self, handle: IndexBufferHandle) -> Option<IndexBuffer> {
        self.index_buffer_registry.remove(&handle.id())
    }

    pub fn render_primitive(&self, handle: RenderPrimitiveHandle) -> Option<&RenderPrimitive> {
        self.render_primitive_registry.get(&handle.id())
    }
}

impl PrimitiveDriver for RenderSystemStorage {
    fn create_render_primitive(
        &mut self,
        descriptor: &RenderPrimitiveDescriptor,
    ) -> RenderPrimitiveHandle {
        let handle = RenderPrimitiveHandle(self.handle_allocator.allocate());

        log::debug!("Creating backend render primitive {handle:?}: {descriptor:?}");

        self.render_primitive_registry
            .insert(handle.id(), RenderPrimitive::from_descriptor(descriptor));

        handle
    }

    fn destroy_render_primitive(&mut self, handle: RenderPrimitiveHandle) {
        match self.render_primitive_registry.remove(&handle.id()) {
            Some(_) => log::debug!("Destroyed backend render primitive {handle:?}"),
            None => log::error!(
                "Attempted to destroy an unknown backend render primitive: {handle:?}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::factory::PrimitiveFactory;
    use crate::render::handle::PrimitiveType;

    fn descriptor(offset: u32) -> RenderPrimitiveDescriptor {
        RenderPrimitiveDescriptor {
            vertex_buffer: VertexBufferHandle(1),
            index_buffer: IndexBufferHandle(2),
            type_: PrimitiveType::TriangleStrip,
            offset,
            min_index: 0,
            max_index: 5,
            count: 6,
        }
    }

    #[test]
    fn allocated_ids_are_unique() {
        let mut allocator = HandleAllocator::default();
        let ids: Vec<u32> = (0..100).map(|_| allocator.allocate()).collect();

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
        assert!(!ids.contains(&0));
    }

    #[test]
    fn storage_records_and_forgets_primitives() {
        let mut storage = RenderSystemStorage::default();

        let handle = storage.create_render_primitive(&descriptor(12));
        let primitive = storage.render_primitive(handle).unwrap();
        assert_eq!(primitive.topology, wgpu::PrimitiveTopology::TriangleStrip);
        assert_eq!(primitive.index_range(), 12..18);
        assert_eq!(primitive.max_index, 5);

        storage.destroy_render_primitive(handle);
        assert!(storage.render_primitive(handle).is_none());
    }

    #[test]
    fn factory_on_storage_keeps_one_record_per_key() {
        let mut storage = RenderSystemStorage::default();
        let mut factory = PrimitiveFactory::new();

        let a = factory.create(&mut storage, &descriptor(0));
        let b = factory.create(&mut storage, &descriptor(0));
        let c = factory.create(&mut storage, &descriptor(6));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(storage.render_primitive_registry.len(), 2);

        factory.destroy(&mut storage, a);
        assert_eq!(storage.render_primitive_registry.len(), 2);
        factory.destroy(&mut storage, b);
        factory.destroy(&mut storage, c);
        assert!(storage.render_primitive_registry.is_empty());

        factory.terminate();
    }
}
