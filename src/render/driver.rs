use crate::render::handle::{
    IndexBufferHandle, PrimitiveType, RenderPrimitiveHandle, VertexBufferHandle,
};

/// Everything a backend needs to bind geometry into one drawable unit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RenderPrimitiveDescriptor {
    pub vertex_buffer: VertexBufferHandle,
    pub index_buffer: IndexBufferHandle,
    pub type_: PrimitiveType,
    pub offset: u32,
    pub min_index: u32,
    pub max_index: u32,
    pub count: u32,
}

/// Backend that physically allocates and releases render primitives.
///
/// Handles returned by `create_render_primitive` must be unique among the
/// primitives that are still alive. `destroy_render_primitive` is only ever
/// called with such a handle, and at most once.
pub trait PrimitiveDriver {
    fn create_render_primitive(
        &mut self,
        descriptor: &RenderPrimitiveDescriptor,
    ) -> RenderPrimitiveHandle;

    fn destroy_render_primitive(&mut self, handle: RenderPrimitiveHandle);
}
