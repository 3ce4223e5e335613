use crate::render::driver::RenderPrimitiveDescriptor;
use crate::render::handle::{IndexBufferHandle, VertexBufferHandle};

/// Backend side of a render primitive: which buffers to bind and which part
/// of the index buffer to draw.
#[derive(Debug)]
pub struct RenderPrimitive {
    pub vertex_buffer: VertexBufferHandle,
    pub index_buffer: IndexBufferHandle,
    pub topology: wgpu::PrimitiveTopology,
    pub offset: u32,
    pub min_index: u32,
    pub max_index: u32,
    pub count: u32,
}

impl RenderPrimitive {
    pub fn from_descriptor(descriptor: &RenderPrimitiveDescriptor) -> Self {
        Self {
            vertex_buffer: descriptor.vertex_buffer,
            index_buffer: descriptor.index_buffer,
            topology: descriptor.type_.into(),
            offset: descriptor.offset,
            min_index: descriptor.min_index,
            max_index: descriptor.max_index,
            count: descriptor.count,
        }
    }

    pub fn index_range(&self) -> std::ops::Range<u32> {
        self.offset..self.offset.saturating_add(self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::handle::PrimitiveType;

    #[test]
    fn index_range_clamps_instead_of_overflowing() {
        let primitive = RenderPrimitive::from_descriptor(&RenderPrimitiveDescriptor {
            vertex_buffer: VertexBufferHandle(1),
            index_buffer: IndexBufferHandle(2),
            type_: PrimitiveType::Lines,
            offset: u32::MAX - 4,
            min_index: 0,
            max_index: 0,
            count: 10,
        });

        assert_eq!(primitive.index_range(), u32::MAX - 4..u32::MAX);
    }
}
