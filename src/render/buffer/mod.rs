pub mod allocator;

pub struct VertexBuffer {
    pub gpu_buffer: wgpu::Buffer,
    pub segments: Vec<VertexBufferSegmentDescriptor>,
}

pub struct VertexBufferSegmentDescriptor {
    pub type_: gltf::Semantic,
    pub offset: usize,
    pub length: usize,
}

pub struct IndexBuffer {
    pub gpu_buffer: wgpu::Buffer,
    pub type_: wgpu::IndexFormat,
    pub count: u32,
}

impl IndexBuffer {
    pub fn from_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        data: &[u8],
        type_: wgpu::IndexFormat,
    ) -> Self {
        let index_size = match type_ {
            wgpu::IndexFormat::Uint16 => std::mem::size_of::<u16>(),
            wgpu::IndexFormat::Uint32 => std::mem::size_of::<u32>(),
        };

        Self {
            gpu_buffer: create_initialized_buffer(
                device,
                queue,
                label,
                data,
                wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            ),
            type_,
            count: (data.len() / index_size) as u32,
        }
    }
}

/// Rounds `length` up so that it can be the size of a buffer copy.
pub fn aligned_size(length: usize) -> u64 {
    let alignment = wgpu::COPY_BUFFER_ALIGNMENT;
    (length as u64).div_ceil(alignment) * alignment
}

pub fn create_initialized_buffer(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    data: &[u8],
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    let size = aligned_size(data.len());

    let gpu_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage,
        mapped_at_creation: false,
    });

    if size as usize == data.len() {
        queue.write_buffer(&gpu_buffer, 0, data);
    } else {
        let mut padded = data.to_vec();
        padded.resize(size as usize, 0);
        queue.write_buffer(&gpu_buffer, 0, &padded);
    }

    gpu_buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_rounded_to_copy_alignment() {
        assert_eq!(aligned_size(0), 0);
        assert_eq!(aligned_size(4), 4);
        assert_eq!(aligned_size(6), 8);
        assert_eq!(aligned_size(13), 16);
    }
}
