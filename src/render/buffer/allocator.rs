use anyhow::Result;

use crate::render::buffer::{aligned_size, VertexBuffer, VertexBufferSegmentDescriptor};
use crate::resource::gltf::GltfLoader;

pub struct VertexBufferAllocator {
    label: String,
    segments: Vec<VertexBufferSegmentAllocationDescriptor>,
}

impl VertexBufferAllocator {
    pub fn new(label: String) -> Self {
        Self {
            label,
            segments: vec![],
        }
    }

    pub fn add_segment(&mut self, semantic: gltf::Semantic, accessor_id: usize, length: usize) {
        self.segments.push(VertexBufferSegmentAllocationDescriptor {
            semantic,
            accessor_id,
            length,
        });
    }

    /// Uploads every segment into one buffer. Each segment starts on a copy
    /// aligned offset.
    pub fn finish(
        self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        gltf_loader: &mut impl GltfLoader,
    ) -> Result<VertexBuffer> {
        let size = self
            .segments
            .iter()
            .map(|segment| aligned_size(segment.length))
            .sum();

        let gpu_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&self.label),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut offset: usize = 0;
        let mut segment_descriptors = Vec::<VertexBufferSegmentDescriptor>::new();
        for segment in self.segments.into_iter() {
            let data = gltf_loader.load_bytes_from_accessor(segment.accessor_id)?;
            let padded_length = aligned_size(data.len()) as usize;

            if padded_length == data.len() {
                queue.write_buffer(&gpu_buffer, offset as u64, data);
            } else {
                let mut padded = data.to_vec();
                padded.resize(padded_length, 0);
                queue.write_buffer(&gpu_buffer, offset as u64, &padded);
            }

            segment_descriptors.push(VertexBufferSegmentDescriptor {
                type_: segment.semantic,
                offset,
                length: data.len(),
            });

            offset += padded_length;
        }
        queue.submit([]);

        Ok(VertexBuffer {
            gpu_buffer,
            segments: segment_descriptors,
        })
    }
}

struct VertexBufferSegmentAllocationDescriptor {
    semantic: gltf::Semantic,
    accessor_id: usize,
    length: usize,
}
