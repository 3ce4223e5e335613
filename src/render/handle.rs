use anyhow::Result;

use crate::error::Error;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VertexBufferHandle(pub u32);

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct IndexBufferHandle(pub u32);

/// Opaque handle to a backend render primitive. Only the backend that issued
/// it knows what it refers to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RenderPrimitiveHandle(pub u32);

impl VertexBufferHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl IndexBufferHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl RenderPrimitiveHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PrimitiveType {
    Points = 0,
    Lines = 1,
    LineStrip = 3,
    #[default]
    Triangles = 4,
    TriangleStrip = 5,
}

impl From<PrimitiveType> for wgpu::PrimitiveTopology {
    fn from(value: PrimitiveType) -> Self {
        match value {
            PrimitiveType::Points => wgpu::PrimitiveTopology::PointList,
            PrimitiveType::Lines => wgpu::PrimitiveTopology::LineList,
            PrimitiveType::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            PrimitiveType::Triangles => wgpu::PrimitiveTopology::TriangleList,
            PrimitiveType::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }
}

impl TryFrom<gltf::mesh::Mode> for PrimitiveType {
    type Error = anyhow::Error;

    fn try_from(mode: gltf::mesh::Mode) -> Result<Self> {
        match mode {
            gltf::mesh::Mode::Points => Ok(PrimitiveType::Points),
            gltf::mesh::Mode::Lines => Ok(PrimitiveType::Lines),
            gltf::mesh::Mode::LineStrip => Ok(PrimitiveType::LineStrip),
            gltf::mesh::Mode::Triangles => Ok(PrimitiveType::Triangles),
            gltf::mesh::Mode::TriangleStrip => Ok(PrimitiveType::TriangleStrip),
            gltf::mesh::Mode::LineLoop | gltf::mesh::Mode::TriangleFan => Err(Error::new(
                format!("The given primitive uses an unsupported topology: {mode:?}"),
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_type_fits_in_a_byte_and_orders_by_value() {
        assert_eq!(std::mem::size_of::<PrimitiveType>(), 1);
        assert!(PrimitiveType::Points < PrimitiveType::Lines);
        assert!(PrimitiveType::LineStrip < PrimitiveType::Triangles);
        assert!(PrimitiveType::Triangles < PrimitiveType::TriangleStrip);
    }

    #[test]
    fn primitive_type_maps_to_wgpu_topology() {
        assert_eq!(
            wgpu::PrimitiveTopology::from(PrimitiveType::Triangles),
            wgpu::PrimitiveTopology::TriangleList
        );
        assert_eq!(
            wgpu::PrimitiveTopology::from(PrimitiveType::LineStrip),
            wgpu::PrimitiveTopology::LineStrip
        );
        assert_eq!(
            wgpu::PrimitiveTopology::from(PrimitiveType::Points),
            wgpu::PrimitiveTopology::PointList
        );
    }

    #[test]
    fn gltf_modes_without_a_backend_topology_are_rejected() {
        assert_eq!(
            PrimitiveType::try_from(gltf::mesh::Mode::TriangleStrip).unwrap(),
            PrimitiveType::TriangleStrip
        );
        assert!(PrimitiveType::try_from(gltf::mesh::Mode::LineLoop).is_err());
        assert!(PrimitiveType::try_from(gltf::mesh::Mode::TriangleFan).is_err());
    }
}
