use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Entry of the mesh table; tells the kernel where a mesh's BVH and
/// triangles begin and how to move rays into the mesh's local space.
///
/// Matrices are stored column-major.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshInfo {
    pub triangle_offset: u32,
    pub node_offset: u32,
    pub material_id: u32,
    pub local_to_world: [f32; 16],
    pub world_to_local: [f32; 16],
}

impl MeshInfo {
    pub const SIZE: usize = 140;

    pub fn new(
        triangle_offset: u32,
        node_offset: u32,
        material_id: u32,
        local_to_world: Mat4,
    ) -> Self {
        let mut this = Self {
            triangle_offset,
            node_offset,
            material_id,
            local_to_world: Default::default(),
            world_to_local: Default::default(),
        };

        this.set_transform(local_to_world);
        this
    }

    pub fn set_transform(&mut self, local_to_world: Mat4) {
        self.local_to_world = local_to_world.to_cols_array();
        self.world_to_local = local_to_world.inverse().to_cols_array();
    }

    pub fn local_to_world(&self) -> Mat4 {
        Mat4::from_cols_array(&self.local_to_world)
    }

    pub fn world_to_local(&self) -> Mat4 {
        Mat4::from_cols_array(&self.world_to_local)
    }
}
