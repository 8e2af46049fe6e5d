use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Triangle as stored in the GPU triangle buffer, in BVH order.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Triangle {
    pub position0: Vec3,
    pub position1: Vec3,
    pub position2: Vec3,
    pub normal0: Vec3,
    pub normal1: Vec3,
    pub normal2: Vec3,
    pub material_id: u32,
}

impl Triangle {
    pub const SIZE: usize = 76;

    pub fn positions(&self) -> [Vec3; 3] {
        [self.position0, self.position1, self.position2]
    }

    pub fn normals(&self) -> [Vec3; 3] {
        [self.normal0, self.normal1, self.normal2]
    }

    pub fn center(&self) -> Vec3 {
        self.positions().into_iter().sum::<Vec3>() / 3.0
    }
}
