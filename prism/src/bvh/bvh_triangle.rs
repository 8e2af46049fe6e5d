use glam::Vec3;

/// Triangle as seen by the builder: its positions, centroid, and the ids of
/// its vertices in the source mesh (so that normals etc. can be fetched
/// later on).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BvhTriangle {
    pub positions: [Vec3; 3],
    pub center: Vec3,
    pub indices: [u32; 3],
}

impl BvhTriangle {
    pub fn new(positions: [Vec3; 3], indices: [u32; 3]) -> Self {
        Self {
            positions,
            center: positions.into_iter().sum::<Vec3>() / 3.0,
            indices,
        }
    }
}
