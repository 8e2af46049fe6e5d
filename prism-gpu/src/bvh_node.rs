use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Flattened BVH node, as read by the traversal kernel.
///
/// `index` is interpreted through `triangle_count`:
///
/// - for leaves (`triangle_count > 0`) it's the first triangle of the
///   leaf's range,
/// - for internal nodes (`triangle_count == 0`) it's the id of the first
///   child; the second child always lives at `index + 1`.
///
/// Children always come after their parent, so a record with both fields
/// zeroed can only be the root of an empty hierarchy; it has neither
/// triangles nor children.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BvhNode {
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub index: u32,
    pub triangle_count: u32,
}

impl BvhNode {
    pub const SIZE: usize = 32;

    pub fn leaf(
        bounds_min: Vec3,
        bounds_max: Vec3,
        triangle_id: u32,
        triangle_count: u32,
    ) -> Self {
        Self {
            bounds_min,
            bounds_max,
            index: triangle_id,
            triangle_count,
        }
    }

    pub fn internal(bounds_min: Vec3, bounds_max: Vec3, child_id: u32) -> Self {
        Self {
            bounds_min,
            bounds_max,
            index: child_id,
            triangle_count: 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.triangle_count > 0
    }

    /// Returns whether this is the root of a hierarchy with no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangle_count == 0 && self.index == 0
    }

    /// Returns ids of both children, if this is an internal node.
    pub fn children(&self) -> Option<[u32; 2]> {
        if self.is_leaf() || self.is_empty() {
            None
        } else {
            Some([self.index, self.index + 1])
        }
    }

    /// Returns `(first, count)` of the leaf's triangle range.
    pub fn triangles(&self) -> Option<(u32, u32)> {
        self.is_leaf().then_some((self.index, self.triangle_count))
    }
}
