use std::ops::Range;

/// Node of the hierarchy, addressed by its position in [`super::Bvh::nodes()`].
///
/// A node with `triangle_count > 0` is a leaf owning triangles
/// `triangle_id..triangle_id + triangle_count`; a node with
/// `triangle_count == 0` is an internal node whose children live at
/// `child_id` and `child_id + 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BvhNode {
    pub bounding_box_id: u32,
    pub triangle_id: u32,
    pub triangle_count: u32,
    pub child_id: u32,
}

impl BvhNode {
    pub(crate) fn leaf(
        bounding_box_id: u32,
        triangle_id: u32,
        triangle_count: u32,
    ) -> Self {
        Self {
            bounding_box_id,
            triangle_id,
            triangle_count,
            child_id: 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.triangle_count > 0
    }

    pub fn is_internal(&self) -> bool {
        !self.is_leaf()
    }

    pub fn triangles(&self) -> Range<usize> {
        let start = self.triangle_id as usize;
        let end = start + self.triangle_count as usize;

        start..end
    }

    pub fn children(&self) -> Option<[u32; 2]> {
        // Children are always appended after the root, so `child_id == 0`
        // can only be the root of an empty hierarchy
        (self.is_internal() && self.child_id > 0)
            .then_some([self.child_id, self.child_id + 1])
    }
}
