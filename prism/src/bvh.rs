mod axis;
mod bounding_box;
mod build_options;
mod builder;
mod bvh_node;
mod bvh_printer;
mod bvh_serializer;
mod bvh_triangle;
mod split_strategy;

use std::hash::{Hash, Hasher};

use fxhash::FxHasher;
use glam::Vec3;

pub use self::axis::*;
pub use self::bounding_box::*;
pub use self::build_options::*;
pub use self::bvh_node::*;
pub use self::bvh_printer::*;
pub use self::bvh_serializer::*;
pub use self::bvh_triangle::*;
pub use self::split_strategy::*;
use crate::{gpu, utils, Error, Result};

/// Bounding volume hierarchy over a triangle soup.
///
/// Nodes, their bounding boxes, and the triangles are kept in three flat
/// arrays and refer to each other only through indices; the root lives at
/// index zero.
///
/// The hierarchy is immutable once built.
#[derive(Clone, Debug)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    bounding_boxes: Vec<BoundingBox>,
    triangles: Vec<BvhTriangle>,
}

impl Bvh {
    /// Most triangles a single hierarchy can hold, so that ids of all of its
    /// nodes (up to `2n - 1`) fit in `u32`.
    pub const MAX_TRIANGLES: usize = (u32::MAX / 2) as usize;

    /// Builds hierarchy using the default options.
    ///
    /// `indices` is interpreted as consecutive triples, each naming the
    /// vertices of one triangle.
    pub fn build(vertices: &[Vec3], indices: &[u32]) -> Result<Self> {
        Self::build_ex(vertices, indices, &Default::default())
    }

    pub fn build_ex(
        vertices: &[Vec3],
        indices: &[u32],
        options: &BvhBuildOptions,
    ) -> Result<Self> {
        Self::validate_options(options)?;
        Self::validate_input(vertices, indices)?;

        log::info!(
            "Building BVH; vertices = {}, triangles = {}, strategy = {:?}",
            vertices.len(),
            indices.len() / 3,
            options.strategy,
        );

        Ok(utils::measure("bvh-build", || {
            builder::run(vertices, indices, options)
        }))
    }

    fn validate_options(options: &BvhBuildOptions) -> Result<()> {
        if let SplitStrategy::Sah { samples_per_axis } = options.strategy {
            if samples_per_axis > SplitStrategy::MAX_SAH_SAMPLES {
                return Err(Error::TooManySamples {
                    samples: samples_per_axis,
                    max: SplitStrategy::MAX_SAH_SAMPLES,
                });
            }
        }

        Ok(())
    }

    fn validate_input(vertices: &[Vec3], indices: &[u32]) -> Result<()> {
        if indices.len() % 3 != 0 {
            return Err(Error::IndicesNotTriangles { len: indices.len() });
        }

        let count = indices.len() / 3;

        if count > Self::MAX_TRIANGLES {
            return Err(Error::TooManyTriangles {
                count,
                max: Self::MAX_TRIANGLES,
            });
        }

        if let Some(pos) = indices
            .iter()
            .position(|&vertex| vertex as usize >= vertices.len())
        {
            return Err(Error::VertexOutOfBounds {
                triangle: pos / 3,
                vertex: indices[pos],
                vertex_count: vertices.len(),
            });
        }

        Ok(())
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn root(&self) -> &BvhNode {
        &self.nodes[0]
    }

    pub fn bounding_boxes(&self) -> &[BoundingBox] {
        &self.bounding_boxes
    }

    /// Returns triangles, reordered so that each leaf's triangles form a
    /// contiguous range.
    pub fn triangles(&self) -> &[BvhTriangle] {
        &self.triangles
    }

    pub fn bounds(&self, node: &BvhNode) -> BoundingBox {
        self.bounding_boxes[node.bounding_box_id as usize]
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the hierarchy contains no triangles; in that case
    /// the root is neither a real leaf nor an internal node and shouldn't be
    /// traversed.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Returns the length of the longest root-to-leaf path, in edges.
    pub fn depth(&self) -> u32 {
        let mut depth = 0;
        let mut stack = vec![(0, 0)];

        while let Some((node_id, node_depth)) = stack.pop() {
            depth = depth.max(node_depth);

            if let Some([left_id, right_id]) =
                self.nodes[node_id as usize].children()
            {
                stack.push((left_id, node_depth + 1));
                stack.push((right_id, node_depth + 1));
            }
        }

        depth
    }

    /// Returns a hash of the entire hierarchy; two builds over the same input
    /// with the same options yield the same fingerprint.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();

        self.nodes.hash(&mut hasher);

        for bb in &self.bounding_boxes {
            hash_vec3(&mut hasher, bb.min());
            hash_vec3(&mut hasher, bb.max());
        }

        for triangle in &self.triangles {
            triangle.indices.hash(&mut hasher);

            for position in triangle.positions {
                hash_vec3(&mut hasher, position);
            }
        }

        hasher.finish()
    }

    pub fn serialize(&self) -> Vec<gpu::BvhNode> {
        BvhSerializer::serialize(self)
    }

    /// Checks the structural invariants of the hierarchy:
    ///
    /// - children are appended after their parent and referenced once,
    /// - children's triangle ranges are non-empty, contiguous, and together
    ///   span the parent's range,
    /// - the root spans all triangles,
    /// - each node's bounding box is exactly the box of its triangles (the
    ///   root's box, built from vertices, must contain it),
    /// - each node's box contains its children's boxes.
    pub fn validate(&self) -> Result<()> {
        if self.triangles.is_empty() {
            return if self.nodes.len() == 1 && self.root().triangle_count == 0
            {
                Ok(())
            } else {
                Err(Error::violation(0, "empty hierarchy must be just a root"))
            };
        }

        let mut spans = vec![0..0; self.nodes.len()];
        let mut references = vec![0; self.nodes.len()];

        for (node_id, node) in self.nodes.iter().enumerate().rev() {
            let id = node_id as u32;

            let bounds = *self
                .bounding_boxes
                .get(node.bounding_box_id as usize)
                .ok_or_else(|| Error::violation(id, "dangling bounding box"))?;

            let span = if node.is_leaf() {
                if node.triangles().end > self.triangles.len() {
                    return Err(Error::violation(id, "triangles out of bounds"));
                }

                node.triangles()
            } else {
                let Some([left_id, right_id]) = node.children() else {
                    return Err(Error::violation(id, "missing children"));
                };

                if left_id <= id || right_id as usize >= self.nodes.len() {
                    return Err(Error::violation(id, "children out of order"));
                }

                references[left_id as usize] += 1;
                references[right_id as usize] += 1;

                let left = spans[left_id as usize].clone();
                let right = spans[right_id as usize].clone();

                if left.is_empty() || right.is_empty() {
                    return Err(Error::violation(id, "empty child"));
                }

                if left.start != node.triangle_id as usize
                    || left.end != right.start
                {
                    return Err(Error::violation(
                        id,
                        format!(
                            "children's ranges ({left:?}, {right:?}) are not \
                             contiguous"
                        ),
                    ));
                }

                for child_id in [left_id, right_id] {
                    let child_bounds =
                        self.bounds(&self.nodes[child_id as usize]);

                    if !bounds.contains(&child_bounds) {
                        return Err(Error::violation(
                            id,
                            format!("bounds don't contain child {child_id}"),
                        ));
                    }
                }

                left.start..right.end
            };

            let actual: BoundingBox =
                self.triangles[span.clone()].iter().collect();

            let is_tight = if id == 0 {
                bounds.contains(&actual)
            } else {
                bounds == actual
            };

            if !is_tight {
                return Err(Error::violation(
                    id,
                    format!(
                        "bounds {bounds:?} don't match triangles {actual:?}"
                    ),
                ));
            }

            spans[node_id] = span;
        }

        if spans[0] != (0..self.triangles.len()) {
            return Err(Error::violation(0, "root doesn't span all triangles"));
        }

        if let Some(node_id) =
            references.iter().skip(1).position(|&refs| refs != 1)
        {
            return Err(Error::violation(
                (node_id + 1) as u32,
                "node must have exactly one parent",
            ));
        }

        Ok(())
    }
}

fn hash_vec3(hasher: &mut impl Hasher, v: Vec3) {
    for component in v.to_array() {
        component.to_bits().hash(hasher);
    }
}
