use super::{BoundingBox, Bvh};
use crate::gpu;

/// Flattens [`Bvh`] into records consumed by the traversal kernel.
///
/// Records are emitted in node order, so `index` of internal nodes keeps
/// pointing at the right children; ids are local to the hierarchy.
///
/// The root of an empty hierarchy is emitted with an empty (inverted) box,
/// which no ray can enter.
pub struct BvhSerializer;

impl BvhSerializer {
    pub fn serialize(bvh: &Bvh) -> Vec<gpu::BvhNode> {
        let mut out = Vec::with_capacity(bvh.len());

        Self::serialize_into(bvh, &mut out);

        out
    }

    /// Appends records to `out`; returns id of the first appended record.
    pub fn serialize_into(bvh: &Bvh, out: &mut Vec<gpu::BvhNode>) -> usize {
        let ptr = out.len();

        out.extend(bvh.nodes().iter().map(|node| {
            let bb = if bvh.is_empty() {
                BoundingBox::default()
            } else {
                bvh.bounds(node)
            };

            if node.is_leaf() {
                gpu::BvhNode::leaf(
                    bb.min(),
                    bb.max(),
                    node.triangle_id,
                    node.triangle_count,
                )
            } else {
                gpu::BvhNode::internal(bb.min(), bb.max(), node.child_id)
            }
        }));

        ptr
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec3, Vec3};

    use super::*;

    #[test]
    fn quad() {
        let vertices = [
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(1.0, 1.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        ];

        let bvh = Bvh::build(&vertices, &[0, 1, 2, 0, 2, 3]).unwrap();
        let nodes = BvhSerializer::serialize(&bvh);

        assert_eq!(
            vec![
                gpu::BvhNode::internal(
                    vec3(0.0, 0.0, 0.0),
                    vec3(1.0, 1.0, 0.0),
                    1,
                ),
                gpu::BvhNode::leaf(
                    vec3(0.0, 0.0, 0.0),
                    vec3(1.0, 1.0, 0.0),
                    0,
                    1,
                ),
                gpu::BvhNode::leaf(
                    vec3(0.0, 0.0, 0.0),
                    vec3(1.0, 1.0, 0.0),
                    1,
                    1,
                ),
            ],
            nodes,
        );

        let bytes: &[u8] = bytemuck::cast_slice(&nodes);

        assert_eq!(3 * gpu::BvhNode::SIZE, bytes.len());
    }

    #[test]
    fn index_follows_node_kind() {
        let vertices: Vec<_> = (0..16)
            .flat_map(|i| {
                let p = vec3(i as f32, (i * i % 7) as f32, (i % 3) as f32);

                [p, p + vec3(0.5, 0.0, 0.0), p + vec3(0.0, 0.5, 0.5)]
            })
            .collect();

        let indices: Vec<u32> = (0..48).collect();
        let bvh = Bvh::build(&vertices, &indices).unwrap();
        let records = BvhSerializer::serialize(&bvh);

        assert_eq!(bvh.len(), records.len());

        for (node, record) in bvh.nodes().iter().zip(&records) {
            assert_eq!(node.triangle_count, record.triangle_count);
            assert_eq!(bvh.bounds(node).min(), record.bounds_min);
            assert_eq!(bvh.bounds(node).max(), record.bounds_max);

            if node.is_leaf() {
                assert_eq!(node.triangle_id, record.index);
            } else {
                assert_eq!(node.child_id, record.index);
            }
        }
    }

    #[test]
    fn empty() {
        let bvh = Bvh::build(&[vec3(1.0, 2.0, 3.0)], &[]).unwrap();
        let nodes = BvhSerializer::serialize(&bvh);

        assert_eq!(1, nodes.len());
        assert_eq!(0, nodes[0].triangle_count);
        assert_eq!(Vec3::INFINITY, nodes[0].bounds_min);
        assert_eq!(Vec3::NEG_INFINITY, nodes[0].bounds_max);
        assert!(nodes[0].is_empty());
        assert_eq!(None, nodes[0].children());
        assert_eq!(bvh.root().children(), nodes[0].children());
    }

    #[test]
    fn append() {
        let vertices =
            [vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)];

        let bvh = Bvh::build(&vertices, &[0, 1, 2]).unwrap();
        let mut out = Vec::new();

        assert_eq!(0, BvhSerializer::serialize_into(&bvh, &mut out));
        assert_eq!(1, BvhSerializer::serialize_into(&bvh, &mut out));
        assert_eq!(out[0], out[1]);
    }
}
