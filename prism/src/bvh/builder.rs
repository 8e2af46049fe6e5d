//! Top-down BVH builder.
//!
//! Each node is split by a plane picked by [`SplitStrategy`]; triangles are
//! partitioned in-place, so every node ends up owning a contiguous range of
//! `Bvh::triangles`. A split that would leave one side empty is abandoned
//! and the node stays a leaf.
//!
//! Instead of recursing, pending nodes are kept on an explicit stack, which
//! yields the same node order as a depth-first recursion would (left subtree
//! first) without tying the tree's depth to the thread's stack size.

use glam::Vec3;

use super::{
    BoundingBox, Bvh, BvhBuildOptions, BvhNode, BvhTriangle, SplittingPlane,
};

pub fn run(
    vertices: &[Vec3],
    indices: &[u32],
    options: &BvhBuildOptions,
) -> Bvh {
    let triangles: Vec<_> = indices
        .chunks_exact(3)
        .map(|ids| {
            let ids = [ids[0], ids[1], ids[2]];

            BvhTriangle::new(ids.map(|id| vertices[id as usize]), ids)
        })
        .collect();

    // A binary tree with one triangle per leaf has `2n - 1` nodes
    let capacity = (2 * triangles.len()).saturating_sub(1).max(1);

    let mut nodes = Vec::with_capacity(capacity);
    let mut bounding_boxes = Vec::with_capacity(capacity);

    bounding_boxes.push(vertices.iter().copied().collect::<BoundingBox>());
    nodes.push(BvhNode::leaf(0, 0, triangles.len() as u32));

    let mut bvh = Bvh {
        nodes,
        bounding_boxes,
        triangles,
    };

    let mut stats = BuildStats::default();
    let mut stack = vec![(0, 0)];

    while let Some((node_id, depth)) = stack.pop() {
        stats.depth = stats.depth.max(depth);

        if let Some([left_id, right_id]) =
            split(&mut bvh, options, node_id, depth, &mut stats)
        {
            stack.push((right_id, depth + 1));
            stack.push((left_id, depth + 1));
        }
    }

    log::debug!(
        "BVH built; nodes = {}, depth = {}, abandoned-splits = {}, \
         depth-limited = {}",
        bvh.nodes.len(),
        stats.depth,
        stats.abandoned_splits,
        stats.depth_limited,
    );

    bvh
}

#[derive(Debug, Default)]
struct BuildStats {
    depth: u32,
    abandoned_splits: usize,
    depth_limited: usize,
}

/// Tries to split given leaf into two; returns ids of the newly-created
/// children on success.
fn split(
    bvh: &mut Bvh,
    options: &BvhBuildOptions,
    node_id: u32,
    depth: u32,
    stats: &mut BuildStats,
) -> Option<[u32; 2]> {
    let node = bvh.nodes[node_id as usize];

    // Whatever the plane, one of the sides would end up empty
    if node.triangle_count < 2 {
        return None;
    }

    if options.max_depth.is_some_and(|max_depth| depth >= max_depth) {
        stats.depth_limited += 1;
        return None;
    }

    let bounds = bvh.bounding_boxes[node.bounding_box_id as usize];
    let triangles = &mut bvh.triangles[node.triangles()];
    let plane = options.strategy.find_splitting_plane(&bounds, triangles)?;
    let pivot = partition(triangles, plane);

    if pivot == 0 || pivot == triangles.len() {
        log::trace!(
            "Abandoning split of node {}; all {} triangles landed on one side \
             of {:?} = {}",
            node_id,
            triangles.len(),
            plane.split_by,
            plane.split_at,
        );

        stats.abandoned_splits += 1;

        return None;
    }

    let (left_tris, right_tris) = triangles.split_at(pivot);
    let left_bb: BoundingBox = left_tris.iter().collect();
    let right_bb: BoundingBox = right_tris.iter().collect();

    // ---

    let pivot = pivot as u32;
    let left_bb_id = bvh.bounding_boxes.len() as u32;
    let left_id = bvh.nodes.len() as u32;
    let right_id = left_id + 1;

    bvh.bounding_boxes.push(left_bb);
    bvh.bounding_boxes.push(right_bb);

    bvh.nodes
        .push(BvhNode::leaf(left_bb_id, node.triangle_id, pivot));

    bvh.nodes.push(BvhNode::leaf(
        left_bb_id + 1,
        node.triangle_id + pivot,
        node.triangle_count - pivot,
    ));

    let parent = &mut bvh.nodes[node_id as usize];

    parent.triangle_count = 0;
    parent.child_id = left_id;

    Some([left_id, right_id])
}

/// Moves triangles whose centers lie strictly before the plane to the front
/// of the slice; returns the number of such triangles.
fn partition(triangles: &mut [BvhTriangle], plane: SplittingPlane) -> usize {
    let mut pivot = 0;

    for i in 0..triangles.len() {
        if triangles[i].center[plane.split_by] < plane.split_at {
            triangles.swap(i, pivot);
            pivot += 1;
        }
    }

    pivot
}
