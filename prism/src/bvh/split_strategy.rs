use derivative::Derivative;

use super::{Axis, BoundingBox, BvhTriangle};

/// Policy used to pick the plane each node gets split by.
///
/// Both policies share the same partitioning and termination rules - they
/// differ only in where they put the plane.
#[derive(Clone, Copy, Debug, PartialEq, Derivative)]
#[derivative(Default)]
pub enum SplitStrategy {
    /// Splits along the longest axis of node's bounding box, right through
    /// its center (spatial median).
    #[derivative(Default)]
    LongestAxis,

    /// Tries `samples_per_axis` evenly spaced planes on each axis and picks
    /// the one with the lowest surface area heuristic cost.
    Sah { samples_per_axis: u32 },
}

impl SplitStrategy {
    pub const DEFAULT_SAH_SAMPLES: u32 = 5;

    /// Most planes per axis the SAH strategy accepts.
    pub const MAX_SAH_SAMPLES: u32 = 1024;

    pub fn sah() -> Self {
        Self::Sah {
            samples_per_axis: Self::DEFAULT_SAH_SAMPLES,
        }
    }

    pub(crate) fn find_splitting_plane(
        &self,
        bounds: &BoundingBox,
        triangles: &[BvhTriangle],
    ) -> Option<SplittingPlane> {
        match *self {
            SplitStrategy::LongestAxis => Some(longest_axis(bounds)),

            SplitStrategy::Sah { samples_per_axis } => {
                sah(bounds, triangles, samples_per_axis)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SplittingPlane {
    pub split_by: Axis,
    pub split_at: f32,
}

fn longest_axis(bounds: &BoundingBox) -> SplittingPlane {
    let extent = bounds.extent();

    let split_by = if extent.x > extent.y.max(extent.z) {
        Axis::X
    } else if extent.y > extent.z {
        Axis::Y
    } else {
        Axis::Z
    };

    SplittingPlane {
        split_by,
        split_at: bounds.center()[split_by],
    }
}

fn sah(
    bounds: &BoundingBox,
    triangles: &[BvhTriangle],
    samples_per_axis: u32,
) -> Option<SplittingPlane> {
    let mut best: Option<(SplittingPlane, f32)> = None;

    for split_by in Axis::all() {
        let start = bounds.min()[split_by];
        let end = bounds.max()[split_by];

        for i in 0..samples_per_axis {
            let plane = SplittingPlane {
                split_by,
                split_at: start
                    + (end - start) * sample_offset(i, samples_per_axis),
            };

            let cost = estimate_cost(triangles, plane);

            let is_better =
                best.map_or(true, |(_, best_cost)| cost < best_cost);

            if is_better {
                best = Some((plane, cost));
            }
        }
    }

    best.map(|(plane, _)| plane)
}

/// Position of `i`-th out of `samples` planes, as a fraction of the extent;
/// planes never land on the box's faces.
fn sample_offset(i: u32, samples: u32) -> f32 {
    (i as f32 + 1.0) / (samples as f32 + 1.0)
}

fn estimate_cost(triangles: &[BvhTriangle], plane: SplittingPlane) -> f32 {
    let mut left_bb = BoundingBox::default();
    let mut left_count = 0;
    let mut right_bb = BoundingBox::default();
    let mut right_count = 0;

    for triangle in triangles {
        if triangle.center[plane.split_by] < plane.split_at {
            left_bb += triangle;
            left_count += 1;
        } else {
            right_bb += triangle;
            right_count += 1;
        }
    }

    (left_count as f32) * left_bb.half_area()
        + (right_count as f32) * right_bb.half_area()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{vec3, Vec3};

    use super::*;

    fn bounds(min: Vec3, max: Vec3) -> BoundingBox {
        BoundingBox::new(min, max)
    }

    #[test]
    fn longest_axis_picks_strictly_longest() {
        let plane = SplitStrategy::LongestAxis.find_splitting_plane(
            &bounds(Vec3::ZERO, vec3(4.0, 1.0, 2.0)),
            &[],
        );

        assert_eq!(
            Some(SplittingPlane {
                split_by: Axis::X,
                split_at: 2.0,
            }),
            plane,
        );

        let plane = SplitStrategy::LongestAxis.find_splitting_plane(
            &bounds(vec3(0.0, -3.0, 0.0), vec3(1.0, 3.0, 2.0)),
            &[],
        );

        assert_eq!(
            Some(SplittingPlane {
                split_by: Axis::Y,
                split_at: 0.0,
            }),
            plane,
        );
    }

    #[test]
    fn longest_axis_ties() {
        // x == y > z: x is not strictly the longest, so y wins
        let plane = longest_axis(&bounds(Vec3::ZERO, vec3(1.0, 1.0, 0.0)));

        assert_eq!(Axis::Y, plane.split_by);
        assert_relative_eq!(0.5, plane.split_at);

        // x == y == z: falls through to z
        let plane = longest_axis(&bounds(Vec3::ZERO, Vec3::ONE));

        assert_eq!(Axis::Z, plane.split_by);
        assert_relative_eq!(0.5, plane.split_at);

        // y == z > x: z
        let plane = longest_axis(&bounds(Vec3::ZERO, vec3(1.0, 2.0, 2.0)));

        assert_eq!(Axis::Z, plane.split_by);
        assert_relative_eq!(1.0, plane.split_at);
    }

    #[test]
    fn sah_separates_clusters() {
        // Two clusters of tiny triangles along the z axis: one near z=0, the
        // other near z=10, with the box padded a bit so that some sample
        // falls in the gap between them.
        let tri = |z: f32| {
            BvhTriangle::new(
                [vec3(0.0, 0.0, z), vec3(0.1, 0.0, z), vec3(0.0, 0.1, z)],
                [0, 0, 0],
            )
        };

        let triangles = [tri(0.0), tri(0.2), tri(9.8), tri(10.0)];

        let plane = SplitStrategy::sah()
            .find_splitting_plane(
                &bounds(vec3(0.0, 0.0, 0.0), vec3(0.1, 0.1, 10.0)),
                &triangles,
            )
            .unwrap();

        assert_eq!(Axis::Z, plane.split_by);
        assert!(plane.split_at > 0.2 && plane.split_at < 9.8);
    }

    #[test]
    fn sah_samples_are_evenly_spaced() {
        let triangles = [BvhTriangle::new([Vec3::ZERO; 3], [0, 0, 0])];

        // A single degenerate triangle at the origin: every candidate puts it
        // on the left side at zero cost, so the first candidate (x at 1/6 of
        // the extent) wins
        let plane = SplitStrategy::sah()
            .find_splitting_plane(
                &bounds(Vec3::ZERO, Vec3::splat(6.0)),
                &triangles,
            )
            .unwrap();

        assert_eq!(Axis::X, plane.split_by);
        assert_relative_eq!(1.0, plane.split_at);
    }

    #[test]
    fn sample_offsets() {
        assert_relative_eq!(0.5, sample_offset(0, 1));
        assert_relative_eq!(1.0 / 6.0, sample_offset(0, 5));
        assert_relative_eq!(5.0 / 6.0, sample_offset(4, 5));

        // Must not overflow for the largest representable sample count
        let last = sample_offset(u32::MAX - 1, u32::MAX);

        assert!(last > 0.0 && last <= 1.0);
    }

    #[test]
    fn sah_without_samples() {
        let strategy = SplitStrategy::Sah {
            samples_per_axis: 0,
        };

        assert_eq!(
            None,
            strategy.find_splitting_plane(&bounds(Vec3::ZERO, Vec3::ONE), &[]),
        );
    }
}
