use std::fmt::Write;

use super::Bvh;

/// Dumps hierarchy as a Graphviz graph, for debugging.
pub struct BvhPrinter;

impl BvhPrinter {
    pub fn print(bvh: &Bvh) -> String {
        let mut out = String::new();

        _ = writeln!(out, "digraph {{");

        for (id, node) in bvh.nodes().iter().enumerate() {
            let bb = bvh.bounds(node);

            if let Some([left_id, right_id]) = node.children() {
                _ = writeln!(
                    out,
                    "  n{} [label=\"node({} : {})\"]",
                    id,
                    bb.min(),
                    bb.max()
                );

                for child_id in [left_id, right_id] {
                    _ = writeln!(out, "  n{} -> n{}", id, child_id);
                }
            } else {
                let triangles = node.triangles();

                _ = writeln!(
                    out,
                    "  n{} [label=\"leaf({}..{})\"]",
                    id, triangles.start, triangles.end
                );
            }
        }

        _ = writeln!(out, "}}");

        out
    }
}
