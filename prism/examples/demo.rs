//! Builds hierarchies over a procedural terrain using both split strategies
//! and prints some statistics about them.
//!
//! Pass `--dot` to dump the longest-axis hierarchy as Graphviz instead.

use std::env;

use glam::{vec3, Mat4, Vec3};
use prism::{
    gpu, Bvh, BvhBuildOptions, BvhPrinter, Mesh, Scene, SplitStrategy,
};

const SIZE: u32 = 64;

fn main() {
    let mesh = terrain(SIZE);

    if env::args().any(|arg| arg == "--dot") {
        let bvh = Bvh::build(mesh.positions(), mesh.indices()).unwrap();

        print!("{}", BvhPrinter::print(&bvh));
        return;
    }

    for strategy in [SplitStrategy::LongestAxis, SplitStrategy::sah()] {
        let options = BvhBuildOptions::default().with_strategy(strategy);

        let bvh = Bvh::build_ex(mesh.positions(), mesh.indices(), &options)
            .unwrap();

        println!(
            "{:?}: nodes = {}, leaves = {}, depth = {}, fingerprint = {:016x}",
            strategy,
            bvh.len(),
            bvh.leaf_count(),
            bvh.depth(),
            bvh.fingerprint(),
        );
    }

    // The same terrain once more, hovering above as a sheet of glass
    let meshes = [
        mesh.clone(),
        mesh.with_material(gpu::Material::default().with_glass(1.33))
            .with_transform(Mat4::from_translation(vec3(0.0, 0.0, 5.0))),
    ];

    let scene = Scene::build(&meshes, &Default::default()).unwrap();

    println!(
        "scene: nodes = {} ({} bytes), triangles = {} ({} bytes), meshes = {}, \
         materials = {}",
        scene.nodes().len(),
        scene.nodes_bytes().len(),
        scene.triangles().len(),
        scene.triangles_bytes().len(),
        scene.meshes().len(),
        scene.materials().len(),
    );
}

/// Generates a `size` x `size` grid, displaced by a few sine waves.
fn terrain(size: u32) -> Mesh {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for y in 0..=size {
        for x in 0..=size {
            let (fx, fy) = (x as f32 / 8.0, y as f32 / 8.0);
            let z = fx.sin() * fy.cos() + 0.25 * (3.0 * fx + fy).sin();

            positions.push(vec3(fx, fy, z));
            normals.push(Vec3::Z);
        }
    }

    for y in 0..size {
        for x in 0..size {
            let i = y * (size + 1) + x;
            let j = i + size + 1;

            indices.extend([i, i + 1, j + 1, i, j + 1, j]);
        }
    }

    Mesh::new(positions, normals, indices)
}
