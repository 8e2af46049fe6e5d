use glam::Mat4;

use crate::{
    gpu, Bvh, BvhBuildOptions, BvhSerializer, Error, Mesh, Result,
};

/// GPU-ready buffers for a set of meshes.
///
/// Each mesh gets its own hierarchy; hierarchies and triangles of all meshes
/// are concatenated, with [`gpu::MeshInfo`] telling where each mesh begins.
/// Node and triangle ids stored in [`gpu::BvhNode`] stay local to their mesh.
///
/// The material table has one entry per mesh, in mesh order.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    nodes: Vec<gpu::BvhNode>,
    triangles: Vec<gpu::Triangle>,
    meshes: Vec<gpu::MeshInfo>,
    materials: Vec<gpu::Material>,
}

impl Scene {
    pub fn build(meshes: &[Mesh], options: &BvhBuildOptions) -> Result<Self> {
        log::info!("Building scene; meshes = {}", meshes.len());

        let mut this = Self::default();

        for (mesh_id, mesh) in meshes.iter().enumerate() {
            this.add(mesh_id, mesh, options)
                .map_err(|err| err.in_mesh(mesh_id))?;
        }

        for (mesh_id, mesh) in this.meshes.iter().enumerate() {
            if mesh.material_id as usize >= this.materials.len() {
                return Err(Error::MaterialNotFound {
                    material: mesh.material_id,
                    count: this.materials.len(),
                }
                .in_mesh(mesh_id));
            }
        }

        log::info!(
            "Scene built; nodes = {}, triangles = {}",
            this.nodes.len(),
            this.triangles.len(),
        );

        Ok(this)
    }

    fn add(
        &mut self,
        mesh_id: usize,
        mesh: &Mesh,
        options: &BvhBuildOptions,
    ) -> Result<()> {
        mesh.validate()?;

        let bvh = Bvh::build_ex(mesh.positions(), mesh.indices(), options)?;

        check_capacity(
            self.triangles.len() + bvh.triangles().len(),
            self.nodes.len() + bvh.len(),
        )?;

        let material_id = mesh.material_id().unwrap_or(mesh_id as u32);
        let triangle_offset = self.triangles.len() as u32;
        let node_offset = BvhSerializer::serialize_into(&bvh, &mut self.nodes);

        self.triangles
            .extend(bvh.triangles().iter().map(|triangle| {
                let [n0, n1, n2] =
                    triangle.indices.map(|id| mesh.normals()[id as usize]);

                let [p0, p1, p2] = triangle.positions;

                gpu::Triangle {
                    position0: p0,
                    position1: p1,
                    position2: p2,
                    normal0: n0,
                    normal1: n1,
                    normal2: n2,
                    material_id,
                }
            }));

        self.meshes.push(gpu::MeshInfo::new(
            triangle_offset,
            node_offset as u32,
            material_id,
            mesh.transform(),
        ));

        self.materials.push(*mesh.material());

        Ok(())
    }

    /// Moves a mesh without rebuilding anything but its table entry.
    pub fn update_transform(
        &mut self,
        mesh_id: usize,
        transform: Mat4,
    ) -> Result<()> {
        self.meshes
            .get_mut(mesh_id)
            .ok_or(Error::MeshNotFound { mesh: mesh_id })?
            .set_transform(transform);

        Ok(())
    }

    pub fn nodes(&self) -> &[gpu::BvhNode] {
        &self.nodes
    }

    pub fn triangles(&self) -> &[gpu::Triangle] {
        &self.triangles
    }

    pub fn meshes(&self) -> &[gpu::MeshInfo] {
        &self.meshes
    }

    pub fn materials(&self) -> &[gpu::Material] {
        &self.materials
    }

    pub fn nodes_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    pub fn triangles_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    pub fn meshes_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.meshes)
    }

    pub fn materials_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.materials)
    }
}

/// Makes sure offsets stored in [`gpu::MeshInfo`] fit in `u32`.
fn check_capacity(triangle_count: usize, node_count: usize) -> Result<()> {
    let max = u32::MAX as usize;

    if triangle_count > max {
        return Err(Error::TooManyTriangles {
            count: triangle_count,
            max,
        });
    }

    if node_count > max {
        return Err(Error::TooManyNodes {
            count: node_count,
            max,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use glam::{vec3, Vec3};

    use super::*;

    fn quad(z: f32) -> Mesh {
        let positions = vec![
            vec3(0.0, 0.0, z),
            vec3(1.0, 0.0, z),
            vec3(1.0, 1.0, z),
            vec3(0.0, 1.0, z),
        ];

        let normals = vec![Vec3::Z, Vec3::Z, Vec3::Z, -Vec3::Z];

        Mesh::new(positions, normals, vec![0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn build() {
        let glass = gpu::Material::default().with_glass(1.5);

        let meshes = [
            quad(0.0).with_material_id(1),
            quad(1.0)
                .with_material(glass)
                .with_transform(Mat4::from_translation(Vec3::X)),
        ];

        let target = Scene::build(&meshes, &Default::default()).unwrap();

        assert_eq!(6, target.nodes().len());
        assert_eq!(4, target.triangles().len());
        assert_eq!(2, target.meshes().len());
        assert_eq!(2, target.materials().len());

        // ---

        let [mesh0, mesh1] = [target.meshes()[0], target.meshes()[1]];

        assert_eq!(0, mesh0.triangle_offset);
        assert_eq!(0, mesh0.node_offset);
        assert_eq!(1, mesh0.material_id);
        assert_eq!(Mat4::IDENTITY, mesh0.local_to_world());

        assert_eq!(2, mesh1.triangle_offset);
        assert_eq!(3, mesh1.node_offset);
        assert_eq!(1, mesh1.material_id);
        assert_eq!(Mat4::from_translation(Vec3::X), mesh1.local_to_world());

        // Ids stay local to each mesh
        assert_eq!(1, target.nodes()[0].index);
        assert_eq!(1, target.nodes()[3].index);
        assert_eq!(target.nodes()[1].index, target.nodes()[4].index);
        assert_eq!(1.0, target.nodes()[3].bounds_min.z);

        // ---

        // Triangle (0, 2, 3) lands second and picks up the flipped normal
        let tri = target.triangles()[1];

        assert_eq!(vec3(0.0, 0.0, 0.0), tri.position0);
        assert_eq!(vec3(1.0, 1.0, 0.0), tri.position1);
        assert_eq!(vec3(0.0, 1.0, 0.0), tri.position2);
        assert_eq!([Vec3::Z, Vec3::Z, -Vec3::Z], tri.normals());
        assert_eq!(1, tri.material_id);
        assert_eq!(1, target.triangles()[3].material_id);

        // ---

        assert_eq!(gpu::Material::default(), target.materials()[0]);
        assert_eq!(glass, target.materials()[1]);

        // ---

        assert_eq!(6 * gpu::BvhNode::SIZE, target.nodes_bytes().len());
        assert_eq!(4 * gpu::Triangle::SIZE, target.triangles_bytes().len());
        assert_eq!(2 * gpu::MeshInfo::SIZE, target.meshes_bytes().len());
        assert_eq!(
            2 * gpu::Material::SIZE,
            target.materials_bytes().len(),
        );
    }

    #[test]
    fn capacity() {
        let max = u32::MAX as usize;

        assert_eq!(Ok(()), check_capacity(max, max));

        assert_eq!(
            Err(Error::TooManyTriangles {
                count: max + 1,
                max,
            }),
            check_capacity(max + 1, 10),
        );

        // Nodes outnumber triangles, so they overflow first
        assert_eq!(
            Err(Error::TooManyNodes {
                count: max + 1,
                max,
            }),
            check_capacity(max / 2 + 1, max + 1),
        );
    }

    #[test]
    fn unknown_material() {
        let meshes = [quad(0.0), quad(1.0).with_material_id(7)];
        let err = Scene::build(&meshes, &Default::default()).unwrap_err();

        assert_eq!(
            Error::Mesh {
                mesh: 1,
                source: Box::new(Error::MaterialNotFound {
                    material: 7,
                    count: 2,
                }),
            },
            err,
        );
    }

    #[test]
    fn update_transform() {
        let mut target =
            Scene::build(&[quad(0.0)], &Default::default()).unwrap();

        let transform = Mat4::from_rotation_y(0.6);

        target.update_transform(0, transform).unwrap();

        assert_eq!(transform, target.meshes()[0].local_to_world());

        assert_eq!(
            Err(Error::MeshNotFound { mesh: 1 }),
            target.update_transform(1, transform),
        );
    }

    #[test]
    fn invalid_mesh() {
        let broken =
            Mesh::new(vec![Vec3::ZERO; 3], vec![Vec3::Z], vec![0, 1, 2]);

        let err = Scene::build(&[quad(0.0), broken], &Default::default())
            .unwrap_err();

        assert_eq!(
            Error::Mesh {
                mesh: 1,
                source: Box::new(Error::NormalsMismatch {
                    positions: 3,
                    normals: 1,
                }),
            },
            err,
        );

        let broken =
            Mesh::new(vec![Vec3::ZERO; 3], vec![Vec3::Z; 3], vec![0, 1]);

        let err = Scene::build(&[broken], &Default::default()).unwrap_err();

        assert_eq!(
            Error::Mesh {
                mesh: 0,
                source: Box::new(Error::IndicesNotTriangles { len: 2 }),
            },
            err,
        );
    }
}
