use glam::{Mat4, Vec3};

use crate::{gpu, Error, Result};

/// Indexed triangle mesh, as handed over by the asset loader.
#[derive(Clone, Debug)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    material: gpu::Material,
    material_id: Option<u32>,
    transform: Mat4,
}

impl Mesh {
    /// Creates a mesh; `normals` are indexed the same way as `positions`.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Self {
        Self {
            positions,
            normals,
            indices,
            material: Default::default(),
            material_id: None,
            transform: Mat4::IDENTITY,
        }
    }

    /// Sets the material this mesh contributes to the scene's material table,
    /// at the same position as the mesh itself.
    pub fn with_material(mut self, material: gpu::Material) -> Self {
        self.material = material;
        self
    }

    /// Makes the mesh's triangles use another entry of the material table;
    /// by default a mesh uses its own material.
    pub fn with_material_id(mut self, material_id: u32) -> Self {
        self.material_id = Some(material_id);
        self
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn material(&self) -> &gpu::Material {
        &self.material
    }

    pub fn material_id(&self) -> Option<u32> {
        self.material_id
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.normals.len() != self.positions.len() {
            return Err(Error::NormalsMismatch {
                positions: self.positions.len(),
                normals: self.normals.len(),
            });
        }

        Ok(())
    }
}
