use bytemuck::{Pod, Zeroable};
use glam::Vec4;

/// Surface description, as read by the shading kernel.
///
/// Triangles and mesh-table entries point at materials through their
/// `material_id`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Material {
    pub color: Vec4,
    pub emission_color: Vec4,
    pub specular_color: Vec4,
    pub emission_strength: f32,
    pub smoothness: f32,
    pub specular_probability: f32,
    pub refraction: f32,
    pub kind: u32,
    pub _pad0: f32,
    pub _pad1: f32,
    pub _pad2: f32,
}

impl Material {
    pub const SIZE: usize = 80;

    /// Matte or metallic surface, depending on `smoothness` and the
    /// specular parameters.
    pub const KIND_OPAQUE: u32 = 0;

    /// Pass-through surface that refracts according to `refraction`.
    pub const KIND_GLASS: u32 = 1;

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn with_emission(mut self, color: Vec4, strength: f32) -> Self {
        self.emission_color = color;
        self.emission_strength = strength;
        self
    }

    pub fn with_specular(
        mut self,
        color: Vec4,
        probability: f32,
        smoothness: f32,
    ) -> Self {
        self.specular_color = color;
        self.specular_probability = probability;
        self.smoothness = smoothness;
        self
    }

    pub fn with_glass(mut self, refraction: f32) -> Self {
        self.kind = Self::KIND_GLASS;
        self.refraction = refraction;
        self
    }

    pub fn is_glass(&self) -> bool {
        self.kind == Self::KIND_GLASS
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            emission_color: Vec4::ZERO,
            specular_color: Vec4::ONE,
            emission_strength: 0.0,
            smoothness: 0.0,
            specular_probability: 0.0,
            refraction: 1.0,
            kind: Self::KIND_OPAQUE,
            _pad0: Default::default(),
            _pad1: Default::default(),
            _pad2: Default::default(),
        }
    }
}
