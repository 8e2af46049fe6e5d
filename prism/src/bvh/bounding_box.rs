use std::ops::{Add, AddAssign};

use glam::Vec3;

use super::BvhTriangle;

/// Axis-aligned bounding box.
///
/// Starts out empty (`min = +inf`, `max = -inf`) and only ever grows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    /// Returns `max - min`; for an empty box this has negative (infinite)
    /// components.
    pub fn extent(&self) -> Vec3 {
        self.max() - self.min()
    }

    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Half of the surface area; zero for an empty box.
    pub fn half_area(&self) -> f32 {
        if !self.is_set() {
            return 0.0;
        }

        let extent = self.extent();

        extent.x * (extent.y + extent.z) + extent.y * extent.z
    }

    pub fn is_set(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    pub fn contains(&self, other: &Self) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(Vec3::INFINITY, Vec3::NEG_INFINITY)
    }
}

impl Add<Vec3> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Vec3) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Vec3> for BoundingBox {
    fn add_assign(&mut self, rhs: Vec3) {
        self.grow(rhs);
    }
}

impl AddAssign<&BvhTriangle> for BoundingBox {
    fn add_assign(&mut self, rhs: &BvhTriangle) {
        for position in rhs.positions {
            self.grow(position);
        }
    }
}

impl Add<Self> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Self> for BoundingBox {
    fn add_assign(&mut self, rhs: Self) {
        if rhs.is_set() {
            *self += rhs.min;
            *self += rhs.max;
        }
    }
}

impl FromIterator<Vec3> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Vec3>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}

impl<'a> FromIterator<&'a BvhTriangle> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = &'a BvhTriangle>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}
