// Copyright @yucwang 2023

use crate::math::constants::{ Float, Vector3f };

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceIntersection {
    p: Vector3f,
    geo_normal: Vector3f,
    t: Float,
    object_index: Option<usize>,
}

impl SurfaceIntersection {
    pub fn new(new_p: Vector3f, new_geo_normal: Vector3f, new_t: Float) -> Self {
        Self { p: new_p, geo_normal: new_geo_normal, t: new_t, object_index: None }
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    /// Outward unit normal of the hit surface.
    pub fn geo_normal(&self) -> Vector3f {
        self.geo_normal
    }

    pub fn object_index(&self) -> Option<usize> {
        self.object_index
    }

    pub fn with_object_index(mut self, index: Option<usize>) -> Self {
        self.object_index = index;
        self
    }
}
