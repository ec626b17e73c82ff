// Copyright @yucwang 2023

use crate::core::interaction::SurfaceIntersection;
use crate::math::aabb::AABB;
use crate::math::ray::Ray3f;

pub trait Shape: Send + Sync {
    fn bounding_box(&self) -> AABB;
    /// Closest hit inside `[ray.min_t, ray.max_t]`.
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection>;
}
