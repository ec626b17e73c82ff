// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{EPSILON, Vector3f};
use crate::math::ray::Ray3f;

/// Axis-aligned box.
pub struct Cube {
    bounds: AABB,
}

impl Cube {
    pub fn new(p_min: Vector3f, p_max: Vector3f) -> Self {
        Self { bounds: AABB::new(p_min, p_max) }
    }
}

impl Shape for Cube {
    fn bounding_box(&self) -> AABB {
        self.bounds
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let (t_min, t_max) = self.bounds.ray_intersect_range(ray)?;
        // Entering the box hits at t_min, starting inside hits at t_max.
        let t_hit = if t_min > ray.min_t { t_min } else { t_max };
        if !ray.test_segment(t_hit) {
            return None;
        }
        let p = ray.at(t_hit);
        Some(SurfaceIntersection::new(p, cube_normal(&self.bounds, p), t_hit))
    }
}

fn cube_normal(bounds: &AABB, p: Vector3f) -> Vector3f {
    let half = bounds.diagonal() * 0.5;
    let local = p - bounds.center();
    let mut axis = 0;
    let mut best = -1.0;
    for idx in 0..3 {
        let d = local[idx].abs() / half[idx].max(EPSILON);
        if d > best {
            best = d;
            axis = idx;
        }
    }
    let mut n = Vector3f::zeros();
    n[axis] = if local[axis] >= 0.0 { 1.0 } else { -1.0 };
    n
}
