// Copyright @yucwang 2026

use crate::core::light::{Light, LightSample};
use crate::math::constants::{Vector3f, EPSILON};

/// Isotropic point light with inverse-square falloff.
pub struct PointLight {
    pub position: Vector3f,
    pub intensity: Vector3f,
}

impl PointLight {
    pub fn new(position: Vector3f, intensity: Vector3f) -> Self {
        Self { position, intensity }
    }
}

impl Light for PointLight {
    fn name(&self) -> &'static str {
        "PointLight"
    }

    fn sample(&self, p: &Vector3f) -> Option<LightSample> {
        let to_light = self.position - p;
        let dist2 = to_light.norm_squared();
        if dist2 <= EPSILON * EPSILON {
            return None;
        }
        let distance = dist2.sqrt();
        Some(LightSample {
            direction: to_light / distance,
            distance,
            radiance: self.intensity / dist2,
        })
    }
}
