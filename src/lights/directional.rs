// Copyright @yucwang 2026

use crate::core::light::{Light, LightSample};
use crate::math::constants::{Float, Vector3f};

/// Light arriving from infinitely far away along `-direction`.
pub struct DirectionalLight {
    pub direction: Vector3f,
    pub radiance: Vector3f,
}

impl DirectionalLight {
    pub fn new_with(direction: Vector3f, radiance: Vector3f) -> Self {
        Self { direction, radiance }
    }
}

impl Light for DirectionalLight {
    fn name(&self) -> &'static str {
        "DirectionalLight"
    }

    fn sample(&self, _p: &Vector3f) -> Option<LightSample> {
        let len = self.direction.norm();
        if len <= 0.0 {
            return None;
        }
        Some(LightSample {
            direction: -self.direction / len,
            distance: Float::INFINITY,
            radiance: self.radiance,
        })
    }
}
