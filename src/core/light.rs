// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};
use std::sync::Arc;

/// Incident light at a shading point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit vector from the shading point toward the light.
    pub direction: Vector3f,
    /// Distance to the light along `direction`, infinite for directional lights.
    pub distance: Float,
    pub radiance: Vector3f,
}

pub trait Light: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// `None` when the light cannot reach `p` (zero direction, point on the light).
    fn sample(&self, p: &Vector3f) -> Option<LightSample>;
}

/// Flattened read view over the scene lights for one configuration generation.
pub type LightView = Arc<[Arc<dyn Light>]>;
