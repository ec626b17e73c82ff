// Copyright @yucwang 2021

use crate::core::error::Result;
use crate::core::params::ParameterSet;
use crate::core::scene::Scene;
use crate::math::constants::Vector4f;
use crate::math::ray::Ray3f;
use std::sync::Arc;

/// Identifies one primary sample: the pixel it belongs to and its index among
/// that pixel's samples. All random decisions of a shade call derive from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SampleId {
    pub pixel: (u32, u32),
    pub index: u32,
}

impl SampleId {
    pub fn new(x: u32, y: u32, index: u32) -> Self {
        Self { pixel: (x, y), index }
    }
}

/// One immutable configuration generation, shared by every in-flight shade call.
pub trait ShadingState: Send + Sync {
    fn shade(&self, ray: &Ray3f, sample: SampleId) -> Vector4f;
    fn samples_per_pixel(&self) -> u32;
    fn random_seed(&self) -> u64;
}

pub trait Renderer: Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Builds a fresh state from the scene and parameters. Never mutates the
    /// renderer, so a failed call leaves every earlier state usable.
    fn configure(&self, scene: &Scene, params: &ParameterSet) -> Result<Arc<dyn ShadingState>>;
}
