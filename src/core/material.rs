// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::materials::lambertian_diffuse::LambertianDiffuseBSDF;
use crate::math::constants::Vector3f;
use std::sync::Arc;

pub struct Material {
    pub name: Option<String>,
    pub bsdf: Arc<dyn BSDF>,
    pub emission: Vector3f,
    /// Element index into the bound simulation frame. Materials with an offset
    /// take their colour from the transfer function applied to that value.
    pub simulation_offset: Option<usize>,
}

impl Material {
    pub fn new(bsdf: Arc<dyn BSDF>) -> Self {
        Self { name: None, bsdf, emission: Vector3f::zeros(), simulation_offset: None }
    }

    pub fn diffuse(color: Vector3f) -> Self {
        Self::new(Arc::new(LambertianDiffuseBSDF::new(color)))
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_emission(mut self, emission: Vector3f) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_simulation_offset(mut self, offset: usize) -> Self {
        self.simulation_offset = Some(offset);
        self
    }
}

/// Flattened read view over the scene materials for one configuration generation.
pub type MaterialView = Arc<[Arc<Material>]>;
