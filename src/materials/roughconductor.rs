// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::math::constants::{Float, Vector3f};
use crate::materials::microfacet::{fresnel_schlick, ggx_d, ggx_g};

pub struct RoughConductorBSDF {
    alpha: Float,
    specular_reflectance: Vector3f,
}

impl RoughConductorBSDF {
    pub fn new(alpha: Float, specular_reflectance: Vector3f) -> Self {
        Self { alpha, specular_reflectance }
    }
}

impl BSDF for RoughConductorBSDF {
    fn name(&self) -> &'static str {
        "RoughConductorBSDF"
    }

    fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> Vector3f {
        if wi.z * wo.z <= 0.0 {
            return Vector3f::zeros();
        }

        let mut m = wi + wo;
        if m.norm_squared() <= 0.0 {
            return Vector3f::zeros();
        }
        m = m.normalize();
        if m.z < 0.0 {
            m = -m;
        }

        let cos_i = wi.z.abs();
        let cos_o = wo.z.abs();
        let denom = 4.0 * cos_i * cos_o;
        if denom <= 1e-6 {
            return Vector3f::zeros();
        }

        let d = ggx_d(m.z, self.alpha);
        let g = ggx_g(cos_i, cos_o, self.alpha);
        let f = fresnel_schlick(self.specular_reflectance, wi.dot(&m).abs());
        f * (d * g / denom)
    }

    fn albedo(&self) -> Vector3f {
        self.specular_reflectance
    }
}
