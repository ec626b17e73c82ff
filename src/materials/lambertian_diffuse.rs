// Copyright @yucwang 2023

use crate::core::bsdf::BSDF;
use crate::math::constants::{ Vector3f, INV_PI };

pub struct LambertianDiffuseBSDF {
    color: Vector3f,
}

impl BSDF for LambertianDiffuseBSDF {
    fn name(&self) -> &'static str {
        "LambertianDiffuseBSDF"
    }

    fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> Vector3f {
        if wi.z * wo.z <= 0.0 {
            return Vector3f::zeros();
        }
        self.color * INV_PI
    }

    fn albedo(&self) -> Vector3f {
        self.color
    }
}

impl LambertianDiffuseBSDF {
    pub fn new(rgb: Vector3f) -> Self {
        Self {
            color: rgb,
        }
    }
}
