// Copyright @yucwang 2023

use crate::math::constants::Vector3f;

// Directions are expressed in the local shading frame, z is the normal.
// `wi` points toward the viewer, `wo` toward the light.
pub trait BSDF: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> Vector3f;
    /// Base colour for renderers that do not evaluate the full BSDF.
    fn albedo(&self) -> Vector3f;
}
