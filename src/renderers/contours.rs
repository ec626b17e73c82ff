// Copyright @yucwang 2026

//! Silhouette and crease detection by probing neighbouring rays.

use crate::core::error::Result;
use crate::core::interaction::SurfaceIntersection;
use crate::core::light::LightView;
use crate::core::params::ParameterSet;
use crate::core::scene::{closest_hit, ObjectView, Scene};
use crate::core::tangent_frame::build_tangent_frame;
use crate::math::constants::{Float, Vector3f, Vector4f};
use crate::math::ray::Ray3f;
use crate::renderers::common::{background_color, random_seed, samples_per_pixel};
use crate::renderers::renderer::{Renderer, SampleId, ShadingState};
use std::sync::Arc;

/// Minimum cosine between the centre and probe normals on a smooth surface.
const CREASE_COSINE: Float = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct ContoursConfig {
    pub background_color: Vector3f,
    pub detection_distance: Float,
    pub wireframe: bool,
    pub shading_enabled: bool,
    pub samples_per_pixel: u32,
    pub random_seed: u64,
}

pub struct ContoursRendererState {
    config: ContoursConfig,
    lights: LightView,
    objects: ObjectView,
}

impl ContoursRendererState {
    pub fn config(&self) -> &ContoursConfig {
        &self.config
    }

    fn is_contour(&self, ray: &Ray3f, hit: &SurfaceIntersection) -> bool {
        let distance = self.config.detection_distance;
        let (t, b) = build_tangent_frame(&ray.dir());
        let offsets = [t * distance, -t * distance, b * distance, -b * distance];

        offsets.iter().any(|offset| {
            let probe = Ray3f::new(ray.origin() + offset, ray.dir(), Some(ray.min_t), None);
            match closest_hit(&self.objects, &probe) {
                None => true,
                Some(other) => {
                    other.object_index() != hit.object_index()
                        || (other.t() - hit.t()).abs() > distance
                        || other.geo_normal().dot(&hit.geo_normal()) < CREASE_COSINE
                }
            }
        })
    }

    fn fill(&self, ray: &Ray3f, hit: &SurfaceIntersection) -> Vector4f {
        let color = hit
            .object_index()
            .and_then(|idx| self.objects.get(idx))
            .map_or(self.config.background_color, |object| object.color);
        if !self.config.shading_enabled || self.lights.is_empty() {
            return Vector4f::new(color.x, color.y, color.z, 1.0);
        }

        let mut n = hit.geo_normal();
        if n.dot(&ray.dir()) > 0.0 {
            n = -n;
        }
        let light_term = self
            .lights
            .iter()
            .filter_map(|light| light.sample(&hit.p()))
            .fold(Vector3f::zeros(), |acc, ls| acc + ls.radiance * n.dot(&ls.direction).abs());
        let rgb = color.component_mul(&light_term);
        Vector4f::new(rgb.x, rgb.y, rgb.z, 1.0)
    }
}

impl ShadingState for ContoursRendererState {
    fn shade(&self, ray: &Ray3f, _sample: SampleId) -> Vector4f {
        let bg = self.config.background_color;
        let background = Vector4f::new(bg.x, bg.y, bg.z, 0.0);
        let hit = match closest_hit(&self.objects, ray) {
            Some(hit) => hit,
            None => return background,
        };

        if self.is_contour(ray, &hit) {
            Vector4f::new(0.0, 0.0, 0.0, 1.0)
        } else if self.config.wireframe {
            background
        } else {
            self.fill(ray, &hit)
        }
    }

    fn samples_per_pixel(&self) -> u32 {
        self.config.samples_per_pixel
    }

    fn random_seed(&self) -> u64 {
        self.config.random_seed
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ContoursRenderer;

impl ContoursRenderer {
    pub const TYPE_NAME: &'static str = "research_contours";

    pub fn new() -> Self {
        Self
    }

    pub fn build_state(&self, scene: &Scene, params: &ParameterSet) -> Result<ContoursRendererState> {
        let config = ContoursConfig {
            background_color: background_color(params)?,
            detection_distance: params.get_float("detectionDistance", 1.0)?.abs(),
            wireframe: params.get_bool("wireframe", false)?,
            shading_enabled: params.get_bool("shadingEnabled", true)?,
            samples_per_pixel: samples_per_pixel(params)?,
            random_seed: random_seed(params)?,
        };
        log::debug!("{}: {:?}", Self::TYPE_NAME, config);
        Ok(ContoursRendererState {
            config,
            lights: scene.light_view(),
            objects: scene.object_view(),
        })
    }
}

impl Renderer for ContoursRenderer {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn configure(&self, scene: &Scene, params: &ParameterSet) -> Result<Arc<dyn ShadingState>> {
        Ok(Arc::new(self.build_state(scene, params)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::ParamValue;
    use crate::core::scene::SceneObject;
    use crate::shapes::cube::Cube;

    fn slab_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::new(
            Arc::new(Cube::new(Vector3f::new(-2.0, -2.0, 4.0), Vector3f::new(2.0, 2.0, 5.0))),
            Vector3f::new(0.2, 0.6, 0.2),
        ));
        scene
    }

    fn ray_at(x: Float) -> Ray3f {
        Ray3f::new(Vector3f::new(x, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0), None, None)
    }

    fn params(wireframe: bool) -> ParameterSet {
        ParameterSet::new()
            .with("detectionDistance", ParamValue::Float(0.25))
            .with("wireframe", ParamValue::Bool(wireframe))
    }

    #[test]
    fn interior_is_filled_and_edge_is_black() {
        let state = ContoursRenderer::new().build_state(&slab_scene(), &params(false)).expect("configure");
        assert_eq!(state.shade(&ray_at(0.0), SampleId::default()), Vector4f::new(0.2, 0.6, 0.2, 1.0));
        assert_eq!(state.shade(&ray_at(1.9), SampleId::default()), Vector4f::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn wireframe_keeps_only_contours() {
        let state = ContoursRenderer::new().build_state(&slab_scene(), &params(true)).expect("configure");
        assert_eq!(state.shade(&ray_at(0.0), SampleId::default()), Vector4f::new(1.0, 1.0, 1.0, 0.0));
        assert_eq!(state.shade(&ray_at(1.9), SampleId::default()).w, 1.0);
    }

    #[test]
    fn miss_is_background() {
        let state = ContoursRenderer::new().build_state(&slab_scene(), &params(false)).expect("configure");
        assert_eq!(state.shade(&ray_at(10.0), SampleId::default()), Vector4f::new(1.0, 1.0, 1.0, 0.0));
    }
}
