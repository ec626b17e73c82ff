// Copyright @yucwang 2026

//! Direct-lighting surface renderer evaluating each object's BSDF.

use crate::core::bsdf::BSDF;
use crate::core::error::Result;
use crate::core::interaction::SurfaceIntersection;
use crate::core::light::LightView;
use crate::core::material::MaterialView;
use crate::core::params::ParameterSet;
use crate::core::scene::{closest_hit, ObjectView, Scene};
use crate::core::tangent_frame::{build_tangent_frame, world_to_local};
use crate::materials::lambertian_diffuse::LambertianDiffuseBSDF;
use crate::math::constants::{Float, Vector3f, Vector4f, FLOAT_MAX};
use crate::math::ray::Ray3f;
use crate::renderers::common::{background_color, bind_simulation_frame, random_seed,
                               read_transfer_function, samples_per_pixel};
use crate::renderers::renderer::{Renderer, SampleId, ShadingState};
use crate::volumes::transfer_function::TransferFunction;
use std::sync::Arc;

const SURFACE_OFFSET: Float = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct PbrConfig {
    pub background_color: Vector3f,
    pub shadow_intensity: Float,
    pub timestamp: Float,
    pub samples_per_pixel: u32,
    pub random_seed: u64,
}

pub struct PbrRendererState {
    config: PbrConfig,
    lights: LightView,
    materials: MaterialView,
    objects: ObjectView,
    /// One BSDF per object, in object order.
    surface_bsdfs: Vec<Arc<dyn BSDF>>,
    transfer_function: TransferFunction,
    simulation_frame: Option<Arc<[Float]>>,
}

impl PbrRendererState {
    pub fn config(&self) -> &PbrConfig {
        &self.config
    }

    fn emission(&self, object_idx: usize) -> Vector3f {
        self.objects[object_idx]
            .material
            .and_then(|idx| self.materials.get(idx))
            .map_or_else(Vector3f::zeros, |material| material.emission)
    }

    fn simulation_tint(&self, object_idx: usize) -> Vector3f {
        let white = Vector3f::new(1.0, 1.0, 1.0);
        let frame = match &self.simulation_frame {
            Some(frame) => frame,
            None => return white,
        };
        self.objects[object_idx]
            .material
            .and_then(|idx| self.materials.get(idx))
            .and_then(|material| material.simulation_offset)
            .and_then(|offset| frame.get(offset).copied())
            .map(|value| self.transfer_function.evaluate(value))
            .filter(|tf| tf.is_visible())
            .map_or(white, |tf| tf.color)
    }

    fn visibility(&self, p: &Vector3f, dir: &Vector3f, distance: Float) -> Float {
        let hard = self.config.shadow_intensity.min(1.0);
        if hard <= 0.0 {
            return 1.0;
        }
        let max_t = if distance.is_finite() { distance } else { FLOAT_MAX };
        let ray = Ray3f::new(*p, *dir, None, Some(max_t));
        match closest_hit(&self.objects, &ray) {
            Some(_) => 1.0 - hard,
            None => 1.0,
        }
    }

    fn shade_hit(&self, ray: &Ray3f, hit: &SurfaceIntersection, object_idx: usize) -> Vector3f {
        let mut n = hit.geo_normal();
        if n.dot(&ray.dir()) > 0.0 {
            n = -n;
        }
        let (t, b) = build_tangent_frame(&n);
        let wi = world_to_local(&(-ray.dir()), &t, &b, &n);
        let p = hit.p() + n * SURFACE_OFFSET;

        let bsdf = &self.surface_bsdfs[object_idx];
        let tint = self.simulation_tint(object_idx);
        let mut radiance = self.emission(object_idx);
        for light in self.lights.iter() {
            let ls = match light.sample(&p) {
                Some(ls) => ls,
                None => continue,
            };
            let wo = world_to_local(&ls.direction, &t, &b, &n);
            let f = bsdf.eval(&wi, &wo).component_mul(&tint);
            if f == Vector3f::zeros() {
                continue;
            }
            let vis = self.visibility(&p, &ls.direction, ls.distance);
            radiance += f.component_mul(&ls.radiance) * (wo.z.abs() * vis);
        }
        radiance
    }
}

impl ShadingState for PbrRendererState {
    fn shade(&self, ray: &Ray3f, _sample: SampleId) -> Vector4f {
        match closest_hit(&self.objects, ray) {
            Some(hit) => match hit.object_index() {
                Some(idx) if idx < self.objects.len() => {
                    let rgb = self.shade_hit(ray, &hit, idx);
                    Vector4f::new(rgb.x, rgb.y, rgb.z, 1.0)
                }
                _ => {
                    let bg = self.config.background_color;
                    Vector4f::new(bg.x, bg.y, bg.z, 0.0)
                }
            },
            None => {
                let bg = self.config.background_color;
                Vector4f::new(bg.x, bg.y, bg.z, 0.0)
            }
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
pub struct PbrRenderer;

impl PbrRenderer {
    pub const TYPE_NAME: &'static str = "research_pbr";

    pub fn new() -> Self {
        Self
    }

    pub fn build_state(&self, scene: &Scene, params: &ParameterSet) -> Result<PbrRendererState> {
        let materials = scene.material_view();

        let mut background = background_color(params)?;
        let bg_material = params.get_int("bgMaterial", -1)?;
        if bg_material >= 0 {
            match materials.get(bg_material as usize) {
                Some(material) if material.emission != Vector3f::zeros() => background = material.emission,
                Some(material) => background = material.bsdf.albedo(),
                None => log::warn!("Background material {} does not exist.", bg_material),
            }
        }

        let config = PbrConfig {
            background_color: background,
            shadow_intensity: params.get_float("shadows", 0.0)?,
            timestamp: params.get_float("timestamp", 0.0)?,
            samples_per_pixel: samples_per_pixel(params)?,
            random_seed: random_seed(params)?,
        };
        let transfer_function = read_transfer_function(scene, params)?;
        let simulation_frame = bind_simulation_frame(scene, config.timestamp);

        let objects = scene.object_view();
        let surface_bsdfs: Vec<Arc<dyn BSDF>> = objects
            .iter()
            .map(|object| match object.material.and_then(|idx| materials.get(idx)) {
                Some(material) => material.bsdf.clone(),
                None => Arc::new(LambertianDiffuseBSDF::new(object.color)) as Arc<dyn BSDF>,
            })
            .collect();

        log::debug!("{}: {} objects, {} lights, {:?}", Self::TYPE_NAME, objects.len(),
                    scene.lights().len(), config);
        Ok(PbrRendererState {
            config,
            lights: scene.light_view(),
            materials,
            objects,
            surface_bsdfs,
            transfer_function,
            simulation_frame,
        })
    }
}

impl Renderer for PbrRenderer {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn configure(&self, scene: &Scene, params: &ParameterSet) -> Result<Arc<dyn ShadingState>> {
        Ok(Arc::new(self.build_state(scene, params)?))
    }
}
