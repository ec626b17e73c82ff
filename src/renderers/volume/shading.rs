// Copyright @yucwang 2026

use super::VolumeRendererState;
use crate::core::interaction::SurfaceIntersection;
use crate::core::light::LightSample;
use crate::core::rng::LcgRng;
use crate::core::scene::{closest_hit, SceneObject};
use crate::core::tangent_frame::{build_tangent_frame, local_to_world};
use crate::math::constants::{Float, Vector3f, Vector4f, FLOAT_MAX, PI};
use crate::math::ray::Ray3f;
use crate::math::warp::{sample_cosine_hemisphere, sample_uniform_cone, sample_uniform_sphere,
                        stratified_sample};
use crate::renderers::renderer::SampleId;

/// Accumulated opacity at which marching stops.
pub const OPACITY_SATURATION: Float = 0.999;
/// Upper bound on primary march samples; the step grows to still span the interval.
pub const MAX_MARCH_STEPS: usize = 4096;
const MIN_OCCLUSION_STEPS: u32 = 4;
const SURFACE_OFFSET: Float = 1e-3;
const GRADIENT_EPSILON: Float = 1e-6;

/// One composited step of a primary march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchStep {
    pub t: Float,
    pub value: Float,
    /// Step-corrected opacity of this sample.
    pub alpha: Float,
    pub accumulated_opacity: Float,
}

fn gradient_normal(grad: &Vector3f) -> Option<Vector3f> {
    let len = grad.norm();
    if len > GRADIENT_EPSILON && len.is_finite() {
        Some(-grad / len)
    } else {
        None
    }
}

impl VolumeRendererState {
    /// Same as `shade`, reporting every composited step to `observer`.
    /// Emission is composited with the sample alpha, `T * alpha * (color + emission)`.
    pub fn shade_traced<F: FnMut(&MarchStep)>(&self, ray: &Ray3f, sample: SampleId, mut observer: F) -> Vector4f {
        let mut rng = LcgRng::for_sample(self.config.random_seed, sample.pixel, sample.index);
        let hit = closest_hit(&self.objects, ray);
        let t_end = hit.as_ref().map_or(ray.max_t, |h| h.t());

        let mut color = Vector3f::zeros();
        let mut opacity: Float = 0.0;

        if let Some((t0, t1)) = self.volume_interval(ray, t_end) {
            let step = self.step_length(t1 - t0);
            let sample_min_t = 0.5 * self.field.min_spacing();
            let mut i = 0usize;
            while i < MAX_MARCH_STEPS {
                let t = t0 + (i as Float + 0.5) * step;
                if t >= t1 {
                    break;
                }
                i += 1;

                let p = ray.at(t);
                let value = match self.field.sample(&p) {
                    Some(value) => value,
                    None => continue,
                };
                let tf = self.transfer_function.evaluate(value);
                if !tf.is_visible() {
                    continue;
                }
                let alpha = self.corrected_opacity(tf.opacity, step);
                if alpha <= 0.0 {
                    continue;
                }

                let normal = gradient_normal(&self.field.gradient(&p, value));
                let shaded = self.modulate(&p, &ray.dir(), normal, &tf.color, sample_min_t, &mut rng);
                let transmittance = 1.0 - opacity;
                color += (shaded + tf.emission) * (transmittance * alpha);
                opacity += transmittance * alpha;

                observer(&MarchStep { t, value, alpha, accumulated_opacity: opacity });
                if opacity >= OPACITY_SATURATION {
                    break;
                }
            }
        }

        let transmittance = (1.0 - opacity).max(0.0);
        match hit {
            Some(hit) => {
                if transmittance > 0.0 {
                    color += self.shade_surface(ray, &hit, &mut rng) * transmittance;
                }
                opacity = 1.0;
            }
            None => color += self.config.background_color * transmittance,
        }

        Vector4f::new(color.x, color.y, color.z, opacity)
    }

    /// Overlap of `[ray.min_t, t_end]` with the field box, if anything can be sampled there.
    fn volume_interval(&self, ray: &Ray3f, t_end: Float) -> Option<(Float, Float)> {
        if !self.transfer_function.is_enabled() {
            return None;
        }
        let bbox = self.field.bbox()?;
        let (t0, t1) = bbox.ray_intersect_range(&ray.clipped(ray.min_t, t_end))?;
        if t1 > t0 && (t1 - t0).is_finite() {
            Some((t0, t1))
        } else {
            None
        }
    }

    pub(super) fn effective_epsilon(&self) -> Float {
        let eps = self.config.volume_epsilon;
        if eps > 0.0 && eps.is_finite() { eps } else { 1.0 }
    }

    fn step_length(&self, length: Float) -> Float {
        let steps = (self.config.samples_per_ray as Float / self.effective_epsilon())
            .min(MAX_MARCH_STEPS as Float);
        length / steps
    }

    /// Opacity of a table entry rescaled from the reference voxel length to `step`.
    fn corrected_opacity(&self, opacity: Float, step: Float) -> Float {
        if opacity >= 1.0 {
            return 1.0;
        }
        let ratio = step / self.field.min_spacing();
        (1.0 - (1.0 - opacity).powf(ratio)).clamp(0.0, 1.0)
    }

    /// Applies the configured shading mode, shadows and ambient occlusion to `base`.
    fn modulate(&self,
                p: &Vector3f,
                view_dir: &Vector3f,
                normal: Option<Vector3f>,
                base: &Vector3f,
                min_t: Float,
                rng: &mut LcgRng) -> Vector3f {
        let lit = if self.config.electron_shading_enabled {
            let rim = normal.map_or(0.0, |n| 1.0 - n.dot(view_dir).abs());
            base * (rim * self.mean_shadow(p, min_t, rng))
        } else if self.config.shading_enabled && !self.lights.is_empty() {
            let mut light_term = Vector3f::zeros();
            for light in self.lights.iter() {
                if let Some(ls) = light.sample(p) {
                    let cos = normal.map_or(1.0, |n| n.dot(&ls.direction).abs());
                    let attenuation = self.shadow_attenuation(p, &ls, min_t, rng);
                    light_term += ls.radiance * (cos * attenuation);
                }
            }
            base.component_mul(&light_term)
        } else {
            base * self.mean_shadow(p, min_t, rng)
        };

        lit * self.ambient_occlusion(p, normal, min_t, rng)
    }

    fn mean_shadow(&self, p: &Vector3f, min_t: Float, rng: &mut LcgRng) -> Float {
        if self.lights.is_empty() {
            return 1.0;
        }
        let total: Float = self
            .lights
            .iter()
            .map(|light| match light.sample(p) {
                Some(ls) => self.shadow_attenuation(p, &ls, min_t, rng),
                None => 1.0,
            })
            .sum();
        total / self.lights.len() as Float
    }

    fn shadow_attenuation(&self, p: &Vector3f, ls: &LightSample, min_t: Float, rng: &mut LcgRng) -> Float {
        let mut attenuation = 1.0;

        let hard = self.config.shadow_intensity.min(1.0);
        if hard > 0.0 {
            attenuation *= 1.0 - hard * self.occlusion(p, &ls.direction, min_t, ls.distance);
        }

        let soft = self.config.soft_shadow_intensity.min(1.0);
        if soft > 0.0 {
            let half_angle = 0.25 * PI * soft;
            let local = sample_uniform_cone(&rng.next_2d(), half_angle.cos());
            let (t, b) = build_tangent_frame(&ls.direction);
            let dir = local_to_world(&local, &t, &b, &ls.direction);
            attenuation *= 1.0 - soft * self.occlusion(p, &dir, min_t, ls.distance);
        }

        attenuation.max(0.0)
    }

    fn ambient_occlusion(&self, p: &Vector3f, normal: Option<Vector3f>, min_t: Float, rng: &mut LcgRng) -> Float {
        let strength = self.config.ao_strength;
        if strength <= 0.0 {
            return 1.0;
        }

        let count = self.config.ao_samples.max(1) as usize;
        let frame = normal.map(|n| {
            let (t, b) = build_tangent_frame(&n);
            (t, b, n)
        });
        let mut occluded = 0.0;
        for idx in 0..count {
            let u = stratified_sample(idx, count, &rng.next_2d());
            let dir = match &frame {
                Some((t, b, n)) => local_to_world(&sample_cosine_hemisphere(&u), t, b, n),
                None => sample_uniform_sphere(&u),
            };
            occluded += self.occlusion(p, &dir, min_t, self.config.ao_distance);
        }

        (1.0 - strength * occluded / count as Float).clamp(0.0, 1.0)
    }

    /// Fraction of light blocked between `origin` and `max_distance` along `dir`.
    /// Opaque objects block fully; the field blocks by its accumulated opacity.
    fn occlusion(&self, origin: &Vector3f, dir: &Vector3f, min_t: Float, max_distance: Float) -> Float {
        if dir.norm_squared() <= 0.0 {
            return 0.0;
        }
        let max_t = if max_distance.is_finite() { max_distance } else { FLOAT_MAX };
        if max_t <= min_t {
            return 0.0;
        }
        let ray = Ray3f::new(*origin, *dir, Some(min_t), Some(max_t));
        if closest_hit(&self.objects, &ray).is_some() {
            return 1.0;
        }
        if !self.transfer_function.is_enabled() {
            return 0.0;
        }
        let (t0, t1) = match self.field.bbox().and_then(|bbox| bbox.ray_intersect_range(&ray)) {
            Some(range) if range.1 > range.0 => range,
            _ => return 0.0,
        };

        let steps = (self.config.samples_per_ray / 2).max(MIN_OCCLUSION_STEPS);
        let step = (t1 - t0) / steps as Float;
        let mut occlusion: Float = 0.0;
        for i in 0..steps {
            let t = t0 + (i as Float + 0.5) * step;
            let value = match self.field.sample(&ray.at(t)) {
                Some(value) => value,
                None => continue,
            };
            let tf = self.transfer_function.evaluate(value);
            if !tf.is_visible() {
                continue;
            }
            occlusion += (1.0 - occlusion) * self.corrected_opacity(tf.opacity, step);
            if occlusion >= OPACITY_SATURATION {
                break;
            }
        }
        occlusion.min(1.0)
    }

    fn shade_surface(&self, ray: &Ray3f, hit: &SurfaceIntersection, rng: &mut LcgRng) -> Vector3f {
        let object = match hit.object_index().and_then(|idx| self.objects.get(idx)) {
            Some(object) => object,
            None => return self.config.background_color,
        };
        let base = self.surface_color(object);

        let mut normal = hit.geo_normal();
        if normal.dot(&ray.dir()) > 0.0 {
            normal = -normal;
        }
        let p = hit.p() + normal * SURFACE_OFFSET;
        self.modulate(&p, &ray.dir(), Some(normal), &base, 0.0, rng)
    }

    /// Object colour, or the transfer function of the object's simulation value.
    fn surface_color(&self, object: &SceneObject) -> Vector3f {
        let frame = match &self.simulation_frame {
            Some(frame) => frame,
            None => return object.color,
        };
        object
            .material
            .and_then(|idx| self.materials.get(idx))
            .and_then(|material| material.simulation_offset)
            .and_then(|offset| frame.get(offset).copied())
            .map(|value| self.transfer_function.evaluate(value))
            .filter(|tf| tf.is_visible())
            .map_or(object.color, |tf| tf.color)
    }
}
