// Copyright @yucwang 2026

//! Ray-marched scalar-field renderer with shadows, soft shadows, ambient
//! occlusion and an electron-microscope style rim shading mode.

pub mod shading;

use crate::core::error::{ConfigError, Result};
use crate::core::light::LightView;
use crate::core::material::MaterialView;
use crate::core::params::ParameterSet;
use crate::core::scene::{ObjectView, Scene};
use crate::math::constants::{Float, Vector3f, Vector3i, Vector4f};
use crate::math::ray::Ray3f;
use crate::renderers::common::{background_color, bind_simulation_frame, random_seed,
                               read_transfer_function, samples_per_pixel};
use crate::renderers::renderer::{Renderer, SampleId, ShadingState};
use crate::volumes::field::{checked_voxel_count, FieldData, ScalarField};
use crate::volumes::transfer_function::TransferFunction;
use std::sync::Arc;

pub use shading::{MarchStep, MAX_MARCH_STEPS};

/// Scalar settings of one configuration generation.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeConfig {
    pub background_color: Vector3f,
    pub shadow_intensity: Float,
    pub soft_shadow_intensity: Float,
    pub ao_strength: Float,
    pub ao_distance: Float,
    pub ao_samples: u32,
    pub shading_enabled: bool,
    pub electron_shading_enabled: bool,
    pub random_seed: u64,
    pub timestamp: Float,
    pub samples_per_pixel: u32,
    pub samples_per_ray: u32,
    pub volume_epsilon: Float,
}

impl VolumeConfig {
    pub fn from_params(params: &ParameterSet) -> Result<Self> {
        Ok(Self {
            background_color: background_color(params)?,
            shadow_intensity: params.get_float("shadows", 0.0)?,
            soft_shadow_intensity: params.get_float("softShadows", 0.0)?,
            ao_strength: params.get_float("aoWeight", 0.0)?,
            ao_distance: params.get_float("aoDistance", 1e20)?,
            ao_samples: params.get_int("aoSamples", 4)?.max(1) as u32,
            shading_enabled: params.get_bool("shadingEnabled", true)?,
            electron_shading_enabled: params.get_bool("electronShading", false)?,
            random_seed: random_seed(params)?,
            timestamp: params.get_float("timestamp", 0.0)?,
            samples_per_pixel: samples_per_pixel(params)?,
            samples_per_ray: params.get_int("volumeSamplesPerRay", 32)?.max(1) as u32,
            volume_epsilon: params.get_float("volumeEpsilon", 1.0)?,
        })
    }
}

/// Immutable state served to every shade call of one generation.
pub struct VolumeRendererState {
    config: VolumeConfig,
    lights: LightView,
    materials: MaterialView,
    objects: ObjectView,
    field: ScalarField,
    transfer_function: TransferFunction,
    simulation_frame: Option<Arc<[Float]>>,
}

impl VolumeRendererState {
    pub fn config(&self) -> &VolumeConfig {
        &self.config
    }

    pub fn field(&self) -> &ScalarField {
        &self.field
    }

    pub fn transfer_function(&self) -> &TransferFunction {
        &self.transfer_function
    }

    pub fn simulation_frame(&self) -> Option<&[Float]> {
        self.simulation_frame.as_deref()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }
}

impl ShadingState for VolumeRendererState {
    fn shade(&self, ray: &Ray3f, sample: SampleId) -> Vector4f {
        self.shade_traced(ray, sample, |_| {})
    }

    fn samples_per_pixel(&self) -> u32 {
        self.config.samples_per_pixel
    }

    fn random_seed(&self) -> u64 {
        self.config.random_seed
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct VolumeRenderer;

impl VolumeRenderer {
    pub const TYPE_NAME: &'static str = "research_volume";

    pub fn new() -> Self {
        Self
    }

    /// Validates every input before building anything, so an error never
    /// leaves a half-built state behind.
    pub fn build_state(&self, scene: &Scene, params: &ParameterSet) -> Result<VolumeRendererState> {
        let config = VolumeConfig::from_params(params)?;

        let dimensions = params.get_vec3i("volumeDimensions", Vector3i::zeros())?;
        if dimensions.iter().any(|d| *d < 0) {
            return Err(ConfigError::InvalidDimensions(dimensions));
        }
        let spacing = params.get_vec3f("volumeElementSpacing", Vector3f::new(1.0, 1.0, 1.0))?;
        let offset = params.get_vec3f("volumeOffset", Vector3f::zeros())?;
        let transfer_function = read_transfer_function(scene, params)?;

        let simulation_frame = bind_simulation_frame(scene, config.timestamp);
        let voxel_count = checked_voxel_count(&dimensions).unwrap_or_else(|| {
            log::warn!("A {}x{}x{} field is not addressable, volume disabled.",
                       dimensions.x, dimensions.y, dimensions.z);
            0
        });
        let data = match scene.volume_data() {
            Some(data) => Some(data.clone()),
            None => match &simulation_frame {
                Some(frame) if voxel_count > 0 && frame.len() == voxel_count => {
                    Some(FieldData::F32(frame.clone()))
                }
                Some(frame) => {
                    log::debug!("Simulation frame of {} values does not fill a {}x{}x{} field.",
                                frame.len(), dimensions.x, dimensions.y, dimensions.z);
                    None
                }
                None => None,
            },
        };

        let field = ScalarField::new(data, dimensions, spacing, offset);
        if field.voxel_count() > 0 && scene.volume_data().is_some() && !field.is_bound() {
            log::warn!("Volume buffer does not cover a {}x{}x{} field, volume disabled.",
                       dimensions.x, dimensions.y, dimensions.z);
        }

        let state = VolumeRendererState {
            config,
            lights: scene.light_view(),
            materials: scene.material_view(),
            objects: scene.object_view(),
            field,
            transfer_function,
            simulation_frame,
        };
        log::debug!("{}: {} lights, {} objects, field bound: {}, transfer function enabled: {}.",
                    Self::TYPE_NAME, state.lights.len(), state.objects.len(),
                    state.field.is_bound(), state.transfer_function.is_enabled());
        log::debug!("{}: {:?}", Self::TYPE_NAME, state.config);
        if state.config.samples_per_ray as Float / state.effective_epsilon() > MAX_MARCH_STEPS as Float {
            log::debug!("{}: march capped at {} steps per ray.", Self::TYPE_NAME, MAX_MARCH_STEPS);
        }
        Ok(state)
    }
}

impl Renderer for VolumeRenderer {
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
    use crate::simulation::frame_series::FrameSeriesHandler;

    #[test]
    fn defaults_match_parameter_table() {
        let config = VolumeConfig::from_params(&ParameterSet::new()).expect("defaults");
        assert_eq!(config.background_color, Vector3f::new(1.0, 1.0, 1.0));
        assert_eq!(config.samples_per_ray, 32);
        assert_eq!(config.ao_samples, 4);
        assert_eq!(config.ao_distance, 1e20);
        assert!(config.shading_enabled);
        assert!(!config.electron_shading_enabled);
        assert_eq!(config.volume_epsilon, 1.0);
    }

    #[test]
    fn negative_dimensions_are_rejected() {
        let params = ParameterSet::new()
            .with("volumeDimensions", ParamValue::Vec3i(Vector3i::new(4, -1, 4)));
        let err = VolumeRenderer::new().build_state(&Scene::new(), &params).err();
        assert_eq!(err, Some(ConfigError::InvalidDimensions(Vector3i::new(4, -1, 4))));
    }

    #[test]
    fn unaddressable_dimensions_disable_the_volume() {
        let mut scene = Scene::new();
        scene.set_volume_data(Some(FieldData::U8(vec![255u8; 8].into())));
        let huge = Vector3i::new(i32::MAX, i32::MAX, i32::MAX);
        let params = ParameterSet::new().with("volumeDimensions", ParamValue::Vec3i(huge));

        let state = VolumeRenderer::new().build_state(&scene, &params).expect("configure");
        assert!(!state.field().is_bound());
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        assert_eq!(state.shade(&ray, SampleId::default()), Vector4f::new(1.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn wrong_parameter_kind_is_rejected() {
        let params = ParameterSet::new().with("bgColor", ParamValue::Int(3));
        assert!(matches!(
            VolumeRenderer::new().build_state(&Scene::new(), &params),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn simulation_frame_feeds_the_field() {
        let mut scene = Scene::new();
        scene.set_simulation(Some(Box::new(FrameSeriesHandler::new(vec![vec![0.5; 8], vec![0.5; 3]]))));
        let params = ParameterSet::new()
            .with("volumeDimensions", ParamValue::Vec3i(Vector3i::new(2, 2, 2)));

        let state = VolumeRenderer::new().build_state(&scene, &params).expect("configure");
        assert!(state.field().is_bound());

        let params = params.with("timestamp", ParamValue::Float(1.0));
        let state = VolumeRenderer::new().build_state(&scene, &params).expect("configure");
        assert!(!state.field().is_bound());
        assert_eq!(state.simulation_frame().map(|f| f.len()), Some(3));
    }
}
