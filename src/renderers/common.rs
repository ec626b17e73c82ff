// Copyright @yucwang 2026

//! Parameter handling shared by the renderer variants.

use crate::core::error::{ConfigError, Result};
use crate::core::params::ParameterSet;
use crate::core::scene::Scene;
use crate::math::constants::{Float, Vector3f};
use crate::simulation::frame_for_timestamp;
use crate::volumes::transfer_function::{TransferFunction, TransferFunctionInterpolation};
use std::sync::Arc;

/// `bgColor`, white when absent.
pub fn background_color(params: &ParameterSet) -> Result<Vector3f> {
    params.get_vec3f("bgColor", Vector3f::new(1.0, 1.0, 1.0))
}

/// `spp`, at least one.
pub fn samples_per_pixel(params: &ParameterSet) -> Result<u32> {
    Ok(params.get_int("spp", 1)?.max(1) as u32)
}

pub fn random_seed(params: &ParameterSet) -> Result<u64> {
    Ok(params.get_int("randomNumber", 0)? as u32 as u64)
}

/// Transfer function from the scene tables and the `transferFunction*` parameters.
pub fn read_transfer_function(scene: &Scene, params: &ParameterSet) -> Result<TransferFunction> {
    let size = params.get_int("transferFunctionSize", 0)?;
    let min_value = params.get_float("transferFunctionMinValue", 0.0)?;
    let range = params.get_float("transferFunctionRange", 0.0)?;
    let threshold = params.get_float("threshold", min_value)?;
    let interpolation = TransferFunctionInterpolation::from_param(
        params.get_int("transferFunctionInterpolation", 1)?,
    );

    let diffuse = scene.transfer_function_diffuse().cloned();
    if diffuse.is_some() && !(range > 0.0) {
        return Err(ConfigError::InvalidTransferFunctionDomain { range });
    }

    Ok(TransferFunction::new(
        diffuse,
        scene.transfer_function_emission().cloned(),
        size,
        min_value,
        range,
        threshold,
    )
    .with_interpolation(interpolation))
}

/// Simulation values for the frame selected by `timestamp`, if the scene has a
/// ready provider that can serve it.
pub fn bind_simulation_frame(scene: &Scene, timestamp: Float) -> Option<Arc<[Float]>> {
    let simulation = scene.simulation()?;
    if !simulation.is_ready() {
        log::debug!("Simulation handler not ready, frame left unbound.");
        return None;
    }
    let frame = frame_for_timestamp(timestamp);
    let data = simulation.frame_data(frame);
    if data.is_none() {
        log::warn!("Simulation frame {} is not available.", frame);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::ParamValue;
    use crate::math::constants::Vector4f;
    use crate::simulation::frame_series::FrameSeriesHandler;

    #[test]
    fn transfer_domain_checked_only_with_table() {
        let mut scene = Scene::new();
        let params = ParameterSet::new().with("transferFunctionRange", ParamValue::Float(0.0));
        assert!(read_transfer_function(&scene, &params).is_ok());

        let table: Arc<[Vector4f]> = vec![Vector4f::new(1.0, 1.0, 1.0, 1.0); 2].into();
        scene.set_transfer_function_data(Some(table), None);
        assert_eq!(
            read_transfer_function(&scene, &params).err(),
            Some(ConfigError::InvalidTransferFunctionDomain { range: 0.0 })
        );
    }

    #[test]
    fn threshold_defaults_to_min_value() {
        let scene = Scene::new();
        let params = ParameterSet::new().with("transferFunctionMinValue", ParamValue::Float(3.0));
        let tf = read_transfer_function(&scene, &params).expect("valid");
        assert_eq!(tf.threshold(), 3.0);
    }

    #[test]
    fn simulation_frame_follows_timestamp() {
        let mut scene = Scene::new();
        assert!(bind_simulation_frame(&scene, 0.0).is_none());
        scene.set_simulation(Some(Box::new(FrameSeriesHandler::new(vec![vec![1.0], vec![2.0]]))));
        let frame = bind_simulation_frame(&scene, 1.5).expect("frame");
        assert_eq!(&*frame, &[2.0]);
    }
}
