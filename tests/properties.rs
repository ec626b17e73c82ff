// Copyright @yucwang 2026

mod common;

use common::{field_params, field_scene, through_field};
use meringue::core::params::{ParamValue, ParameterSet};
use meringue::core::scene::Scene;
use meringue::lights::point::PointLight;
use meringue::math::constants::{Float, Vector3f, Vector4f};
use meringue::math::ray::Ray3f;
use meringue::renderers::volume::VolumeRenderer;
use meringue::renderers::{SampleId, ShadingState};
use meringue::volumes::transfer_function::TransferFunction;
use proptest::prelude::*;
use std::sync::Arc;

fn ramp_table(size: usize) -> Arc<[Vector4f]> {
    (0..size)
        .map(|i| {
            let v = (i + 1) as Float / size as Float;
            Vector4f::new(v, 1.0 - v, 0.5, v)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn transfer_function_is_total(size in 1usize..64,
                                  min in -100.0f32..100.0,
                                  range in 0.01f32..1000.0,
                                  s in -1.0e6f32..1.0e6) {
        let tf = TransferFunction::new(Some(ramp_table(size)), None, size as i32, min, range, min);
        let x = tf.table_coordinate(s).expect("finite sample");
        prop_assert!(x >= 0.0 && x <= (size - 1) as Float);

        let sample = tf.evaluate(s);
        prop_assert!(sample.opacity >= 0.0 && sample.opacity <= 1.0);
        prop_assert!(sample.color.iter().all(|c| c.is_finite()));
        prop_assert_eq!(sample.emission, Vector3f::zeros());
    }

    #[test]
    fn below_threshold_is_invisible(threshold in -50.0f32..50.0, below in 0.001f32..100.0) {
        let tf = TransferFunction::new(Some(ramp_table(8)), None, 8, -100.0, 200.0, threshold);
        let sample = tf.evaluate(threshold - below);
        prop_assert_eq!(sample.opacity, 0.0);
        prop_assert!(!sample.is_visible());
    }

    #[test]
    fn missing_field_shades_background(r in 0.0f32..1.0, g in 0.0f32..1.0, b in 0.0f32..1.0,
                                       dx in -1.0f32..1.0, dy in -1.0f32..1.0,
                                       px in 0u32..512, py in 0u32..512) {
        let mut scene = Scene::new();
        scene.set_transfer_function_data(Some(ramp_table(4)), None);
        let params = ParameterSet::new()
            .with("bgColor", ParamValue::Vec3f(Vector3f::new(r, g, b)))
            .with("transferFunctionSize", ParamValue::Int(4))
            .with("transferFunctionRange", ParamValue::Float(1.0))
            .with("aoWeight", ParamValue::Float(1.0));
        let state = VolumeRenderer::new().build_state(&scene, &params).expect("configure");

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(dx, dy, 1.0), None, None);
        prop_assert_eq!(state.shade(&ray, SampleId::new(px, py, 0)), Vector4f::new(r, g, b, 0.0));
    }

    #[test]
    fn configure_is_idempotent(shadows in 0.0f32..1.0,
                               soft in 0.0f32..1.0,
                               ao in 0.0f32..1.0,
                               spr in 1i32..128,
                               seed in any::<i32>()) {
        let scene = field_scene(4, Vector4f::new(1.0, 1.0, 1.0, 0.5), |x, y, z| (x + y + z) as u8 * 20);
        let params = field_params(4)
            .with("shadows", ParamValue::Float(shadows))
            .with("softShadows", ParamValue::Float(soft))
            .with("aoWeight", ParamValue::Float(ao))
            .with("volumeSamplesPerRay", ParamValue::Int(spr))
            .with("randomNumber", ParamValue::Int(seed));

        let renderer = VolumeRenderer::new();
        let first = renderer.build_state(&scene, &params).expect("configure");
        let second = renderer.build_state(&scene, &params).expect("configure");
        prop_assert_eq!(first.config(), second.config());
        prop_assert_eq!(first.field(), second.field());
        prop_assert_eq!(first.transfer_function(), second.transfer_function());
    }

    #[test]
    fn fixed_seed_is_reproducible(seed in any::<i32>(), px in 0u32..64, py in 0u32..64, index in 0u32..8) {
        let mut scene = field_scene(4, Vector4f::new(0.8, 0.6, 0.4, 0.4), |x, _, z| (x * 40 + z * 10) as u8);
        scene.add_light(Arc::new(PointLight::new(Vector3f::new(2.0, 8.0, 2.0), Vector3f::new(20.0, 20.0, 20.0))));
        let params = field_params(4)
            .with("shadows", ParamValue::Float(0.7))
            .with("softShadows", ParamValue::Float(0.5))
            .with("aoWeight", ParamValue::Float(0.8))
            .with("aoDistance", ParamValue::Float(2.0))
            .with("volumeSamplesPerRay", ParamValue::Int(8))
            .with("randomNumber", ParamValue::Int(seed));

        let a = VolumeRenderer::new().build_state(&scene, &params).expect("configure");
        let b = VolumeRenderer::new().build_state(&scene, &params).expect("configure");
        let sample = SampleId::new(px, py, index);
        prop_assert_eq!(a.shade(&through_field(4), sample), b.shade(&through_field(4), sample));
    }

    #[test]
    fn accumulated_opacity_never_decreases(values in proptest::collection::vec(any::<u8>(), 64),
                                           ox in 0.5f32..3.5, oy in 0.5f32..3.5,
                                           spr in 1i32..64) {
        let mut scene = Scene::new();
        scene.set_volume_data(Some(meringue::volumes::field::FieldData::U8(values.into())));
        scene.set_transfer_function_data(Some(ramp_table(16)), None);
        let params = field_params(4)
            .with("transferFunctionSize", ParamValue::Int(16))
            .with("volumeSamplesPerRay", ParamValue::Int(spr));
        let state = VolumeRenderer::new().build_state(&scene, &params).expect("configure");

        let ray = Ray3f::new(Vector3f::new(ox, oy, -1.0), Vector3f::new(0.1, -0.05, 1.0), None, None);
        let mut last = 0.0;
        let mut monotone = true;
        let out = state.shade_traced(&ray, SampleId::default(), |step| {
            monotone &= step.accumulated_opacity >= last && step.accumulated_opacity <= 1.0;
            last = step.accumulated_opacity;
        });
        prop_assert!(monotone);
        prop_assert!(out.w >= last);
    }
}
