// Copyright @yucwang 2026

#![allow(dead_code)]

use meringue::core::params::{ParamValue, ParameterSet};
use meringue::core::scene::Scene;
use meringue::math::constants::{Float, Vector3f, Vector3i, Vector4f};
use meringue::math::ray::Ray3f;
use meringue::volumes::field::FieldData;
use std::sync::Arc;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Scene with a `dims^3` field filled by `value(x, y, z)` and a constant table.
pub fn field_scene<F: Fn(usize, usize, usize) -> u8>(dims: usize, entry: Vector4f, value: F) -> Scene {
    let mut data = Vec::with_capacity(dims * dims * dims);
    for z in 0..dims {
        for y in 0..dims {
            for x in 0..dims {
                data.push(value(x, y, z));
            }
        }
    }
    let mut scene = Scene::new();
    scene.set_volume_data(Some(FieldData::U8(data.into())));
    let table: Arc<[Vector4f]> = vec![entry; 2].into();
    scene.set_transfer_function_data(Some(table), None);
    scene
}

pub fn field_params(dims: usize) -> ParameterSet {
    let d = dims as i32;
    ParameterSet::new()
        .with("volumeDimensions", ParamValue::Vec3i(Vector3i::new(d, d, d)))
        .with("transferFunctionSize", ParamValue::Int(2))
        .with("transferFunctionRange", ParamValue::Float(255.0))
}

/// Ray along +z through the centre of the x/y extent of a `dims^3` field.
pub fn through_field(dims: usize) -> Ray3f {
    let c = dims as Float * 0.5;
    Ray3f::new(Vector3f::new(c, c, -3.0), Vector3f::new(0.0, 0.0, 1.0), None, None)
}
