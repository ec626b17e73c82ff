// Copyright @yucwang 2026

use crate::core::error::{ConfigError, Result};
use crate::math::constants::{Float, Int, Vector3f, Vector3i};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Float(Float),
    Int(Int),
    Bool(bool),
    Vec3f(Vector3f),
    Vec3i(Vector3i),
}

/// Named scalar and vector parameters handed to a renderer on every commit.
///
/// Getters take the default used when a name is absent. Numeric kinds convert
/// into each other (an integer flag may be read as a bool and vice versa); a
/// vector where a scalar is expected is an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: ParamValue) -> &mut Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn with(mut self, name: &str, value: ParamValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.values.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_float(&self, name: &str, default: Float) -> Result<Float> {
        match self.values.get(name) {
            None => Ok(default),
            Some(ParamValue::Float(v)) => Ok(*v),
            Some(ParamValue::Int(v)) => Ok(*v as Float),
            Some(ParamValue::Bool(v)) => Ok(if *v { 1.0 } else { 0.0 }),
            Some(_) => Err(mismatch(name, "a float")),
        }
    }

    pub fn get_int(&self, name: &str, default: Int) -> Result<Int> {
        match self.values.get(name) {
            None => Ok(default),
            Some(ParamValue::Int(v)) => Ok(*v),
            Some(ParamValue::Bool(v)) => Ok(*v as Int),
            Some(ParamValue::Float(v)) if v.fract() == 0.0 => Ok(*v as Int),
            Some(_) => Err(mismatch(name, "an integer")),
        }
    }

    pub fn get_bool(&self, name: &str, default: bool) -> Result<bool> {
        match self.values.get(name) {
            None => Ok(default),
            Some(ParamValue::Bool(v)) => Ok(*v),
            Some(ParamValue::Int(v)) => Ok(*v != 0),
            Some(ParamValue::Float(v)) => Ok(*v != 0.0),
            Some(_) => Err(mismatch(name, "a boolean")),
        }
    }

    pub fn get_vec3f(&self, name: &str, default: Vector3f) -> Result<Vector3f> {
        match self.values.get(name) {
            None => Ok(default),
            Some(ParamValue::Vec3f(v)) => Ok(*v),
            Some(ParamValue::Vec3i(v)) => Ok(v.map(|c| c as Float)),
            Some(_) => Err(mismatch(name, "a float triple")),
        }
    }

    pub fn get_vec3i(&self, name: &str, default: Vector3i) -> Result<Vector3i> {
        match self.values.get(name) {
            None => Ok(default),
            Some(ParamValue::Vec3i(v)) => Ok(*v),
            Some(_) => Err(mismatch(name, "an integer triple")),
        }
    }
}

fn mismatch(name: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidParameter { name: name.to_string(), expected }
}
