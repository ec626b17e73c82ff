// Copyright @yucwang 2021

pub mod bsdf;
pub mod error;
pub mod interaction;
pub mod light;
pub mod material;
pub mod params;
pub mod rng;
pub mod scene;
pub mod sensor;
pub mod shape;
pub mod tangent_frame;
