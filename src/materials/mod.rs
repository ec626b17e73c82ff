// Copyright @yucwang 2026

pub mod lambertian_diffuse;
pub mod microfacet;
pub mod roughconductor;
