// Copyright @yucwang 2026

pub mod common;
pub mod contours;
pub mod frame;
pub mod handle;
pub mod pbr;
pub mod registry;
pub mod renderer;
pub mod volume;

pub use handle::RendererHandle;
pub use registry::RendererRegistry;
pub use renderer::{Renderer, SampleId, ShadingState};
