// Copyright @yucwang 2026

use crate::core::error::{ConfigError, Result};
use crate::renderers::contours::ContoursRenderer;
use crate::renderers::handle::RendererHandle;
use crate::renderers::pbr::PbrRenderer;
use crate::renderers::renderer::Renderer;
use crate::renderers::volume::VolumeRenderer;
use std::collections::BTreeMap;

pub type RendererConstructor = fn() -> Box<dyn Renderer>;

/// Maps renderer type identifiers to constructors. Built explicitly by the
/// host at startup; there is no process-wide registration.
#[derive(Default)]
pub struct RendererRegistry {
    constructors: BTreeMap<String, RendererConstructor>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the volume, PBR and contour renderers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(VolumeRenderer::TYPE_NAME, volume_renderer);
        registry.register(PbrRenderer::TYPE_NAME, pbr_renderer);
        registry.register(ContoursRenderer::TYPE_NAME, contours_renderer);
        registry
    }

    /// Replaces any constructor already registered under `name`.
    pub fn register(&mut self, name: &str, constructor: RendererConstructor) {
        if self.constructors.insert(name.to_string(), constructor).is_some() {
            log::warn!("Renderer {} registered twice, keeping the latest constructor.", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(|k| k.as_str())
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn Renderer>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| ConfigError::UnknownRenderer(name.to_string()))?;
        Ok(constructor())
    }

    pub fn create_handle(&self, name: &str) -> Result<RendererHandle> {
        Ok(RendererHandle::new(self.create(name)?))
    }
}

fn volume_renderer() -> Box<dyn Renderer> {
    Box::new(VolumeRenderer::new())
}

fn pbr_renderer() -> Box<dyn Renderer> {
    Box::new(PbrRenderer::new())
}

fn contours_renderer() -> Box<dyn Renderer> {
    Box::new(ContoursRenderer::new())
}
