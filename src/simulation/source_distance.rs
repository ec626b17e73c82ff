// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};
use crate::simulation::SimulationHandler;
use std::sync::Arc;

/// Per-element distance to a moving source, one source position per frame.
///
/// Element `i` of frame `f` holds `scale * |elements[i] - sources[f]|`.
#[derive(Clone)]
pub struct SourceDistanceHandler {
    elements: Arc<[Vector3f]>,
    sources: Arc<[Vector3f]>,
    scale: Float,
}

impl SourceDistanceHandler {
    pub fn new(elements: Vec<Vector3f>, sources: Vec<Vector3f>, scale: Float) -> Self {
        Self { elements: elements.into(), sources: sources.into(), scale }
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

impl SimulationHandler for SourceDistanceHandler {
    fn frame_data(&self, frame: u32) -> Option<Arc<[Float]>> {
        let source = self.sources.get(frame as usize)?;
        let values: Vec<Float> = self
            .elements
            .iter()
            .map(|p| (p - source).norm() * self.scale)
            .collect();
        Some(values.into())
    }

    fn is_ready(&self) -> bool {
        !self.sources.is_empty()
    }

    fn frame_count(&self) -> u32 {
        self.sources.len() as u32
    }

    fn clone_handler(&self) -> Box<dyn SimulationHandler> {
        Box::new(self.clone())
    }
}
