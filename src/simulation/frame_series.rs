// Copyright @yucwang 2026

use crate::math::constants::Float;
use crate::simulation::SimulationHandler;
use std::sync::Arc;

/// Pre-decoded frames held in memory. Frame indices past the end wrap around.
#[derive(Clone)]
pub struct FrameSeriesHandler {
    frames: Arc<[Arc<[Float]>]>,
}

impl FrameSeriesHandler {
    pub fn new(frames: Vec<Vec<Float>>) -> Self {
        let frames: Vec<Arc<[Float]>> = frames.into_iter().map(Arc::from).collect();
        Self { frames: frames.into() }
    }
}

impl SimulationHandler for FrameSeriesHandler {
    fn frame_data(&self, frame: u32) -> Option<Arc<[Float]>> {
        if self.frames.is_empty() {
            return None;
        }
        let idx = frame as usize % self.frames.len();
        Some(self.frames[idx].clone())
    }

    fn is_ready(&self) -> bool {
        !self.frames.is_empty()
    }

    fn frame_count(&self) -> u32 {
        self.frames.len() as u32
    }

    fn clone_handler(&self) -> Box<dyn SimulationHandler> {
        Box::new(self.clone())
    }
}
