// Copyright @yucwang 2026

//! Time-varying per-element scalar data consumed by the renderers.

pub mod frame_series;
pub mod source_distance;

use crate::math::constants::Float;
use std::sync::Arc;

pub trait SimulationHandler: Send + Sync {
    /// Values for `frame`, `None` while the frame is not available.
    fn frame_data(&self, frame: u32) -> Option<Arc<[Float]>>;

    fn is_ready(&self) -> bool;

    fn frame_count(&self) -> u32;

    /// Independent copy for use by another renderer instance.
    fn clone_handler(&self) -> Box<dyn SimulationHandler>;
}

/// Frame index selected by a renderer timestamp. Negative and non-finite
/// timestamps select frame 0.
pub fn frame_for_timestamp(timestamp: Float) -> u32 {
    if timestamp.is_finite() && timestamp > 0.0 {
        timestamp.floor().min(u32::MAX as Float) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_floors_to_frame() {
        assert_eq!(frame_for_timestamp(0.0), 0);
        assert_eq!(frame_for_timestamp(2.9), 2);
        assert_eq!(frame_for_timestamp(-4.0), 0);
        assert_eq!(frame_for_timestamp(Float::NAN), 0);
    }
}
