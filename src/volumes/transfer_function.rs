// Copyright @yucwang 2026

use crate::math::constants::{Float, Int, Vector3f, Vector4f};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferFunctionInterpolation {
    Nearest,
    Linear,
}

impl TransferFunctionInterpolation {
    /// Parameter encoding: 0 is nearest, anything else linear.
    pub fn from_param(value: Int) -> Self {
        if value == 0 {
            TransferFunctionInterpolation::Nearest
        } else {
            TransferFunctionInterpolation::Linear
        }
    }
}

/// Colour, opacity and emission for one scalar value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransferSample {
    pub color: Vector3f,
    pub opacity: Float,
    pub emission: Vector3f,
}

impl TransferSample {
    pub fn transparent() -> Self {
        Self { color: Vector3f::zeros(), opacity: 0.0, emission: Vector3f::zeros() }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Piecewise-linear lookup table over the scalar window `[min_value, min_value + range]`.
///
/// `diffuse` entries carry rgb plus opacity. Values below `threshold` are not
/// visible whatever the table says.
#[derive(Clone, Debug)]
pub struct TransferFunction {
    diffuse: Option<Arc<[Vector4f]>>,
    emission: Option<Arc<[Vector3f]>>,
    size: Int,
    min_value: Float,
    range: Float,
    threshold: Float,
    interpolation: TransferFunctionInterpolation,
}

impl Default for TransferFunction {
    fn default() -> Self {
        Self::disabled()
    }
}

impl PartialEq for TransferFunction {
    fn eq(&self, other: &Self) -> bool {
        fn same<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
            match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            }
        }
        same(&self.diffuse, &other.diffuse)
            && same(&self.emission, &other.emission)
            && self.size == other.size
            && self.min_value == other.min_value
            && self.range == other.range
            && self.threshold == other.threshold
            && self.interpolation == other.interpolation
    }
}

impl TransferFunction {
    pub fn new(diffuse: Option<Arc<[Vector4f]>>,
               emission: Option<Arc<[Vector3f]>>,
               size: Int,
               min_value: Float,
               range: Float,
               threshold: Float) -> Self {
        Self {
            diffuse,
            emission,
            size,
            min_value,
            range,
            threshold,
            interpolation: TransferFunctionInterpolation::Linear,
        }
    }

    pub fn disabled() -> Self {
        Self::new(None, None, 0, 0.0, 0.0, 0.0)
    }

    pub fn with_interpolation(mut self, interpolation: TransferFunctionInterpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn min_value(&self) -> Float {
        self.min_value
    }

    pub fn range(&self) -> Float {
        self.range
    }

    pub fn threshold(&self) -> Float {
        self.threshold
    }

    pub fn interpolation(&self) -> TransferFunctionInterpolation {
        self.interpolation
    }

    /// Number of usable table entries, zero when the table cannot be sampled.
    pub fn effective_size(&self) -> usize {
        let table_len = self.diffuse.as_ref().map_or(0, |d| d.len());
        if self.size <= 0 || !(self.range > 0.0) {
            return 0;
        }
        (self.size as usize).min(table_len)
    }

    pub fn is_enabled(&self) -> bool {
        self.effective_size() > 0
    }

    /// Continuous table coordinate of `value`, clamped to `[0, size - 1]`.
    pub fn table_coordinate(&self, value: Float) -> Option<Float> {
        let size = self.effective_size();
        if size == 0 || !value.is_finite() {
            return None;
        }
        let last = (size - 1) as Float;
        let x = (value - self.min_value) / self.range * last;
        Some(x.max(0.0).min(last))
    }

    pub fn evaluate(&self, value: Float) -> TransferSample {
        let x = match self.table_coordinate(value) {
            Some(x) => x,
            None => return TransferSample::transparent(),
        };
        if value < self.threshold {
            return TransferSample::transparent();
        }
        let diffuse = match &self.diffuse {
            Some(diffuse) => diffuse,
            None => return TransferSample::transparent(),
        };
        let last = self.effective_size() - 1;

        let (rgba, emission) = match self.interpolation {
            TransferFunctionInterpolation::Nearest => {
                let idx = (x.round() as usize).min(last);
                (diffuse[idx], self.emission_at(idx))
            }
            TransferFunctionInterpolation::Linear => {
                let i0 = (x.floor() as usize).min(last);
                let i1 = (i0 + 1).min(last);
                let t = x - i0 as Float;
                (
                    diffuse[i0] * (1.0 - t) + diffuse[i1] * t,
                    self.emission_at(i0) * (1.0 - t) + self.emission_at(i1) * t,
                )
            }
        };

        TransferSample {
            color: Vector3f::new(rgba.x, rgba.y, rgba.z),
            opacity: rgba.w.max(0.0).min(1.0),
            emission,
        }
    }

    fn emission_at(&self, idx: usize) -> Vector3f {
        self.emission
            .as_ref()
            .and_then(|e| e.get(idx).copied())
            .unwrap_or_else(Vector3f::zeros)
    }
}
