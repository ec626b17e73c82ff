// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f, Vector3i};
use std::sync::Arc;

/// Raw sample buffer shared with the scene, x-fastest then y then z.
#[derive(Clone, Debug)]
pub enum FieldData {
    U8(Arc<[u8]>),
    F32(Arc<[Float]>),
}

impl FieldData {
    pub fn len(&self) -> usize {
        match self {
            FieldData::U8(data) => data.len(),
            FieldData::F32(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn value(&self, idx: usize) -> Float {
        match self {
            FieldData::U8(data) => data[idx] as Float,
            FieldData::F32(data) => data[idx],
        }
    }

    fn same_buffer(&self, other: &FieldData) -> bool {
        match (self, other) {
            (FieldData::U8(a), FieldData::U8(b)) => Arc::ptr_eq(a, b),
            (FieldData::F32(a), FieldData::F32(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Number of voxels in a grid of `dimensions`, `None` for a negative extent or
/// a product that does not fit in `usize`.
pub fn checked_voxel_count(dimensions: &Vector3i) -> Option<usize> {
    dimensions
        .iter()
        .try_fold(1usize, |count, d| usize::try_from(*d).ok().and_then(|d| count.checked_mul(d)))
}

/// Dense scalar grid placed in world space.
///
/// Voxel `(i, j, k)` covers `offset + [i, i + 1) * spacing` on each axis and its
/// value sits at the cell centre. A field without data, with a zero extent or
/// with a buffer shorter than its extent is unbound and contributes nothing.
#[derive(Clone, Debug)]
pub struct ScalarField {
    data: Option<FieldData>,
    dimensions: Vector3i,
    spacing: Vector3f,
    offset: Vector3f,
}

impl Default for ScalarField {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for ScalarField {
    // Buffers compare by identity, bulk data is never copied or scanned.
    fn eq(&self, other: &Self) -> bool {
        let same_data = match (&self.data, &other.data) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same_buffer(b),
            _ => false,
        };
        same_data
            && self.dimensions == other.dimensions
            && self.spacing == other.spacing
            && self.offset == other.offset
    }
}

impl ScalarField {
    pub fn new(data: Option<FieldData>, dimensions: Vector3i, spacing: Vector3f, offset: Vector3f) -> Self {
        Self { data, dimensions, spacing, offset }
    }

    pub fn empty() -> Self {
        Self::new(None, Vector3i::zeros(), Vector3f::new(1.0, 1.0, 1.0), Vector3f::zeros())
    }

    pub fn dimensions(&self) -> Vector3i {
        self.dimensions
    }

    pub fn spacing(&self) -> Vector3f {
        self.spacing
    }

    pub fn offset(&self) -> Vector3f {
        self.offset
    }

    /// Zero when any extent is non-positive or the grid is not addressable.
    pub fn voxel_count(&self) -> usize {
        checked_voxel_count(&self.dimensions).unwrap_or(0)
    }

    pub fn is_bound(&self) -> bool {
        let count = self.voxel_count();
        match &self.data {
            Some(data) => count > 0
                && data.len() >= count
                && self.spacing.iter().all(|s| *s > 0.0 && s.is_finite()),
            None => false,
        }
    }

    pub fn bbox(&self) -> Option<AABB> {
        if !self.is_bound() {
            return None;
        }
        let extent = self.dimensions.map(|d| d as Float).component_mul(&self.spacing);
        Some(AABB::new(self.offset, self.offset + extent))
    }

    /// Smallest element spacing, the reference length for opacity correction.
    pub fn min_spacing(&self) -> Float {
        self.spacing.min().max(1e-6)
    }

    fn fetch(&self, data: &FieldData, x: usize, y: usize, z: usize) -> Float {
        let xres = self.dimensions.x as usize;
        let yres = self.dimensions.y as usize;
        data.value((z * yres + y) * xres + x)
    }

    /// Trilinear value at `p`, `None` outside the field box or when unbound.
    pub fn sample(&self, p: &Vector3f) -> Option<Float> {
        let data = self.data.as_ref()?;
        let bbox = self.bbox()?;
        if !bbox.contains(p) {
            return None;
        }

        let local = (p - self.offset).component_div(&self.spacing) - Vector3f::new(0.5, 0.5, 0.5);
        let res = [self.dimensions.x as isize, self.dimensions.y as isize, self.dimensions.z as isize];

        let base = local.map(|v| v.floor());
        let frac = local - base;
        let mut lo = [0usize; 3];
        let mut hi = [0usize; 3];
        for axis in 0..3 {
            let i0 = base[axis] as isize;
            lo[axis] = i0.clamp(0, res[axis] - 1) as usize;
            hi[axis] = (i0 + 1).clamp(0, res[axis] - 1) as usize;
        }
        let (tx, ty, tz) = (frac.x, frac.y, frac.z);

        let c000 = self.fetch(data, lo[0], lo[1], lo[2]);
        let c100 = self.fetch(data, hi[0], lo[1], lo[2]);
        let c010 = self.fetch(data, lo[0], hi[1], lo[2]);
        let c110 = self.fetch(data, hi[0], hi[1], lo[2]);
        let c001 = self.fetch(data, lo[0], lo[1], hi[2]);
        let c101 = self.fetch(data, hi[0], lo[1], hi[2]);
        let c011 = self.fetch(data, lo[0], hi[1], hi[2]);
        let c111 = self.fetch(data, hi[0], hi[1], hi[2]);

        let c00 = c000 * (1.0 - tx) + c100 * tx;
        let c10 = c010 * (1.0 - tx) + c110 * tx;
        let c01 = c001 * (1.0 - tx) + c101 * tx;
        let c11 = c011 * (1.0 - tx) + c111 * tx;

        let c0 = c00 * (1.0 - ty) + c10 * ty;
        let c1 = c01 * (1.0 - ty) + c11 * ty;

        Some(c0 * (1.0 - tz) + c1 * tz)
    }

    /// Central-difference gradient with one voxel of stencil per axis.
    /// Neighbours outside the box fall back to the centre value.
    pub fn gradient(&self, p: &Vector3f, center: Float) -> Vector3f {
        let mut grad = Vector3f::zeros();
        for axis in 0..3 {
            let mut delta = Vector3f::zeros();
            delta[axis] = self.spacing[axis];
            let forward = self.sample(&(p + delta)).unwrap_or(center);
            let backward = self.sample(&(p - delta)).unwrap_or(center);
            grad[axis] = (forward - backward) / (2.0 * self.spacing[axis]);
        }
        grad
    }
}
