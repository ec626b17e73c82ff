// Copyright @yucwang 2026

use crate::core::error::Result;
use crate::core::params::ParameterSet;
use crate::core::scene::Scene;
use crate::math::constants::{Vector3f, Vector4f};
use crate::math::ray::Ray3f;
use crate::renderers::renderer::{Renderer, SampleId, ShadingState};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// State served before the first successful commit: transparent white.
struct UnconfiguredState {
    background: Vector3f,
}

impl ShadingState for UnconfiguredState {
    fn shade(&self, _ray: &Ray3f, _sample: SampleId) -> Vector4f {
        Vector4f::new(self.background.x, self.background.y, self.background.z, 0.0)
    }

    fn samples_per_pixel(&self) -> u32 {
        1
    }

    fn random_seed(&self) -> u64 {
        0
    }
}

/// A renderer variant plus its current configuration generation.
///
/// `commit` builds the next state without holding the lock and then swaps it
/// in, so readers see either the old or the new generation. A rejected commit
/// leaves the current generation in place.
pub struct RendererHandle {
    renderer: Box<dyn Renderer>,
    state: RwLock<Arc<dyn ShadingState>>,
    generation: AtomicU64,
}

impl RendererHandle {
    pub fn new(renderer: Box<dyn Renderer>) -> Self {
        Self {
            renderer,
            state: RwLock::new(Arc::new(UnconfiguredState { background: Vector3f::new(1.0, 1.0, 1.0) })),
            generation: AtomicU64::new(0),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.renderer.type_name()
    }

    /// Returns the new generation number.
    pub fn commit(&self, scene: &Scene, params: &ParameterSet) -> Result<u64> {
        let next = match self.renderer.configure(scene, params) {
            Ok(state) => state,
            Err(err) => {
                log::warn!("{}: configuration rejected, keeping generation {}: {}",
                           self.type_name(), self.generation(), err);
                return Err(err);
            }
        };

        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        *guard = next;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        drop(guard);

        log::info!("{}: committed generation {}.", self.type_name(), generation);
        Ok(generation)
    }

    /// The current generation; hold it for a whole render pass.
    pub fn snapshot(&self) -> Arc<dyn ShadingState> {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn shade(&self, ray: &Ray3f, sample: SampleId) -> Vector4f {
        self.snapshot().shade(ray, sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ConfigError;
    use crate::core::params::ParamValue;

    struct FlatRenderer;

    struct FlatState(Vector4f);

    impl ShadingState for FlatState {
        fn shade(&self, _ray: &Ray3f, _sample: SampleId) -> Vector4f {
            self.0
        }

        fn samples_per_pixel(&self) -> u32 {
            1
        }

        fn random_seed(&self) -> u64 {
            0
        }
    }

    impl Renderer for FlatRenderer {
        fn type_name(&self) -> &'static str {
            "flat"
        }

        fn configure(&self, _scene: &Scene, params: &ParameterSet) -> Result<Arc<dyn ShadingState>> {
            let level = params.get_float("level", 0.0)?;
            Ok(Arc::new(FlatState(Vector4f::new(level, level, level, 1.0))))
        }
    }

    fn any_ray() -> Ray3f {
        Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None)
    }

    #[test]
    fn unconfigured_handle_serves_background() {
        let handle = RendererHandle::new(Box::new(FlatRenderer));
        assert_eq!(handle.generation(), 0);
        assert_eq!(handle.shade(&any_ray(), SampleId::default()), Vector4f::new(1.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn failed_commit_keeps_generation() {
        let handle = RendererHandle::new(Box::new(FlatRenderer));
        let scene = Scene::new();
        let good = ParameterSet::new().with("level", ParamValue::Float(0.5));
        assert_eq!(handle.commit(&scene, &good), Ok(1));
        let before = handle.snapshot();

        let bad = ParameterSet::new().with("level", ParamValue::Vec3f(Vector3f::zeros()));
        assert!(matches!(handle.commit(&scene, &bad), Err(ConfigError::InvalidParameter { .. })));
        assert_eq!(handle.generation(), 1);
        assert!(Arc::ptr_eq(&before, &handle.snapshot()));
    }

    #[test]
    fn old_snapshot_survives_new_commit() {
        let handle = RendererHandle::new(Box::new(FlatRenderer));
        let scene = Scene::new();
        handle.commit(&scene, &ParameterSet::new().with("level", ParamValue::Float(0.25))).expect("commit");
        let pass = handle.snapshot();
        handle.commit(&scene, &ParameterSet::new().with("level", ParamValue::Float(0.75))).expect("commit");

        assert_eq!(pass.shade(&any_ray(), SampleId::default()).x, 0.25);
        assert_eq!(handle.shade(&any_ray(), SampleId::default()).x, 0.75);
    }
}
