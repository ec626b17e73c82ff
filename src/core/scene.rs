// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::light::{Light, LightView};
use crate::core::material::{Material, MaterialView};
use crate::core::shape::Shape;
use crate::math::constants::{Vector3f, Vector4f};
use crate::math::ray::Ray3f;
use crate::simulation::SimulationHandler;
use crate::volumes::field::FieldData;
use std::sync::Arc;

pub struct SceneObject {
    pub shape: Arc<dyn Shape>,
    pub color: Vector3f,
    /// Index into the scene materials.
    pub material: Option<usize>,
    pub name: Option<String>,
}

impl SceneObject {
    pub fn new(shape: Arc<dyn Shape>, color: Vector3f) -> Self {
        Self { shape, color, material: None, name: None }
    }

    pub fn with_material(mut self, material: usize) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn shape(&self) -> &Arc<dyn Shape> {
        &self.shape
    }
}

/// Flattened read view over the opaque objects for one configuration generation.
pub type ObjectView = Arc<[Arc<SceneObject>]>;

/// Host-owned scene description. Renderers only ever take shared read views of
/// its contents when they are configured.
#[derive(Default)]
pub struct Scene {
    objects: Vec<Arc<SceneObject>>,
    lights: Vec<Arc<dyn Light>>,
    materials: Vec<Arc<Material>>,
    volume_data: Option<FieldData>,
    transfer_function_diffuse: Option<Arc<[Vector4f]>>,
    transfer_function_emission: Option<Arc<[Vector3f]>>,
    simulation: Option<Box<dyn SimulationHandler>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: SceneObject) -> usize {
        self.objects.push(Arc::new(object));
        self.objects.len() - 1
    }

    pub fn objects(&self) -> &[Arc<SceneObject>] {
        &self.objects
    }

    pub fn add_light(&mut self, light: Arc<dyn Light>) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Arc<dyn Light>] {
        &self.lights
    }

    pub fn clear_lights(&mut self) {
        self.lights.clear();
    }

    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(Arc::new(material));
        self.materials.len() - 1
    }

    pub fn materials(&self) -> &[Arc<Material>] {
        &self.materials
    }

    pub fn set_volume_data(&mut self, data: Option<FieldData>) {
        self.volume_data = data;
    }

    pub fn volume_data(&self) -> Option<&FieldData> {
        self.volume_data.as_ref()
    }

    pub fn set_transfer_function_data(&mut self,
                                      diffuse: Option<Arc<[Vector4f]>>,
                                      emission: Option<Arc<[Vector3f]>>) {
        self.transfer_function_diffuse = diffuse;
        self.transfer_function_emission = emission;
    }

    pub fn transfer_function_diffuse(&self) -> Option<&Arc<[Vector4f]>> {
        self.transfer_function_diffuse.as_ref()
    }

    pub fn transfer_function_emission(&self) -> Option<&Arc<[Vector3f]>> {
        self.transfer_function_emission.as_ref()
    }

    pub fn set_simulation(&mut self, simulation: Option<Box<dyn SimulationHandler>>) {
        self.simulation = simulation;
    }

    pub fn simulation(&self) -> Option<&dyn SimulationHandler> {
        self.simulation.as_deref()
    }

    pub fn light_view(&self) -> LightView {
        self.lights.iter().cloned().collect()
    }

    pub fn material_view(&self) -> MaterialView {
        self.materials.iter().cloned().collect()
    }

    pub fn object_view(&self) -> ObjectView {
        self.objects.iter().cloned().collect()
    }
}

/// Closest opaque hit along `ray`, tagged with the object index.
pub fn closest_hit(objects: &[Arc<SceneObject>], ray: &Ray3f) -> Option<SurfaceIntersection> {
    let mut ray = *ray;
    let mut closest = None;
    for (idx, object) in objects.iter().enumerate() {
        if let Some(hit) = object.shape.ray_intersection(&ray) {
            if ray.update(hit.t()) {
                closest = Some(hit.with_object_index(Some(idx)));
            }
        }
    }
    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::light::LightSample;
    use crate::math::aabb::AABB;
    use crate::math::constants::Float;

    struct TestShape {
        t: Float,
    }

    impl Shape for TestShape {
        fn bounding_box(&self) -> AABB {
            AABB::new(Vector3f::zeros(), Vector3f::zeros())
        }

        fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
            if !ray.test_segment(self.t) {
                return None;
            }
            Some(SurfaceIntersection::new(ray.at(self.t), Vector3f::new(0.0, 0.0, -1.0), self.t))
        }
    }

    struct TestLight;

    impl Light for TestLight {
        fn sample(&self, _p: &Vector3f) -> Option<LightSample> {
            None
        }
    }

    #[test]
    fn test_scene_closest_hit() {
        let mut scene = Scene::new();
        let grey = Vector3f::new(0.5, 0.5, 0.5);
        scene.add_object(SceneObject::new(Arc::new(TestShape { t: 5.0 }), grey));
        scene.add_object(SceneObject::new(Arc::new(TestShape { t: 2.0 }), grey));
        scene.add_object(SceneObject::new(Arc::new(TestShape { t: 10.0 }), grey));

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        let hit = closest_hit(scene.objects(), &ray).expect("expected intersection");

        assert_eq!(hit.t(), 2.0);
        assert_eq!(hit.object_index(), Some(1));
    }

    #[test]
    fn test_views_share_scene_handles() {
        let mut scene = Scene::new();
        scene.add_light(Arc::new(TestLight));
        scene.add_material(Material::diffuse(Vector3f::new(1.0, 0.0, 0.0)));

        let lights = scene.light_view();
        let materials = scene.material_view();
        assert_eq!(lights.len(), 1);
        assert!(Arc::ptr_eq(&lights[0], &scene.lights()[0]));
        assert!(Arc::ptr_eq(&materials[0], &scene.materials()[0]));

        scene.clear_lights();
        assert_eq!(lights.len(), 1);
        assert!(scene.light_view().is_empty());
    }
}
