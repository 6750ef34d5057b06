//! Registry of animated scene objects
//!
//! `SceneManager` owns the scene graph and an ordered list of the objects it
//! created. Every registered object lives in the scene graph; objects added
//! to the graph directly (loaded models, lights added by hand) are drawn but
//! never animated.

use glam::Vec3;
use log::debug;
use std::ops::{Deref, DerefMut};

use crate::animation::{AnimationBehavior, SpinAxes};
use crate::engine::{Geometry, Materials, Object3D, ObjectId, SceneGraph};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderParams {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self {
            radius_top: 1.0,
            radius_bottom: 1.0,
            height: 2.0,
            radial_segments: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereParams {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl SphereParams {
    pub fn radius(radius: f32) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 32,
            height_segments: 32,
        }
    }
}

pub const DEFAULT_CUBE_SIZE: f32 = 1.0;

#[derive(Debug)]
struct RegisteredObject {
    id: ObjectId,
    behavior: Option<AnimationBehavior>,
}

#[derive(Debug, Default)]
pub struct SceneManager {
    scene: SceneGraph,
    registry: Vec<RegisteredObject>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Direct scene graph access. Objects added here are not animated.
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// Insert into the scene graph and append to the registry
    pub fn add_object(&mut self, object: Object3D) -> ObjectMut<'_> {
        let (id, object) = self.scene.insert(object);
        self.registry.push(RegisteredObject { id, behavior: None });
        let index = self.registry.len() - 1;
        ObjectMut {
            id,
            object,
            behavior: &mut self.registry[index].behavior,
        }
    }

    pub fn add_cube(
        &mut self,
        size: f32,
        materials: impl Into<Materials>,
        position: Vec3,
        rotation: Vec3,
    ) -> Result<ObjectMut<'_>> {
        let geometry = Geometry::cube(size)?;
        Ok(self.add_mesh(geometry, materials.into(), position, rotation))
    }

    pub fn add_cylinder(
        &mut self,
        params: CylinderParams,
        materials: impl Into<Materials>,
        position: Vec3,
        rotation: Vec3,
    ) -> Result<ObjectMut<'_>> {
        let geometry = Geometry::cylinder(
            params.radius_top,
            params.radius_bottom,
            params.height,
            params.radial_segments,
        )?;
        Ok(self.add_mesh(geometry, materials.into(), position, rotation))
    }

    pub fn add_sphere(
        &mut self,
        params: SphereParams,
        materials: impl Into<Materials>,
        position: Vec3,
        rotation: Vec3,
    ) -> Result<ObjectMut<'_>> {
        let geometry = Geometry::sphere(params.radius, params.width_segments, params.height_segments)?;
        Ok(self.add_mesh(geometry, materials.into(), position, rotation))
    }

    fn add_mesh(
        &mut self,
        geometry: Geometry,
        materials: Materials,
        position: Vec3,
        rotation: Vec3,
    ) -> ObjectMut<'_> {
        debug!("registering {:?} at {}", geometry.kind(), position);
        self.add_object(Object3D::mesh(geometry, materials).at(position).rotated(rotation))
    }

    /// Run every attached behavior once, in registration order
    pub fn update(&mut self, seconds: f32) -> usize {
        let mut animated = 0;
        for entry in &mut self.registry {
            let Some(behavior) = entry.behavior.as_mut() else {
                continue;
            };
            if let Some(object) = self.scene.get_mut(entry.id) {
                behavior.apply(&mut object.transform, seconds);
                animated += 1;
            }
        }
        animated
    }

    /// Replace the behavior of a registered object. Returns false for unknown ids.
    pub fn set_behavior(&mut self, id: ObjectId, behavior: Option<AnimationBehavior>) -> bool {
        match self.registry.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.behavior = behavior;
                true
            }
            None => false,
        }
    }

    pub fn has_behavior(&self, id: ObjectId) -> bool {
        self.registry
            .iter()
            .any(|entry| entry.id == id && entry.behavior.is_some())
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Registered ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.registry.iter().map(|entry| entry.id)
    }

    /// Registered objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object3D)> + '_ {
        self.registry
            .iter()
            .filter_map(|entry| self.scene.get(entry.id).map(|object| (entry.id, object)))
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object3D> {
        self.scene.get(id)
    }
}

/// Mutable access to a freshly registered object, for chained setup
pub struct ObjectMut<'a> {
    id: ObjectId,
    object: &'a mut Object3D,
    behavior: &'a mut Option<AnimationBehavior>,
}

impl<'a> ObjectMut<'a> {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn with_behavior(self, behavior: AnimationBehavior) -> Self {
        *self.behavior = Some(behavior);
        self
    }

    pub fn spin(self, axes: SpinAxes) -> Self {
        self.with_behavior(AnimationBehavior::spin(axes))
    }

    pub fn scaled(self, scale: f32) -> Self {
        self.object.transform.set_uniform_scale(scale);
        self
    }

    pub fn named(self, name: impl Into<String>) -> Self {
        self.object.name = name.into();
        self
    }

    pub fn clickable(self, clickable: bool) -> Self {
        self.object.clickable = clickable;
        self
    }
}

impl Deref for ObjectMut<'_> {
    type Target = Object3D;

    fn deref(&self) -> &Object3D {
        self.object
    }
}

impl DerefMut for ObjectMut<'_> {
    fn deref_mut(&mut self) -> &mut Object3D {
        self.object
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Light, Material};
    use crate::math::Color;

    fn material() -> Material {
        Material::standard(Color::from_hex(0x800080))
    }

    #[test]
    fn test_add_cube_registers_and_inserts() {
        let mut manager = SceneManager::new();
        let id = manager
            .add_cube(1.0, material(), Vec3::ZERO, Vec3::ZERO)
            .unwrap()
            .id();
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.scene().len(), 1);
        assert!(manager.scene().get(id).is_some());
        assert!(!manager.has_behavior(id));
    }

    #[test]
    fn test_invalid_parameters_leave_registry_untouched() {
        let mut manager = SceneManager::new();
        let params = CylinderParams {
            radial_segments: 2,
            ..CylinderParams::default()
        };
        assert!(manager.add_cylinder(params, material(), Vec3::ZERO, Vec3::ZERO).is_err());
        assert!(manager.add_sphere(SphereParams::radius(-1.0), material(), Vec3::ZERO, Vec3::ZERO).is_err());
        assert!(manager.is_empty());
        assert!(manager.scene().is_empty());
    }

    #[test]
    fn test_chaining_scale_and_behavior() {
        let mut manager = SceneManager::new();
        let id = manager
            .add_sphere(SphereParams::default(), material(), Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO)
            .unwrap()
            .scaled(5.0)
            .spin(SpinAxes::X)
            .id();

        assert_eq!(manager.object(id).unwrap().transform.scale, Vec3::splat(5.0));
        assert_eq!(manager.update(0.25), 1);
        assert_eq!(manager.object(id).unwrap().transform.rotation.x, 0.25);
    }

    #[test]
    fn test_scene_graph_objects_are_not_animated() {
        let mut manager = SceneManager::new();
        manager.scene_mut().add(Object3D::light(Light::ambient(0x404040, 1.0)));
        manager
            .add_cube(1.0, material(), Vec3::ZERO, Vec3::ZERO)
            .unwrap()
            .spin(SpinAxes::Y);

        assert_eq!(manager.scene().len(), 2);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.update(1.0), 1);
    }

    #[test]
    fn test_set_behavior_after_registration() {
        let mut manager = SceneManager::new();
        let id = manager.add_cube(1.0, material(), Vec3::ZERO, Vec3::ZERO).unwrap().id();
        assert!(manager.set_behavior(id, Some(AnimationBehavior::spin(SpinAxes::Z))));
        manager.update(3.0);
        assert_eq!(manager.object(id).unwrap().transform.rotation.z, 3.0);

        assert!(manager.set_behavior(id, None));
        assert!(!manager.has_behavior(id));

        let stray = manager.scene_mut().add(Object3D::group(Vec::new()));
        assert!(!manager.set_behavior(stray, None));
    }

    #[test]
    fn test_defaults() {
        let cylinder = CylinderParams::default();
        assert_eq!((cylinder.radius_top, cylinder.radius_bottom, cylinder.height), (1.0, 1.0, 2.0));
        assert_eq!(cylinder.radial_segments, 8);
        let sphere = SphereParams::default();
        assert_eq!((sphere.radius, sphere.width_segments, sphere.height_segments), (1.0, 32, 32));
        assert_eq!(DEFAULT_CUBE_SIZE, 1.0);
    }
}
