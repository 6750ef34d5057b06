use glam::Vec3;
use scene_viewer::engine::{GeometryKind, Material, Materials, Object3D};
use scene_viewer::math::{Color, Transform};
use scene_viewer::{AnimationBehavior, CylinderParams, SceneError, SceneManager, SphereParams, SpinAxes};
use std::cell::RefCell;
use std::rc::Rc;

fn material() -> Material {
    Material::standard(Color::from_hex(0x44aa88))
}

#[cfg(test)]
mod registry_tests {
    use super::*;

    #[test]
    fn test_single_cube_update_is_noop() {
        let mut manager = SceneManager::new();
        let id = manager.add_cube(1.0, material(), Vec3::ZERO, Vec3::ZERO).unwrap().id();

        assert_eq!(manager.update(1.0), 0);
        assert_eq!(manager.len(), 1);

        let cube = manager.object(id).unwrap();
        assert_eq!(cube.transform.position, Vec3::ZERO);
        assert_eq!(cube.transform.rotation, Vec3::ZERO);
    }

    #[test]
    fn test_insertion_order_is_iteration_order() {
        let mut manager = SceneManager::new();
        let mut returned = Vec::new();
        returned.push(manager.add_cube(1.0, material(), Vec3::X, Vec3::ZERO).unwrap().id());
        returned.push(
            manager
                .add_sphere(SphereParams::default(), material(), Vec3::Y, Vec3::ZERO)
                .unwrap()
                .id(),
        );
        returned.push(
            manager
                .add_cylinder(CylinderParams::default(), material(), Vec3::Z, Vec3::ZERO)
                .unwrap()
                .id(),
        );
        returned.push(manager.add_object(Object3D::group(Vec::new())).id());

        let ids: Vec<_> = manager.ids().collect();
        assert_eq!(ids, returned);

        let kinds: Vec<_> = manager
            .objects()
            .filter_map(|(_, object)| object.as_mesh().map(|mesh| mesh.geometry.kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![GeometryKind::Box, GeometryKind::Sphere, GeometryKind::Cylinder]
        );
    }

    #[test]
    fn test_update_visits_behaviors_in_registration_order() {
        let visits = Rc::new(RefCell::new(Vec::new()));
        let mut manager = SceneManager::new();

        for tag in 0..4 {
            let visits = visits.clone();
            let object = manager.add_cube(1.0, material(), Vec3::ZERO, Vec3::ZERO).unwrap();
            if tag != 2 {
                object.with_behavior(AnimationBehavior::custom(move |_, _| {
                    visits.borrow_mut().push(tag);
                }));
            }
        }

        assert_eq!(manager.update(0.5), 3);
        assert_eq!(manager.update(0.6), 3);
        assert_eq!(*visits.borrow(), vec![0, 1, 3, 0, 1, 3]);
    }

    #[test]
    fn test_behavior_only_touches_its_own_object() {
        let mut manager = SceneManager::new();
        let spinning = manager
            .add_cube(1.0, material(), Vec3::ZERO, Vec3::ZERO)
            .unwrap()
            .spin(SpinAxes::X | SpinAxes::Y)
            .id();
        let still = manager
            .add_sphere(SphereParams::radius(0.5), material(), Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO)
            .unwrap()
            .id();
        let drifting = manager
            .add_cube(1.0, material(), Vec3::ZERO, Vec3::ZERO)
            .unwrap()
            .with_behavior(AnimationBehavior::custom(|t: &mut Transform, s| {
                t.position.y = s;
            }))
            .id();

        let before = manager.object(still).unwrap().transform;
        for t in [0.1_f32, 0.5, 1.0, 2.5] {
            manager.update(t);
            assert_eq!(manager.object(still).unwrap().transform, before);
            let spin = manager.object(spinning).unwrap().transform;
            assert_eq!(spin.rotation, Vec3::new(t, t, 0.0));
            assert_eq!(spin.position, Vec3::ZERO);
            assert_eq!(manager.object(drifting).unwrap().transform.position.y, t);
        }
    }

    #[test]
    fn test_objects_added_to_graph_directly_are_not_animated() {
        let mut manager = SceneManager::new();
        manager.add_cube(1.0, material(), Vec3::ZERO, Vec3::ZERO).unwrap().spin(SpinAxes::Y);
        manager
            .scene_mut()
            .add(Object3D::group(Vec::new()).named("model"));

        assert_eq!(manager.len(), 1);
        assert_eq!(manager.scene().len(), 2);
        assert_eq!(manager.update(1.0), 1);
    }

    #[test]
    fn test_invalid_parameters_leave_registry_untouched() {
        let mut manager = SceneManager::new();

        let err = manager.add_cube(0.0, material(), Vec3::ZERO, Vec3::ZERO).err();
        assert!(matches!(err, Some(SceneError::InvalidParameter { .. })));

        let params = CylinderParams {
            radial_segments: 2,
            ..CylinderParams::default()
        };
        assert!(manager.add_cylinder(params, material(), Vec3::ZERO, Vec3::ZERO).is_err());

        let params = SphereParams {
            radius: -1.0,
            ..SphereParams::default()
        };
        assert!(manager.add_sphere(params, material(), Vec3::ZERO, Vec3::ZERO).is_err());

        assert!(manager.is_empty());
        assert!(manager.scene().is_empty());
    }

    #[test]
    fn test_empty_material_list_is_rejected() {
        assert!(matches!(
            Materials::from_vec(Vec::new()),
            Err(SceneError::MissingMaterial)
        ));
    }

    #[test]
    fn test_position_rotation_and_chained_scale() {
        let mut manager = SceneManager::new();
        let id = manager
            .add_cube(1.0, material(), Vec3::new(-10.0, 5.0, -10.0), Vec3::new(0.0, 1.0, 0.0))
            .unwrap()
            .scaled(5.0)
            .id();

        let cube = manager.object(id).unwrap();
        assert_eq!(cube.transform.position, Vec3::new(-10.0, 5.0, -10.0));
        assert_eq!(cube.transform.rotation, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(cube.transform.scale, Vec3::splat(5.0));
    }

    #[test]
    fn test_set_behavior_replaces_and_clears() {
        let mut manager = SceneManager::new();
        let id = manager.add_cube(1.0, material(), Vec3::ZERO, Vec3::ZERO).unwrap().id();
        assert!(!manager.has_behavior(id));

        assert!(manager.set_behavior(id, Some(AnimationBehavior::spin(SpinAxes::Z))));
        manager.update(0.25);
        assert_eq!(manager.object(id).unwrap().transform.rotation.z, 0.25);

        assert!(manager.set_behavior(id, None));
        manager.update(3.0);
        assert_eq!(manager.object(id).unwrap().transform.rotation.z, 0.25);
    }
}
