use anyhow::Result;
use glam::Vec3;

use crate::animation::SpinAxes;
use crate::engine::{Background, Light, Material, Materials, Object3D};
use crate::math::Color;
use crate::scene_manager::{CylinderParams, SceneManager, SphereParams, DEFAULT_CUBE_SIZE};
use crate::scenes::{background_rng, populate_background};
use crate::traits::{SceneBuilder, SceneContext};

const FACE_COLORS: [u32; 6] = [0xe05252, 0x52e0a1, 0x5287e0, 0xe0d452, 0xb452e0, 0xe09752];
const LAMP_COLOR: u32 = 0xffff00;

/// Asset-free scene: lights, three spinning primitives and background shapes
pub struct PrimitivesScene;

impl SceneBuilder for PrimitivesScene {
    fn name(&self) -> &str {
        "primitives"
    }

    fn build(&self, ctx: &mut SceneContext<'_>) -> Result<()> {
        let manager = &mut *ctx.manager;
        manager
            .scene_mut()
            .set_background(Background::Color(Color::from_hex(0x101018)));
        add_key_lights(manager);

        let faces = FACE_COLORS
            .iter()
            .map(|&hex| Material::standard(Color::from_hex(hex)))
            .collect();
        add_spinning_trio(manager, Materials::from_vec(faces)?)?;

        add_lamp(manager, Vec3::new(-2.0, 6.0, -10.0))?;
        add_lamp(manager, Vec3::new(2.0, 6.0, -10.0))?;

        let settings = &ctx.config.background;
        populate_background(manager, settings.count, settings, &mut background_rng(settings))?;
        Ok(())
    }
}

/// White key light plus dim ambient fill
pub(crate) fn add_key_lights(manager: &mut SceneManager) {
    let scene = manager.scene_mut();
    scene.add(
        Object3D::light(Light::directional(0xffffff, 3.0))
            .at(Vec3::new(-1.0, 2.0, 4.0))
            .named("key light"),
    );
    scene.add(Object3D::light(Light::ambient(0x404040, 1.0)).named("ambient"));
}

/// Cube spinning on X and Y at the origin, a cylinder spinning on Y to its
/// left and a sphere spinning on X to its right.
///
/// The cube takes one material per face. The cylinder uses the first
/// material and the sphere the second.
pub(crate) fn add_spinning_trio(manager: &mut SceneManager, cube_materials: Materials) -> Result<()> {
    let first = cube_materials.for_group(0).cloned().unwrap_or_default();
    let second = cube_materials.for_group(1).cloned().unwrap_or_default();

    manager
        .add_cube(DEFAULT_CUBE_SIZE, cube_materials, Vec3::ZERO, Vec3::ZERO)?
        .spin(SpinAxes::X | SpinAxes::Y)
        .named("cube");

    let cylinder = CylinderParams {
        radial_segments: 32,
        ..CylinderParams::default()
    };
    manager
        .add_cylinder(cylinder, first, Vec3::new(-2.0, 0.0, 0.0), Vec3::ZERO)?
        .spin(SpinAxes::Y)
        .named("cylinder");

    manager
        .add_sphere(SphereParams::default(), second, Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO)?
        .spin(SpinAxes::X)
        .named("sphere");
    Ok(())
}

/// Yellow point light marked by a solid bulb inside a translucent glow
pub(crate) fn add_lamp(manager: &mut SceneManager, position: Vec3) -> Result<()> {
    manager
        .scene_mut()
        .add(Object3D::light(Light::point(LAMP_COLOR, 10.0, 10.0)).at(position));

    let yellow = Color::from_hex(LAMP_COLOR);
    manager.add_sphere(SphereParams::radius(0.5), Material::standard(yellow), position, Vec3::ZERO)?;
    manager.add_sphere(
        SphereParams::radius(0.75),
        Material::basic(yellow).with_opacity(0.5),
        position,
        Vec3::ZERO,
    )?;
    Ok(())
}
