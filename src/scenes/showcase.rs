use anyhow::Result;
use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

use crate::engine::{Fog, Geometry, Light, Material, Materials, Object3D, TextureSettings};
use crate::loaders::{AssetLoader, ModelRequest, ModelSource};
use crate::math::Transform;
use crate::scene_manager::{SceneManager, SphereParams, DEFAULT_CUBE_SIZE};
use crate::scenes::primitives::{add_key_lights, add_lamp, add_spinning_trio};
use crate::scenes::{background_rng, populate_background};
use crate::traits::{SceneBuilder, SceneContext};

const PLANETS: [(&str, [f32; 3]); 5] = [
    ("merc.jfif", [15.0, 5.0, 0.0]),
    ("solar.jfif", [10.0, 5.0, 10.0]),
    ("themoon.jfif", [0.0, 5.0, 15.0]),
    ("monkey.jfif", [-10.0, 5.0, 10.0]),
    ("io.jfif", [-15.0, 5.0, 0.0]),
];

const MOON_POSITION: Vec3 = Vec3::new(10.0, 5.0, -10.0);
const SKULL_POSITION: Vec3 = Vec3::new(0.0, -1.0, -15.0);

/// Purple-fogged planet field around a skull, with a spinning trio at the origin
pub struct ShowcaseScene;

impl SceneBuilder for ShowcaseScene {
    fn name(&self) -> &str {
        "showcase"
    }

    fn build(&self, ctx: &mut SceneContext<'_>) -> Result<()> {
        let config = ctx.config;
        let manager = &mut *ctx.manager;
        let assets = &mut *ctx.assets;
        let asset = |name: &str| config.asset(name);

        manager.scene_mut().set_fog(Fog::exp2(0x800080, 0.05));

        let mut skull = Transform::from_position_rotation(SKULL_POSITION, Vec3::new(3.0 * FRAC_PI_2, 0.0, 0.0));
        skull.set_uniform_scale(0.5);
        assets.load_model(ModelRequest {
            name: "skull".to_string(),
            source: ModelSource::Obj {
                obj: asset("skull.obj"),
                mtl: asset("skull.mtl"),
            },
            transform: skull,
        })?;

        let bedrock = assets.load_texture(asset("bedrock.webp"), TextureSettings::repeating(100.0));
        manager.add_object(
            Object3D::mesh(Geometry::plane(100.0, 100.0)?, Material::textured(bedrock))
                .at(Vec3::new(0.0, -1.0, 0.0))
                .rotated(Vec3::new(-FRAC_PI_2, 0.0, 0.0))
                .named("ground"),
        );

        add_moon(manager, assets, config.asset("moon.jpg"))?;

        for (file, position) in PLANETS {
            let map = assets.load_texture(asset(file), TextureSettings::default());
            manager
                .add_sphere(SphereParams::default(), Material::textured(map), Vec3::from_array(position), Vec3::ZERO)?
                .scaled(5.0)
                .named(file);
        }

        add_key_lights(manager);

        let tess = assets.load_texture(asset("tess.jpg"), TextureSettings::default());
        manager
            .add_cube(DEFAULT_CUBE_SIZE, Material::textured(tess), Vec3::new(-10.0, 5.0, -10.0), Vec3::ZERO)?
            .scaled(5.0)
            .named("tess");

        let flowers = (1..=6)
            .map(|i| {
                let map = assets.load_texture(asset(&format!("flower-{}.jpg", i)), TextureSettings::default());
                Material::textured(map)
            })
            .collect();
        add_spinning_trio(manager, Materials::from_vec(flowers)?)?;

        assets.load_background(asset("space1.jpg"), manager.scene_mut());

        add_lamp(manager, Vec3::new(-2.0, 6.0, -10.0))?;
        add_lamp(manager, Vec3::new(2.0, 6.0, -10.0))?;

        let settings = &config.background;
        populate_background(manager, settings.count, settings, &mut background_rng(settings))?;
        Ok(())
    }
}

/// Large textured sphere with a red directional light at its center
fn add_moon(manager: &mut SceneManager, assets: &AssetLoader, texture: std::path::PathBuf) -> Result<()> {
    let map = assets.load_texture(texture, TextureSettings::default());
    manager
        .add_sphere(SphereParams::radius(5.0), Material::textured(map), MOON_POSITION, Vec3::ZERO)?
        .named("moon");
    manager.scene_mut().add(
        Object3D::light(Light::directional(0xff0000, 5.0))
            .at(MOON_POSITION)
            .named("moon light"),
    );
    Ok(())
}

