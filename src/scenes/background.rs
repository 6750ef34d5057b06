use glam::Vec3;
use log::debug;
use rand::Rng;

use crate::config::BackgroundConfig;
use crate::engine::Material;
use crate::error::Result;
use crate::math::Color;
use crate::scene_manager::{SceneManager, SphereParams};

/// Scatter `count` clickable cubes and spheres through the registry.
///
/// Each shape gets an independent uniform position in `[-spread, spread]`
/// per axis, a size in `[min_size, max_size]`, and a fair coin flip between
/// cube and sphere. Calling it again adds another `count` shapes.
pub fn populate_background<R: Rng>(
    manager: &mut SceneManager,
    count: usize,
    settings: &BackgroundConfig,
    rng: &mut R,
) -> Result<()> {
    let material = Material::standard(Color::from_hex(settings.color));
    let spread = settings.spread.abs();
    let (lo, hi) = if settings.min_size <= settings.max_size {
        (settings.min_size, settings.max_size)
    } else {
        (settings.max_size, settings.min_size)
    };

    let mut cubes = 0;
    for _ in 0..count {
        let position = Vec3::new(
            rng.random_range(-spread..=spread),
            rng.random_range(-spread..=spread),
            rng.random_range(-spread..=spread),
        );
        let size = rng.random_range(lo..=hi);

        let shape = if rng.random_bool(0.5) {
            cubes += 1;
            manager.add_cube(size, material.clone(), position, Vec3::ZERO)?
        } else {
            manager.add_sphere(SphereParams::radius(size), material.clone(), position, Vec3::ZERO)?
        };
        shape.clickable(true);
    }

    debug!("background: {} cubes, {} spheres", cubes, count - cubes);
    Ok(())
}
