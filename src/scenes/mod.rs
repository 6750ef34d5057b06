mod background;
mod primitives;
mod showcase;

use anyhow::{bail, Result};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::BackgroundConfig;
use crate::traits::{SceneBuilder, SceneContext};

pub use background::populate_background;
pub use primitives::PrimitivesScene;
pub use showcase::ShowcaseScene;

/// All scenes selectable by name
pub fn builders() -> Vec<Box<dyn SceneBuilder>> {
    vec![Box::new(ShowcaseScene), Box::new(PrimitivesScene)]
}

/// Build the scene called `name` into the context
pub fn build_scene(name: &str, ctx: &mut SceneContext<'_>) -> Result<()> {
    let builders = builders();
    let Some(builder) = builders.iter().find(|b| b.name() == name) else {
        let known: Vec<_> = builders.iter().map(|b| b.name().to_string()).collect();
        bail!("unknown scene {:?}, expected one of {}", name, known.join(", "));
    };
    builder.build(ctx)?;
    info!(
        "built scene {}: {} registered objects, {} scene graph entries",
        name,
        ctx.manager.len(),
        ctx.manager.scene().len()
    );
    Ok(())
}

/// Seeded when the config asks for a reproducible layout
pub(crate) fn background_rng(settings: &BackgroundConfig) -> StdRng {
    match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
