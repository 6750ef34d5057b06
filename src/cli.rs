// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

use crate::config::SceneConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-viewer")]
#[command(about = "Animated 3D scene with a switchable dual camera", long_about = None)]
pub struct Cli {
    /// TOML file with scene settings
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Scene to build (showcase, primitives)
    #[arg(long, short)]
    pub scene: Option<String>,

    /// Directory holding textures and models
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Number of random background shapes
    #[arg(long = "background-count")]
    pub background_count: Option<usize>,

    /// Seed for the background layout
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable UI panels
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

impl Cli {
    /// Apply flags on top of a loaded configuration
    pub fn apply(&self, mut config: SceneConfig) -> SceneConfig {
        if let Some(scene) = &self.scene {
            config.scene = scene.clone();
        }
        if let Some(assets) = &self.assets {
            config.assets = assets.clone();
        }
        if let Some(count) = self.background_count {
            config.background.count = count;
        }
        if self.seed.is_some() {
            config.background.seed = self.seed;
        }
        if self.no_ui {
            config.show_ui = false;
        }
        config
    }
}
