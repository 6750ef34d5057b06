use crate::config::SceneConfig;
use crate::loaders::AssetLoader;
use crate::scene_manager::SceneManager;

/// Everything a scene needs while it populates itself
pub struct SceneContext<'a> {
    pub manager: &'a mut SceneManager,
    pub assets: &'a mut AssetLoader,
    pub config: &'a SceneConfig,
}

/// Scene construction abstraction
pub trait SceneBuilder {
    /// Name used to select the scene from config or the command line
    fn name(&self) -> &str;

    /// Add objects, lights and background to the scene
    fn build(&self, ctx: &mut SceneContext<'_>) -> anyhow::Result<()>;
}
