//! Scene configuration
//!
//! Values are read from a TOML file and then overridden by command-line
//! flags. Every field has a default so a partial file is valid.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SceneError};

/// Perspective parameters shared by both camera rigs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            aspect: 2.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Placement of one camera rig
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub position: [f32; 3],
    /// Euler rotation in radians
    pub rotation: [f32; 3],
    pub target: [f32; 3],
}

impl RigConfig {
    pub fn front() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            rotation: [0.0, 0.0, 0.0],
            target: [0.0, 0.0, 0.0],
        }
    }

    pub fn back() -> Self {
        Self {
            position: [0.0, 0.0, -30.0],
            rotation: [0.0, std::f32::consts::PI, 0.0],
            target: [0.0, 0.0, -15.0],
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn rotation(&self) -> Vec3 {
        Vec3::from_array(self.rotation)
    }

    pub fn target(&self) -> Vec3 {
        Vec3::from_array(self.target)
    }
}

impl Default for RigConfig {
    fn default() -> Self {
        Self::front()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub projection: ProjectionConfig,
    pub front: RigConfig,
    pub back: RigConfig,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionConfig::default(),
            front: RigConfig::front(),
            back: RigConfig::back(),
        }
    }
}

/// Random scatter of background shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub count: usize,
    /// Positions are drawn uniformly from [-spread, spread] on each axis
    pub spread: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub seed: Option<u64>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            count: 100,
            spread: 25.0,
            min_size: 0.5,
            max_size: 1.5,
            color: 0x800080,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scene Viewer".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Name of the scene to build (see `scenes::build_scene`)
    pub scene: String,
    /// Directory holding textures, models and the skybox
    pub assets: PathBuf,
    pub show_ui: bool,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub background: BackgroundConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scene: "showcase".to_string(),
            assets: PathBuf::from("resources"),
            show_ui: true,
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            background: BackgroundConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SceneError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| SceneError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SceneError::Config(e.to_string()))
    }

    pub fn asset(&self, relative: &str) -> PathBuf {
        self.assets.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_showcase_constants() {
        let config = SceneConfig::default();
        assert_eq!(config.camera.projection.fov, 75.0);
        assert_eq!(config.camera.projection.aspect, 2.0);
        assert_eq!(config.camera.front.position(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(config.camera.back.target(), Vec3::new(0.0, 0.0, -15.0));
        assert_eq!(config.background.count, 100);
        assert_eq!(config.background.color, 0x800080);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SceneConfig::from_toml(
            r#"
            scene = "primitives"

            [background]
            count = 12
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.scene, "primitives");
        assert_eq!(config.background.count, 12);
        assert_eq!(config.background.seed, Some(7));
        assert_eq!(config.background.spread, 25.0);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = SceneConfig::from_toml("scene = [").unwrap_err();
        assert!(matches!(err, SceneError::Config(_)));
    }

    #[test]
    fn test_toml_roundtrip_preserves_camera() {
        let mut config = SceneConfig::default();
        config.camera.projection.far = 250.0;
        let text = config.to_toml().unwrap();
        let parsed = SceneConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.camera.projection.far, 250.0);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = SceneConfig::load("/nonexistent/scene.toml").unwrap_err();
        assert!(matches!(err, SceneError::Config(_)));
    }
}
