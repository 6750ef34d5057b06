pub mod animation;
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod frame;
pub mod loaders;
pub mod math;
pub mod panel;
pub mod render_loop;
pub mod renderer;
pub mod scene_manager;
pub mod scenes;
pub mod traits;
pub mod view;
pub mod window;

pub use animation::{AnimationBehavior, SpinAxes};
pub use error::{Result, SceneError};
pub use render_loop::{RenderLoop, TickReport};
pub use scene_manager::{CylinderParams, ObjectMut, SceneManager, SphereParams};
pub use view::{CameraRig, ViewController, ViewMode};
