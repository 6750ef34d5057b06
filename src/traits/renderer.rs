use crate::engine::{PerspectiveCamera, SceneGraph};
use crate::error::Result;

/// Draws a scene graph through a camera into a sized buffer
pub trait SceneRenderer {
    /// Current drawing buffer size in physical pixels
    fn drawing_buffer_size(&self) -> (u32, u32);

    /// Resize the drawing buffer
    fn set_size(&mut self, width: u32, height: u32);

    fn pixel_ratio(&self) -> f64;

    /// Device pixel ratio; overlays drawn on top of the scene are scaled by it
    fn set_pixel_ratio(&mut self, ratio: f64);

    /// Render one frame
    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<()>;
}
