use glam::Vec3;

use super::controller::Controller;
use crate::engine::PerspectiveCamera;

/// Input-driven camera movement around a fixed target
pub trait CameraControls {
    /// Apply this frame's input to `camera`. Returns true if the camera moved.
    fn update(&mut self, camera: &mut PerspectiveCamera, input: &dyn Controller) -> bool;

    /// Point the camera orbits and looks at
    fn target(&self) -> Vec3;
}
