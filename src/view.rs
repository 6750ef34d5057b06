//! Front/back dual camera state
//!
//! Both rigs live for the whole session. The active camera and the active
//! controls are derived from the single `mode` field, so they always come
//! from the same rig and a toggle switches both at once.

use glam::Vec3;
use log::info;

use crate::config::{CameraConfig, RigConfig};
use crate::engine::{OrbitControls, PerspectiveCamera};
use crate::error::Result;
use crate::traits::{Button, CameraControls, Controller};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Front,
    Back,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Front => "Front View",
            Self::Back => "Back View",
        }
    }
}

/// A camera with its own input controls
#[derive(Debug, Clone)]
pub struct CameraRig<C = OrbitControls> {
    pub camera: PerspectiveCamera,
    pub controls: C,
}

impl<C: CameraControls> CameraRig<C> {
    /// Pair a camera with controls and aim it at the controls' target
    pub fn new(mut camera: PerspectiveCamera, controls: C) -> Self {
        camera.look_at(controls.target());
        Self { camera, controls }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.aspect = aspect;
        self.camera.update_projection_matrix();
    }
}

impl CameraRig<OrbitControls> {
    pub fn orbit(camera: PerspectiveCamera, target: Vec3) -> Self {
        Self::new(camera, OrbitControls::new(target))
    }

    /// Build a rig from configuration
    pub fn from_config(config: &CameraConfig, rig: &RigConfig) -> Result<Self> {
        let p = &config.projection;
        let mut camera = PerspectiveCamera::new(p.fov, p.aspect, p.near, p.far)?;
        camera.position = rig.position();
        camera.set_rotation(rig.rotation());
        Ok(Self::orbit(camera, rig.target()))
    }
}

#[derive(Debug, Clone)]
pub struct ViewController<C = OrbitControls> {
    front: CameraRig<C>,
    back: CameraRig<C>,
    mode: ViewMode,
}

impl<C: CameraControls> ViewController<C> {
    /// Starts in front view
    pub fn new(front: CameraRig<C>, back: CameraRig<C>) -> Self {
        Self {
            front,
            back,
            mode: ViewMode::Front,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Flip between front and back. Returns the new mode.
    pub fn toggle_view(&mut self) -> ViewMode {
        self.mode = self.mode.toggled();
        info!("switched to {}", self.mode.label());
        self.mode
    }

    pub fn current_label(&self) -> &'static str {
        self.mode.label()
    }

    pub fn rig(&self, mode: ViewMode) -> &CameraRig<C> {
        match mode {
            ViewMode::Front => &self.front,
            ViewMode::Back => &self.back,
        }
    }

    pub fn active_rig(&self) -> &CameraRig<C> {
        self.rig(self.mode)
    }

    pub fn active_camera(&self) -> &PerspectiveCamera {
        &self.active_rig().camera
    }

    pub fn active_controls(&self) -> &C {
        &self.active_rig().controls
    }

    /// Feed input to the active rig only. Returns true if its camera moved.
    pub fn update_controls(&mut self, input: &dyn Controller) -> bool {
        let rig = match self.mode {
            ViewMode::Front => &mut self.front,
            ViewMode::Back => &mut self.back,
        };
        rig.controls.update(&mut rig.camera, input)
    }

    /// Toggle on a fresh press of V. Returns true if the view changed.
    pub fn toggle_on_key(&mut self, input: &dyn Controller) -> bool {
        if input.was_pressed(Button::KeyV) {
            self.toggle_view();
            true
        } else {
            false
        }
    }

    /// Apply a new aspect ratio to both cameras, active or not
    pub fn set_aspect(&mut self, aspect: f32) {
        self.front.set_aspect(aspect);
        self.back.set_aspect(aspect);
    }
}

impl ViewController<OrbitControls> {
    pub fn from_config(config: &CameraConfig) -> Result<Self> {
        Ok(Self::new(
            CameraRig::from_config(config, &config.front)?,
            CameraRig::from_config(config, &config.back)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn views() -> ViewController {
        ViewController::from_config(&CameraConfig::default()).unwrap()
    }

    #[test]
    fn test_starts_in_front() {
        let views = views();
        assert_eq!(views.mode(), ViewMode::Front);
        assert_eq!(views.current_label(), "Front View");
        assert_eq!(views.active_controls().target(), Vec3::ZERO);
    }

    #[test]
    fn test_toggle_switches_camera_and_controls_together() {
        let mut views = views();
        assert_eq!(views.toggle_view(), ViewMode::Back);
        assert_eq!(views.current_label(), "Back View");
        assert_eq!(views.active_camera().position, Vec3::new(0.0, 0.0, -30.0));
        assert_eq!(views.active_controls().target(), Vec3::new(0.0, 0.0, -15.0));
    }

    #[test]
    fn test_back_camera_faces_model() {
        let views = views();
        let back = &views.rig(ViewMode::Back).camera;
        assert!((back.forward() - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_set_aspect_updates_both_rigs() {
        let mut views = views();
        views.set_aspect(1.5);
        assert_eq!(views.rig(ViewMode::Front).camera.aspect, 1.5);
        assert_eq!(views.rig(ViewMode::Back).camera.aspect, 1.5);
    }
}
