use glam::Vec3;
use std::f32::consts::PI;

use crate::engine::PerspectiveCamera;
use crate::traits::{Button, CameraControls, Controller};

const ROTATE_PER_PIXEL: f32 = 0.005;
const ZOOM_PER_LINE: f32 = 0.95;
const POLAR_EPSILON: f32 = 1e-4;

/// Orbit a camera around a target with the left button and zoom with the wheel
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    target: Vec3,
    pub enabled: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            enabled: true,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.5,
            max_distance: 200.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }
}

impl CameraControls for OrbitControls {
    fn update(&mut self, camera: &mut PerspectiveCamera, input: &dyn Controller) -> bool {
        let offset = camera.position - self.target;
        let mut radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        let mut moved = false;

        if self.enabled {
            if input.is_down(Button::MouseLeft) {
                let (dx, dy) = input.pointer_delta();
                if dx != 0.0 || dy != 0.0 {
                    theta -= dx * ROTATE_PER_PIXEL * self.rotate_speed;
                    phi -= dy * ROTATE_PER_PIXEL * self.rotate_speed;
                    moved = true;
                }
            }
            let scroll = input.scroll_delta();
            if scroll != 0.0 {
                radius *= ZOOM_PER_LINE.powf(scroll * self.zoom_speed);
                moved = true;
            }
        }

        let min_phi = self.min_polar_angle.max(POLAR_EPSILON);
        let max_phi = self.max_polar_angle.min(PI - POLAR_EPSILON);
        phi = phi.clamp(min_phi, max_phi);
        radius = radius.clamp(self.min_distance, self.max_distance);

        let sin_phi = phi.sin();
        let offset = Vec3::new(radius * sin_phi * theta.sin(), radius * phi.cos(), radius * sin_phi * theta.cos());
        camera.position = self.target + offset;
        camera.look_at(self.target);
        moved
    }

    fn target(&self) -> Vec3 {
        self.target
    }
}
