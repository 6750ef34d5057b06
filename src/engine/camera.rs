use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::error::{positive, Result, SceneError};

/// Perspective camera looking down its local -Z axis
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub orientation: Quat,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        let fov = positive("fov", fov)?;
        let aspect = positive("aspect", aspect)?;
        let near = positive("near", near)?;
        let far = positive("far", far)?;
        if far <= near {
            return Err(SceneError::InvalidParameter {
                name: "far",
                value: far as f64,
                reason: "far plane must lie beyond near plane",
            });
        }
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        Ok(camera)
    }

    /// Set orientation from Euler angles in radians (XYZ order)
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.orientation = Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
    }

    pub fn rotation(&self) -> Vec3 {
        let (x, y, z) = self.orientation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    /// Turn to face `target`. A target at the camera position leaves orientation unchanged.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = target - self.position;
        if forward.length_squared() <= f32::EPSILON {
            return;
        }
        let up = if forward.normalize().cross(Vec3::Y).length_squared() < 1e-8 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let view = Mat4::look_at_rh(self.position, target, up);
        let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
        self.orientation = rotation.normalize();
    }

    /// Recompute the cached projection after changing fov, aspect, near or far
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }
}
