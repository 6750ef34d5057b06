use bitflags::bitflags;
use std::fmt;

use crate::math::Transform;

bitflags! {
    /// Rotation axes driven by a spin behavior
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpinAxes: u8 {
        const X = 0b001;
        const Y = 0b010;
        const Z = 0b100;
    }
}

/// Per-frame transform update attached to a registered object
///
/// A behavior only ever sees its own object's transform, so it cannot touch
/// any other object in the scene.
pub enum AnimationBehavior {
    /// Sets each selected rotation component to `seconds * rate`
    Spin { axes: SpinAxes, rate: f32 },
    Custom(Box<dyn FnMut(&mut Transform, f32)>),
}

impl AnimationBehavior {
    pub fn spin(axes: SpinAxes) -> Self {
        Self::Spin { axes, rate: 1.0 }
    }

    pub fn custom(f: impl FnMut(&mut Transform, f32) + 'static) -> Self {
        Self::Custom(Box::new(f))
    }

    pub fn apply(&mut self, transform: &mut Transform, seconds: f32) {
        match self {
            Self::Spin { axes, rate } => {
                let angle = seconds * *rate;
                if axes.contains(SpinAxes::X) {
                    transform.rotation.x = angle;
                }
                if axes.contains(SpinAxes::Y) {
                    transform.rotation.y = angle;
                }
                if axes.contains(SpinAxes::Z) {
                    transform.rotation.z = angle;
                }
            }
            Self::Custom(f) => f(transform, seconds),
        }
    }
}

impl fmt::Debug for AnimationBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spin { axes, rate } => f
                .debug_struct("Spin")
                .field("axes", axes)
                .field("rate", rate)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
