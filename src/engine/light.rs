use crate::math::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Parallel rays shining from the light's position toward the origin
    Directional,
    /// Omni light with a finite range; `distance` 0 means unlimited
    Point { distance: f32, decay: f32 },
    Ambient,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    pub fn directional(hex: u32, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            color: Color::from_hex(hex),
            intensity,
        }
    }

    pub fn point(hex: u32, intensity: f32, distance: f32) -> Self {
        Self {
            kind: LightKind::Point {
                distance,
                decay: 2.0,
            },
            color: Color::from_hex(hex),
            intensity,
        }
    }

    pub fn ambient(hex: u32, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color: Color::from_hex(hex),
            intensity,
        }
    }

    /// Color premultiplied by intensity
    pub fn radiance(&self) -> Color {
        self.color.scaled(self.intensity)
    }
}
