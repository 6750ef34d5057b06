use crate::engine::texture::TextureHandle;
use crate::error::{Result, SceneError};
use crate::math::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Lambert diffuse under scene lights and fog
    Standard,
    /// Flat color, ignores lights
    Basic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub shading: Shading,
    pub color: Color,
    pub map: Option<TextureHandle>,
    pub transparent: bool,
    pub opacity: f32,
}

impl Material {
    pub fn standard(color: Color) -> Self {
        Self {
            shading: Shading::Standard,
            color,
            map: None,
            transparent: false,
            opacity: 1.0,
        }
    }

    pub fn basic(color: Color) -> Self {
        Self {
            shading: Shading::Basic,
            ..Self::standard(color)
        }
    }

    /// Lit material whose color comes from `map`
    pub fn textured(map: TextureHandle) -> Self {
        Self::standard(Color::WHITE).with_map(map)
    }

    pub fn with_map(mut self, map: TextureHandle) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = true;
        self
    }

    pub fn is_blended(&self) -> bool {
        self.transparent && self.opacity < 1.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(Color::WHITE)
    }
}

/// One material for the whole mesh, or one per geometry group
#[derive(Debug, Clone, PartialEq)]
pub enum Materials {
    Single(Material),
    PerGroup(Vec<Material>),
}

impl Materials {
    pub fn from_vec(materials: Vec<Material>) -> Result<Self> {
        match materials.len() {
            0 => Err(SceneError::MissingMaterial),
            1 => Ok(Self::Single(materials.into_iter().next().ok_or(SceneError::MissingMaterial)?)),
            _ => Ok(Self::PerGroup(materials)),
        }
    }

    /// Material for a geometry group. Groups past the end of the list are not drawn.
    pub fn for_group(&self, material_index: usize) -> Option<&Material> {
        match self {
            Self::Single(material) => Some(material),
            Self::PerGroup(list) => list.get(material_index),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        let slice = match self {
            Self::Single(material) => std::slice::from_ref(material),
            Self::PerGroup(list) => list.as_slice(),
        };
        slice.iter()
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::PerGroup(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Material> for Materials {
    fn from(material: Material) -> Self {
        Self::Single(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_is_missing_material() {
        assert!(matches!(
            Materials::from_vec(Vec::new()),
            Err(SceneError::MissingMaterial)
        ));
    }

    #[test]
    fn test_single_applies_to_every_group() {
        let materials = Materials::from_vec(vec![Material::basic(Color::BLACK)]).unwrap();
        assert!(matches!(materials, Materials::Single(_)));
        assert_eq!(materials.for_group(5), materials.for_group(0));
    }

    #[test]
    fn test_per_group_lookup() {
        let list: Vec<_> = (0..6)
            .map(|i| Material::standard(Color::rgb(i as f32, 0.0, 0.0)))
            .collect();
        let materials = Materials::from_vec(list).unwrap();
        assert_eq!(materials.len(), 6);
        assert_eq!(materials.for_group(3).unwrap().color.r, 3.0);
        assert!(materials.for_group(6).is_none());
    }

    #[test]
    fn test_opacity_marks_transparent() {
        let glow = Material::basic(Color::WHITE).with_opacity(0.5);
        assert!(glow.transparent);
        assert!(glow.is_blended());
        assert!(!Material::default().is_blended());
    }
}
