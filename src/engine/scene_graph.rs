use glam::Mat4;

use crate::engine::object::Object3D;
use crate::engine::texture::TextureHandle;
use crate::math::Color;

/// Index of a top-level object. Objects are never removed, so ids stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Color(Color),
    /// Equirectangular panorama
    Texture(TextureHandle),
}

/// Exponential squared fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub density: f32,
}

impl Fog {
    pub fn exp2(hex: u32, density: f32) -> Self {
        Self {
            color: Color::from_hex(hex),
            density,
        }
    }

    /// Blend factor toward the fog color at `depth`
    pub fn factor(&self, depth: f32) -> f32 {
        let d = self.density * depth;
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }
}

/// Append-only container of everything drawn in a frame
#[derive(Debug, Default)]
pub struct SceneGraph {
    objects: Vec<Object3D>,
    background: Option<Background>,
    fog: Option<Fog>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: Object3D) -> ObjectId {
        self.insert(object).0
    }

    /// Add and keep a handle to the stored object
    pub fn insert(&mut self, object: Object3D) -> (ObjectId, &mut Object3D) {
        let index = self.objects.len();
        self.objects.push(object);
        (ObjectId(index), &mut self.objects[index])
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id.0)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.objects.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object3D)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, object)| (ObjectId(index), object))
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = Some(background);
    }

    pub fn fog(&self) -> Option<&Fog> {
        self.fog.as_ref()
    }

    pub fn set_fog(&mut self, fog: Fog) {
        self.fog = Some(fog);
    }

    /// Visit every visible node, nested groups included, with its world matrix
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(&Object3D, Mat4),
    {
        for object in &self.objects {
            object.traverse(Mat4::IDENTITY, &mut visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::light::Light;

    #[test]
    fn test_add_returns_sequential_ids() {
        let mut scene = SceneGraph::new();
        let a = scene.add(Object3D::light(Light::ambient(0x404040, 1.0)));
        let b = scene.add(Object3D::group(Vec::new()));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(scene.len(), 2);
        assert!(scene.get(b).unwrap().as_light().is_none());
    }

    #[test]
    fn test_fog_factor_monotonic() {
        let fog = Fog::exp2(0x800080, 0.05);
        assert_eq!(fog.factor(0.0), 0.0);
        assert!(fog.factor(10.0) < fog.factor(20.0));
        assert!(fog.factor(1000.0) > 0.999);
    }

    #[test]
    fn test_background_and_fog_default_unset() {
        let scene = SceneGraph::new();
        assert!(scene.background().is_none());
        assert!(scene.fog().is_none());
        assert!(scene.is_empty());
    }
}
