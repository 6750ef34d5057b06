use glam::{Mat4, Vec3};

use crate::engine::geometry::Geometry;
use crate::engine::light::Light;
use crate::engine::material::Materials;
use crate::math::Transform;

#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Geometry,
    pub materials: Materials,
}

#[derive(Debug, Clone)]
pub enum ObjectKind {
    Mesh(Mesh),
    Light(Light),
    Group(Vec<Object3D>),
}

/// A node in the scene graph
#[derive(Debug, Clone)]
pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub kind: ObjectKind,
    pub visible: bool,
    /// Marks the object as a pointer target. Nothing reads it yet.
    pub clickable: bool,
}

impl Object3D {
    fn with_kind(kind: ObjectKind) -> Self {
        Self {
            name: String::new(),
            transform: Transform::IDENTITY,
            kind,
            visible: true,
            clickable: false,
        }
    }

    pub fn mesh(geometry: Geometry, materials: impl Into<Materials>) -> Self {
        Self::with_kind(ObjectKind::Mesh(Mesh {
            geometry,
            materials: materials.into(),
        }))
    }

    pub fn light(light: Light) -> Self {
        Self::with_kind(ObjectKind::Light(light))
    }

    pub fn group(children: Vec<Object3D>) -> Self {
        Self::with_kind(ObjectKind::Group(children))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn scaled(mut self, scale: f32) -> Self {
        self.transform.set_uniform_scale(scale);
        self
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            ObjectKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            ObjectKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Object3D] {
        match &self.kind {
            ObjectKind::Group(children) => children,
            _ => &[],
        }
    }

    /// Depth-first walk over visible nodes with their world matrices
    pub fn traverse<F>(&self, parent: Mat4, visit: &mut F)
    where
        F: FnMut(&Object3D, Mat4),
    {
        if !self.visible {
            return;
        }
        let world = parent * self.transform.matrix();
        visit(self, world);
        for child in self.children() {
            child.traverse(world, visit);
        }
    }
}
