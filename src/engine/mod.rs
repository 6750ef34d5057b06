//! Minimal retained-mode 3D engine: scene graph, primitives, materials,
//! lights, a perspective camera and orbit controls.

mod camera;
mod controls;
mod geometry;
mod light;
mod material;
mod object;
mod scene_graph;
mod texture;

pub use camera::PerspectiveCamera;
pub use controls::OrbitControls;
pub use geometry::{Geometry, GeometryGroup, GeometryId, GeometryKind, MeshData};
pub use light::{Light, LightKind};
pub use material::{Material, Materials, Shading};
pub use object::{Mesh, Object3D, ObjectKind};
pub use scene_graph::{Background, Fog, ObjectId, SceneGraph};
pub use texture::{
    ColorSpace, Mapping, TextureHandle, TextureId, TextureImage, TextureSettings, WrapMode,
};
