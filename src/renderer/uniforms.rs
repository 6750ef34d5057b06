//! GPU-side data layouts and their construction from the scene

use glam::{Mat4, Vec3};
use log::debug;

use crate::engine::{Background, Light, LightKind, Material, MeshData, PerspectiveCamera, SceneGraph, Shading};
use crate::math::Color;

pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;
pub const MAX_POINT_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave mesh attributes into vertices
pub fn interleave(data: &MeshData) -> Vec<Vertex> {
    data.positions
        .iter()
        .enumerate()
        .map(|(i, position)| Vertex {
            position: *position,
            normal: data.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            uv: data.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
        })
        .collect()
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightUniform {
    /// Unit vector pointing toward the light
    pub direction: [f32; 4],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 4],
    pub color: [f32; 4],
    /// x: cutoff distance (0 = none), y: decay
    pub params: [f32; 4],
}

/// Lights gathered from one traversal of the scene graph
#[derive(Debug, Default, Clone)]
pub struct SceneLights {
    pub ambient: [f32; 3],
    pub directional: Vec<DirectionalLightUniform>,
    pub point: Vec<PointLightUniform>,
}

impl SceneLights {
    pub fn add(&mut self, light: &Light, world: Mat4) {
        let radiance = light.radiance().to_vec4(0.0);
        let position = world.transform_point3(Vec3::ZERO);
        match light.kind {
            LightKind::Ambient => {
                let c = light.radiance();
                self.ambient[0] += c.r;
                self.ambient[1] += c.g;
                self.ambient[2] += c.b;
            }
            LightKind::Directional => {
                if self.directional.len() >= MAX_DIRECTIONAL_LIGHTS {
                    debug!("directional light limit reached, skipping one");
                    return;
                }
                // aimed at the origin
                let direction = position.try_normalize().unwrap_or(Vec3::Y);
                self.directional.push(DirectionalLightUniform {
                    direction: direction.extend(0.0).to_array(),
                    color: radiance,
                });
            }
            LightKind::Point { distance, decay } => {
                if self.point.len() >= MAX_POINT_LIGHTS {
                    debug!("point light limit reached, skipping one");
                    return;
                }
                self.point.push(PointLightUniform {
                    position: position.extend(1.0).to_array(),
                    color: radiance,
                    params: [distance, decay, 0.0, 0.0],
                });
            }
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// rgb: fog color, w: density (0 disables fog)
    pub fog: [f32; 4],
    pub ambient: [f32; 4],
    pub background: [f32; 4],
    /// x: directional count, y: point count, z: sky texture bound
    pub counts: [u32; 4],
    pub directional: [DirectionalLightUniform; MAX_DIRECTIONAL_LIGHTS],
    pub point: [PointLightUniform; MAX_POINT_LIGHTS],
}

impl FrameUniform {
    pub fn new(camera: &PerspectiveCamera, scene: &SceneGraph, lights: &SceneLights, sky_bound: bool) -> Self {
        let view_proj = camera.view_projection();
        let (fog, density) = scene
            .fog()
            .map(|f| (f.color, f.density))
            .unwrap_or((Color::BLACK, 0.0));

        let mut directional = [DirectionalLightUniform::default(); MAX_DIRECTIONAL_LIGHTS];
        for (slot, light) in directional.iter_mut().zip(&lights.directional) {
            *slot = *light;
        }
        let mut point = [PointLightUniform::default(); MAX_POINT_LIGHTS];
        for (slot, light) in point.iter_mut().zip(&lights.point) {
            *slot = *light;
        }

        Self {
            view_proj: view_proj.to_cols_array_2d(),
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            fog: fog.to_vec4(density),
            ambient: [lights.ambient[0], lights.ambient[1], lights.ambient[2], 0.0],
            background: clear_color(scene).to_vec4(1.0),
            counts: [
                lights.directional.len().min(MAX_DIRECTIONAL_LIGHTS) as u32,
                lights.point.len().min(MAX_POINT_LIGHTS) as u32,
                u32::from(sky_bound),
                0,
            ],
            directional,
            point,
        }
    }
}

/// Solid color behind everything
pub fn clear_color(scene: &SceneGraph) -> Color {
    match scene.background() {
        Some(Background::Color(color)) => *color,
        _ => Color::BLACK,
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    /// rgb: base color, a: opacity
    pub color: [f32; 4],
    /// x: map bound, y: unlit, zw: uv repeat
    pub params: [f32; 4],
}

impl ObjectUniform {
    pub fn new(world: Mat4, material: &Material, map_bound: bool) -> Self {
        let repeat = material
            .map
            .as_ref()
            .map(|m| m.settings().repeat)
            .unwrap_or([1.0, 1.0]);
        let opacity = if material.transparent { material.opacity } else { 1.0 };
        Self {
            model: world.to_cols_array_2d(),
            normal: world.inverse().transpose().to_cols_array_2d(),
            color: material.color.to_vec4(opacity),
            params: [
                if map_bound { 1.0 } else { 0.0 },
                if material.shading == Shading::Basic { 1.0 } else { 0.0 },
                repeat[0],
                repeat[1],
            ],
        }
    }
}

/// Overlay scale in physical pixels per UI point
///
/// Follows the display's pixel ratio so the overlay tracks DPI changes. The
/// UI's own scale is used only until a usable ratio has been set.
pub fn overlay_pixels_per_point(pixel_ratio: f64, ui_scale: f32) -> f32 {
    if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
        pixel_ratio as f32
    } else {
        ui_scale
    }
}

/// Round `size` up to the device's dynamic offset alignment
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}
