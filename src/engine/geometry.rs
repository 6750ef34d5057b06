//! Procedural geometry
//!
//! Tessellation follows the usual conventions for box, cylinder, sphere and
//! plane primitives: positions, normals and uvs per vertex, a `u32` index
//! list, and material groups that split the index range so a mesh can carry
//! one material per face (box) or per section (cylinder).

use glam::Vec3;
use std::f32::consts::{PI, TAU};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{positive, segments, Result, SceneError};

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity used by the renderer to cache GPU buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

impl GeometryId {
    fn next() -> Self {
        Self(NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Box,
    Cylinder,
    Sphere,
    Plane,
    Mesh,
}

/// A contiguous index range drawn with one material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryGroup {
    pub start: u32,
    pub count: u32,
    pub material_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub groups: Vec<GeometryGroup>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Groups to draw; a mesh without explicit groups draws everything with material 0
    pub fn draw_groups(&self) -> Vec<GeometryGroup> {
        if self.groups.is_empty() {
            vec![GeometryGroup {
                start: 0,
                count: self.indices.len() as u32,
                material_index: 0,
            }]
        } else {
            self.groups.clone()
        }
    }

    /// Area-weighted smooth normals
    pub fn compute_vertex_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from_array(self.positions[a]);
            let pb = Vec3::from_array(self.positions[b]);
            let pc = Vec3::from_array(self.positions[c]);
            let face = (pc - pb).cross(pa - pb);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }
        self.normals = accum
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
            .collect();
    }

    fn push_group(&mut self, start: usize, material_index: usize) {
        let count = self.indices.len() - start;
        if count > 0 {
            self.groups.push(GeometryGroup {
                start: start as u32,
                count: count as u32,
                material_index,
            });
        }
    }
}

/// Shared, immutable geometry
#[derive(Debug, Clone)]
pub struct Geometry {
    id: GeometryId,
    kind: GeometryKind,
    data: Arc<MeshData>,
}

impl Geometry {
    fn new(kind: GeometryKind, data: MeshData) -> Self {
        Self {
            id: GeometryId::next(),
            kind,
            data: Arc::new(data),
        }
    }

    /// Axis-aligned cube with six face groups in +x, -x, +y, -y, +z, -z order
    pub fn cube(size: f32) -> Result<Self> {
        let size = positive("size", size)?;
        Ok(Self::new(GeometryKind::Box, box_data(size)))
    }

    /// Open-ended tube with caps; groups are torso, top cap, bottom cap
    pub fn cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    ) -> Result<Self> {
        let radius_top = positive("radius_top", radius_top)?;
        let radius_bottom = positive("radius_bottom", radius_bottom)?;
        let height = positive("height", height)?;
        let radial_segments = segments("radial_segments", radial_segments)?;
        Ok(Self::new(
            GeometryKind::Cylinder,
            cylinder_data(radius_top, radius_bottom, height, radial_segments),
        ))
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Result<Self> {
        let radius = positive("radius", radius)?;
        let width_segments = segments("width_segments", width_segments)?;
        let height_segments = segments("height_segments", height_segments)?;
        Ok(Self::new(
            GeometryKind::Sphere,
            sphere_data(radius, width_segments, height_segments),
        ))
    }

    /// Plane in the XY plane facing +z
    pub fn plane(width: f32, height: f32) -> Result<Self> {
        let width = positive("width", width)?;
        let height = positive("height", height)?;
        Ok(Self::new(GeometryKind::Plane, plane_data(width, height)))
    }

    /// Wrap loaded mesh data. Missing normals are computed and missing uvs zeroed.
    pub fn from_mesh(mut data: MeshData) -> Result<Self> {
        if data.positions.is_empty() {
            return Err(SceneError::InvalidParameter {
                name: "positions",
                value: 0.0,
                reason: "mesh has no vertices",
            });
        }
        if data.indices.is_empty() {
            data.indices = (0..data.positions.len() as u32).collect();
        }
        let vertex_count = data.positions.len() as u32;
        if let Some(&bad) = data.indices.iter().find(|&&i| i >= vertex_count) {
            return Err(SceneError::InvalidParameter {
                name: "index",
                value: bad as f64,
                reason: "index out of range",
            });
        }
        if data.normals.len() != data.positions.len() {
            data.compute_vertex_normals();
        }
        if data.uvs.len() != data.positions.len() {
            data.uvs = vec![[0.0, 0.0]; data.positions.len()];
        }
        Ok(Self::new(GeometryKind::Mesh, data))
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn data(&self) -> &MeshData {
        &self.data
    }
}

fn box_data(size: f32) -> MeshData {
    let h = size * 0.5;
    // (normal, u axis, v axis) with u x v = normal
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut data = MeshData::default();
    for (face_index, (normal, u, v)) in faces.into_iter().enumerate() {
        let base = data.positions.len() as u32;
        let start = data.indices.len();
        for (cu, cv) in corners {
            let p = normal * h + u * (cu * h) + v * (cv * h);
            data.positions.push(p.to_array());
            data.normals.push(normal.to_array());
            data.uvs.push([(cu + 1.0) * 0.5, (cv + 1.0) * 0.5]);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        data.push_group(start, face_index);
    }
    data
}

fn cylinder_data(radius_top: f32, radius_bottom: f32, height: f32, radial: u32) -> MeshData {
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;
    let mut data = MeshData::default();

    // torso: two rings, top first
    let start = data.indices.len();
    for row in 0..=1u32 {
        let v = row as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        for col in 0..=radial {
            let u = col as f32 / radial as f32;
            let theta = u * TAU;
            let (sin, cos) = theta.sin_cos();
            data.positions.push([radius * sin, half - v * height, radius * cos]);
            let normal = Vec3::new(sin, slope, cos).normalize();
            data.normals.push(normal.to_array());
            data.uvs.push([u, 1.0 - v]);
        }
    }
    let ring = radial + 1;
    for col in 0..radial {
        let a = col;
        let b = ring + col;
        let c = ring + col + 1;
        let d = col + 1;
        data.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }
    data.push_group(start, 0);

    for (top, material_index) in [(true, 1), (false, 2)] {
        let start = data.indices.len();
        let radius = if top { radius_top } else { radius_bottom };
        let sign = if top { 1.0 } else { -1.0 };
        let center = data.positions.len() as u32;
        data.positions.push([0.0, half * sign, 0.0]);
        data.normals.push([0.0, sign, 0.0]);
        data.uvs.push([0.5, 0.5]);

        let first = data.positions.len() as u32;
        for col in 0..=radial {
            let theta = col as f32 / radial as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            data.positions.push([radius * sin, half * sign, radius * cos]);
            data.normals.push([0.0, sign, 0.0]);
            data.uvs.push([cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5]);
        }
        for col in 0..radial {
            let i = first + col;
            if top {
                data.indices.extend_from_slice(&[i, i + 1, center]);
            } else {
                data.indices.extend_from_slice(&[i + 1, i, center]);
            }
        }
        data.push_group(start, material_index);
    }
    data
}

fn sphere_data(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut data = MeshData::default();
    let stride = width_segments + 1;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let (sin_phi, cos_phi) = (v * PI).sin_cos();
            let (sin_theta, cos_theta) = (u * TAU).sin_cos();
            let p = Vec3::new(-radius * cos_theta * sin_phi, radius * cos_phi, radius * sin_theta * sin_phi);
            data.positions.push(p.to_array());
            data.normals
                .push(p.try_normalize().unwrap_or(Vec3::Y).to_array());
            data.uvs.push([u, 1.0 - v]);
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * stride + ix + 1;
            let b = iy * stride + ix;
            let c = (iy + 1) * stride + ix;
            let d = (iy + 1) * stride + ix + 1;
            // poles collapse to single triangles
            if iy != 0 {
                data.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                data.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    data
}

fn plane_data(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width * 0.5, height * 0.5);
    MeshData {
        positions: vec![[-hw, hh, 0.0], [hw, hh, 0.0], [-hw, -hh, 0.0], [hw, -hh, 0.0]],
        normals: vec![[0.0, 0.0, 1.0]; 4],
        uvs: vec![[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
        indices: vec![0, 2, 1, 2, 3, 1],
        groups: Vec::new(),
    }
}
