use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::engine::{Geometry, Material, MeshData, Object3D, TextureSettings};
use crate::loaders::TextureLoader;
use crate::math::{srgb_to_linear, Color};

/// Load an OBJ model with an explicit MTL file into a group of meshes.
///
/// Diffuse texture paths in the MTL are resolved relative to the MTL file
/// and queued on `textures`. A missing or broken MTL is logged and the
/// model falls back to a plain white material.
pub fn load_obj(obj_path: &Path, mtl_path: &Path, textures: &TextureLoader) -> Result<Object3D> {
    let file = File::open(obj_path).with_context(|| format!("opening {:?}", obj_path))?;
    let mut reader = BufReader::new(file);

    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, materials) = tobj::load_obj_buf(&mut reader, &options, |_| tobj::load_mtl(mtl_path))
        .with_context(|| format!("parsing {:?}", obj_path))?;

    let materials = match materials {
        Ok(materials) => materials,
        Err(e) => {
            warn!("material library {:?} unusable: {}", mtl_path, e);
            Vec::new()
        }
    };
    let mtl_dir = mtl_path.parent().unwrap_or_else(|| Path::new("."));
    let converted: Vec<Material> = materials
        .iter()
        .map(|m| convert_material(m, mtl_dir, textures))
        .collect();

    let mut children = Vec::with_capacity(models.len());
    for model in models {
        let data = mesh_data(&model.mesh);
        if data.positions.is_empty() {
            continue;
        }
        let material = model
            .mesh
            .material_id
            .and_then(|id| converted.get(id).cloned())
            .unwrap_or_default();
        let geometry = Geometry::from_mesh(data)
            .with_context(|| format!("mesh {:?} in {:?}", model.name, obj_path))?;
        children.push(Object3D::mesh(geometry, material).named(model.name));
    }

    if children.is_empty() {
        bail!("{:?} contains no geometry", obj_path);
    }
    info!(
        "parsed {:?}: {} meshes, {} materials",
        obj_path,
        children.len(),
        converted.len()
    );
    Ok(Object3D::group(children))
}

fn mesh_data(mesh: &tobj::Mesh) -> MeshData {
    MeshData {
        positions: mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect(),
        normals: mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect(),
        uvs: mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect(),
        indices: mesh.indices.clone(),
        groups: Vec::new(),
    }
}

fn convert_material(source: &tobj::Material, dir: &Path, textures: &TextureLoader) -> Material {
    let color = source
        .diffuse
        .map(|[r, g, b]| Color::rgb(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)))
        .unwrap_or(Color::WHITE);
    let mut material = Material::standard(color);
    if let Some(texture) = &source.diffuse_texture {
        material = material.with_map(textures.load(dir.join(texture), TextureSettings::default()));
    }
    if let Some(dissolve) = source.dissolve.filter(|d| *d < 1.0) {
        material = material.with_opacity(dissolve);
    }
    material
}
