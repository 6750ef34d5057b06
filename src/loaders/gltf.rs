use anyhow::{bail, Context, Result};
use glam::{EulerRot, Mat4};
use log::{debug, info, warn};
use std::path::Path;

use crate::engine::{
    Geometry, Material, MeshData, Object3D, TextureHandle, TextureImage, TextureSettings,
};
use crate::math::{Color, Transform};

/// Loads a glTF file into a group mirroring its node hierarchy
pub fn load_gltf_file(path: impl AsRef<Path>) -> Result<Object3D> {
    let path = path.as_ref();
    debug!("loading glTF file {:?}", path);

    let (document, buffers, images) =
        gltf::import(path).with_context(|| format!("failed to load glTF file {:?}", path))?;

    let textures: Vec<Option<TextureHandle>> = images.into_iter().map(convert_image).collect();

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("glTF file has no scenes")?;

    let mut roots = Vec::new();
    for node in scene.nodes() {
        roots.push(process_node(&node, &buffers, &textures)?);
    }

    let mesh_count = count_meshes(&roots);
    if mesh_count == 0 {
        bail!("no geometry found in {:?}", path);
    }
    info!("glTF {:?}: {} nodes, {} meshes", path, document.nodes().count(), mesh_count);
    Ok(Object3D::group(roots))
}

fn count_meshes(objects: &[Object3D]) -> usize {
    objects
        .iter()
        .map(|o| usize::from(o.as_mesh().is_some()) + count_meshes(o.children()))
        .sum()
}

/// Recursively converts glTF nodes
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    textures: &[Option<TextureHandle>],
) -> Result<Object3D> {
    let mut children = Vec::new();

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if let Some(object) = process_primitive(&primitive, buffers, textures)? {
                children.push(object);
            }
        }
    }

    for child in node.children() {
        children.push(process_node(&child, buffers, textures)?);
    }

    let mut group = Object3D::group(children).named(node.name().unwrap_or_default());
    group.transform = node_transform(node);
    Ok(group)
}

fn node_transform(node: &gltf::Node) -> Transform {
    let matrix = Mat4::from_cols_array_2d(&node.transform().matrix());
    let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    Transform {
        position: translation,
        rotation: glam::Vec3::new(x, y, z),
        scale,
    }
}

fn process_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    textures: &[Option<TextureHandle>],
) -> Result<Option<Object3D>> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        warn!("skipping non-triangle primitive {:?}", primitive.mode());
        return Ok(None);
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .context("mesh primitive has no positions")?
        .collect();
    if positions.is_empty() {
        return Ok(None);
    }

    let data = MeshData {
        positions,
        normals: reader.read_normals().map(|n| n.collect()).unwrap_or_default(),
        // glTF puts v = 0 at the top of the image; flip to the bottom-origin convention
        uvs: reader
            .read_tex_coords(0)
            .map(|t| t.into_f32().map(|[u, v]| [u, 1.0 - v]).collect())
            .unwrap_or_default(),
        indices: reader
            .read_indices()
            .map(|i| i.into_u32().collect())
            .unwrap_or_default(),
        groups: Vec::new(),
    };

    let pbr = primitive.material().pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();
    let mut material = Material::standard(Color::rgb(r, g, b));
    if let Some(info) = pbr.base_color_texture() {
        if let Some(Some(handle)) = textures.get(info.texture().source().index()) {
            material = material.with_map(handle.clone());
        }
    }
    if a < 1.0 {
        material = material.with_opacity(a);
    }

    Ok(Some(Object3D::mesh(Geometry::from_mesh(data)?, material)))
}

fn convert_image(image: gltf::image::Data) -> Option<TextureHandle> {
    use gltf::image::Format;

    let (width, height) = (image.width, image.height);
    let rgba = match image.format {
        Format::R8G8B8A8 => image.pixels,
        Format::R8G8B8 => image
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        other => {
            warn!("unsupported glTF image format {:?}", other);
            return None;
        }
    };
    TextureImage::new(width, height, rgba)
        .map(|image| TextureHandle::from_image(image, TextureSettings::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_error() {
        assert!(load_gltf_file("/nonexistent/model.gltf").is_err());
    }

    #[test]
    fn test_convert_rgb_image_expands_alpha() {
        let data = gltf::image::Data {
            pixels: vec![1, 2, 3, 4, 5, 6],
            format: gltf::image::Format::R8G8B8,
            width: 2,
            height: 1,
        };
        let handle = convert_image(data).unwrap();
        assert_eq!(handle.image().unwrap().rgba, vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_count_meshes_nested() {
        let leaf = Object3D::mesh(Geometry::cube(1.0).unwrap(), Material::default());
        let tree = vec![Object3D::group(vec![leaf.clone(), Object3D::group(vec![leaf])])];
        assert_eq!(count_meshes(&tree), 2);
    }
}
