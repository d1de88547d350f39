//! glTF/GLB export.

use crate::error::{BookError, Result};
use crate::scene::{BookScene, PartMaterial};
use crate::scene::geometry::Mesh;
use gltf_json as json;
use json::validation::Checked::Valid;
use json::validation::USize64;
use std::mem;

/// Byte ranges of one part's vertex data inside the binary chunk.
struct MeshOffsets {
    pos_offset: usize,
    pos_bytes: usize,
    norm_offset: usize,
    norm_bytes: usize,
    uv_offset: usize,
    uv_bytes: usize,
    /// `None` for point parts.
    idx: Option<(usize, usize)>,
    vertex_count: usize,
    index_count: usize,
}

fn write_mesh(buffer: &mut Vec<u8>, mesh: &Mesh) -> MeshOffsets {
    let pos_offset = buffer.len();
    buffer.extend_from_slice(bytemuck_cast_slice(&mesh.positions_flat()));
    let norm_offset = buffer.len();
    buffer.extend_from_slice(bytemuck_cast_slice(&mesh.normals_flat()));
    let uv_offset = buffer.len();
    buffer.extend_from_slice(bytemuck_cast_slice(&mesh.uvs_flat()));
    let idx_offset = buffer.len();
    let idx = if mesh.is_points() {
        None
    } else {
        buffer.extend_from_slice(bytemuck_cast_slice(&mesh.indices));
        Some((idx_offset, buffer.len() - idx_offset))
    };

    MeshOffsets {
        pos_offset,
        pos_bytes: norm_offset - pos_offset,
        norm_offset,
        norm_bytes: uv_offset - norm_offset,
        uv_offset,
        uv_bytes: idx_offset - uv_offset,
        idx,
        vertex_count: mesh.vertex_count(),
        index_count: mesh.indices.len(),
    }
}

/// Export a scene to GLB format (binary glTF).
/// Each non-empty part becomes one primitive with its own PBR material;
/// translucent parts use blend alpha mode.
pub fn export_glb(scene: &BookScene) -> Result<Vec<u8>> {
    let parts: Vec<_> = scene.parts.iter().filter(|p| !p.mesh.is_empty()).collect();
    if parts.is_empty() {
        return Err(BookError::Export("Cannot export empty scene".to_string()));
    }

    // All vertex data is f32 or u32, so every offset stays 4-byte aligned.
    let mut buffer_data: Vec<u8> = Vec::new();
    let offsets: Vec<MeshOffsets> = parts
        .iter()
        .map(|p| write_mesh(&mut buffer_data, &p.mesh))
        .collect();

    let mut accessors = Vec::new();
    let mut buffer_views = Vec::new();
    let mut primitives = Vec::new();
    let mut materials = Vec::new();

    for (part, offsets) in parts.iter().zip(&offsets) {
        let (min, max) = part.mesh.bounds().unwrap_or(([0.0; 3], [0.0; 3]));
        let view_start = buffer_views.len() as u32;
        let accessor_start = accessors.len() as u32;
        let target = Some(json::buffer::Target::ArrayBuffer);

        buffer_views.push(create_buffer_view(offsets.pos_offset, offsets.pos_bytes, target));
        buffer_views.push(create_buffer_view(offsets.norm_offset, offsets.norm_bytes, target));
        buffer_views.push(create_buffer_view(offsets.uv_offset, offsets.uv_bytes, target));

        accessors.push(create_accessor(view_start, offsets.vertex_count, json::accessor::Type::Vec3, json::accessor::ComponentType::F32, Some(min), Some(max)));
        accessors.push(create_accessor(view_start + 1, offsets.vertex_count, json::accessor::Type::Vec3, json::accessor::ComponentType::F32, None, None));
        accessors.push(create_accessor(view_start + 2, offsets.vertex_count, json::accessor::Type::Vec2, json::accessor::ComponentType::F32, None, None));

        let indices = offsets.idx.map(|(offset, bytes)| {
            buffer_views.push(create_buffer_view(offset, bytes, Some(json::buffer::Target::ElementArrayBuffer)));
            accessors.push(create_accessor(view_start + 3, offsets.index_count, json::accessor::Type::Scalar, json::accessor::ComponentType::U32, None, None));
            accessor_start + 3
        });

        let material_idx = materials.len() as u32;
        materials.push(create_material(&part.material));
        primitives.push(create_primitive(accessor_start, indices, material_idx));
    }

    let root = json::Root {
        accessors,
        buffers: vec![json::Buffer {
            byte_length: USize64(buffer_data.len() as u64),
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            uri: None,
        }],
        buffer_views,
        materials,
        meshes: vec![json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some("book".to_string()),
            primitives,
            weights: None,
        }],
        nodes: vec![json::Node {
            camera: None,
            children: None,
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: Some(json::Index::new(0)),
            name: Some("book".to_string()),
            rotation: None,
            scale: None,
            translation: None,
            skin: None,
            weights: None,
        }],
        scenes: vec![json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            nodes: vec![json::Index::new(0)],
        }],
        scene: Some(json::Index::new(0)),
        ..Default::default()
    };

    let json_string = json::serialize::to_string(&root)
        .map_err(|e| BookError::Export(format!("Failed to serialize glTF JSON: {}", e)))?;

    Ok(write_glb(json_string.as_bytes(), &buffer_data))
}

/// Frame a JSON chunk and a BIN chunk as a GLB container.
fn write_glb(json_bytes: &[u8], buffer_data: &[u8]) -> Vec<u8> {
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let padded_json_len = json_bytes.len() + json_padding;

    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let padded_buffer_len = buffer_data.len() + buffer_padding;

    let total_size = 12 + // GLB header
        8 + padded_json_len + // JSON chunk
        8 + padded_buffer_len; // BIN chunk

    let mut glb = Vec::with_capacity(total_size);

    // GLB Header
    glb.extend_from_slice(b"glTF"); // magic
    glb.extend_from_slice(&2u32.to_le_bytes()); // version
    glb.extend_from_slice(&(total_size as u32).to_le_bytes()); // length

    // JSON Chunk
    glb.extend_from_slice(&(padded_json_len as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // chunk type: JSON
    glb.extend_from_slice(json_bytes);
    glb.extend_from_slice(&vec![0x20u8; json_padding]); // padding (spaces)

    // BIN Chunk
    glb.extend_from_slice(&(padded_buffer_len as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E4942u32.to_le_bytes()); // chunk type: BIN
    glb.extend_from_slice(buffer_data);
    glb.extend_from_slice(&vec![0u8; buffer_padding]); // padding (zeros)

    glb
}

/// Create a buffer view.
fn create_buffer_view(
    offset: usize,
    size: usize,
    target: Option<json::buffer::Target>,
) -> json::buffer::View {
    json::buffer::View {
        buffer: json::Index::new(0),
        byte_length: USize64(size as u64),
        byte_offset: Some(USize64(offset as u64)),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        target: target.map(Valid),
    }
}

/// Create an accessor.
fn create_accessor(
    buffer_view: u32,
    count: usize,
    type_: json::accessor::Type,
    component_type: json::accessor::ComponentType,
    min: Option<[f32; 3]>,
    max: Option<[f32; 3]>,
) -> json::Accessor {
    json::Accessor {
        buffer_view: Some(json::Index::new(buffer_view)),
        byte_offset: Some(USize64(0)),
        count: USize64(count as u64),
        component_type: Valid(json::accessor::GenericComponentType(component_type)),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(type_),
        min: min.map(|m| json::Value::from(m.to_vec())),
        max: max.map(|m| json::Value::from(m.to_vec())),
        name: None,
        normalized: false,
        sparse: None,
    }
}

/// Create a primitive whose position, normal and uv accessors are consecutive.
fn create_primitive(
    positions_accessor: u32,
    indices_accessor: Option<u32>,
    material: u32,
) -> json::mesh::Primitive {
    let mut attributes = std::collections::BTreeMap::new();
    attributes.insert(
        Valid(json::mesh::Semantic::Positions),
        json::Index::new(positions_accessor),
    );
    attributes.insert(
        Valid(json::mesh::Semantic::Normals),
        json::Index::new(positions_accessor + 1),
    );
    attributes.insert(
        Valid(json::mesh::Semantic::TexCoords(0)),
        json::Index::new(positions_accessor + 2),
    );

    let mode = if indices_accessor.is_some() {
        json::mesh::Mode::Triangles
    } else {
        json::mesh::Mode::Points
    };

    json::mesh::Primitive {
        attributes,
        extensions: Default::default(),
        extras: Default::default(),
        indices: indices_accessor.map(json::Index::new),
        material: Some(json::Index::new(material)),
        mode: Valid(mode),
        targets: None,
    }
}

fn create_material(material: &PartMaterial) -> json::Material {
    let alpha_mode = if material.is_transparent() {
        json::material::AlphaMode::Blend
    } else {
        json::material::AlphaMode::Opaque
    };

    json::Material {
        name: Some(material.name.clone()),
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_texture: None,
            base_color_factor: json::material::PbrBaseColorFactor(material.base_color),
            metallic_factor: json::material::StrengthFactor(material.metalness),
            roughness_factor: json::material::StrengthFactor(material.roughness),
            metallic_roughness_texture: None,
            extensions: Default::default(),
            extras: Default::default(),
        },
        alpha_mode: Valid(alpha_mode),
        alpha_cutoff: None,
        double_sided: true,
        normal_texture: None,
        occlusion_texture: None,
        emissive_texture: None,
        emissive_factor: json::material::EmissiveFactor(material.emissive),
        extensions: Default::default(),
        extras: Default::default(),
    }
}

/// Cast a slice of T to a slice of bytes.
fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    let ptr = slice.as_ptr() as *const u8;
    let len = slice.len() * mem::size_of::<T>();
    unsafe { std::slice::from_raw_parts(ptr, len) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BookConfig;
    use glam::Vec3;

    fn json_chunk(glb: &[u8]) -> serde_json::Value {
        let len = u32::from_le_bytes([glb[12], glb[13], glb[14], glb[15]]) as usize;
        serde_json::from_slice(&glb[20..20 + len]).unwrap()
    }

    #[test]
    fn test_export_book() {
        let scene = BookScene::build(&BookConfig::default(), &[]);
        let glb = export_glb(&scene).unwrap();

        // Check GLB header
        assert_eq!(&glb[0..4], b"glTF");
        assert_eq!(u32::from_le_bytes([glb[4], glb[5], glb[6], glb[7]]), 2); // version
        assert_eq!(
            u32::from_le_bytes([glb[8], glb[9], glb[10], glb[11]]) as usize,
            glb.len()
        );
        assert_eq!(glb.len() % 4, 0);

        let doc = json_chunk(&glb);
        assert_eq!(doc["materials"].as_array().unwrap().len(), 3);
        assert_eq!(doc["meshes"][0]["primitives"].as_array().unwrap().len(), 3);
        // Pages are translucent by default.
        assert_eq!(doc["materials"][2]["alphaMode"], "BLEND");
        assert_eq!(doc["materials"][0]["name"], "spine");
        assert_eq!(doc["meshes"][0]["name"], "book");
    }

    #[test]
    fn test_export_empty_scene_fails() {
        let result = export_glb(&BookScene::default());
        assert!(matches!(result, Err(BookError::Export(_))));
    }

    #[test]
    fn test_particles_export_as_points() {
        let mut scene = BookScene::build(&BookConfig::default(), &[]);
        scene.add_particles(&[Vec3::ZERO, Vec3::ONE]);
        let glb = export_glb(&scene).unwrap();

        let doc = json_chunk(&glb);
        let primitive = &doc["meshes"][0]["primitives"][3];
        assert_eq!(primitive["mode"], 0);
        assert!(primitive.get("indices").is_none());
    }
}
