//! Wavefront OBJ export.
//!
//! OBJ is a simple, widely-supported text-based 3D format.
//! Each scene part becomes a group with its own MTL material; particle
//! parts are written as point elements.

use crate::error::Result;
use crate::scene::{BookScene, PartMaterial};
use std::fmt::Write;

/// Export a scene to OBJ format.
/// Returns (obj_content, mtl_content) as strings.
pub fn export_obj(scene: &BookScene, name: &str) -> Result<(String, String)> {
    let total_verts = scene.total_vertices();
    let total_tris = scene.total_triangles();

    // Pre-size buffers: ~60 bytes per vertex line (v/vt/vn) × 3 + ~40 per face
    let mut obj = String::with_capacity(256 + total_verts * 180 + total_tris * 40);
    let mut mtl = String::with_capacity(512);

    writeln!(obj, "# Babel Book OBJ Export")?;
    writeln!(obj, "# Vertices: {}", total_verts)?;
    writeln!(obj, "# Triangles: {}", total_tris)?;
    writeln!(obj)?;
    writeln!(obj, "mtllib {}.mtl", name)?;
    writeln!(obj)?;
    writeln!(obj, "o {}", name)?;
    writeln!(obj)?;

    let parts: Vec<_> = scene.parts.iter().filter(|p| !p.mesh.is_empty()).collect();

    // OBJ has global vertex pools
    for part in &parts {
        for v in &part.mesh.vertices {
            writeln!(obj, "v {} {} {}", v.position[0], v.position[1], v.position[2])?;
        }
    }
    writeln!(obj)?;
    for part in &parts {
        for v in &part.mesh.vertices {
            writeln!(obj, "vt {} {}", v.uv[0], v.uv[1])?;
        }
    }
    writeln!(obj)?;
    for part in &parts {
        for v in &part.mesh.vertices {
            writeln!(obj, "vn {} {} {}", v.normal[0], v.normal[1], v.normal[2])?;
        }
    }
    writeln!(obj)?;

    let mut vertex_offset: usize = 0;
    for part in &parts {
        let material = material_name(name, &part.material);
        writeln!(obj, "g {}", part.name)?;
        writeln!(obj, "usemtl {}", material)?;

        if part.mesh.is_points() {
            for i in 0..part.mesh.vertex_count() {
                writeln!(obj, "p {}", i + vertex_offset + 1)?;
            }
        } else {
            for tri in part.mesh.indices.chunks_exact(3) {
                let i0 = tri[0] as usize + vertex_offset + 1;
                let i1 = tri[1] as usize + vertex_offset + 1;
                let i2 = tri[2] as usize + vertex_offset + 1;
                writeln!(
                    obj,
                    "f {}/{}/{} {}/{}/{} {}/{}/{}",
                    i0, i0, i0, i1, i1, i1, i2, i2, i2
                )?;
            }
        }
        writeln!(obj)?;
        vertex_offset += part.mesh.vertex_count();
    }

    writeln!(mtl, "# Babel Book Materials")?;
    for part in &parts {
        write_material(&mut mtl, &material_name(name, &part.material), &part.material)?;
    }

    Ok((obj, mtl))
}

fn material_name(prefix: &str, material: &PartMaterial) -> String {
    format!("{}_{}", prefix, material.name)
}

fn write_material(mtl: &mut String, name: &str, material: &PartMaterial) -> Result<()> {
    let [r, g, b, a] = material.base_color;
    let [er, eg, eb] = material.emissive;
    // Phong approximation of the PBR parameters
    let specular = material.metalness;
    let shininess = (1.0 - material.roughness).max(0.0) * 100.0 + 1.0;

    writeln!(mtl)?;
    writeln!(mtl, "newmtl {}", name)?;
    writeln!(mtl, "Ka {} {} {}", r, g, b)?;
    writeln!(mtl, "Kd {} {} {}", r, g, b)?;
    writeln!(mtl, "Ks {} {} {}", specular, specular, specular)?;
    writeln!(mtl, "Ke {} {} {}", er, eg, eb)?;
    writeln!(mtl, "Ns {}", shininess)?;
    writeln!(mtl, "d {}", a)?;
    writeln!(mtl, "illum 2")?;
    Ok(())
}

/// OBJ and MTL text ready for writing to files.
pub struct ObjExport {
    pub obj: String,
    pub mtl: String,
}

impl ObjExport {
    pub fn from_scene(scene: &BookScene, name: &str) -> Result<Self> {
        let (obj, mtl) = export_obj(scene, name)?;
        Ok(Self { obj, mtl })
    }
}
