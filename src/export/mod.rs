//! Scene export formats.
//!
//! GLB for engines and viewers, OBJ/MTL for everything else.

pub mod gltf;
pub mod obj;

pub use gltf::export_glb;
pub use obj::{export_obj, ObjExport};

use crate::error::Result;
use crate::scene::BookScene;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Glb,
    Obj,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Glb => "glb",
            ExportFormat::Obj => "obj",
        }
    }
}

/// Write `scene` to `path`, adding the format's extension when `path` has
/// none. OBJ also writes a sibling `.mtl`. Returns every file written.
pub fn write_scene(scene: &BookScene, path: &Path, format: ExportFormat) -> Result<Vec<PathBuf>> {
    let path = if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(format.extension())
    };

    match format {
        ExportFormat::Glb => {
            let glb_data = export_glb(scene)?;
            fs::write(&path, &glb_data)?;
            info!("Exported GLB ({} bytes) to {:?}", glb_data.len(), path);
            Ok(vec![path])
        }
        ExportFormat::Obj => {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("book");
            let obj_export = ObjExport::from_scene(scene, name)?;
            let mtl_path = path.with_extension("mtl");

            fs::write(&path, &obj_export.obj)?;
            fs::write(&mtl_path, &obj_export.mtl)?;
            info!("Exported OBJ to {:?} with materials {:?}", path, mtl_path);
            Ok(vec![path, mtl_path])
        }
    }
}
