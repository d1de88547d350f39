//! Scene assembly: the posed book as meshes grouped by material.

pub mod geometry;

pub use geometry::{Mesh, Vertex};

use crate::config::BookConfig;
use crate::constants::{
    COVER_THICKNESS, GLOW_MAX, PAGE_HEIGHT_RATIO, PAGE_WIDTH_RATIO, SPINE_DEPTH, SPINE_WIDTH,
};
use crate::layout::{page_pose, CoverPose};
use crate::types::{MaterialPreset, Rgb};
use glam::{Mat4, Vec3};

/// Surface parameters for one scene part.
#[derive(Debug, Clone, PartialEq)]
pub struct PartMaterial {
    pub name: String,
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
}

impl PartMaterial {
    fn new(name: &str, color: Rgb, opacity: f32, preset: MaterialPreset) -> Self {
        let params = preset.params();
        Self {
            name: name.to_string(),
            base_color: color.to_rgba(opacity),
            emissive: [0.0; 3],
            roughness: params.roughness,
            metalness: params.metalness,
        }
    }

    /// Emit `color` at `strength` in [0, 1].
    fn with_emissive(mut self, color: Rgb, strength: f32) -> Self {
        let [r, g, b, _] = color.to_rgba(1.0);
        let s = strength.clamp(0.0, 1.0);
        self.emissive = [r * s, g * s, b * s];
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.base_color[3] < 1.0
    }
}

/// One mesh with one material.
#[derive(Debug, Clone)]
pub struct ScenePart {
    pub name: String,
    pub mesh: Mesh,
    pub material: PartMaterial,
}

/// The book in world space.
#[derive(Debug, Clone, Default)]
pub struct BookScene {
    pub parts: Vec<ScenePart>,
    /// Book-group transform already baked into every part.
    root: Mat4,
    page_color: Option<Rgb>,
}

/// Whole-book transform: scale, then spine rotation about Y, then tilt about X.
pub fn root_transform(config: &BookConfig) -> Mat4 {
    Mat4::from_rotation_x(config.tilt)
        * Mat4::from_rotation_y(config.spine_rotation)
        * Mat4::from_scale(Vec3::splat(config.scale))
}

impl BookScene {
    /// Pose the book under `config`. `sweeps` holds per-page sweep angles,
    /// 0 meaning the page follows its cover; missing entries count as 0.
    pub fn build(config: &BookConfig, sweeps: &[f32]) -> Self {
        let dims = config.dimensions;

        let spine_material =
            PartMaterial::new("spine", config.spine_color, 1.0, MaterialPreset::Leather);
        let cover_material = PartMaterial::new(
            "cover",
            config.cover_color,
            config.cover_opacity,
            config.cover_material,
        );
        let page_material = PartMaterial::new(
            "page",
            config.page_color,
            config.page_opacity,
            MaterialPreset::Glass,
        )
        .with_emissive(config.page_color, config.glow_intensity / GLOW_MAX);

        let spine = Mesh::cuboid(Vec3::ZERO, Vec3::new(SPINE_WIDTH, dims.height, SPINE_DEPTH));

        let cover = Mesh::cuboid(
            Vec3::new(dims.width / 2.0, 0.0, 0.0),
            Vec3::new(dims.width, dims.height, COVER_THICKNESS),
        );
        let mut covers = cover.transformed(CoverPose::back(config).transform());
        covers.merge(&cover.transformed(CoverPose::front(config).transform()));

        let page = Mesh::hinged_plane(
            dims.width * PAGE_WIDTH_RATIO,
            dims.height * PAGE_HEIGHT_RATIO,
        );
        let mut pages = Mesh::new();
        for index in 0..config.page_count {
            let Some(mut pose) = page_pose(config, index) else {
                continue;
            };
            let sweep = sweeps.get(index).copied().unwrap_or(0.0);
            if !pose.flipping && sweep != 0.0 {
                pose = pose.swept(sweep);
            }
            pages.merge(&page.transformed(pose.transform()));
        }

        let mut scene = BookScene {
            parts: Vec::new(),
            root: root_transform(config),
            page_color: Some(config.page_color),
        };
        scene.push("spine", spine, spine_material);
        scene.push("covers", covers, cover_material);
        scene.push("pages", pages, page_material);
        scene
    }

    fn push(&mut self, name: &str, mut mesh: Mesh, material: PartMaterial) {
        mesh.transform(self.root);
        self.parts.push(ScenePart {
            name: name.to_string(),
            mesh,
            material,
        });
    }

    /// Add particle positions (book-local) as a point part. Empty input adds nothing.
    pub fn add_particles(&mut self, positions: &[Vec3]) {
        if positions.is_empty() {
            return;
        }
        let color = self.page_color.unwrap_or(Rgb::from_u32(0x00ffcc));
        let material = PartMaterial::new("particles", color, 1.0, MaterialPreset::Glass)
            .with_emissive(color, 1.0);
        self.push("particles", Mesh::points(positions), material);
    }

    /// Shift the whole book, e.g. by the hover and glitch offsets.
    pub fn translate(&mut self, offset: Vec3) {
        for part in &mut self.parts {
            part.mesh.translate(offset);
        }
    }

    pub fn part(&self, name: &str) -> Option<&ScenePart> {
        self.parts.iter().find(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|p| p.mesh.is_empty())
    }

    pub fn total_vertices(&self) -> usize {
        self.parts.iter().map(|p| p.mesh.vertex_count()).sum()
    }

    pub fn total_triangles(&self) -> usize {
        self.parts.iter().map(|p| p.mesh.triangle_count()).sum()
    }

    /// Bounds over every part, `None` when the scene is empty.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        self.parts
            .iter()
            .filter_map(|p| p.mesh.bounds())
            .reduce(|(amin, amax), (bmin, bmax)| {
                (
                    Vec3::from(amin).min(Vec3::from(bmin)).to_array(),
                    Vec3::from(amax).max(Vec3::from(bmax)).to_array(),
                )
            })
    }
}
