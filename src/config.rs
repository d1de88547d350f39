//! Book state record and widget construction options.

use crate::constants::{self, DEFAULT_PARTICLE_COUNT};
use crate::types::{Dimensions, FlipDirection, MaterialPreset, Rgb};
use crate::widget::Callbacks;
use serde::{Deserialize, Serialize};

/// The single source of truth for everything the book shows.
///
/// Mutated only through [`BookStore`](crate::store::BookStore) setters and
/// animations; serialises to camelCase JSON so hosts can persist or seed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookConfig {
    pub page_count: usize,
    /// Split point: pages below it hang off the back cover.
    pub current_page: usize,
    pub dimensions: Dimensions,

    pub spine_rotation: f32,
    pub tilt: f32,
    pub scale: f32,

    /// Front cover opening angle in radians, 0 = closed.
    pub front_hinge: f32,
    /// Back cover opening angle in radians, 0 = closed.
    pub back_hinge: f32,

    pub page_opacity: f32,
    pub page_color: Rgb,
    pub glow_intensity: f32,
    pub cover_color: Rgb,
    pub cover_opacity: f32,
    /// Surface preset used for roughness and metalness on export.
    pub cover_material: MaterialPreset,
    pub spine_color: Rgb,

    pub front_cover_text: String,
    pub back_cover_text: String,
    pub cover_text_color: Rgb,

    pub particles_enabled: bool,
    pub particle_intensity: f32,
    pub confidence_score: f32,

    pub debug: bool,

    /// Page currently mid-flip, `None` when idle.
    pub flipping_page_index: Option<usize>,
    pub flip_progress: f32,
    pub flip_direction: Option<FlipDirection>,
    pub is_flipping_continuously: bool,
    pub continuous_direction: Option<FlipDirection>,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            page_count: 30,
            current_page: 15,
            dimensions: Dimensions::default(),
            spine_rotation: 0.5,
            tilt: 0.2,
            scale: 1.0,
            front_hinge: 0.0,
            back_hinge: 0.0,
            page_opacity: 0.15,
            page_color: Rgb::from_u32(0x00ffcc),
            glow_intensity: 0.0,
            cover_color: Rgb::from_u32(0x2b1e16),
            cover_opacity: 1.0,
            cover_material: MaterialPreset::Leather,
            spine_color: Rgb::from_u32(0x666666),
            front_cover_text: String::new(),
            back_cover_text: String::new(),
            cover_text_color: Rgb::from_u32(0xc9a876),
            particles_enabled: true,
            particle_intensity: 0.5,
            confidence_score: 0.0,
            debug: false,
            flipping_page_index: None,
            flip_progress: 0.0,
            flip_direction: None,
            is_flipping_continuously: false,
            continuous_direction: None,
        }
    }
}

impl BookConfig {
    /// Load a config from JSON, then pull any out-of-range values back in.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let mut config: BookConfig = serde_json::from_str(json)?;
        config.normalize();
        Ok(config)
    }

    /// Clamp every field to its valid domain and drop transient flip state.
    pub fn normalize(&mut self) {
        self.page_count = self
            .page_count
            .clamp(constants::MIN_PAGE_COUNT, constants::MAX_PAGE_COUNT);
        if self.current_page >= self.page_count {
            self.current_page = self.page_count - 1;
        }
        self.front_hinge = self.front_hinge.clamp(0.0, constants::MAX_HINGE);
        self.back_hinge = self.back_hinge.clamp(0.0, constants::MAX_HINGE);
        self.page_opacity = self.page_opacity.clamp(0.0, 1.0);
        self.cover_opacity = self.cover_opacity.clamp(0.0, 1.0);
        self.glow_intensity = self.glow_intensity.clamp(0.0, constants::GLOW_MAX);
        self.particle_intensity = self.particle_intensity.clamp(0.0, 1.0);
        self.confidence_score = self.confidence_score.clamp(0.0, 1.0);
        self.flipping_page_index = None;
        self.flip_progress = 0.0;
        self.flip_direction = None;
        self.is_flipping_continuously = false;
        self.continuous_direction = None;
    }

    /// Number of pages attached to the back cover.
    pub fn back_page_count(&self) -> usize {
        self.current_page
    }

    /// Number of pages attached to the front cover.
    pub fn front_page_count(&self) -> usize {
        self.page_count - self.current_page
    }

    pub fn is_flipping(&self) -> bool {
        self.flipping_page_index.is_some()
    }
}

/// Construction options for a [`BookWidget`](crate::widget::BookWidget).
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookOptions {
    /// Host container size in pixels. Zero falls back to the window size.
    pub container_width: u32,
    pub container_height: u32,

    pub page_count: usize,
    pub initial_spine_rotation: f32,
    pub initial_tilt: f32,
    pub initial_scale: f32,
    pub initial_front_hinge: f32,
    pub initial_back_hinge: f32,
    pub initial_material: MaterialPreset,
    pub initial_hover: bool,
    pub initial_glow_intensity: f32,
    pub initial_confidence_score: f32,
    pub initial_particle_intensity: f32,
    pub particle_count: usize,
    pub enable_particles: bool,
    pub debug: bool,
    /// Seed for the particle sampler; `None` draws from entropy.
    pub seed: Option<u64>,

    #[serde(skip)]
    pub callbacks: Callbacks,
}

impl Default for BookOptions {
    fn default() -> Self {
        Self {
            container_width: 0,
            container_height: 0,
            page_count: 30,
            initial_spine_rotation: 0.5,
            initial_tilt: 0.2,
            initial_scale: 1.0,
            initial_front_hinge: 0.0,
            initial_back_hinge: 0.0,
            initial_material: MaterialPreset::Leather,
            initial_hover: false,
            initial_glow_intensity: 0.0,
            initial_confidence_score: 0.0,
            initial_particle_intensity: 0.0,
            particle_count: DEFAULT_PARTICLE_COUNT,
            enable_particles: true,
            debug: false,
            seed: None,
            callbacks: Callbacks::default(),
        }
    }
}

impl BookOptions {
    /// Attach a callback fired when pages sweep and when a page flip completes.
    pub fn on_flip(mut self, f: impl FnMut(FlipDirection) + 'static) -> Self {
        self.callbacks.on_flip = Some(Box::new(f));
        self
    }

    pub fn on_glitch(mut self, f: impl FnMut() + 'static) -> Self {
        self.callbacks.on_glitch = Some(Box::new(f));
        self
    }

    pub fn on_hover_change(mut self, f: impl FnMut(bool) + 'static) -> Self {
        self.callbacks.on_hover_change = Some(Box::new(f));
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
