//! Fixed dimensions and timings shared by the layout, store and widget.

use std::f32::consts::PI;

/// Spine width along X. Covers pivot at half of this.
pub const SPINE_WIDTH: f32 = 0.1;
/// Spine depth along Z. Fixed regardless of page count: more pages pack denser.
pub const SPINE_DEPTH: f32 = 0.6;
/// Thickness of each cover box.
pub const COVER_THICKNESS: f32 = 0.05;

/// Pages are narrower and shorter than the covers so they stay inside them.
pub const PAGE_WIDTH_RATIO: f32 = 0.93;
pub const PAGE_HEIGHT_RATIO: f32 = 0.95;

pub const MIN_PAGE_COUNT: usize = 10;
pub const MAX_PAGE_COUNT: usize = 100;
/// Depth consumed per page when a depth change re-estimates the page count.
pub const DEPTH_PER_PAGE: f32 = 0.002;

/// Hinge angle both covers open to.
pub const OPEN_HINGE: f32 = PI * 0.4;
pub const MAX_HINGE: f32 = PI;

pub const GLOW_MAX: f32 = 2.0;

// Flip timings, in milliseconds.
pub const FLIP_DURATION_MS: f64 = 500.0;
pub const CONTINUOUS_FLIP_PAUSE_MS: f64 = 100.0;
pub const MULTI_FLIP_PAUSE_MS: f64 = 50.0;
pub const DEFAULT_BOOK_TWEEN_MS: f64 = 1000.0;
pub const MATERIAL_MORPH_MS: f64 = 500.0;

// Widget page sweeps.
pub const SWEEP_DURATION_MS: f64 = 700.0;
pub const SWEEP_DELAY_PER_PAGE_MS: f64 = 60.0;
pub const SWEEP_RESET_MS: f64 = 500.0;

// Hover and glitch motion of the whole book group.
pub const HOVER_SPEED: f64 = 0.002;
pub const HOVER_AMPLITUDE: f32 = 0.3;
pub const HOVER_SETTLE_MS: f64 = 500.0;
pub const GLITCH_STEP_MS: f64 = 50.0;
pub const GLITCH_REPEATS: u32 = 4;
pub const GLITCH_AMPLITUDE: f32 = 0.3;

/// Weight kept from the previous glow value on each tick.
pub const GLOW_SMOOTHING: f32 = 0.9;

// Particles.
pub const DEFAULT_PARTICLE_COUNT: usize = 1500;
pub const POISSON_MIN_DISTANCE: f32 = 0.1;
pub const POISSON_ATTEMPTS: usize = 30;
pub const SPAWN_WIDTH_RATIO: f32 = 0.8;
pub const SPAWN_HEIGHT_RATIO: f32 = 0.5;
pub const SPAWN_DEPTH_RATIO: f32 = 0.5;
/// Hinge angle above which the book counts as open for particle visibility.
pub const PARTICLE_OPEN_HINGE: f32 = 0.5;

// Fallback window size for zero-sized containers.
pub const FALLBACK_WIDTH: u32 = 1280;
pub const FALLBACK_HEIGHT: u32 = 720;
