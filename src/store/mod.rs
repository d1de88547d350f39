//! The book state store.
//!
//! [`BookStore`] owns the [`BookConfig`] and is its only writer: every change
//! goes through a setter (which clamps) or an animation (which is advanced by
//! [`BookStore::tick`]). Nothing here blocks; callers fire an action and poll
//! the config to watch it finish.

mod effects;
mod flip;

pub use flip::FlipOutcome;

use crate::anim::{Clock, Timeline, TweenSet};
use crate::config::BookConfig;
use crate::constants::{GLOW_MAX, MAX_HINGE, MAX_PAGE_COUNT, MIN_PAGE_COUNT, SPINE_DEPTH, DEPTH_PER_PAGE};
use crate::types::{DimensionsPatch, Emotion, FlipDirection, MaterialPreset, Rgb};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Properties the store animates with tweens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenTarget {
    FrontHinge,
    BackHinge,
    ParticleIntensity,
    GlowIntensity,
}

/// Something that happened inside the store, drained by the owner after
/// each call or tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreEvent {
    FlipStarted {
        page: usize,
        direction: FlipDirection,
    },
    FlipCompleted {
        page: usize,
        direction: FlipDirection,
        current_page: usize,
    },
}

/// Work deferred to a later tick.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StoreAction {
    /// Next flip of a continuous run.
    ContinueFlip(FlipDirection),
    /// Next flip of a `flip_pages` batch.
    NextBatchFlip,
    PulseUp { emotion: Emotion, cycle: u32 },
    PulseDown { emotion: Emotion, cycle: u32 },
    Shake { remaining: u32, rotation: f32, tilt: f32 },
    GlowFlash { from: f32, to: f32, duration_ms: f64 },
}

impl StoreAction {
    fn is_effect(&self) -> bool {
        !matches!(self, StoreAction::ContinueFlip(_) | StoreAction::NextBatchFlip)
    }
}

pub struct BookStore {
    config: BookConfig,
    clock: Box<dyn Clock>,
    tweens: TweenSet<TweenTarget>,
    timeline: Timeline<StoreAction>,
    active_flip: Option<flip::ActiveFlip>,
    batch: Option<flip::FlipBatch>,
    events: Vec<StoreEvent>,
    rng: StdRng,
}

impl std::fmt::Debug for BookStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookStore")
            .field("config", &self.config)
            .field("tweens", &self.tweens.len())
            .field("pending", &self.timeline.len())
            .field("active_flip", &self.active_flip)
            .finish()
    }
}

impl BookStore {
    /// Create a store with default state.
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self::with_config(BookConfig::default(), clock)
    }

    /// Create a store seeded with `config` (normalised first).
    pub fn with_config(mut config: BookConfig, clock: impl Clock + 'static) -> Self {
        config.normalize();
        Self {
            config,
            clock: Box::new(clock),
            tweens: TweenSet::new(),
            timeline: Timeline::new(),
            active_flip: None,
            batch: None,
            events: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a fixed seed for the random parts of effects.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// A plain copy of the current state.
    pub fn snapshot(&self) -> BookConfig {
        self.config.clone()
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Advance every animation to the current clock time. Call once per frame.
    ///
    /// Returns the sampled time.
    pub fn tick(&mut self) -> f64 {
        let now = self.clock.now_ms();

        for (target, value) in self.tweens.advance(now) {
            self.apply_tween(target, value);
        }
        self.advance_flip(now);
        for action in self.timeline.drain_due(now) {
            self.run_action(action, now);
        }
        now
    }

    /// True while any tween, flip or deferred action is pending.
    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty() || self.active_flip.is_some() || !self.timeline.is_empty()
    }

    pub fn is_tweening(&self, target: TweenTarget) -> bool {
        self.tweens.is_active(target)
    }

    /// Take the events collected since the last call.
    pub fn take_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }

    fn apply_tween(&mut self, target: TweenTarget, value: f32) {
        match target {
            TweenTarget::FrontHinge => self.config.front_hinge = value.clamp(0.0, MAX_HINGE),
            TweenTarget::BackHinge => self.config.back_hinge = value.clamp(0.0, MAX_HINGE),
            TweenTarget::ParticleIntensity => {
                self.config.particle_intensity = value.clamp(0.0, 1.0)
            }
            TweenTarget::GlowIntensity => self.config.glow_intensity = value.clamp(0.0, GLOW_MAX),
        }
    }

    fn run_action(&mut self, action: StoreAction, now: f64) {
        match action {
            StoreAction::ContinueFlip(direction) => self.continue_flip(direction, now),
            StoreAction::NextBatchFlip => self.next_batch_flip(now),
            StoreAction::PulseUp { emotion, cycle } => self.pulse_up(emotion, cycle, now),
            StoreAction::PulseDown { emotion, cycle } => self.pulse_down(emotion, cycle, now),
            StoreAction::Shake {
                remaining,
                rotation,
                tilt,
            } => self.shake(remaining, rotation, tilt, now),
            StoreAction::GlowFlash {
                from,
                to,
                duration_ms,
            } => self.glow_flash(from, to, duration_ms, now),
        }
    }

    // ========== SETTERS ==========

    /// Change the page density. Clamped to 10..=100; the book reopens at its middle.
    pub fn set_page_count(&mut self, count: usize) {
        let count = count.clamp(MIN_PAGE_COUNT, MAX_PAGE_COUNT);
        self.cancel_flip();
        self.config.page_count = count;
        self.config.current_page = count / 2;
        self.config.dimensions.depth = SPINE_DEPTH;
    }

    /// Jump to a page. Out-of-range values wrap around the book. A flip in
    /// flight is abandoned.
    pub fn set_current_page(&mut self, page: i64) {
        self.cancel_flip();
        let count = self.config.page_count as i64;
        self.config.current_page = page.rem_euclid(count) as usize;
    }

    /// Merge new dimensions. A changed depth re-estimates the page count.
    pub fn set_dimensions(&mut self, patch: DimensionsPatch) {
        let current = self.config.dimensions;
        let mut next = current;
        if let Some(height) = patch.height {
            next.height = height.max(0.0);
        }
        if let Some(width) = patch.width {
            next.width = width.max(0.0);
        }
        if let Some(depth) = patch.depth {
            next.depth = depth.max(0.0);
        }

        if patch.depth.is_some() && next.depth != current.depth {
            let estimated = (next.depth / DEPTH_PER_PAGE).round() as usize;
            let count = estimated.clamp(MIN_PAGE_COUNT, MAX_PAGE_COUNT);
            self.cancel_flip();
            self.config.page_count = count;
            self.config.current_page = count / 2;
        }
        self.config.dimensions = next;
    }

    pub fn set_spine_rotation(&mut self, rotation: f32) {
        self.config.spine_rotation = rotation;
    }

    pub fn set_tilt(&mut self, tilt: f32) {
        self.config.tilt = tilt;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.config.scale = scale.max(0.0);
    }

    pub fn set_front_hinge(&mut self, hinge: f32) {
        self.tweens.cancel(TweenTarget::FrontHinge);
        self.config.front_hinge = hinge.clamp(0.0, MAX_HINGE);
    }

    pub fn set_back_hinge(&mut self, hinge: f32) {
        self.tweens.cancel(TweenTarget::BackHinge);
        self.config.back_hinge = hinge.clamp(0.0, MAX_HINGE);
    }

    pub fn set_both_hinges(&mut self, hinge: f32) {
        self.set_front_hinge(hinge);
        self.set_back_hinge(hinge);
    }

    pub fn set_page_opacity(&mut self, opacity: f32) {
        self.config.page_opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn set_page_color(&mut self, color: Rgb) {
        self.config.page_color = color;
    }

    pub fn set_glow_intensity(&mut self, intensity: f32) {
        self.tweens.cancel(TweenTarget::GlowIntensity);
        self.config.glow_intensity = intensity.clamp(0.0, GLOW_MAX);
    }

    pub fn set_cover_color(&mut self, color: Rgb) {
        self.config.cover_color = color;
    }

    pub fn set_cover_opacity(&mut self, opacity: f32) {
        self.config.cover_opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn set_cover_material(&mut self, material: MaterialPreset) {
        self.config.cover_material = material;
    }

    pub fn set_spine_color(&mut self, color: Rgb) {
        self.config.spine_color = color;
    }

    pub fn set_front_cover_text(&mut self, text: impl Into<String>) {
        self.config.front_cover_text = text.into();
    }

    pub fn set_back_cover_text(&mut self, text: impl Into<String>) {
        self.config.back_cover_text = text.into();
    }

    pub fn set_cover_text_color(&mut self, color: Rgb) {
        self.config.cover_text_color = color;
    }

    pub fn set_particles_enabled(&mut self, enabled: bool) {
        self.config.particles_enabled = enabled;
    }

    pub fn set_particle_intensity(&mut self, intensity: f32) {
        self.tweens.cancel(TweenTarget::ParticleIntensity);
        self.config.particle_intensity = intensity.clamp(0.0, 1.0);
    }

    pub fn set_confidence_score(&mut self, score: f32) {
        self.config.confidence_score = score.clamp(0.0, 1.0);
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    /// Back to the defaults, dropping every running animation.
    pub fn reset(&mut self) {
        self.tweens.clear();
        self.timeline.clear();
        self.active_flip = None;
        self.batch = None;
        self.config = BookConfig::default();
    }
}
