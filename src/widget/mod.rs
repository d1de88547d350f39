//! The embeddable book widget.
//!
//! [`BookWidget`] wraps a [`BookStore`] with the imperative surface a host
//! page drives: transform and hinge setters, page sweeps, hover and glitch,
//! particle controls, events, `get_state`, `resize` and `dispose`.
//! Like the store it never blocks; call [`BookWidget::tick`] once per frame.

mod events;
mod glow;
mod motion;
mod resources;
mod sweep;

pub use events::{dispatch_error, BookEvent, EventLog, EventSink};
pub use glow::GlowTracker;
pub use motion::GroupMotion;
pub use resources::{DisposeReport, ResourceKind, ResourceRegistry, Viewport};
pub use sweep::PageSweeps;

use crate::anim::Clock;
use crate::config::{BookConfig, BookOptions};
use crate::constants::{MAX_PAGE_COUNT, MIN_PAGE_COUNT};
use crate::particles::ParticleField;
use crate::scene::BookScene;
use crate::store::{BookStore, FlipOutcome, StoreEvent, TweenTarget};
use crate::types::{DimensionsPatch, Emotion, FlipDirection, MaterialPreset, Rgb};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Host callbacks fired alongside the named events.
#[derive(Default)]
pub struct Callbacks {
    pub on_flip: Option<Box<dyn FnMut(FlipDirection)>>,
    pub on_glitch: Option<Box<dyn FnMut()>>,
    pub on_hover_change: Option<Box<dyn FnMut(bool)>>,
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_flip", &self.on_flip.is_some())
            .field("on_glitch", &self.on_glitch.is_some())
            .field("on_hover_change", &self.on_hover_change.is_some())
            .finish()
    }
}

/// Plain snapshot returned by [`BookWidget::get_state`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetState {
    pub is_hovering: bool,
    /// `[x, y]` offset of the whole book from hover and glitch.
    pub offset: [f32; 2],
    pub visible_particles: usize,
    #[serde(flatten)]
    pub book: BookConfig,
}

impl WidgetState {
    pub fn new(book: &BookConfig, is_hovering: bool, offset: [f32; 2], visible_particles: usize) -> Self {
        Self {
            is_hovering,
            offset,
            visible_particles,
            book: book.clone(),
        }
    }
}

pub struct BookWidget {
    store: BookStore,
    sweeps: PageSweeps,
    motion: GroupMotion,
    glow: GlowTracker,
    particles: Option<ParticleField>,
    particle_count: usize,
    rng: StdRng,
    viewport: Viewport,
    resources: ResourceRegistry,
    callbacks: Callbacks,
    sink: Option<Box<dyn EventSink>>,
    disposed: bool,
}

impl std::fmt::Debug for BookWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookWidget")
            .field("store", &self.store)
            .field("motion", &self.motion)
            .field("viewport", &self.viewport)
            .field("callbacks", &self.callbacks)
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl BookWidget {
    /// Build the widget from construction options.
    pub fn new(options: BookOptions, clock: impl Clock + 'static) -> Self {
        let BookOptions {
            container_width,
            container_height,
            page_count,
            initial_spine_rotation,
            initial_tilt,
            initial_scale,
            initial_front_hinge,
            initial_back_hinge,
            initial_material,
            initial_hover,
            initial_glow_intensity,
            initial_confidence_score,
            initial_particle_intensity,
            particle_count,
            enable_particles,
            debug,
            seed,
            callbacks,
        } = options;

        let page_count = page_count.clamp(MIN_PAGE_COUNT, MAX_PAGE_COUNT);
        let config = BookConfig {
            page_count,
            current_page: page_count / 2,
            spine_rotation: initial_spine_rotation,
            tilt: initial_tilt,
            scale: initial_scale,
            front_hinge: initial_front_hinge,
            back_hinge: initial_back_hinge,
            glow_intensity: initial_glow_intensity,
            particle_intensity: initial_particle_intensity,
            particles_enabled: enable_particles,
            debug,
            ..BookConfig::default()
        };
        let mut store = BookStore::with_config(config, clock);
        let mut rng = match seed {
            Some(seed) => {
                store = store.with_seed(seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        let params = initial_material.params();
        store.set_cover_color(params.color);
        store.set_cover_opacity(params.opacity);
        store.set_cover_material(initial_material);

        let particles = enable_particles
            .then(|| ParticleField::seed(&store.config().dimensions, particle_count, &mut rng));

        let mut resources = ResourceRegistry::new();
        for name in ["spine", "cover", "page"] {
            resources.register(ResourceKind::Geometry, name);
        }
        for name in ["spine", "cover", "page"] {
            resources.register(ResourceKind::Material, name);
        }
        for name in ["front-cover-text", "back-cover-text"] {
            resources.register(ResourceKind::Texture, name);
        }
        if particles.is_some() {
            resources.register(ResourceKind::Geometry, "particles");
            resources.register(ResourceKind::Material, "particles");
        }
        resources.attach_resize_listener();

        let sweeps = PageSweeps::new(store.config().page_count);
        let mut widget = Self {
            store,
            sweeps,
            motion: GroupMotion::new(initial_hover),
            glow: GlowTracker::new(),
            particles,
            particle_count,
            rng,
            viewport: Viewport::new(container_width, container_height),
            resources,
            callbacks,
            sink: None,
            disposed: false,
        };
        widget.set_confidence_score(initial_confidence_score);
        debug!(
            "Book widget ready: {} pages, {}x{}",
            widget.store.config().page_count,
            widget.viewport.width,
            widget.viewport.height
        );
        widget
    }

    /// Route named events to `sink`.
    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn set_event_sink(&mut self, sink: impl EventSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn store(&self) -> &BookStore {
        &self.store
    }

    pub fn config(&self) -> &BookConfig {
        self.store.config()
    }

    pub fn sweeps(&self) -> &PageSweeps {
        &self.sweeps
    }

    pub fn particles(&self) -> Option<&ParticleField> {
        self.particles.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// True while anything would still move without further input.
    pub fn is_animating(&self) -> bool {
        self.store.is_animating()
            || self.sweeps.is_animating()
            || self.motion.is_glitching()
            || self.motion.is_hovering()
    }

    // ========== FRAME ==========

    /// Advance every animation to the clock's current time.
    ///
    /// Does nothing after [`dispose`](Self::dispose).
    pub fn tick(&mut self) {
        if self.disposed {
            return;
        }
        let now = self.store.tick();
        self.sweeps.advance(now);
        self.motion.advance(now);
        self.update_glow(now);

        for event in self.store.take_events() {
            if let StoreEvent::FlipCompleted { direction, .. } = event {
                self.notify_flip(direction);
            }
        }
    }

    fn update_glow(&mut self, now: f64) {
        let Some(velocity) = self.glow.max_velocity(self.sweeps.angles(), now) else {
            return;
        };
        if self.store.is_tweening(TweenTarget::GlowIntensity) {
            return;
        }
        let config = self.store.config();
        let glow = GlowTracker::step(config.glow_intensity, velocity, config.confidence_score);
        self.store.set_glow_intensity(glow);
    }

    // ========== TRANSFORM ==========

    pub fn set_spine_rotation(&mut self, angle: f32) {
        self.store.set_spine_rotation(angle);
    }

    pub fn set_tilt(&mut self, angle: f32) {
        self.store.set_tilt(angle);
    }

    pub fn set_scale(&mut self, value: f32) {
        self.store.set_scale(value);
    }

    // ========== HINGES ==========

    /// Set the front cover angle; swept pages never pass the cover.
    pub fn set_front_hinge(&mut self, angle: f32) {
        self.store.set_front_hinge(angle);
        self.sweeps.clamp_to_front(self.store.config().front_hinge);
    }

    pub fn set_back_hinge(&mut self, angle: f32) {
        self.store.set_back_hinge(angle);
        self.sweeps.clamp_to_back(self.store.config().back_hinge);
    }

    pub fn set_both_hinges(&mut self, angle: f32) {
        self.set_front_hinge(angle);
        self.set_back_hinge(angle);
    }

    pub fn open_book(&mut self, duration_ms: f64) {
        self.store.open_book(duration_ms);
    }

    pub fn close_book(&mut self, duration_ms: f64) {
        self.store.close_book(duration_ms);
    }

    // ========== PAGES ==========

    /// Sweep every page toward one cover: the front cover for forward,
    /// the back cover for backward.
    pub fn flip_pages(&mut self, direction: FlipDirection) {
        let target = self.sweep_target(direction);
        let now = self.store.now_ms();
        self.sweeps.sweep_all(target, now);
        self.notify_flip(direction);
    }

    /// Sweep a single page. Out-of-range indices are ignored.
    pub fn flip_single_page(&mut self, index: usize, direction: FlipDirection) {
        let target = self.sweep_target(direction);
        let now = self.store.now_ms();
        if !self.sweeps.sweep_one(index, target, now) {
            debug!("Ignoring sweep of page {} (book has {})", index, self.sweeps.len());
            return;
        }
        self.notify_flip(direction);
    }

    /// Ease every swept page back onto its cover.
    pub fn reset_pages(&mut self) {
        let now = self.store.now_ms();
        self.sweeps.reset(now);
    }

    /// Animate one page between the stacks.
    pub fn flip_page(&mut self, direction: FlipDirection) -> FlipOutcome {
        self.store.flip_page(direction)
    }

    /// Animate `count` pages between the stacks, one after another.
    pub fn flip_page_run(
        &mut self,
        count: usize,
        direction: FlipDirection,
        duration_ms: f64,
    ) -> FlipOutcome {
        self.store.flip_pages(count, direction, duration_ms)
    }

    pub fn toggle_continuous_flip(&mut self, direction: FlipDirection) -> bool {
        self.store.toggle_continuous_flip(direction)
    }

    pub fn stop_continuous_flip(&mut self) {
        self.store.stop_continuous_flip();
    }

    /// Change the page count. Sweeps are dropped.
    pub fn set_page_count(&mut self, count: usize) {
        self.store.set_page_count(count);
        self.pages_changed();
    }

    /// Jump to a page, wrapping out-of-range values.
    pub fn set_current_page(&mut self, page: i64) {
        self.store.set_current_page(page);
    }

    /// Merge new dimensions. A depth change re-estimates the page count and
    /// drops sweeps.
    pub fn set_dimensions(&mut self, patch: DimensionsPatch) {
        let before = self.store.config().page_count;
        self.store.set_dimensions(patch);
        if self.store.config().page_count != before {
            self.pages_changed();
        }
    }

    /// Back to the default book, dropping every running animation and sweep.
    pub fn reset(&mut self) {
        self.store.reset();
        self.pages_changed();
    }

    fn pages_changed(&mut self) {
        self.sweeps.resize(self.store.config().page_count);
        self.glow.reset();
    }

    fn sweep_target(&self, direction: FlipDirection) -> f32 {
        let config = self.store.config();
        match direction {
            FlipDirection::Forward => -config.front_hinge,
            FlipDirection::Backward => config.back_hinge,
        }
    }

    // ========== APPEARANCE ==========

    pub fn morph_material(&mut self, preset: MaterialPreset) {
        self.store.morph_material(preset);
    }

    pub fn trigger_emotion(&mut self, emotion: Emotion) {
        self.store.trigger_emotion(emotion);
    }

    pub fn set_page_color(&mut self, color: Rgb) {
        self.store.set_page_color(color);
    }

    pub fn set_page_opacity(&mut self, opacity: f32) {
        self.store.set_page_opacity(opacity);
    }

    pub fn set_cover_color(&mut self, color: Rgb) {
        self.store.set_cover_color(color);
    }

    pub fn set_cover_opacity(&mut self, opacity: f32) {
        self.store.set_cover_opacity(opacity);
    }

    pub fn set_spine_color(&mut self, color: Rgb) {
        self.store.set_spine_color(color);
    }

    pub fn set_front_cover_text(&mut self, text: impl Into<String>) {
        self.store.set_front_cover_text(text);
    }

    pub fn set_back_cover_text(&mut self, text: impl Into<String>) {
        self.store.set_back_cover_text(text);
    }

    pub fn set_cover_text_color(&mut self, color: Rgb) {
        self.store.set_cover_text_color(color);
    }

    pub fn set_glow_intensity(&mut self, intensity: f32) {
        self.store.set_glow_intensity(intensity);
    }

    /// Set confidence. It lifts the glow to its floor and, with particles
    /// on, drives particle intensity.
    pub fn set_confidence_score(&mut self, score: f32) {
        self.store.set_confidence_score(score);
        let config = self.store.config();
        let confidence = config.confidence_score;
        let floor = GlowTracker::confidence_floor(confidence);
        if floor > config.glow_intensity {
            self.store.set_glow_intensity(floor);
        }
        if self.store.config().particles_enabled {
            self.store.set_particle_intensity(confidence);
        }
    }

    // ========== PARTICLES ==========

    pub fn set_particle_intensity(&mut self, intensity: f32) {
        self.store.set_particle_intensity(intensity);
    }

    /// Turn particles on or off, seeding the cloud the first time.
    pub fn enable_particles(&mut self, enabled: bool) {
        self.store.set_particles_enabled(enabled);
        if enabled && self.particles.is_none() {
            let dimensions = self.store.config().dimensions;
            self.particles = Some(ParticleField::seed(&dimensions, self.particle_count, &mut self.rng));
            self.resources.register(ResourceKind::Geometry, "particles");
            self.resources.register(ResourceKind::Material, "particles");
        }
    }

    /// Particles currently shown.
    pub fn visible_particle_count(&self) -> usize {
        let config = self.store.config();
        self.particles.as_ref().map_or(0, |field| {
            field
                .visible_positions(
                    config.particles_enabled,
                    config.particle_intensity,
                    config.front_hinge,
                    config.back_hinge,
                )
                .len()
        })
    }

    // ========== MOTION ==========

    /// Jolt the book sideways.
    pub fn glitch(&mut self) {
        let now = self.store.now_ms();
        self.motion.glitch(now);
        if let Some(on_glitch) = self.callbacks.on_glitch.as_mut() {
            on_glitch();
        }
        let event = BookEvent::Glitch {
            state: self.get_state(),
        };
        self.emit(&event);
    }

    /// Toggle the hover bob and return whether the book now hovers.
    pub fn toggle_hover(&mut self) -> bool {
        let now = self.store.now_ms();
        let hovering = self.motion.toggle_hover(now);
        if let Some(on_hover_change) = self.callbacks.on_hover_change.as_mut() {
            on_hover_change(hovering);
        }
        let event = BookEvent::HoverChange {
            is_hovering: hovering,
            state: self.get_state(),
        };
        self.emit(&event);
        hovering
    }

    // ========== HOST ==========

    /// Plain snapshot of the widget.
    pub fn get_state(&self) -> WidgetState {
        WidgetState::new(
            self.store.config(),
            self.motion.is_hovering(),
            self.motion.offset(),
            self.visible_particle_count(),
        )
    }

    /// Renderable geometry for the current state.
    pub fn scene(&self) -> BookScene {
        let config = self.store.config();
        let mut scene = BookScene::build(config, self.sweeps.angles());
        if let Some(field) = &self.particles {
            scene.add_particles(field.visible_positions(
                config.particles_enabled,
                config.particle_intensity,
                config.front_hinge,
                config.back_hinge,
            ));
        }
        let [x, y] = self.motion.offset();
        scene.translate(Vec3::new(x, y, 0.0));
        scene
    }

    /// The container changed size; zero dimensions fall back to the window.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.disposed {
            warn!("resize() after dispose");
            return;
        }
        self.viewport.resize(width, height);
        debug!(
            "Resized to {}x{} (aspect {:.3})",
            self.viewport.width, self.viewport.height, self.viewport.aspect
        );
    }

    /// Release every tracked resource and stop ticking. Later calls return `None`.
    pub fn dispose(&mut self) -> Option<DisposeReport> {
        if self.disposed {
            return None;
        }
        self.disposed = true;
        let report = self.resources.release_all();
        self.sink = None;
        debug!("Disposed book widget, released {} resources", report.total());
        Some(report)
    }

    fn notify_flip(&mut self, direction: FlipDirection) {
        if let Some(on_flip) = self.callbacks.on_flip.as_mut() {
            on_flip(direction);
        }
        let event = BookEvent::Flip {
            direction,
            state: self.get_state(),
        };
        self.emit(&event);
    }

    fn emit(&mut self, event: &BookEvent) {
        if let Some(sink) = self.sink.as_mut() {
            events::emit(&mut **sink, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::ManualClock;
    use crate::constants::OPEN_HINGE;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn options() -> BookOptions {
        BookOptions {
            particle_count: 200,
            ..BookOptions::default()
        }
        .with_seed(17)
    }

    fn widget(options: BookOptions) -> (BookWidget, ManualClock) {
        let clock = ManualClock::new();
        (BookWidget::new(options, clock.clone()), clock)
    }

    fn run(widget: &mut BookWidget, clock: &ManualClock, ms: f64) {
        let mut elapsed = 0.0;
        while elapsed < ms {
            clock.advance(16.0);
            widget.tick();
            elapsed += 16.0;
        }
    }

    #[test]
    fn test_host_clock_offset_keeps_first_flip_animated() {
        let clock = ManualClock::starting_at(12_000.0);
        let mut widget = BookWidget::new(options(), clock.clone());
        assert!(widget.flip_page(FlipDirection::Forward).started());

        clock.set(12_250.0);
        widget.tick();
        assert!((widget.config().flip_progress - 0.5).abs() < 1e-6);
        assert_eq!(widget.config().current_page, 15);
    }

    #[test]
    fn test_store_operations_forwarded() {
        let (mut widget, clock) = widget(options());

        widget.toggle_continuous_flip(FlipDirection::Forward);
        widget.stop_continuous_flip();
        assert!(!widget.config().is_flipping_continuously);
        run(&mut widget, &clock, 600.0);
        assert_eq!(widget.config().current_page, 16);

        widget.set_current_page(-2);
        assert_eq!(widget.config().current_page, 28);

        widget.set_both_hinges(1.0);
        assert_eq!(widget.config().front_hinge, 1.0);
        assert_eq!(widget.config().back_hinge, 1.0);

        widget.flip_pages(FlipDirection::Forward);
        widget.set_dimensions(DimensionsPatch {
            depth: Some(0.1),
            ..Default::default()
        });
        assert_eq!(widget.config().page_count, 50);
        assert_eq!(widget.sweeps().len(), 50);
        assert!(!widget.sweeps().is_animating());

        widget.reset();
        assert_eq!(widget.config(), &BookConfig::default());
        assert_eq!(widget.sweeps().len(), 30);
    }

    #[test]
    fn test_construction_applies_options() {
        let (widget, _) = widget(BookOptions {
            page_count: 12,
            initial_material: MaterialPreset::Glass,
            initial_front_hinge: 1.0,
            container_width: 0,
            ..options()
        });
        let config = widget.config();
        assert_eq!(config.page_count, 12);
        assert_eq!(config.current_page, 6);
        assert_eq!(config.front_hinge, 1.0);
        assert_eq!(config.cover_opacity, 0.3);
        assert_eq!(config.cover_material, MaterialPreset::Glass);
        assert_eq!(widget.viewport().width, 1280);
        assert_eq!(widget.particles().map(|p| p.count()), Some(200));
    }

    #[test]
    fn test_flip_pages_sweeps_toward_front_cover() {
        let (mut widget, clock) = widget(options());
        widget.set_front_hinge(1.0);
        widget.set_back_hinge(1.0);
        widget.flip_pages(FlipDirection::Forward);

        run(&mut widget, &clock, 700.0 + 60.0 * 30.0 + 100.0);
        assert!(widget.sweeps().angles().iter().all(|a| *a == -1.0));

        widget.reset_pages();
        run(&mut widget, &clock, 600.0);
        assert!(!widget.sweeps().is_swept());
    }

    #[test]
    fn test_flip_single_page_ignores_invalid_index() {
        let flips = Rc::new(RefCell::new(Vec::new()));
        let seen = flips.clone();
        let (mut widget, clock) = widget(options().on_flip(move |d| seen.borrow_mut().push(d)));
        widget.set_back_hinge(0.8);

        widget.flip_single_page(99, FlipDirection::Backward);
        assert!(flips.borrow().is_empty());

        widget.flip_single_page(3, FlipDirection::Backward);
        run(&mut widget, &clock, 800.0);
        assert_eq!(widget.sweeps().angle(3), Some(0.8));
        assert_eq!(*flips.borrow(), vec![FlipDirection::Backward]);
    }

    #[test]
    fn test_hinge_setters_clamp_swept_pages() {
        let (mut widget, clock) = widget(options());
        widget.set_front_hinge(1.0);
        widget.set_back_hinge(1.0);
        widget.flip_single_page(0, FlipDirection::Forward);
        widget.flip_single_page(1, FlipDirection::Backward);
        run(&mut widget, &clock, 800.0);

        widget.set_front_hinge(0.4);
        widget.set_back_hinge(0.2);
        assert_eq!(widget.sweeps().angle(0), Some(-0.4));
        assert_eq!(widget.sweeps().angle(1), Some(0.2));
    }

    #[test]
    fn test_confidence_lifts_glow_and_particles() {
        let (mut widget, _) = widget(options());
        widget.set_confidence_score(0.8);
        assert_eq!(widget.config().confidence_score, 0.8);
        assert!((widget.config().glow_intensity - 0.4).abs() < 1e-6);
        assert_eq!(widget.config().particle_intensity, 0.8);

        widget.set_confidence_score(-1.0);
        assert_eq!(widget.config().confidence_score, 0.0);
        // Glow is never lowered by confidence.
        assert!((widget.config().glow_intensity - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_confidence_leaves_particles_when_disabled() {
        let (mut widget, _) = widget(BookOptions {
            enable_particles: false,
            initial_particle_intensity: 0.3,
            ..options()
        });
        widget.set_confidence_score(0.9);
        assert_eq!(widget.config().particle_intensity, 0.3);
        assert!(widget.particles().is_none());

        widget.enable_particles(true);
        assert!(widget.particles().is_some());
        assert!(widget.resources().contains(ResourceKind::Geometry, "particles"));
    }

    #[test]
    fn test_glow_rises_while_pages_sweep() {
        let (mut widget, clock) = widget(options());
        widget.set_front_hinge(2.0);
        widget.tick();
        widget.flip_pages(FlipDirection::Forward);
        run(&mut widget, &clock, 400.0);
        assert!(widget.config().glow_intensity > 0.0);
    }

    #[test]
    fn test_glow_eases_to_confidence_floor() {
        let (mut widget, clock) = widget(options());
        widget.set_confidence_score(0.4);
        widget.set_glow_intensity(2.0);
        run(&mut widget, &clock, 16.0 * 300.0);
        assert!((widget.config().glow_intensity - 0.2).abs() < 1e-3);
    }

    #[test]
    fn test_particles_visible_only_when_open() {
        let (mut widget, _) = widget(options());
        widget.set_particle_intensity(0.5);
        assert_eq!(widget.visible_particle_count(), 0);

        widget.set_front_hinge(OPEN_HINGE);
        assert_eq!(widget.visible_particle_count(), 100);
        assert_eq!(widget.get_state().visible_particles, 100);
    }

    #[test]
    fn test_events_and_callbacks() {
        let hover = Rc::new(RefCell::new(Vec::new()));
        let glitches = Rc::new(RefCell::new(0));
        let (seen_hover, seen_glitch) = (hover.clone(), glitches.clone());
        let names = Rc::new(RefCell::new(Vec::new()));
        let seen_names = names.clone();

        let (mut widget, _) = widget(
            options()
                .on_hover_change(move |h| seen_hover.borrow_mut().push(h))
                .on_glitch(move || *seen_glitch.borrow_mut() += 1),
        );
        widget.set_event_sink(move |name: &str, detail: &serde_json::Value| -> crate::Result<()> {
            seen_names.borrow_mut().push((name.to_string(), detail.clone()));
            Ok(())
        });

        assert!(widget.toggle_hover());
        assert!(!widget.toggle_hover());
        widget.glitch();

        assert_eq!(*hover.borrow(), vec![true, false]);
        assert_eq!(*glitches.borrow(), 1);
        let names = names.borrow();
        assert_eq!(names.len(), 3);
        assert_eq!(names[0].0, "babel:hoverChange");
        assert_eq!(names[0].1["isHovering"], true);
        assert_eq!(names[2].0, "babel:glitch");
        assert_eq!(names[2].1["state"]["isHovering"], false);
    }

    #[test]
    fn test_failing_sink_does_not_stop_widget() {
        let (mut widget, clock) = widget(options());
        widget.set_event_sink(|_: &str, _: &serde_json::Value| -> crate::Result<()> {
            Err(dispatch_error("no listener"))
        });
        widget.glitch();
        widget.flip_pages(FlipDirection::Forward);
        run(&mut widget, &clock, 300.0);
        assert!(!widget.motion.is_glitching());
        assert_eq!(widget.get_state().offset[0], 0.0);
        assert!(widget.sweeps().is_animating());
    }

    #[test]
    fn test_store_flip_reports_on_completion() {
        let flips = Rc::new(RefCell::new(0));
        let seen = flips.clone();
        let (mut widget, clock) = widget(options().on_flip(move |_| *seen.borrow_mut() += 1));

        assert!(widget.flip_page(FlipDirection::Forward).started());
        run(&mut widget, &clock, 200.0);
        assert_eq!(*flips.borrow(), 0);
        run(&mut widget, &clock, 400.0);
        assert_eq!(*flips.borrow(), 1);
        assert_eq!(widget.config().current_page, 16);
    }

    #[test]
    fn test_get_state_is_a_snapshot() {
        let (mut widget, _) = widget(options());
        let before = widget.get_state();
        widget.set_tilt(1.25);
        assert_eq!(before.book.tilt, 0.2);
        assert_eq!(widget.get_state().book.tilt, 1.25);

        let json = serde_json::to_value(widget.get_state()).unwrap();
        assert_eq!(json["tilt"], 1.25);
        assert_eq!(json["isHovering"], false);
    }

    #[test]
    fn test_resize_and_dispose() {
        let (mut widget, clock) = widget(options());
        widget.resize(1000, 500);
        assert_eq!(widget.viewport().aspect, 2.0);

        let report = widget.dispose().unwrap();
        assert_eq!(report.geometries, 4);
        assert_eq!(report.materials, 4);
        assert_eq!(report.textures, 2);
        assert_eq!(report.listeners, 1);
        assert!(widget.resources().is_empty());
        assert!(widget.dispose().is_none());

        // Ticks after dispose are inert.
        widget.open_book(100.0);
        clock.advance(500.0);
        widget.tick();
        assert_eq!(widget.config().front_hinge, 0.0);

        widget.resize(10, 10);
        assert_eq!(widget.viewport().width, 1000);
    }

    #[test]
    fn test_scene_includes_visible_particles() {
        let (mut widget, _) = widget(options());
        assert!(widget.scene().part("particles").is_none());

        widget.set_particle_intensity(1.0);
        widget.set_front_hinge(OPEN_HINGE);
        let scene = widget.scene();
        assert_eq!(scene.part("particles").unwrap().mesh.vertex_count(), 200);
    }

    #[test]
    fn test_page_count_change_drops_sweeps() {
        let (mut widget, clock) = widget(options());
        widget.set_front_hinge(1.0);
        widget.flip_pages(FlipDirection::Forward);
        run(&mut widget, &clock, 200.0);

        widget.set_page_count(50);
        assert_eq!(widget.sweeps().len(), 50);
        assert!(!widget.sweeps().is_swept());
        assert!(!widget.sweeps().is_animating());
    }
}
