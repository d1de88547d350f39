//! WASM bindings for babel-book.
//!
//! The browser owns the frame loop: call `tick(now)` from
//! `requestAnimationFrame` and read back state or meshes as needed.

use crate::widget::{dispatch_error, EventSink};
use crate::{
    BookOptions, BookWidget, DimensionsPatch, Emotion, FlipDirection, ManualClock, MaterialPreset,
    Rgb,
};
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// Forwards widget events to a JS function `(name, detailJson) => void`.
struct JsEventSink {
    listener: js_sys::Function,
}

impl EventSink for JsEventSink {
    fn dispatch(&mut self, name: &str, detail: &Value) -> crate::Result<()> {
        self.listener
            .call2(
                &JsValue::NULL,
                &JsValue::from_str(name),
                &JsValue::from_str(&detail.to_string()),
            )
            .map(|_| ())
            .map_err(|e| dispatch_error(format!("{:?}", e)))
    }
}

/// A book widget driven by browser frame times.
#[wasm_bindgen]
pub struct BookHandle {
    inner: BookWidget,
    clock: ManualClock,
}

#[wasm_bindgen]
impl BookHandle {
    /// Create a widget from optional JSON options (camelCase fields).
    ///
    /// `now_ms` is the host's current `performance.now()`, so animations
    /// started before the first `tick` run from the right moment.
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: Option<String>, now_ms: f64) -> Result<BookHandle, JsError> {
        let options = match options_json {
            Some(json) => serde_json::from_str::<BookOptions>(&json)
                .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))?,
            None => BookOptions::default(),
        };
        let clock = ManualClock::starting_at(now_ms);
        Ok(BookHandle {
            inner: BookWidget::new(options, clock.clone()),
            clock,
        })
    }

    /// Receive `babel:*` events as `(name, detailJson)`.
    pub fn set_event_listener(&mut self, listener: js_sys::Function) {
        self.inner.set_event_sink(JsEventSink { listener });
    }

    /// Advance every animation to `now_ms` (a `performance.now()` timestamp).
    pub fn tick(&mut self, now_ms: f64) {
        self.clock.set(now_ms);
        self.inner.tick();
    }

    #[wasm_bindgen(getter)]
    pub fn is_animating(&self) -> bool {
        self.inner.is_animating()
    }

    /// Current state as JSON.
    pub fn state_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.inner.get_state()).map_err(js_error)
    }

    pub fn open_book(&mut self, duration_ms: f64) {
        self.inner.open_book(duration_ms);
    }

    pub fn close_book(&mut self, duration_ms: f64) {
        self.inner.close_book(duration_ms);
    }

    /// Sweep every page toward `direction` ("forward"/"backward").
    pub fn flip_pages(&mut self, direction: &str) -> Result<(), JsError> {
        let direction: FlipDirection = direction.parse().map_err(js_error)?;
        self.inner.flip_pages(direction);
        Ok(())
    }

    pub fn flip_single_page(&mut self, index: usize, direction: &str) -> Result<(), JsError> {
        let direction: FlipDirection = direction.parse().map_err(js_error)?;
        self.inner.flip_single_page(index, direction);
        Ok(())
    }

    pub fn reset_pages(&mut self) {
        self.inner.reset_pages();
    }

    /// Move one page between stacks. Returns whether the flip started.
    pub fn flip_page(&mut self, direction: &str) -> Result<bool, JsError> {
        let direction: FlipDirection = direction.parse().map_err(js_error)?;
        Ok(self.inner.flip_page(direction).started())
    }

    pub fn flip_page_run(
        &mut self,
        count: usize,
        direction: &str,
        duration_ms: f64,
    ) -> Result<bool, JsError> {
        let direction: FlipDirection = direction.parse().map_err(js_error)?;
        Ok(self.inner.flip_page_run(count, direction, duration_ms).started())
    }

    pub fn toggle_continuous_flip(&mut self, direction: &str) -> Result<bool, JsError> {
        let direction: FlipDirection = direction.parse().map_err(js_error)?;
        Ok(self.inner.toggle_continuous_flip(direction))
    }

    pub fn stop_continuous_flip(&mut self) {
        self.inner.stop_continuous_flip();
    }

    pub fn set_page_count(&mut self, count: usize) {
        self.inner.set_page_count(count);
    }

    /// Jump to a page; negative or oversized values wrap.
    pub fn set_current_page(&mut self, page: i32) {
        self.inner.set_current_page(i64::from(page));
    }

    /// Merge dimensions from JSON, e.g. `{"depth": 0.4}`.
    pub fn set_dimensions(&mut self, patch_json: &str) -> Result<(), JsError> {
        let patch: DimensionsPatch = serde_json::from_str(patch_json).map_err(js_error)?;
        self.inner.set_dimensions(patch);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn set_spine_rotation(&mut self, angle: f32) {
        self.inner.set_spine_rotation(angle);
    }

    pub fn set_tilt(&mut self, angle: f32) {
        self.inner.set_tilt(angle);
    }

    pub fn set_scale(&mut self, value: f32) {
        self.inner.set_scale(value);
    }

    pub fn set_front_hinge(&mut self, angle: f32) {
        self.inner.set_front_hinge(angle);
    }

    pub fn set_back_hinge(&mut self, angle: f32) {
        self.inner.set_back_hinge(angle);
    }

    pub fn set_both_hinges(&mut self, angle: f32) {
        self.inner.set_both_hinges(angle);
    }

    /// Switch cover material ("leather", "metal" or "glass").
    pub fn morph_material(&mut self, preset: &str) -> Result<(), JsError> {
        let preset: MaterialPreset = preset.parse().map_err(js_error)?;
        self.inner.morph_material(preset);
        Ok(())
    }

    pub fn trigger_emotion(&mut self, emotion: &str) -> Result<(), JsError> {
        let emotion: Emotion = emotion.parse().map_err(js_error)?;
        self.inner.trigger_emotion(emotion);
        Ok(())
    }

    /// Page colour as `#rrggbb`.
    pub fn set_page_color(&mut self, hex: &str) -> Result<(), JsError> {
        let color = Rgb::from_hex(hex).map_err(js_error)?;
        self.inner.set_page_color(color);
        Ok(())
    }

    pub fn set_page_opacity(&mut self, opacity: f32) {
        self.inner.set_page_opacity(opacity);
    }

    pub fn set_glow_intensity(&mut self, intensity: f32) {
        self.inner.set_glow_intensity(intensity);
    }

    pub fn set_confidence_score(&mut self, score: f32) {
        self.inner.set_confidence_score(score);
    }

    pub fn set_particle_intensity(&mut self, intensity: f32) {
        self.inner.set_particle_intensity(intensity);
    }

    pub fn enable_particles(&mut self, enabled: bool) {
        self.inner.enable_particles(enabled);
    }

    pub fn set_front_cover_text(&mut self, text: String) {
        self.inner.set_front_cover_text(text);
    }

    pub fn set_back_cover_text(&mut self, text: String) {
        self.inner.set_back_cover_text(text);
    }

    pub fn glitch(&mut self) {
        self.inner.glitch();
    }

    pub fn toggle_hover(&mut self) -> bool {
        self.inner.toggle_hover()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.inner.resize(width, height);
    }

    /// Release everything. Returns false when already disposed.
    pub fn dispose(&mut self) -> bool {
        self.inner.dispose().is_some()
    }

    /// The posed book, with visible particles, as GLB bytes.
    pub fn export_glb(&self) -> Result<Vec<u8>, JsError> {
        crate::export_glb(&self.inner.scene()).map_err(js_error)
    }

    /// Visible particle positions as a flat `[x, y, z, ...]` array.
    pub fn particle_positions(&self) -> Vec<f32> {
        let config = self.inner.config();
        self.inner
            .particles()
            .map(|field| {
                field
                    .visible_positions(
                        config.particles_enabled,
                        config.particle_intensity,
                        config.front_hinge,
                        config.back_hinge,
                    )
                    .iter()
                    .flat_map(|p| p.to_array())
                    .collect()
            })
            .unwrap_or_default()
    }
}
