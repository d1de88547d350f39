//! Animated store actions: opening, closing, material morphs and emotions.

use super::{BookStore, StoreAction, TweenTarget};
use crate::anim::{Easing, Tween};
use crate::constants::{MATERIAL_MORPH_MS, OPEN_HINGE};
use crate::types::{Emotion, MaterialPreset};
use rand::Rng;
use tracing::debug;

const PULSE_CYCLES: u32 = 5;
const PULSE_HALF_MS: f64 = 600.0;

const SHAKE_COUNT: u32 = 10;
const SHAKE_STEP_MS: f64 = 50.0;
/// Full width of the random tremor offset.
const SHAKE_INTENSITY: f32 = 0.15;

const FLASH_PEAK: f32 = 2.0;
const FLASH_REST: f32 = 0.3;
const FLASH_UP_MS: f64 = 200.0;
const FLASH_DOWN_MS: f64 = 300.0;

/// Glow levels for one pulsing emotion.
struct PulseLevels {
    high: f32,
    low: f32,
    settle: f32,
    particles: f32,
    particles_ms: f64,
}

fn pulse_levels(emotion: Emotion) -> Option<PulseLevels> {
    match emotion {
        Emotion::Focus => Some(PulseLevels {
            high: 1.8,
            low: 0.8,
            settle: 1.2,
            particles: 1.0,
            particles_ms: 800.0,
        }),
        Emotion::Drift => Some(PulseLevels {
            high: 0.4,
            low: 0.1,
            settle: 0.1,
            particles: 0.1,
            particles_ms: 1200.0,
        }),
        Emotion::Paradox => None,
    }
}

impl BookStore {
    /// Tween a property from its current value to `to`, replacing any tween
    /// already running on it.
    fn tween_to(&mut self, target: TweenTarget, to: f32, duration_ms: f64, easing: Easing, now: f64) {
        let from = match target {
            TweenTarget::FrontHinge => self.config.front_hinge,
            TweenTarget::BackHinge => self.config.back_hinge,
            TweenTarget::ParticleIntensity => self.config.particle_intensity,
            TweenTarget::GlowIntensity => self.config.glow_intensity,
        };
        self.tweens
            .start(target, Tween::new(from, to, now, duration_ms, easing));
    }

    /// Swing both covers open and raise the particle flow.
    pub fn open_book(&mut self, duration_ms: f64) {
        debug!("Open book over {}ms", duration_ms);
        let now = self.clock.now_ms();
        let easing = Easing::EaseInOutCubic;
        self.tween_to(TweenTarget::FrontHinge, OPEN_HINGE, duration_ms, easing, now);
        self.tween_to(TweenTarget::BackHinge, OPEN_HINGE, duration_ms, easing, now);
        self.tween_to(TweenTarget::ParticleIntensity, 0.7, duration_ms, easing, now);
    }

    /// Close both covers and fade particles and glow out.
    pub fn close_book(&mut self, duration_ms: f64) {
        debug!("Close book over {}ms", duration_ms);
        let now = self.clock.now_ms();
        let easing = Easing::EaseInOutCubic;
        self.tween_to(TweenTarget::FrontHinge, 0.0, duration_ms, easing, now);
        self.tween_to(TweenTarget::BackHinge, 0.0, duration_ms, easing, now);
        self.tween_to(TweenTarget::ParticleIntensity, 0.0, duration_ms, easing, now);
        self.tween_to(TweenTarget::GlowIntensity, 0.0, duration_ms, easing, now);
    }

    /// Switch the cover to a preset. Colour and opacity change at once,
    /// glow and particles ease toward the preset's levels.
    pub fn morph_material(&mut self, preset: MaterialPreset) {
        debug!("Morph cover to {}", preset.as_str());
        let params = preset.params();
        let now = self.clock.now_ms();

        self.config.cover_color = params.color;
        self.config.cover_opacity = params.opacity;
        self.config.cover_material = preset;

        let easing = Easing::EaseInOutCubic;
        self.tween_to(TweenTarget::GlowIntensity, params.glow, MATERIAL_MORPH_MS, easing, now);
        if let Some(particles) = params.particle_intensity {
            self.tween_to(TweenTarget::ParticleIntensity, particles, MATERIAL_MORPH_MS, easing, now);
        }
    }

    /// Play an emotion. A new emotion cuts off whatever effect was running.
    pub fn trigger_emotion(&mut self, emotion: Emotion) {
        debug!("Trigger emotion {:?}", emotion);
        let now = self.clock.now_ms();

        // An interrupted tremor must not leave the book shaken.
        let mut shake_origin = None;
        self.timeline.retain(|action| {
            if let StoreAction::Shake { rotation, tilt, .. } = action {
                shake_origin = Some((*rotation, *tilt));
            }
            !action.is_effect()
        });
        if let Some((rotation, tilt)) = shake_origin {
            self.config.spine_rotation = rotation;
            self.config.tilt = tilt;
        }

        match pulse_levels(emotion) {
            Some(levels) => {
                self.pulse_up(emotion, 0, now);
                self.tween_to(
                    TweenTarget::ParticleIntensity,
                    levels.particles,
                    levels.particles_ms,
                    Easing::EaseInOutCubic,
                    now,
                );
            }
            None => {
                let (rotation, tilt) = (self.config.spine_rotation, self.config.tilt);
                self.shake(SHAKE_COUNT, rotation, tilt, now);
                self.tween_to(TweenTarget::GlowIntensity, FLASH_PEAK, FLASH_UP_MS, Easing::Linear, now);
                self.timeline.schedule(
                    now + FLASH_UP_MS,
                    StoreAction::GlowFlash {
                        from: FLASH_PEAK,
                        to: FLASH_REST,
                        duration_ms: FLASH_DOWN_MS,
                    },
                );
            }
        }
    }

    pub(super) fn pulse_up(&mut self, emotion: Emotion, cycle: u32, now: f64) {
        let Some(levels) = pulse_levels(emotion) else {
            return;
        };
        let easing = Easing::EaseInOutCubic;
        if cycle >= PULSE_CYCLES {
            self.tween_to(TweenTarget::GlowIntensity, levels.settle, PULSE_HALF_MS, easing, now);
            return;
        }
        self.tween_to(TweenTarget::GlowIntensity, levels.high, PULSE_HALF_MS, easing, now);
        self.timeline
            .schedule(now + PULSE_HALF_MS, StoreAction::PulseDown { emotion, cycle });
    }

    pub(super) fn pulse_down(&mut self, emotion: Emotion, cycle: u32, now: f64) {
        let Some(levels) = pulse_levels(emotion) else {
            return;
        };
        self.tween_to(
            TweenTarget::GlowIntensity,
            levels.low,
            PULSE_HALF_MS,
            Easing::EaseInOutCubic,
            now,
        );
        self.timeline.schedule(
            now + PULSE_HALF_MS,
            StoreAction::PulseUp {
                emotion,
                cycle: cycle + 1,
            },
        );
    }

    /// One step of the paradox tremor around the resting `rotation` and `tilt`.
    pub(super) fn shake(&mut self, remaining: u32, rotation: f32, tilt: f32, now: f64) {
        if remaining == 0 {
            self.config.spine_rotation = rotation;
            self.config.tilt = tilt;
            return;
        }
        self.config.spine_rotation = rotation + (self.rng.gen::<f32>() - 0.5) * SHAKE_INTENSITY;
        self.config.tilt = tilt + (self.rng.gen::<f32>() - 0.5) * SHAKE_INTENSITY;
        self.timeline.schedule(
            now + SHAKE_STEP_MS,
            StoreAction::Shake {
                remaining: remaining - 1,
                rotation,
                tilt,
            },
        );
    }

    pub(super) fn glow_flash(&mut self, from: f32, to: f32, duration_ms: f64, now: f64) {
        self.tweens.start(
            TweenTarget::GlowIntensity,
            Tween::new(from, to, now, duration_ms, Easing::Linear),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::ManualClock;

    fn store() -> (BookStore, ManualClock) {
        let clock = ManualClock::new();
        (BookStore::new(clock.clone()).with_seed(3), clock)
    }

    fn run(store: &mut BookStore, clock: &ManualClock, ms: f64) {
        let mut elapsed = 0.0;
        while elapsed < ms {
            clock.advance(16.0);
            store.tick();
            elapsed += 16.0;
        }
    }

    #[test]
    fn test_open_book_reaches_open_angle() {
        let (mut store, clock) = store();
        store.open_book(1000.0);

        clock.advance(500.0);
        store.tick();
        let halfway = store.config().front_hinge;
        assert!(halfway > 0.0 && halfway < OPEN_HINGE);

        clock.advance(500.0);
        store.tick();
        assert_eq!(store.config().front_hinge, OPEN_HINGE);
        assert_eq!(store.config().back_hinge, OPEN_HINGE);
        assert_eq!(store.config().particle_intensity, 0.7);
        assert!(!store.is_animating());
    }

    #[test]
    fn test_close_during_open_converges_to_closed() {
        let (mut store, clock) = store();
        store.set_glow_intensity(1.0);
        store.open_book(1000.0);
        run(&mut store, &clock, 300.0);

        store.close_book(1000.0);
        run(&mut store, &clock, 1100.0);

        let config = store.config();
        assert_eq!(config.front_hinge, 0.0);
        assert_eq!(config.back_hinge, 0.0);
        assert_eq!(config.particle_intensity, 0.0);
        assert_eq!(config.glow_intensity, 0.0);
    }

    #[test]
    fn test_direct_setter_cancels_tween() {
        let (mut store, clock) = store();
        store.open_book(1000.0);
        run(&mut store, &clock, 200.0);

        store.set_both_hinges(0.25);
        run(&mut store, &clock, 1000.0);
        assert_eq!(store.config().front_hinge, 0.25);
        assert_eq!(store.config().back_hinge, 0.25);
    }

    #[test]
    fn test_morph_to_glass() {
        let (mut store, clock) = store();
        store.morph_material(MaterialPreset::Glass);

        assert_eq!(store.config().cover_material, MaterialPreset::Glass);
        assert_eq!(store.config().cover_opacity, 0.3);
        assert_eq!(store.config().cover_color, MaterialPreset::Glass.params().color);

        run(&mut store, &clock, 600.0);
        assert_eq!(store.config().glow_intensity, 1.8);
        assert_eq!(store.config().particle_intensity, 1.0);
    }

    #[test]
    fn test_morph_to_leather_keeps_particles() {
        let (mut store, clock) = store();
        store.set_particle_intensity(0.4);
        store.morph_material(MaterialPreset::Leather);
        run(&mut store, &clock, 600.0);

        assert_eq!(store.config().glow_intensity, 0.1);
        assert_eq!(store.config().particle_intensity, 0.4);
    }

    #[test]
    fn test_focus_pulses_then_settles() {
        let (mut store, clock) = store();
        store.trigger_emotion(Emotion::Focus);

        // Top of the first pulse.
        run(&mut store, &clock, 600.0);
        assert!((store.config().glow_intensity - 1.8).abs() < 0.05);

        run(&mut store, &clock, 5.0 * 1200.0 + 1000.0);
        assert!(!store.is_animating());
        assert_eq!(store.config().glow_intensity, 1.2);
        assert_eq!(store.config().particle_intensity, 1.0);
    }

    #[test]
    fn test_drift_ends_dim() {
        let (mut store, clock) = store();
        store.trigger_emotion(Emotion::Drift);
        run(&mut store, &clock, 8000.0);

        assert!(!store.is_animating());
        assert_eq!(store.config().glow_intensity, 0.1);
        assert_eq!(store.config().particle_intensity, 0.1);
    }

    #[test]
    fn test_paradox_shakes_and_restores() {
        let (mut store, clock) = store();
        let rotation = store.config().spine_rotation;
        let tilt = store.config().tilt;

        store.trigger_emotion(Emotion::Paradox);
        assert!((store.config().spine_rotation - rotation).abs() <= 0.075);
        assert!((store.config().tilt - tilt).abs() <= 0.075);

        run(&mut store, &clock, 100.0);
        assert!(store.config().glow_intensity > 0.0);

        run(&mut store, &clock, 1000.0);
        assert_eq!(store.config().spine_rotation, rotation);
        assert_eq!(store.config().tilt, tilt);
        assert_eq!(store.config().glow_intensity, 0.3);
        assert!(!store.is_animating());
    }

    #[test]
    fn test_new_emotion_interrupts_tremor() {
        let (mut store, clock) = store();
        let rotation = store.config().spine_rotation;
        store.trigger_emotion(Emotion::Paradox);
        run(&mut store, &clock, 120.0);

        store.trigger_emotion(Emotion::Drift);
        assert_eq!(store.config().spine_rotation, rotation);
        run(&mut store, &clock, 8000.0);
        assert_eq!(store.config().spine_rotation, rotation);
        assert_eq!(store.config().glow_intensity, 0.1);
    }
}
