//! Page glow driven by how fast pages are sweeping.

use crate::constants::{GLOW_MAX, GLOW_SMOOTHING};

/// Glow per unit of angular velocity (rad/s).
const VELOCITY_GLOW: f32 = 0.1;
/// Glow per unit of confidence.
const CONFIDENCE_GLOW: f32 = 0.5;

/// Tracks page angles between ticks and eases glow toward a target
/// derived from the fastest page and the confidence score.
#[derive(Debug, Clone, Default)]
pub struct GlowTracker {
    previous: Vec<f32>,
    last_ms: Option<f64>,
}

impl GlowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest angular speed (rad/s) since the previous call, then remember
    /// `angles` for the next one. `None` when no time has passed.
    pub fn max_velocity(&mut self, angles: &[f32], now_ms: f64) -> Option<f32> {
        let last = self.last_ms.replace(now_ms);
        if self.previous.len() != angles.len() {
            self.previous = angles.to_vec();
            return None;
        }

        let dt = (now_ms - last?) / 1000.0;
        if dt <= 0.0 {
            return None;
        }

        let max = angles
            .iter()
            .zip(&self.previous)
            .map(|(now, before)| ((now - before).abs() as f64 / dt) as f32)
            .fold(0.0, f32::max);
        self.previous.copy_from_slice(angles);
        Some(max)
    }

    /// Next glow value from the current one.
    pub fn step(current: f32, max_velocity: f32, confidence: f32) -> f32 {
        let velocity_glow = (max_velocity * VELOCITY_GLOW).min(GLOW_MAX);
        let target = velocity_glow.max(confidence * CONFIDENCE_GLOW);
        (current * GLOW_SMOOTHING + target * (1.0 - GLOW_SMOOTHING)).clamp(0.0, GLOW_MAX)
    }

    /// Glow that confidence alone guarantees.
    pub fn confidence_floor(confidence: f32) -> f32 {
        confidence * CONFIDENCE_GLOW
    }

    /// Forget history, e.g. after the page count changes.
    pub fn reset(&mut self) {
        self.previous.clear();
        self.last_ms = None;
    }
}
