//! Whole-book offsets: the hover bob and the glitch jolt.

use crate::anim::{Easing, Tween};
use crate::constants::{
    GLITCH_AMPLITUDE, GLITCH_REPEATS, GLITCH_STEP_MS, HOVER_AMPLITUDE, HOVER_SETTLE_MS, HOVER_SPEED,
};

/// Glitch keyframes for one run, starting and ending at rest.
const GLITCH_KEYS: [f32; 4] = [0.0, GLITCH_AMPLITUDE, -GLITCH_AMPLITUDE, 0.0];

#[derive(Debug, Clone, Default)]
pub struct GroupMotion {
    hovering: bool,
    offset_x: f32,
    offset_y: f32,
    settle: Option<Tween>,
    glitch_start: Option<f64>,
}

impl GroupMotion {
    pub fn new(hovering: bool) -> Self {
        Self {
            hovering,
            ..Self::default()
        }
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_glitching(&self) -> bool {
        self.glitch_start.is_some()
    }

    /// `[x, y]` offset of the book group.
    pub fn offset(&self) -> [f32; 2] {
        [self.offset_x, self.offset_y]
    }

    /// Flip hover on or off and return the new state. Leaving hover eases the
    /// book back down.
    pub fn toggle_hover(&mut self, now_ms: f64) -> bool {
        self.hovering = !self.hovering;
        self.settle = if self.hovering {
            None
        } else {
            Some(Tween::new(self.offset_y, 0.0, now_ms, HOVER_SETTLE_MS, Easing::Linear))
        };
        self.hovering
    }

    /// Start a glitch, restarting one already running.
    pub fn glitch(&mut self, now_ms: f64) {
        self.glitch_start = Some(now_ms);
    }

    pub fn advance(&mut self, now_ms: f64) {
        if self.hovering {
            self.offset_y = ((now_ms * HOVER_SPEED).sin() as f32) * HOVER_AMPLITUDE;
        } else if let Some(settle) = self.settle {
            let sample = settle.sample(now_ms);
            self.offset_y = sample.value;
            if sample.done {
                self.settle = None;
            }
        }

        if let Some(start) = self.glitch_start {
            let elapsed = now_ms - start;
            let total = GLITCH_STEP_MS * f64::from(GLITCH_REPEATS + 1);
            if elapsed >= total {
                self.offset_x = 0.0;
                self.glitch_start = None;
            } else {
                let run = (elapsed.max(0.0) % GLITCH_STEP_MS) / GLITCH_STEP_MS;
                self.offset_x = glitch_offset(run as f32);
            }
        }
    }
}

/// Piecewise-linear position through the glitch keyframes at `t` in [0, 1].
fn glitch_offset(t: f32) -> f32 {
    let segments = (GLITCH_KEYS.len() - 1) as f32;
    let scaled = t.clamp(0.0, 1.0) * segments;
    let i = (scaled.floor() as usize).min(GLITCH_KEYS.len() - 2);
    let local = scaled - i as f32;
    GLITCH_KEYS[i] + (GLITCH_KEYS[i + 1] - GLITCH_KEYS[i]) * local
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glitch_keyframes() {
        assert_eq!(glitch_offset(0.0), 0.0);
        assert!((glitch_offset(1.0 / 3.0) - 0.3).abs() < 1e-5);
        assert!((glitch_offset(2.0 / 3.0) + 0.3).abs() < 1e-5);
        assert!(glitch_offset(1.0).abs() < 1e-6);
    }

    #[test]
    fn test_glitch_runs_five_times_then_rests() {
        let mut motion = GroupMotion::new(false);
        motion.glitch(0.0);

        motion.advance(50.0 * 3.0 + 50.0 / 3.0);
        assert!((motion.offset()[0] - 0.3).abs() < 1e-4);
        assert!(motion.is_glitching());

        motion.advance(250.0);
        assert_eq!(motion.offset()[0], 0.0);
        assert!(!motion.is_glitching());
    }

    #[test]
    fn test_hover_bobs_then_settles() {
        let mut motion = GroupMotion::new(true);
        let t = std::f64::consts::FRAC_PI_2 / HOVER_SPEED;
        motion.advance(t);
        assert!((motion.offset()[1] - 0.3).abs() < 1e-4);

        assert!(!motion.toggle_hover(t));
        motion.advance(t + 250.0);
        assert!((motion.offset()[1] - 0.15).abs() < 1e-3);
        motion.advance(t + 500.0);
        assert_eq!(motion.offset()[1], 0.0);
    }
}
