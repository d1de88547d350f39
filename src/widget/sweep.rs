//! Per-page sweep angles animated by the widget.
//!
//! A sweep turns a page about the spine edge independently of its cover.
//! Angle 0 means the page follows its cover.

use crate::anim::{Easing, Tween, TweenSet};
use crate::constants::{SWEEP_DELAY_PER_PAGE_MS, SWEEP_DURATION_MS, SWEEP_RESET_MS};

#[derive(Debug, Clone, Default)]
pub struct PageSweeps {
    angles: Vec<f32>,
    tweens: TweenSet<usize>,
}

impl PageSweeps {
    pub fn new(page_count: usize) -> Self {
        Self {
            angles: vec![0.0; page_count],
            tweens: TweenSet::new(),
        }
    }

    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    pub fn angle(&self, index: usize) -> Option<f32> {
        self.angles.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Any page turned away from its cover.
    pub fn is_swept(&self) -> bool {
        self.angles.iter().any(|a| *a != 0.0)
    }

    /// Drop every sweep and match a new page count.
    pub fn resize(&mut self, page_count: usize) {
        self.tweens.clear();
        self.angles = vec![0.0; page_count];
    }

    /// Sweep every page to `target`, each starting a little after the one
    /// before it.
    pub fn sweep_all(&mut self, target: f32, now_ms: f64) {
        for index in 0..self.angles.len() {
            let delay = index as f64 * SWEEP_DELAY_PER_PAGE_MS;
            self.sweep_page(index, target, now_ms, delay);
        }
    }

    /// Sweep one page to `target`. Returns false for an index outside the book.
    pub fn sweep_one(&mut self, index: usize, target: f32, now_ms: f64) -> bool {
        if index >= self.angles.len() {
            return false;
        }
        self.sweep_page(index, target, now_ms, 0.0);
        true
    }

    fn sweep_page(&mut self, index: usize, target: f32, now_ms: f64, delay_ms: f64) {
        let tween = Tween::new(
            self.angles[index],
            target,
            now_ms,
            SWEEP_DURATION_MS,
            Easing::QuadraticInOut,
        )
        .delayed(delay_ms);
        self.tweens.start(index, tween);
    }

    /// Ease every page back onto its cover.
    pub fn reset(&mut self, now_ms: f64) {
        for index in 0..self.angles.len() {
            let tween = Tween::new(self.angles[index], 0.0, now_ms, SWEEP_RESET_MS, Easing::Linear);
            self.tweens.start(index, tween);
        }
    }

    /// Keep swept pages between the open covers: `[-front_hinge, back_hinge]`.
    pub fn clamp_to_front(&mut self, front_hinge: f32) {
        for angle in &mut self.angles {
            if *angle < -front_hinge {
                *angle = -front_hinge;
            }
        }
    }

    pub fn clamp_to_back(&mut self, back_hinge: f32) {
        for angle in &mut self.angles {
            if *angle > back_hinge {
                *angle = back_hinge;
            }
        }
    }

    pub fn advance(&mut self, now_ms: f64) {
        for (index, value) in self.tweens.advance(now_ms) {
            if let Some(angle) = self.angles.get_mut(index) {
                *angle = value;
            }
        }
    }
}
