//! Per-property tween records.

use super::Easing;
use std::collections::HashMap;
use std::hash::Hash;

/// One scalar animating from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    /// Start time in ms. May lie in the future for delayed tweens.
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

/// Value of a tween at a given time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSample {
    pub value: f32,
    pub done: bool,
}

impl Tween {
    pub fn new(from: f32, to: f32, start_ms: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing,
        }
    }

    /// Push the start back by `delay_ms`.
    pub fn delayed(mut self, delay_ms: f64) -> Self {
        self.start_ms += delay_ms;
        self
    }

    /// Linear progress in [0, 1]. Zero-length tweens are complete immediately.
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn sample(&self, now_ms: f64) -> TweenSample {
        let progress = self.progress(now_ms);
        let done = progress >= 1.0;
        // Land exactly on the target; easing curves can leave a rounding residue.
        let value = if done {
            self.to
        } else {
            self.from + (self.to - self.from) * self.easing.apply(progress)
        };
        TweenSample { value, done }
    }
}

/// Tweens keyed by the property they drive.
///
/// Starting a tween on a key that is already animating replaces the old one,
/// so the newest request always wins.
#[derive(Debug, Clone)]
pub struct TweenSet<K> {
    tweens: HashMap<K, Tween>,
}

impl<K> Default for TweenSet<K> {
    fn default() -> Self {
        Self {
            tweens: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> TweenSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, key: K, tween: Tween) {
        self.tweens.insert(key, tween);
    }

    pub fn cancel(&mut self, key: K) -> Option<Tween> {
        self.tweens.remove(&key)
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }

    pub fn is_active(&self, key: K) -> bool {
        self.tweens.contains_key(&key)
    }

    pub fn get(&self, key: K) -> Option<&Tween> {
        self.tweens.get(&key)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Sample every tween at `now_ms`, drop the finished ones, and return
    /// `(key, value)` for each tween that has started.
    pub fn advance(&mut self, now_ms: f64) -> Vec<(K, f32)> {
        let mut values = Vec::with_capacity(self.tweens.len());
        let mut finished = Vec::new();

        for (key, tween) in &self.tweens {
            if now_ms < tween.start_ms {
                continue;
            }
            let sample = tween.sample(now_ms);
            values.push((*key, sample.value));
            if sample.done {
                finished.push(*key);
            }
        }

        for key in finished {
            self.tweens.remove(&key);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_linear_midpoint_and_end() {
        let tween = Tween::new(0.0, 10.0, 100.0, 200.0, Easing::Linear);

        assert_eq!(tween.sample(100.0).value, 0.0);
        assert_eq!(tween.sample(200.0), TweenSample { value: 5.0, done: false });
        assert_eq!(tween.sample(1000.0), TweenSample { value: 10.0, done: true });
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let tween = Tween::new(1.0, 2.0, 0.0, 0.0, Easing::EaseInOutCubic);
        assert!(tween.sample(0.0).done);
        assert_eq!(tween.sample(0.0).value, 2.0);
    }

    #[test]
    fn test_set_newest_tween_wins() {
        let mut set = TweenSet::new();
        set.start("hinge", Tween::new(0.0, 1.0, 0.0, 1000.0, Easing::Linear));
        set.start("hinge", Tween::new(0.5, 0.0, 500.0, 1000.0, Easing::Linear));

        assert_eq!(set.len(), 1);
        let values = set.advance(1500.0);
        assert_eq!(values, vec![("hinge", 0.0)]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_delayed_tween_waits() {
        let mut set = TweenSet::new();
        set.start(3usize, Tween::new(0.0, 1.0, 0.0, 100.0, Easing::Linear).delayed(50.0));

        assert!(set.advance(20.0).is_empty());
        assert!(set.is_active(3));

        let values = set.advance(100.0);
        assert_eq!(values.len(), 1);
        assert!((values[0].1 - 0.5).abs() < 1e-6);
    }
}
