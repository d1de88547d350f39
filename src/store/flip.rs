//! The page-flip state machine.
//!
//! Idle until a flip starts, then `Flipping` until `flip_progress` reaches 1.
//! Only one page may be mid-flip. `current_page` moves when the flip
//! completes, so the stacks keep their membership while the page is in the air.

use super::{BookStore, StoreAction, StoreEvent};
use crate::constants::{CONTINUOUS_FLIP_PAUSE_MS, FLIP_DURATION_MS, MULTI_FLIP_PAUSE_MS};
use crate::types::FlipDirection;
use tracing::{debug, warn};

/// Result of asking for a flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    Started,
    /// Another page is already mid-flip.
    Busy,
    /// No page left to turn in that direction.
    AtBoundary,
    /// A batch of zero flips.
    NothingToDo,
}

impl FlipOutcome {
    pub fn started(&self) -> bool {
        matches!(self, FlipOutcome::Started)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ActiveFlip {
    page: usize,
    direction: FlipDirection,
    start_ms: f64,
    duration_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct FlipBatch {
    remaining: usize,
    direction: FlipDirection,
    duration_ms: f64,
}

impl BookStore {
    /// Turn one page over the default 500 ms.
    pub fn flip_page(&mut self, direction: FlipDirection) -> FlipOutcome {
        let now = self.clock.now_ms();
        self.start_flip(direction, FLIP_DURATION_MS, now)
    }

    /// Turn `count` pages one after another, each over `duration_ms`, with a
    /// short pause in between. Stops early at a boundary.
    pub fn flip_pages(
        &mut self,
        count: usize,
        direction: FlipDirection,
        duration_ms: f64,
    ) -> FlipOutcome {
        if self.active_flip.is_some() {
            warn!("Flip already in progress, ignoring batch of {}", count);
            return FlipOutcome::Busy;
        }
        if count == 0 {
            return FlipOutcome::NothingToDo;
        }

        debug!(
            "Starting {} page flips {} from page {}",
            count, direction, self.config.current_page
        );
        let now = self.clock.now_ms();
        let outcome = self.start_flip(direction, duration_ms, now);
        if outcome.started() {
            self.batch = Some(FlipBatch {
                remaining: count,
                direction,
                duration_ms,
            });
        }
        outcome
    }

    /// Start or stop flipping continuously in `direction`.
    ///
    /// Returns whether continuous flipping is active afterwards.
    pub fn toggle_continuous_flip(&mut self, direction: FlipDirection) -> bool {
        if self.config.is_flipping_continuously
            && self.config.continuous_direction == Some(direction)
        {
            debug!("Stop continuous flip");
            self.stop_continuous_flip();
            return false;
        }

        debug!("Start continuous flip {}", direction);
        self.timeline
            .retain(|a| !matches!(a, StoreAction::ContinueFlip(_)));
        self.config.is_flipping_continuously = true;
        self.config.continuous_direction = Some(direction);
        self.flip_page(direction);
        true
    }

    pub fn stop_continuous_flip(&mut self) {
        self.config.is_flipping_continuously = false;
        self.config.continuous_direction = None;
        self.timeline
            .retain(|a| !matches!(a, StoreAction::ContinueFlip(_)));
    }

    /// The page that changes stacks when flipping in `direction`, if any.
    pub fn flip_candidate(&self, direction: FlipDirection) -> Option<usize> {
        let current = self.config.current_page;
        match direction {
            FlipDirection::Forward => (current + 1 < self.config.page_count).then_some(current),
            FlipDirection::Backward => current.checked_sub(1),
        }
    }

    pub(super) fn start_flip(
        &mut self,
        direction: FlipDirection,
        duration_ms: f64,
        now: f64,
    ) -> FlipOutcome {
        if self.active_flip.is_some() {
            warn!("Flip already in progress");
            return FlipOutcome::Busy;
        }
        let Some(page) = self.flip_candidate(direction) else {
            debug!(
                "Already at the {} page",
                if direction == FlipDirection::Forward { "last" } else { "first" }
            );
            return FlipOutcome::AtBoundary;
        };

        debug!("Start flip {}: page {}", direction, page);
        self.active_flip = Some(ActiveFlip {
            page,
            direction,
            start_ms: now,
            duration_ms,
        });
        self.config.flipping_page_index = Some(page);
        self.config.flip_progress = 0.0;
        self.config.flip_direction = Some(direction);
        self.events.push(StoreEvent::FlipStarted { page, direction });
        FlipOutcome::Started
    }

    pub(super) fn advance_flip(&mut self, now: f64) {
        let Some(flip) = self.active_flip else {
            return;
        };

        let progress = if flip.duration_ms <= 0.0 {
            1.0
        } else {
            ((now - flip.start_ms) / flip.duration_ms).clamp(0.0, 1.0)
        };
        self.config.flip_progress = progress as f32;

        if progress >= 1.0 {
            self.complete_flip(flip, now);
        }
    }

    fn complete_flip(&mut self, flip: ActiveFlip, now: f64) {
        let last = self.config.page_count as isize - 1;
        let next = (self.config.current_page as isize + flip.direction.step()).clamp(0, last);
        self.config.current_page = next as usize;

        self.active_flip = None;
        self.config.flipping_page_index = None;
        self.config.flip_progress = 0.0;
        self.config.flip_direction = None;
        self.events.push(StoreEvent::FlipCompleted {
            page: flip.page,
            direction: flip.direction,
            current_page: self.config.current_page,
        });
        debug!("Flip complete, current page {}", self.config.current_page);

        if let Some(mut batch) = self.batch.take() {
            batch.remaining = batch.remaining.saturating_sub(1);
            if batch.remaining > 0 {
                self.batch = Some(batch);
                self.timeline
                    .schedule(now + MULTI_FLIP_PAUSE_MS, StoreAction::NextBatchFlip);
                return;
            }
            debug!("Finished page batch {}", batch.direction);
        }

        // Continuous mode may have been switched on, or turned around, while
        // this page was in the air.
        if let Some(direction) = self.continuous_direction() {
            self.timeline
                .retain(|a| !matches!(a, StoreAction::ContinueFlip(_)));
            self.timeline.schedule(
                now + CONTINUOUS_FLIP_PAUSE_MS,
                StoreAction::ContinueFlip(direction),
            );
        }
    }

    fn continuous_direction(&self) -> Option<FlipDirection> {
        if self.config.is_flipping_continuously {
            self.config.continuous_direction
        } else {
            None
        }
    }

    pub(super) fn continue_flip(&mut self, direction: FlipDirection, now: f64) {
        if !self.config.is_flipping_continuously
            || self.config.continuous_direction != Some(direction)
        {
            return;
        }
        if self.start_flip(direction, FLIP_DURATION_MS, now) == FlipOutcome::AtBoundary {
            debug!("Continuous flip reached the {} boundary", direction);
            self.stop_continuous_flip();
        }
    }

    pub(super) fn next_batch_flip(&mut self, now: f64) {
        let Some(batch) = self.batch else {
            return;
        };
        match self.start_flip(batch.direction, batch.duration_ms, now) {
            FlipOutcome::Started => {}
            outcome => {
                debug!("Page batch stopped early: {:?}", outcome);
                self.batch = None;
            }
        }
    }

    /// Abandon any flip in flight without moving `current_page`. Batches and
    /// continuous mode end with it.
    pub(super) fn cancel_flip(&mut self) {
        self.active_flip = None;
        self.batch = None;
        self.config.flipping_page_index = None;
        self.config.flip_progress = 0.0;
        self.config.flip_direction = None;
        self.timeline
            .retain(|a| !matches!(a, StoreAction::NextBatchFlip));
        self.stop_continuous_flip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::ManualClock;
    use crate::config::BookConfig;

    fn store() -> (BookStore, ManualClock) {
        let clock = ManualClock::new();
        (BookStore::new(clock.clone()).with_seed(11), clock)
    }

    /// Tick in 16 ms frames for `ms`.
    fn run(store: &mut BookStore, clock: &ManualClock, ms: f64) {
        let mut elapsed = 0.0;
        while elapsed < ms {
            clock.advance(16.0);
            store.tick();
            elapsed += 16.0;
        }
    }

    #[test]
    fn test_forward_flip_commits_on_completion() {
        let (mut store, clock) = store();
        assert_eq!(store.flip_page(FlipDirection::Forward), FlipOutcome::Started);

        // Membership is unchanged while the page is in the air.
        assert_eq!(store.config().current_page, 15);
        assert_eq!(store.config().flipping_page_index, Some(15));
        assert_eq!(store.config().flip_direction, Some(FlipDirection::Forward));

        clock.advance(250.0);
        store.tick();
        assert!((store.config().flip_progress - 0.5).abs() < 1e-6);
        assert_eq!(store.config().current_page, 15);

        clock.advance(250.0);
        store.tick();
        assert_eq!(store.config().current_page, 16);
        assert_eq!(store.config().flipping_page_index, None);
        assert_eq!(store.config().flip_progress, 0.0);
        assert_eq!(store.config().flip_direction, None);
    }

    #[test]
    fn test_backward_flip_moves_last_back_page() {
        let (mut store, clock) = store();
        store.flip_page(FlipDirection::Backward);
        assert_eq!(store.config().flipping_page_index, Some(14));

        run(&mut store, &clock, 600.0);
        assert_eq!(store.config().current_page, 14);
    }

    #[test]
    fn test_rapid_reinvocation_is_rejected() {
        let (mut store, clock) = store();
        store.flip_page(FlipDirection::Forward);

        clock.advance(100.0);
        store.tick();
        let before = store.snapshot();

        assert_eq!(store.flip_page(FlipDirection::Forward), FlipOutcome::Busy);
        assert_eq!(store.flip_page(FlipDirection::Backward), FlipOutcome::Busy);
        assert_eq!(store.flip_pages(3, FlipDirection::Forward, 500.0), FlipOutcome::Busy);
        assert_eq!(store.snapshot(), before);

        run(&mut store, &clock, 500.0);
        assert_eq!(store.config().current_page, 16);
    }

    #[test]
    fn test_boundaries_are_noops() {
        let clock = ManualClock::new();
        let config = BookConfig {
            current_page: 29,
            ..BookConfig::default()
        };
        let mut store = BookStore::with_config(config, clock.clone());
        let before = store.snapshot();
        assert_eq!(store.flip_page(FlipDirection::Forward), FlipOutcome::AtBoundary);
        assert_eq!(store.snapshot(), before);

        store.set_current_page(0);
        let before = store.snapshot();
        assert_eq!(store.flip_page(FlipDirection::Backward), FlipOutcome::AtBoundary);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_flip_pages_sequential_with_pause() {
        let (mut store, clock) = store();
        assert!(store.flip_pages(3, FlipDirection::Forward, 200.0).started());

        // First flip done, then a 50 ms pause before the next starts.
        clock.advance(200.0);
        store.tick();
        assert_eq!(store.config().current_page, 16);
        assert!(!store.config().is_flipping());

        clock.advance(30.0);
        store.tick();
        assert!(!store.config().is_flipping());

        clock.advance(20.0);
        store.tick();
        assert_eq!(store.config().flipping_page_index, Some(16));

        run(&mut store, &clock, 1000.0);
        assert_eq!(store.config().current_page, 18);
        assert!(!store.is_animating());
    }

    #[test]
    fn test_flip_pages_stops_at_boundary() {
        let clock = ManualClock::new();
        let config = BookConfig {
            current_page: 27,
            ..BookConfig::default()
        };
        let mut store = BookStore::with_config(config, clock.clone());
        store.flip_pages(10, FlipDirection::Forward, 100.0);

        run(&mut store, &clock, 2000.0);
        assert_eq!(store.config().current_page, 29);
        assert!(!store.is_animating());
    }

    #[test]
    fn test_zero_batch_does_nothing() {
        let (mut store, _) = store();
        assert_eq!(store.flip_pages(0, FlipDirection::Forward, 100.0), FlipOutcome::NothingToDo);
        assert!(!store.config().is_flipping());
    }

    #[test]
    fn test_continuous_flip_toggle() {
        let (mut store, clock) = store();

        assert!(store.toggle_continuous_flip(FlipDirection::Forward));
        assert!(store.config().is_flipping());

        // One flip plus the 100 ms pause, then the next flip is in flight.
        run(&mut store, &clock, 640.0);
        assert_eq!(store.config().current_page, 16);
        assert!(store.config().is_flipping());

        assert!(!store.toggle_continuous_flip(FlipDirection::Forward));
        run(&mut store, &clock, 1000.0);
        assert_eq!(store.config().current_page, 17);
        assert!(!store.config().is_flipping());
        assert!(!store.config().is_flipping_continuously);
    }

    #[test]
    fn test_continuous_flip_switches_direction() {
        let (mut store, clock) = store();
        store.toggle_continuous_flip(FlipDirection::Forward);
        run(&mut store, &clock, 520.0);

        assert!(store.toggle_continuous_flip(FlipDirection::Backward));
        assert_eq!(store.config().continuous_direction, Some(FlipDirection::Backward));

        run(&mut store, &clock, 3000.0);
        assert!(store.config().current_page < 16);
    }

    #[test]
    fn test_continuous_flip_turns_around_mid_flight() {
        let (mut store, clock) = store();
        store.toggle_continuous_flip(FlipDirection::Forward);
        run(&mut store, &clock, 200.0);

        // The forward page is still in the air, so the first backward flip
        // waits for it to land.
        assert!(store.toggle_continuous_flip(FlipDirection::Backward));
        assert_eq!(store.config().flip_direction, Some(FlipDirection::Forward));

        run(&mut store, &clock, 450.0);
        assert_eq!(store.config().current_page, 16);
        assert_eq!(store.config().flip_direction, Some(FlipDirection::Backward));

        run(&mut store, &clock, 2000.0);
        assert!(store.config().current_page < 15);
        assert!(store.config().is_flipping_continuously);
        assert!(store.is_animating());
    }

    #[test]
    fn test_continuous_flip_resumes_after_batch() {
        let (mut store, clock) = store();
        store.flip_pages(2, FlipDirection::Forward, 200.0);
        assert!(store.toggle_continuous_flip(FlipDirection::Backward));

        run(&mut store, &clock, 600.0);
        assert_eq!(store.config().current_page, 17);

        run(&mut store, &clock, 2000.0);
        assert!(store.config().current_page < 17);
        assert!(store.config().is_flipping_continuously);
    }

    #[test]
    fn test_continuous_flip_stops_at_boundary() {
        let clock = ManualClock::new();
        let config = BookConfig {
            current_page: 27,
            ..BookConfig::default()
        };
        let mut store = BookStore::with_config(config, clock.clone());
        store.toggle_continuous_flip(FlipDirection::Forward);

        run(&mut store, &clock, 5000.0);
        assert_eq!(store.config().current_page, 29);
        assert!(!store.config().is_flipping_continuously);
        assert!(!store.is_animating());
    }

    #[test]
    fn test_events_reported() {
        let (mut store, clock) = store();
        store.flip_page(FlipDirection::Forward);
        run(&mut store, &clock, 520.0);

        let events = store.take_events();
        assert_eq!(
            events,
            vec![
                StoreEvent::FlipStarted { page: 15, direction: FlipDirection::Forward },
                StoreEvent::FlipCompleted {
                    page: 15,
                    direction: FlipDirection::Forward,
                    current_page: 16
                },
            ]
        );
        assert!(store.take_events().is_empty());
    }

    #[test]
    fn test_page_count_change_cancels_flip() {
        let (mut store, _) = store();
        store.flip_page(FlipDirection::Forward);
        store.set_page_count(20);
        assert!(!store.config().is_flipping());
        assert_eq!(store.config().current_page, 10);
    }

    #[test]
    fn test_page_count_change_ends_continuous_mode() {
        let (mut store, clock) = store();
        store.toggle_continuous_flip(FlipDirection::Forward);
        run(&mut store, &clock, 200.0);

        store.set_page_count(40);
        assert!(!store.config().is_flipping_continuously);
        assert_eq!(store.config().continuous_direction, None);

        run(&mut store, &clock, 3000.0);
        assert_eq!(store.config().current_page, 20);
        assert!(!store.is_animating());

        // Toggling again starts a fresh run instead of stopping a dead one.
        assert!(store.toggle_continuous_flip(FlipDirection::Forward));
        assert!(store.config().is_flipping());
    }

    #[test]
    fn test_current_page_jump_cancels_flip() {
        let (mut store, clock) = store();
        store.flip_page(FlipDirection::Forward);
        run(&mut store, &clock, 100.0);

        store.set_current_page(3);
        assert!(!store.config().is_flipping());
        assert_eq!(store.config().current_page, 3);

        run(&mut store, &clock, 1000.0);
        assert_eq!(store.config().current_page, 3);
    }
}
