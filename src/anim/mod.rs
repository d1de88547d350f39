//! Time-based animation primitives.
//!
//! Nothing here runs on its own: hosts sample a [`Clock`] once per frame and
//! push the time through [`TweenSet::advance`] and [`Timeline::drain_due`].

pub mod clock;
pub mod easing;
pub mod timeline;
pub mod tween;

pub use clock::{Clock, ManualClock};
#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use easing::Easing;
pub use timeline::Timeline;
pub use tween::{Tween, TweenSample, TweenSet};
