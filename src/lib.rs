//! # Babel Book
//!
//! State, page-flip animation and geometry for a decorative 3D book widget.
//!
//! ## Overview
//!
//! A [`BookStore`] holds the single [`BookConfig`] record and advances every
//! animation from a [`Clock`]. A [`BookWidget`] layers the host-facing
//! behaviour on top: page sweeps, hover and glitch motion, the particle
//! field, events and resource bookkeeping. At any moment the posed book can
//! be turned into a [`BookScene`] and exported as GLB or OBJ.
//!
//! ## Quick Start
//!
//! ```ignore
//! use babel_book::{BookOptions, BookWidget, FlipDirection, ManualClock, export_glb};
//!
//! let clock = ManualClock::new();
//! let mut widget = BookWidget::new(BookOptions::default().with_seed(7), clock.clone());
//!
//! widget.open_book(1000.0);
//! widget.flip_page(FlipDirection::Forward);
//! for _ in 0..120 {
//!     clock.advance(16.0);
//!     widget.tick();
//! }
//!
//! let glb_bytes = export_glb(&widget.scene())?;
//! ```
//!
//! ## Layout Only
//!
//! The geometry helpers work without a store:
//!
//! ```ignore
//! use babel_book::layout::{distribute, page_pose};
//!
//! let slots = distribute(15, 30);
//! let pose = page_pose(&config, 3);
//! ```

pub mod error;
pub mod constants;
pub mod types;
pub mod config;
pub mod anim;
pub mod layout;
pub mod particles;
pub mod store;
pub mod widget;
pub mod scene;
pub mod export;

// Re-export main types for convenience
pub use error::{BookError, Result};
pub use types::{Dimensions, DimensionsPatch, Emotion, FlipDirection, MaterialPreset, Rgb};
pub use config::{BookConfig, BookOptions};
pub use anim::{Clock, Easing, ManualClock};
#[cfg(not(target_arch = "wasm32"))]
pub use anim::SystemClock;
pub use store::{BookStore, FlipOutcome, StoreEvent, TweenTarget};
pub use particles::{ParticleField, PoissonDiskSampler};
pub use widget::{BookEvent, BookWidget, DisposeReport, EventSink, WidgetState};
pub use scene::{BookScene, Mesh, Vertex};
pub use export::gltf::export_glb;
pub use export::obj::{export_obj, ObjExport};

#[cfg(feature = "wasm")]
pub mod wasm;
