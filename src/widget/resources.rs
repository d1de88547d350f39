//! Bookkeeping for host-side allocations and the viewport they render into.

use crate::constants::{FALLBACK_HEIGHT, FALLBACK_WIDTH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Geometry,
    Material,
    Texture,
}

/// Counts of what a dispose released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisposeReport {
    pub geometries: usize,
    pub materials: usize,
    pub textures: usize,
    pub listeners: usize,
}

impl DisposeReport {
    pub fn total(&self) -> usize {
        self.geometries + self.materials + self.textures + self.listeners
    }
}

/// Named resources the host must free when the widget goes away.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    live: BTreeMap<(ResourceKind, String), u32>,
    resize_listener: bool,
    next_handle: u32,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a resource and return its handle. Registering the same name
    /// twice keeps the first handle.
    pub fn register(&mut self, kind: ResourceKind, name: impl Into<String>) -> u32 {
        let next = self.next_handle;
        let handle = *self.live.entry((kind, name.into())).or_insert(next);
        if handle == next {
            self.next_handle += 1;
        }
        handle
    }

    pub fn contains(&self, kind: ResourceKind, name: &str) -> bool {
        self.live.contains_key(&(kind, name.to_string()))
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.live.keys().filter(|(k, _)| *k == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && !self.resize_listener
    }

    pub fn attach_resize_listener(&mut self) {
        self.resize_listener = true;
    }

    pub fn has_resize_listener(&self) -> bool {
        self.resize_listener
    }

    /// Free everything and detach the resize listener.
    pub fn release_all(&mut self) -> DisposeReport {
        let report = DisposeReport {
            geometries: self.count(ResourceKind::Geometry),
            materials: self.count(ResourceKind::Material),
            textures: self.count(ResourceKind::Texture),
            listeners: usize::from(self.resize_listener),
        };
        for (kind, name) in self.live.keys() {
            debug!("Release {:?} {}", kind, name);
        }
        self.live.clear();
        self.resize_listener = false;
        report
    }
}

/// Render surface size and aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub aspect: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(FALLBACK_WIDTH, FALLBACK_HEIGHT)
    }
}

impl Viewport {
    /// A zero width or height falls back to the window size.
    pub fn new(width: u32, height: u32) -> Self {
        let width = if width == 0 { FALLBACK_WIDTH } else { width };
        let height = if height == 0 { FALLBACK_HEIGHT } else { height };
        Self {
            width,
            height,
            aspect: width as f32 / height as f32,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }
}
