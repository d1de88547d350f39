//! Flip directions and emotion names.

use crate::error::{BookError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which way a page turns.
///
/// Forward moves pages from the front stack onto the back stack, so
/// `current_page` grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipDirection {
    Forward,
    Backward,
}

impl FlipDirection {
    /// The opposite direction.
    pub fn opposite(&self) -> FlipDirection {
        match self {
            FlipDirection::Forward => FlipDirection::Backward,
            FlipDirection::Backward => FlipDirection::Forward,
        }
    }

    /// Page index delta applied when a flip in this direction completes.
    pub fn step(&self) -> isize {
        match self {
            FlipDirection::Forward => 1,
            FlipDirection::Backward => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlipDirection::Forward => "forward",
            FlipDirection::Backward => "backward",
        }
    }
}

impl fmt::Display for FlipDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlipDirection {
    type Err = BookError;

    /// Accepts the long names and the one-letter forms `f` / `b`.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "forward" | "f" => Ok(FlipDirection::Forward),
            "backward" | "b" => Ok(FlipDirection::Backward),
            _ => Err(BookError::UnknownDirection(s.to_string())),
        }
    }
}

/// Cognitive-state effects the store can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Bright slow glow pulses, more particles.
    Focus,
    /// Dim slow glow pulses, fewer particles.
    Drift,
    /// Tremor of the whole book plus a glow flash.
    Paradox,
}

impl FromStr for Emotion {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "focus" => Ok(Emotion::Focus),
            "drift" => Ok(Emotion::Drift),
            "paradox" => Ok(Emotion::Paradox),
            _ => Err(BookError::UnknownEmotion(s.to_string())),
        }
    }
}
