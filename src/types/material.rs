//! Cover material presets.

use super::Rgb;
use crate::error::{BookError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Named cover looks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialPreset {
    /// Dark, matte, organic.
    #[default]
    Leather,
    /// Reflective, cold, hard.
    Metal,
    /// Transparent.
    Glass,
}

/// Explicit surface parameters for a preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialParams {
    pub color: Rgb,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    /// Glow the pages settle to after a morph.
    pub glow: f32,
    /// Particle intensity a morph drives toward, if any.
    pub particle_intensity: Option<f32>,
}

impl MaterialParams {
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

impl MaterialPreset {
    pub const ALL: [MaterialPreset; 3] = [
        MaterialPreset::Leather,
        MaterialPreset::Metal,
        MaterialPreset::Glass,
    ];

    pub fn params(&self) -> MaterialParams {
        match self {
            MaterialPreset::Leather => MaterialParams {
                color: Rgb::from_u32(0x2b1e16),
                roughness: 0.8,
                metalness: 0.1,
                opacity: 1.0,
                glow: 0.1,
                particle_intensity: None,
            },
            MaterialPreset::Metal => MaterialParams {
                color: Rgb::from_u32(0x556b7d),
                roughness: 0.3,
                metalness: 0.9,
                opacity: 1.0,
                glow: 0.8,
                particle_intensity: Some(0.9),
            },
            MaterialPreset::Glass => MaterialParams {
                color: Rgb::from_u32(0xd0e8f2),
                roughness: 0.0,
                metalness: 0.0,
                opacity: 0.3,
                glow: 1.8,
                particle_intensity: Some(1.0),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialPreset::Leather => "leather",
            MaterialPreset::Metal => "metal",
            MaterialPreset::Glass => "glass",
        }
    }

    /// Best-effort match of a cover colour back to a preset.
    pub fn from_color(color: Rgb) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.params().color == color)
    }
}

impl FromStr for MaterialPreset {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "leather" => Ok(MaterialPreset::Leather),
            "metal" => Ok(MaterialPreset::Metal),
            "glass" => Ok(MaterialPreset::Glass),
            _ => Err(BookError::UnknownMaterial(s.to_string())),
        }
    }
}
