use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ChoreographyError, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    pub replay: ReplayConfig,
    pub glow: GlowConfig,
}

impl AppConfig {
    /// Loads a JSON configuration file. Missing fields fall back to defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would stall the replay clock or size the surface
    /// nonsensically.
    pub fn validate(&self) -> Result<()> {
        if let ReplayStepping::FixedStep { step_ms } = self.replay.stepping {
            if !(step_ms.is_finite() && step_ms > 0.0) {
                return Err(ChoreographyError::Config(format!(
                    "replay.stepping.step_ms must be a positive number, got {step_ms}"
                )));
            }
        }
        let min_duration = self.replay.min_duration_ms;
        if !(min_duration.is_finite() && min_duration >= 0.0) {
            return Err(ChoreographyError::Config(format!(
                "replay.min_duration_ms must be a non-negative number, got {min_duration}"
            )));
        }
        let ratio = self.canvas.layout.pixel_ratio;
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(ChoreographyError::Config(format!(
                "canvas.layout.pixel_ratio must be a positive number, got {ratio}"
            )));
        }
        Ok(())
    }
}

/// Placement and density of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasLayout {
    /// On-screen offset of the surface, subtracted from pointer coordinates.
    pub left: f32,
    pub top: f32,
    /// Logical (CSS pixel) size.
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 960.0,
            height: 540.0,
            pixel_ratio: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub layout: CanvasLayout,
    pub background: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            layout: CanvasLayout::default(),
            background: "#0f172a".to_string(),
        }
    }
}

/// How the replay clock advances between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReplayStepping {
    /// Advance by a constant amount per frame regardless of real time.
    FixedStep { step_ms: f64 },
    /// Advance by the measured time between frame callbacks.
    WallClock,
}

impl Default for ReplayStepping {
    fn default() -> Self {
        Self::FixedStep { step_ms: 16.0 }
    }
}

impl ReplayStepping {
    /// Amount to advance the replay clock for a frame at `now_ms` whose
    /// predecessor ran at `previous_ms`.
    pub fn delta(&self, previous_ms: f64, now_ms: f64) -> f64 {
        match *self {
            Self::FixedStep { step_ms } => step_ms,
            Self::WallClock => (now_ms - previous_ms).max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub min_duration_ms: f64,
    pub stepping: ReplayStepping,
    /// Opacity of the background wash painted before each replay frame.
    pub fade_alpha: f32,
    /// Opacity of the background fill painted before each idle frame.
    pub idle_clear_alpha: f32,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: crate::timeline::MIN_DURATION_MS,
            stepping: ReplayStepping::default(),
            fade_alpha: 0.1,
            idle_clear_alpha: 1.0,
        }
    }
}

/// Stroke widths of the three glow layers, in logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowConfig {
    pub outer_width: f32,
    pub inner_width: f32,
    pub core_width: f32,
    pub outer_alpha_byte: u8,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            outer_width: 8.0,
            inner_width: 3.0,
            core_width: 1.0,
            outer_alpha_byte: 0x40,
        }
    }
}
