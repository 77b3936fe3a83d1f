use std::fmt;

use crate::{ChoreographyError, Result};

/// Trail colors offered to the user.
pub const COLORS: [&str; 10] = [
    "#ff6b6b", "#4ecdc4", "#45b7d1", "#96ceb4", "#feca57", "#ff9ff3", "#54a0ff", "#5f27cd",
    "#00d2d3", "#ff9f43",
];

/// Straight-alpha color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    /// Parses any CSS color string (`#rrggbb`, `rgb(..)`, named colors, ...).
    pub fn parse(input: &str) -> Result<Self> {
        let color = csscolorparser::parse(input).map_err(|source| ChoreographyError::Color {
            input: input.to_string(),
            source,
        })?;
        Ok(Self::from_rgba8(color.to_rgba8()))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Equivalent of appending a two-digit hex alpha to a `#rrggbb` string.
    pub fn with_alpha_byte(self, alpha: u8) -> Self {
        self.with_alpha(f32::from(alpha) / 255.0)
    }

    /// Scales the existing alpha by `factor`.
    pub fn fade(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor.clamp(0.0, 1.0))
    }
}

/// A user-facing trail color: the string it was chosen as plus its parsed
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailColor {
    pub css: String,
    pub rgba: Rgba,
}

impl TrailColor {
    pub fn parse(css: &str) -> Result<Self> {
        Ok(Self {
            css: css.to_string(),
            rgba: Rgba::parse(css)?,
        })
    }
}

impl Default for TrailColor {
    fn default() -> Self {
        Self {
            css: COLORS[0].to_string(),
            rgba: Rgba::from_rgba8([0xff, 0x6b, 0x6b, 0xff]),
        }
    }
}

impl fmt::Display for TrailColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css)
    }
}
