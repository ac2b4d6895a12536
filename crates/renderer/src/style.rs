//! Icon style: canvas size, slot colors and label colors.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while loading an icon style.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Failed to read style file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid style document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid style: {0}")]
    Invalid(String),
}

/// An RGBA color, written as `#rgb`, `#rrggbb` or `#rrggbbaa` in style files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a CSS-style hex color.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match hex.len() {
            3 => {
                // #abc is #aabbcc
                let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Self::opaque(digits.next()??, digits.next()??, digits.next()??))
            }
            6 => Some(Self::opaque(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
                a: channel(&hex[6..8])?,
            }),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba::from_hex(&value).ok_or_else(|| format!("invalid color '{}'", value))
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

/// How station icons are drawn.
///
/// Every field has a default, so a style file only needs the fields it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconStyle {
    /// Width and height of the square canvas, in pixels.
    pub size: u32,
    /// Doughnut hole radius as a fraction of the outer radius.
    pub hole_ratio: f32,
    pub mechanical: Rgba,
    pub ebike: Rgba,
    pub dock: Rgba,
    pub unavailable: Rgba,
    pub hole: Rgba,
    /// Stroke and bar color of the unavailable glyph.
    pub outline: Rgba,
    /// Label color on light backgrounds (the doughnut hole).
    pub label_dark: Rgba,
    /// Label color on colored backgrounds.
    pub label_light: Rgba,
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            size: 25,
            hole_ratio: 0.7,
            mechanical: Rgba::opaque(0x80, 0xc6, 0x64),
            ebike: Rgba::opaque(0x16, 0xa2, 0xa8),
            dock: Rgba::opaque(0xd4, 0x68, 0xc9),
            unavailable: Rgba::opaque(0xfc, 0x62, 0x62),
            hole: Rgba::WHITE,
            outline: Rgba::WHITE,
            label_dark: Rgba::BLACK,
            label_light: Rgba::WHITE,
        }
    }
}

impl IconStyle {
    /// Parse a YAML style document.
    pub fn from_yaml(text: &str) -> Result<Self, StyleError> {
        let style: IconStyle = serde_yaml::from_str(text)?;
        style.validate()?;
        Ok(style)
    }

    pub fn from_file(path: &str) -> Result<Self, StyleError> {
        let text = std::fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        if !(8..=256).contains(&self.size) {
            return Err(StyleError::Invalid(format!(
                "size must be between 8 and 256, got {}",
                self.size
            )));
        }
        if !(0.0..1.0).contains(&self.hole_ratio) {
            return Err(StyleError::Invalid(format!(
                "hole_ratio must be in [0, 1), got {}",
                self.hole_ratio
            )));
        }
        Ok(())
    }

    /// Slice colors in slot order: mechanical, ebike, docks.
    pub fn slot_colors(&self) -> [Rgba; 3] {
        [self.mechanical, self.ebike, self.dock]
    }
}
