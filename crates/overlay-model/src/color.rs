//! Hex color values as entered by color pickers.

use std::fmt;
use std::str::FromStr;

use clipdeck_common::error::ClipdeckError;
use serde::{Deserialize, Serialize};

/// A validated hex color (`#rgb`, `#rrggbb`, or `#rrggbbaa`).
///
/// The original string is preserved so it round-trips exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    raw: String,
    rgba: [u8; 4],
}

impl HexColor {
    /// Opaque black, the default fill of new overlays.
    pub fn black() -> Self {
        Self {
            raw: "#000".to_string(),
            rgba: [0, 0, 0, 255],
        }
    }

    /// The color as entered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// RGBA channels.
    pub fn rgba(&self) -> [u8; 4] {
        self.rgba
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::black()
    }
}

impl FromStr for HexColor {
    type Err = ClipdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClipdeckError::invalid_parameter(format!("Invalid hex color: {s:?}"));
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);

        let rgba = match digits.len() {
            3 => [
                nibble(0).map_err(|_| invalid())?,
                nibble(1).map_err(|_| invalid())?,
                nibble(2).map_err(|_| invalid())?,
                255,
            ],
            6 | 8 => [
                byte(0).map_err(|_| invalid())?,
                byte(2).map_err(|_| invalid())?,
                byte(4).map_err(|_| invalid())?,
                if digits.len() == 8 {
                    byte(6).map_err(|_| invalid())?
                } else {
                    255
                },
            ],
            _ => return Err(invalid()),
        };

        Ok(Self {
            raw: s.trim().to_string(),
            rgba,
        })
    }
}

impl TryFrom<String> for HexColor {
    type Error = ClipdeckError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.raw
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
