// SPDX-License-Identifier: MPL-2.0
//! Point and color value types for annotations.

use std::fmt;
use std::str::FromStr;

/// A position in image pixel coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Non-premultiplied RGBA stroke color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl StrokeColor {
    pub const RED: Self = Self::rgb(0xFF, 0x3B, 0x30);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for StrokeColor {
    fn default() -> Self {
        Self::RED
    }
}

/// Error returned when a color string is not `#rgb`, `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color: {:?}", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for StrokeColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&hex[i..=i], 16)
                        .map(|n| n * 0x11)
                        .map_err(|_| err())
                };
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for StrokeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0xFF {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_hex() {
        assert_eq!("#ff0000".parse(), Ok(StrokeColor::rgb(255, 0, 0)));
        assert_eq!("#00FF0080".parse(), Ok(StrokeColor::rgba(0, 255, 0, 0x80)));
    }

    #[test]
    fn parses_short_hex() {
        assert_eq!("#f0a".parse(), Ok(StrokeColor::rgb(0xFF, 0x00, 0xAA)));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!("ff0000".parse::<StrokeColor>().is_err());
        assert!("#ff00".parse::<StrokeColor>().is_err());
        assert!("#gg0000".parse::<StrokeColor>().is_err());
        assert!("#ффф".parse::<StrokeColor>().is_err());
    }

    #[test]
    fn display_uses_short_form_for_opaque_colors() {
        assert_eq!(StrokeColor::rgb(1, 2, 3).to_string(), "#010203");
        assert_eq!(StrokeColor::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }
}
