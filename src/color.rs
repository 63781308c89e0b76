// filepath: src/color.rs
//! RGBA colors and hex parsing

use thiserror::Error;

/// Straight (non-premultiplied) 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("expected 6 or 8 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Default highlight, `#1397C5`
    pub const HIGHLIGHT: Color = Color::rgb(0x13, 0x97, 0xC5);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with an optional leading `#`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(bad));
        }
        if digits.len() != 6 && digits.len() != 8 {
            return Err(ColorParseError::InvalidLength(digits.len()));
        }

        // All characters are ASCII hex digits here, so byte slicing is safe.
        let channel = |i: usize| -> Result<u8, ColorParseError> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorParseError::InvalidDigit(digits.as_bytes()[i] as char))
        };

        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Same color with alpha scaled by `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Bytes of a premultiplied `wl_shm` ARGB8888 pixel (little endian B, G, R, A).
    pub fn to_argb8888(self) -> [u8; 4] {
        let premul = |c: u8| ((c as u16 * self.a as u16 + 127) / 255) as u8;
        [premul(self.b), premul(self.g), premul(self.r), self.a]
    }

    /// Source-over blend of `self` onto a premultiplied ARGB8888 pixel.
    /// `coverage` scales the source alpha, used for anti-aliased glyphs.
    pub fn blend_onto(self, dst: &mut [u8], coverage: f32) {
        let src = self.with_opacity(coverage).to_argb8888();
        let inv = 255 - src[3] as u16;
        for i in 0..4 {
            dst[i] = (src[i] as u16 + (dst[i] as u16 * inv + 127) / 255) as u8;
        }
    }
}

impl std::str::FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}
