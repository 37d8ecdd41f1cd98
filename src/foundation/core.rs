use crate::foundation::error::{SinusError, SinusResult};

/// Absolute 0-based frame index within one export job.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Canvas dimensions in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> SinusResult<Self> {
        if width == 0 || height == 0 {
            return Err(SinusError::validation("canvas width/height must be >= 1"));
        }
        Ok(Self { width, height })
    }

    /// Canvas resized by `factor`, rounded per axis and never smaller than 1x1.
    pub fn scaled(self, factor: f32) -> Self {
        let scale = |v: u32| -> u32 { ((v as f32) * factor).round().max(1.0) as u32 };
        Self {
            width: scale(self.width),
            height: scale(self.height),
        }
    }

    /// Pixel count.
    pub fn area(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
        }
    }
}

/// Linear RGB triple with channels in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RgbRepr", into = "RgbRepr")]
pub struct Rgb {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Rgb {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Build a color from float channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB` (any case, surrounding whitespace ignored).
    pub fn from_hex(value: &str) -> SinusResult<Self> {
        let norm = normalize_hex(value)
            .ok_or_else(|| SinusError::validation(format!("invalid hex color '{value}'")))?;
        let channel = |i: usize| -> SinusResult<f32> {
            u8::from_str_radix(&norm[1 + i * 2..3 + i * 2], 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|e| SinusError::validation(format!("invalid hex color '{value}': {e}")))
        };
        Ok(Self::new(channel(0)?, channel(1)?, channel(2)?))
    }

    /// Uppercase `#RRGGBB` form, channels rounded and clamped to a byte.
    pub fn to_hex(self) -> String {
        let b = self.to_rgb8();
        format!("#{:02X}{:02X}{:02X}", b[0], b[1], b[2])
    }

    /// Channels quantised to bytes.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |v: f32| -> u8 { (v * 255.0).round().clamp(0.0, 255.0) as u8 };
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Channels as an array.
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Canonical `#RRGGBB` form of a user-typed hex color, or `None` if it is not one.
pub fn normalize_hex(value: &str) -> Option<String> {
    let v = value.trim();
    let digits = v.strip_prefix('#').unwrap_or(v);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", digits.to_ascii_uppercase()))
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum RgbRepr {
    Hex(String),
    Array([f32; 3]),
}

impl TryFrom<RgbRepr> for Rgb {
    type Error = SinusError;

    fn try_from(value: RgbRepr) -> Result<Self, Self::Error> {
        match value {
            RgbRepr::Hex(s) => Self::from_hex(&s),
            RgbRepr::Array([r, g, b]) => {
                if [r, g, b].iter().any(|c| !c.is_finite()) {
                    return Err(SinusError::validation("color channels must be finite"));
                }
                Ok(Self::new(r, g, b))
            }
        }
    }
}

impl From<Rgb> for RgbRepr {
    fn from(value: Rgb) -> Self {
        Self::Hex(value.to_hex())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
