use std::io::Cursor;

use crate::foundation::error::{SinusError, SinusResult};

/// A rendered frame as opaque RGBA8 pixels, rows top-down.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Zero-filled frame.
    pub fn new(width: u32, height: u32) -> Self {
        let mut f = Self::default();
        f.resize(width, height);
        f
    }

    /// Resize in place, keeping the allocation when the byte length already matches.
    pub fn resize(&mut self, width: u32, height: u32) {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        self.width = width;
        self.height = height;
        self.data.resize(len, 0);
    }

    /// Pixel at `(x, y)`, `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> SinusResult<Vec<u8>> {
        let mut out = Vec::new();
        image::write_buffer_with_format(
            &mut Cursor::new(&mut out),
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| SinusError::export(format!("encode png: {e}")))?;
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
