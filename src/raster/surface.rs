use crate::foundation::error::{SinusError, SinusResult};
use crate::foundation::math::Vec3;

/// Undeformed text or image pixels, sampled by the compositor.
///
/// Pixels are straight-alpha RGBA8, rows top-down. Lookups are nearest-texel with edge clamping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl SourceSurface {
    /// Fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    /// Surface over existing straight-alpha pixels.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> SinusResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if data.len() != expected {
            return Err(SinusError::validation(format!(
                "surface byte length {} does not match {width}x{height} RGBA8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw straight-alpha bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Replace the contents with un-premultiplied copies of `premul` pixels.
    pub(crate) fn load_premultiplied(&mut self, width: u32, height: u32, premul: &[u8]) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.reserve(premul.len());
        for px in premul.chunks_exact(4) {
            let a = px[3];
            match a {
                0 => self.data.extend_from_slice(&[0, 0, 0, 0]),
                255 => self.data.extend_from_slice(px),
                _ => {
                    let un = |c: u8| -> u8 {
                        ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8
                    };
                    self.data.extend_from_slice(&[un(px[0]), un(px[1]), un(px[2]), a]);
                }
            }
        }
    }

    /// Texel at integer coordinates, clamped to the edges.
    pub fn texel(&self, x: i64, y: i64) -> [u8; 4] {
        if self.width == 0 || self.height == 0 {
            return [0; 4];
        }
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// RGB of the texel covering normalised coordinate `st` (`t = 0` is the top row).
    pub fn sample(&self, st: [f32; 2]) -> Vec3 {
        let x = (st[0] * self.width as f32).floor() as i64;
        let y = (st[1] * self.height as f32).floor() as i64;
        let t = self.texel(x, y);
        [
            f32::from(t[0]) / 255.0,
            f32::from(t[1]) / 255.0,
            f32::from(t[2]) / 255.0,
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/surface.rs"]
mod tests;
