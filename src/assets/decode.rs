use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{SinusError, SinusResult};
use crate::scene::content::ImageSource;

/// Decode an encoded bitmap (PNG, JPEG, GIF, ...) into a straight-alpha [`ImageSource`].
pub fn load_image_source(bytes: &[u8]) -> SinusResult<ImageSource> {
    let dyn_img = image::load_from_memory(bytes).map_err(|e| {
        tracing::warn!(error = %e, len = bytes.len(), "image decode failed");
        SinusError::decode(format!("decode image from memory: {e}"))
    })?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    ImageSource::new(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn load_image_file(path: &Path) -> SinusResult<ImageSource> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    load_image_source(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
