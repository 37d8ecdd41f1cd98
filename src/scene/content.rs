use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{SinusError, SinusResult};

/// Maximum number of text entries.
pub const MAX_TEXT_VARIANTS: usize = 10;

/// Entry shown when no text has been configured.
pub const DEFAULT_ENTRY: &str = "SINUS";

/// Text entries cycled across lines, sharing one font.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextContent {
    /// Display order; line `i` shows entry `i % len`.
    pub entries: Vec<String>,
    /// Font size in logical pixels.
    pub font_size: f32,
    /// Font family name.
    pub font_family: String,
    /// Font file to shape with. Without one, text renders as solid glyph blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_file: Option<PathBuf>,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            entries: vec![DEFAULT_ENTRY.to_owned()],
            font_size: 96.0,
            font_family: "Arial".to_owned(),
            font_file: None,
        }
    }
}

impl TextContent {
    /// Entries as rasterized: an empty list shows the default entry and whitespace-only entries
    /// become a single space.
    pub fn sanitized_entries(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return vec![DEFAULT_ENTRY.to_owned()];
        }
        self.entries
            .iter()
            .map(|e| {
                if e.trim().is_empty() {
                    " ".to_owned()
                } else {
                    e.clone()
                }
            })
            .collect()
    }

    /// Replace the text of entry `index`.
    pub fn set_entry(&mut self, index: usize, text: impl Into<String>) -> SinusResult<()> {
        let slot = self
            .entries
            .get_mut(index)
            .ok_or_else(|| SinusError::validation(format!("no text entry at index {index}")))?;
        *slot = text.into();
        Ok(())
    }

    /// Append an empty entry and return its index.
    pub fn push_entry(&mut self) -> SinusResult<usize> {
        if self.entries.len() >= MAX_TEXT_VARIANTS {
            return Err(SinusError::validation(format!(
                "at most {MAX_TEXT_VARIANTS} text entries are supported"
            )));
        }
        self.entries.push(String::new());
        Ok(self.entries.len() - 1)
    }

    /// Remove entry `index`. The last remaining entry is cleared instead of removed.
    pub fn remove_entry(&mut self, index: usize) -> SinusResult<()> {
        if index >= self.entries.len() {
            return Err(SinusError::validation(format!(
                "no text entry at index {index}"
            )));
        }
        if self.entries.len() == 1 {
            self.entries[0].clear();
        } else {
            self.entries.remove(index);
        }
        Ok(())
    }

    pub fn validate(&self) -> SinusResult<()> {
        if self.entries.len() > MAX_TEXT_VARIANTS {
            return Err(SinusError::validation(format!(
                "at most {MAX_TEXT_VARIANTS} text entries are supported"
            )));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(SinusError::validation("font_size must be finite and > 0"));
        }
        Ok(())
    }
}

/// Decoded bitmap shown instead of text.
///
/// Pixels are straight-alpha RGBA8, row-major. The buffer is shared and never mutated; loading a
/// new image replaces the whole value.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageSource {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Straight-alpha RGBA8 pixels.
    pub rgba8: Arc<Vec<u8>>,
}

impl ImageSource {
    pub fn new(width: u32, height: u32, rgba8: Vec<u8>) -> SinusResult<Self> {
        if width == 0 || height == 0 {
            return Err(SinusError::decode("image has zero width or height"));
        }
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if rgba8.len() != expected {
            return Err(SinusError::decode(format!(
                "image byte length {} does not match {width}x{height} RGBA8",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        })
    }
}
