use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assets::decode::{load_image_file, load_image_source};
use crate::foundation::core::Canvas;
use crate::foundation::error::{SinusError, SinusResult};
use crate::scene::content::{ImageSource, TextContent};
use crate::scene::params::ParameterSet;

/// Everything needed to render: canvas, parameters, and the content shown on the lines.
///
/// Scenes are usually loaded from JSON, where every field is optional:
///
/// ```json
/// { "canvas": { "width": 1280, "height": 720 },
///   "params": { "num_curves": 3, "wave_type": "square", "text_color": "#ff8800" },
///   "text": { "entries": ["HELLO", "WORLD"], "font_file": "fonts/Inter-Bold.ttf" },
///   "image": "photo.png" }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scene {
    /// Logical canvas size; exports scale it by their quality factor.
    pub canvas: Canvas,
    /// Render parameters.
    pub params: ParameterSet,
    /// Text shown when no image is loaded.
    pub text: TextContent,
    /// Image file to load; relative paths resolve against the scene file.
    #[serde(rename = "image", skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
    /// Decoded image; when present it replaces the text.
    #[serde(skip)]
    pub image: Option<ImageSource>,
}

impl Scene {
    /// Parse a scene from a JSON string. Image paths are not loaded.
    pub fn from_json_str(json: &str) -> SinusResult<Self> {
        let scene: Scene = serde_json::from_str(json)
            .map_err(|e| SinusError::serde(format!("parse scene JSON: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Parse a scene from a JSON reader. Image paths are not loaded.
    pub fn from_reader<R: std::io::Read>(r: R) -> SinusResult<Self> {
        let scene: Scene = serde_json::from_reader(r)
            .map_err(|e| SinusError::serde(format!("parse scene JSON: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Load a scene file, resolving relative font and image paths against its directory and
    /// decoding the referenced image. An image that fails to decode is logged and the scene
    /// stays in text mode.
    pub fn from_path(path: impl AsRef<Path>) -> SinusResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SinusError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        let mut scene = Self::from_reader(BufReader::new(f))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        if let Some(font) = scene.text.font_file.as_mut()
            && font.is_relative()
        {
            *font = base.join(&*font);
        }
        if let Some(image) = scene.image_path.take() {
            let resolved = if image.is_relative() {
                base.join(image)
            } else {
                image
            };
            if let Err(e) = scene.load_image(&resolved) {
                tracing::warn!(path = %resolved.display(), error = %e, "image not loaded");
            }
        }
        Ok(scene)
    }

    /// Pretty JSON form of the scene.
    pub fn to_json_pretty(&self) -> SinusResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SinusError::serde(format!("serialize scene JSON: {e}")))
    }

    pub fn validate(&self) -> SinusResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(SinusError::validation("canvas width/height must be >= 1"));
        }
        self.params.validate()?;
        self.text.validate()
    }

    /// Switch to image mode with the decoded file. On failure the scene is left unchanged.
    pub fn load_image(&mut self, path: &Path) -> SinusResult<()> {
        let image = load_image_file(path)?;
        tracing::debug!(
            path = %path.display(),
            width = image.width,
            height = image.height,
            "image loaded"
        );
        self.image_path = Some(path.to_path_buf());
        self.image = Some(image);
        Ok(())
    }

    /// Switch to image mode with encoded image bytes. On failure the scene is left unchanged.
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> SinusResult<()> {
        let image = load_image_source(bytes)?;
        self.image_path = None;
        self.image = Some(image);
        Ok(())
    }

    /// Return to text mode.
    pub fn clear_image(&mut self) {
        self.image = None;
        self.image_path = None;
    }

    /// `true` when an image replaces the text.
    pub fn is_image_mode(&self) -> bool {
        self.image.is_some()
    }

    /// Whether source colors pass through untinted. Only honoured in image mode.
    pub fn preserves_source_color(&self) -> bool {
        self.params.preserve_image_color && self.is_image_mode()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
