use crate::foundation::core::Canvas;
use crate::foundation::error::{SinusError, SinusResult};
use crate::layout::cache::{LayoutEntry, build_entry};
use crate::raster::rasterizer::{RasterContent, Rasterizer};
use crate::render::frame::FrameRGBA;
use crate::scene::model::Scene;
use crate::shader::compositor::{DeformCompositor, FrameUniforms};
use crate::text::shaper::{TextShaper, shaper_for};

/// Content prepared once per export and reused for every frame.
#[derive(Clone, Debug)]
pub enum RenderCache {
    /// Draw the scene's image.
    Image,
    /// Draw text with this precomputed layout.
    Text(LayoutEntry),
}

/// Isolated, supersampled renderer for exports.
///
/// Owns its own rasterizer and compositor output, so rendering never disturbs the live loop.
/// Pixel-valued parameters are scaled by the quality factor; the clock is passed per call and the
/// scene is only read.
pub struct FrameExporter {
    canvas: Canvas,
    quality_factor: f32,
    size: Canvas,
    surfaces: Option<Surfaces>,
}

struct Surfaces {
    rasterizer: Rasterizer,
    compositor: DeformCompositor,
}

impl FrameExporter {
    /// Exporter rendering `canvas` at `round(canvas * quality_factor)` pixels.
    pub fn new(canvas: Canvas, quality_factor: f32) -> SinusResult<Self> {
        let rasterizer = Rasterizer::new(canvas, quality_factor)?;
        let size = rasterizer.pixel_size();
        tracing::debug!(
            width = size.width,
            height = size.height,
            quality_factor,
            "export surfaces allocated"
        );
        Ok(Self {
            canvas,
            quality_factor,
            size,
            surfaces: Some(Surfaces {
                rasterizer,
                compositor: DeformCompositor::new(),
            }),
        })
    }

    /// Output width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Output height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn quality_factor(&self) -> f32 {
        self.quality_factor
    }

    /// Precompute what every frame of `scene` draws, shaping text with the scene's font.
    pub fn create_render_cache(&self, scene: &Scene) -> SinusResult<RenderCache> {
        if scene.is_image_mode() {
            return Ok(RenderCache::Image);
        }
        let mut shaper = shaper_for(&scene.text)?;
        self.create_render_cache_with(scene, shaper.as_mut())
    }

    /// [`FrameExporter::create_render_cache`] with an explicit shaper.
    pub fn create_render_cache_with(
        &self,
        scene: &Scene,
        shaper: &mut dyn TextShaper,
    ) -> SinusResult<RenderCache> {
        if scene.is_image_mode() {
            return Ok(RenderCache::Image);
        }
        let entry = build_entry(
            &scene.text,
            scene.params.line_count(),
            scene.params.effective_spacing(),
            self.canvas,
            shaper,
        )?;
        Ok(RenderCache::Text(entry))
    }

    /// Render `scene` at clock value `time`. Rows are top-down and alpha is opaque.
    pub fn render_frame(
        &mut self,
        scene: &Scene,
        time: f64,
        cache: &RenderCache,
    ) -> SinusResult<&FrameRGBA> {
        let surfaces = self
            .surfaces
            .as_mut()
            .ok_or_else(|| SinusError::init("frame exporter has been disposed"))?;

        let content = match cache {
            RenderCache::Image => RasterContent::Image(scene.image.as_ref().ok_or_else(|| {
                SinusError::validation("render cache expects an image but the scene has none")
            })?),
            RenderCache::Text(entry) => RasterContent::Text(entry),
        };
        let source = surfaces
            .rasterizer
            .draw(content, scene.params.speed, time)?;

        let uniforms = FrameUniforms::from_params(
            &scene.params,
            time,
            self.size.width,
            self.size.height,
            self.quality_factor,
            scene.preserves_source_color(),
        );
        Ok(surfaces.compositor.composite(source, &uniforms))
    }

    /// Release every surface. Later renders fail; dropping the exporter does the same.
    pub fn dispose(&mut self) {
        if self.surfaces.take().is_some() {
            tracing::debug!("export surfaces released");
        }
    }

    /// `true` after [`FrameExporter::dispose`].
    pub fn is_disposed(&self) -> bool {
        self.surfaces.is_none()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/frame.rs"]
mod tests;
