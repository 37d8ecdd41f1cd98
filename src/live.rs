//! Wall-clock preview loop.
//!
//! Every tick advances the scene clock and recomposites. The source surface is redrawn at most
//! once per [`RASTER_INTERVAL_MS`], so the compositor may run several times over the same text
//! pixels while the deformation keeps moving.

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use crate::foundation::error::{SinusError, SinusResult};
use crate::layout::cache::TextLayoutCache;
use crate::raster::rasterizer::{RasterContent, Rasterizer};
use crate::render::frame::FrameRGBA;
use crate::scene::model::Scene;
use crate::shader::compositor::{DeformCompositor, FrameUniforms};
use crate::text::shaper::{TextShaper, shaper_for};

/// Minimum time between two source-surface redraws.
pub const RASTER_INTERVAL_MS: f64 = 16.0;

/// Clock step used when a tick carries no timestamp.
pub const FALLBACK_DELTA_SECONDS: f64 = 0.016;

/// Interactive renderer at the scene's own canvas size.
pub struct LiveRenderLoop {
    rasterizer: Rasterizer,
    compositor: DeformCompositor,
    layout: TextLayoutCache,
    shaper: Box<dyn TextShaper>,
    last_tick_ms: Option<f64>,
    last_raster_ms: Option<f64>,
    rasterized: bool,
    raster_count: u64,
}

impl LiveRenderLoop {
    /// Loop for `scene`, shaping text with the scene's font (or block glyphs without one).
    pub fn new(scene: &Scene) -> SinusResult<Self> {
        Self::with_shaper(scene, shaper_for(&scene.text)?)
    }

    pub fn with_shaper(scene: &Scene, shaper: Box<dyn TextShaper>) -> SinusResult<Self> {
        Ok(Self {
            rasterizer: Rasterizer::new(scene.canvas, 1.0)?,
            compositor: DeformCompositor::new(),
            layout: TextLayoutCache::new(),
            shaper,
            last_tick_ms: None,
            last_raster_ms: None,
            rasterized: false,
            raster_count: 0,
        })
    }

    /// Swap the text shaper, e.g. after the font changed.
    pub fn set_shaper(&mut self, shaper: Box<dyn TextShaper>) {
        self.shaper = shaper;
        self.layout.invalidate();
        self.rasterized = false;
    }

    /// Mark text content as changed so the next raster pass relayouts.
    pub fn invalidate_layout(&mut self) {
        self.layout.invalidate();
    }

    /// Advance the clock to `now_ms` and render one frame.
    ///
    /// Without a timestamp the clock advances by [`FALLBACK_DELTA_SECONDS`] and the source surface
    /// is only drawn if it never was.
    pub fn tick(&mut self, scene: &mut Scene, now_ms: Option<f64>) -> SinusResult<&FrameRGBA> {
        let delta = match (now_ms, self.last_tick_ms) {
            (Some(now), Some(last)) => (now - last) / 1000.0,
            _ => FALLBACK_DELTA_SECONDS,
        };
        if let Some(now) = now_ms {
            self.last_tick_ms = Some(now);
        }
        scene.params.time += delta;

        if scene.canvas != self.rasterizer.canvas() {
            self.rasterizer.resize(scene.canvas)?;
            self.layout.invalidate();
            self.rasterized = false;
        }

        let due = match (now_ms, self.last_raster_ms) {
            (Some(now), Some(last)) => now - last >= RASTER_INTERVAL_MS,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if due || !self.rasterized {
            self.rasterize(scene)?;
            if let Some(now) = now_ms {
                self.last_raster_ms = Some(now);
            }
        }

        let pixel = self.rasterizer.pixel_size();
        let uniforms = FrameUniforms::from_params(
            &scene.params,
            scene.params.time,
            pixel.width,
            pixel.height,
            1.0,
            scene.preserves_source_color(),
        );
        Ok(self.compositor.composite(self.rasterizer.surface(), &uniforms))
    }

    fn rasterize(&mut self, scene: &Scene) -> SinusResult<()> {
        let content = match &scene.image {
            Some(image) => RasterContent::Image(image),
            None => RasterContent::Text(self.layout.resolve(
                &scene.text,
                scene.params.line_count(),
                scene.params.effective_spacing(),
                scene.canvas,
                self.shaper.as_mut(),
            )?),
        };
        self.rasterizer
            .draw(content, scene.params.speed, scene.params.time)?;
        self.rasterized = true;
        self.raster_count += 1;
        Ok(())
    }

    /// Drive ticks from a monotonic clock at `target_fps` until `present` breaks.
    ///
    /// `present` receives the scene (so hosts may edit parameters between frames) and the frame
    /// just rendered.
    pub fn run<P>(&mut self, scene: &mut Scene, target_fps: f64, mut present: P) -> SinusResult<()>
    where
        P: FnMut(&mut Scene, &FrameRGBA) -> ControlFlow<()>,
    {
        if !target_fps.is_finite() || target_fps <= 0.0 {
            return Err(SinusError::validation("target fps must be finite and > 0"));
        }
        let interval = Duration::from_secs_f64(1.0 / target_fps);
        let clock = Instant::now();
        loop {
            let started = Instant::now();
            let now_ms = clock.elapsed().as_secs_f64() * 1000.0;
            let frame = self.tick(scene, Some(now_ms))?;
            if present(scene, frame).is_break() {
                return Ok(());
            }
            std::thread::sleep(interval.saturating_sub(started.elapsed()));
        }
    }

    /// Last rendered frame.
    pub fn frame(&self) -> &FrameRGBA {
        self.compositor.frame()
    }

    /// Number of source-surface redraws so far.
    pub fn raster_count(&self) -> u64 {
        self.raster_count
    }

    /// Number of text layout rebuilds so far.
    pub fn layout_recomputes(&self) -> u64 {
        self.layout.recompute_count()
    }
}

#[cfg(test)]
#[path = "../tests/unit/live.rs"]
mod tests;
