use crate::encode::gif::{GifSink, GifSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::export::artifact::{Artifact, ExportPhase, percent};
use crate::export::frame::FrameExporter;
use crate::export::limits::{
    AnimationRequest, ExportLimits, GIF_MAX_FPS, GIF_QUALITY_FACTOR, yield_interval,
};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SinusError, SinusResult};
use crate::scene::model::Scene;

/// Looping GIF of the animation, starting at the scene's clock.
///
/// Frames are rendered at the requested rate; playback is capped at 100 fps, the finest delay
/// GIF viewers honour.
#[derive(Clone, Copy, Debug)]
pub struct GifExporter {
    pub request: AnimationRequest,
    pub quality_factor: f32,
}

impl GifExporter {
    pub fn new(request: AnimationRequest) -> Self {
        Self {
            request,
            quality_factor: GIF_QUALITY_FACTOR,
        }
    }

    #[tracing::instrument(
        skip(self, scene, on_progress),
        fields(frames = self.request.total_frames, fps = self.request.fps)
    )]
    pub fn export(
        &self,
        scene: &Scene,
        mut on_progress: impl FnMut(ExportPhase),
    ) -> SinusResult<Artifact> {
        let request = self.request;
        request.validate(ExportLimits::GIF)?;
        scene.validate()?;

        let mut exporter = FrameExporter::new(scene.canvas, self.quality_factor)?;
        let cache = exporter.create_render_cache(scene)?;
        let playback_fps = request.fps.min(GIF_MAX_FPS);
        tracing::info!(
            width = exporter.width(),
            height = exporter.height(),
            playback_fps,
            "gif export started"
        );

        let mut sink = GifSink::new(GifSinkOpts::for_quality_factor(self.quality_factor));
        sink.begin(SinkConfig {
            width: exporter.width(),
            height: exporter.height(),
            fps: playback_fps,
        })?;

        let every = yield_interval(request.fps);
        for i in 0..request.total_frames {
            let t = request.frame_time(scene.params.time, i);
            let frame = exporter.render_frame(scene, t, &cache)?;
            sink.push_frame(FrameIndex(i), frame)?;
            on_progress(ExportPhase::Preparing {
                frame: i + 1,
                total: request.total_frames,
                fps: playback_fps,
            });
            if (i + 1) % every == 0 {
                std::thread::yield_now();
            }
        }
        exporter.dispose();

        sink.finish(|p| on_progress(ExportPhase::Encoding { percent: percent(p) }))?;
        on_progress(ExportPhase::Finalizing);
        let bytes = sink
            .take_output()
            .ok_or_else(|| SinusError::export("gif encoder produced no output"))?;
        tracing::info!(bytes = bytes.len(), "gif export finished");
        Ok(Artifact::new("gif", "image/gif", bytes))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/gif.rs"]
mod tests;
