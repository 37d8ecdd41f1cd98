use crate::encode::ffmpeg::{VideoSink, VideoSinkOpts, negotiate_codec, video_bitrate};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::encode::toolchain::EncoderToolchain;
use crate::export::artifact::{Artifact, ExportPhase};
use crate::export::frame::FrameExporter;
use crate::export::limits::{AnimationRequest, ExportLimits, VIDEO_QUALITY_FACTOR, yield_interval};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SinusError, SinusResult};
use crate::scene::model::Scene;

/// MP4 or WebM clip of the animation, encoded by the system `ffmpeg`.
#[derive(Clone, Copy, Debug)]
pub struct VideoExporter<'a> {
    pub request: AnimationRequest,
    pub quality_factor: f32,
    pub toolchain: &'a EncoderToolchain,
}

impl VideoExporter<'static> {
    /// Exporter using the `ffmpeg` on `PATH`.
    pub fn new(request: AnimationRequest) -> Self {
        Self {
            request,
            quality_factor: VIDEO_QUALITY_FACTOR,
            toolchain: EncoderToolchain::system(),
        }
    }
}

impl VideoExporter<'_> {
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
        request.validate(ExportLimits::VIDEO)?;
        scene.validate()?;
        let encoders = self.toolchain.ensure()?;
        let codec = negotiate_codec(&encoders)?;

        let mut exporter = FrameExporter::new(scene.canvas, self.quality_factor)?;
        let cache = exporter.create_render_cache(scene)?;
        let (width, height) = (exporter.width(), exporter.height());
        let bitrate = video_bitrate(width, height, request.fps);
        tracing::info!(width, height, mime = codec.mime, bitrate, "video export started");

        let mut sink = VideoSink::new(VideoSinkOpts {
            program: self.toolchain.program().clone(),
            codec,
            bitrate,
        });
        sink.begin(SinkConfig {
            width,
            height,
            fps: request.fps,
        })?;

        let every = yield_interval(request.fps);
        for i in 0..request.total_frames {
            let t = request.frame_time(scene.params.time, i);
            let frame = exporter.render_frame(scene, t, &cache)?;
            sink.push_frame(FrameIndex(i), frame)?;
            on_progress(ExportPhase::Preparing {
                frame: i + 1,
                total: request.total_frames,
                fps: request.fps,
            });
            if (i + 1) % every == 0 {
                std::thread::yield_now();
            }
        }
        exporter.dispose();

        on_progress(ExportPhase::Finalizing);
        sink.end()?;
        let bytes = sink
            .take_output()
            .ok_or_else(|| SinusError::export("the encoded video stream is empty"))?;
        tracing::info!(bytes = bytes.len(), "video export finished");
        Ok(Artifact::new(codec.container.extension(), codec.mime, bytes))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/video.rs"]
mod tests;
