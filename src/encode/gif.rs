use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::JoinHandle;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::encode::sink::{FrameOrder, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SinusError, SinusResult};
use crate::render::frame::FrameRGBA;

/// Frames buffered between the render loop and the encoder thread.
const CHANNEL_DEPTH: usize = 4;

/// Options for [`GifSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GifSinkOpts {
    /// NeuQuant sampling speed, `1` (best) to `30` (fastest).
    pub speed: i32,
}

impl GifSinkOpts {
    /// Options for frames rendered at `quality_factor`: `max(1, round(20 / qf))`.
    pub fn for_quality_factor(quality_factor: f32) -> Self {
        Self {
            speed: (20.0 / quality_factor).round().clamp(1.0, 30.0) as i32,
        }
    }
}

impl Default for GifSinkOpts {
    fn default() -> Self {
        Self { speed: 10 }
    }
}

/// Looping GIF sink.
///
/// Frames are quantised and written by a worker thread fed over a bounded channel; the encoded
/// bytes are collected with [`GifSink::finish`] or [`GifSink::take_output`].
pub struct GifSink {
    opts: GifSinkOpts,
    order: FrameOrder,
    frames: Option<SyncSender<RgbaImage>>,
    progress: Option<Receiver<u64>>,
    worker: Option<JoinHandle<SinusResult<Vec<u8>>>>,
    submitted: u64,
    output: Option<Vec<u8>>,
}

impl GifSink {
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            order: FrameOrder::default(),
            frames: None,
            progress: None,
            worker: None,
            submitted: 0,
            output: None,
        }
    }

    /// Close the stream, report encoding progress in `0..=1`, and wait for the encoder.
    pub fn finish(&mut self, mut on_progress: impl FnMut(f32)) -> SinusResult<()> {
        self.order.finish("gif sink")?;
        drop(self.frames.take());

        if let Some(progress) = self.progress.take() {
            let total = self.submitted.max(1) as f32;
            for encoded in progress {
                on_progress((encoded as f32 / total).min(1.0));
            }
        }
        let worker = self
            .worker
            .take()
            .ok_or_else(|| SinusError::export("gif sink not started"))?;
        let bytes = worker
            .join()
            .map_err(|_| SinusError::export("gif encoder thread panicked"))??;
        if bytes.is_empty() {
            return Err(SinusError::export("gif encoder produced no output"));
        }
        self.output = Some(bytes);
        Ok(())
    }

    /// Encoded GIF after a successful `end`/`finish`.
    pub fn take_output(&mut self) -> Option<Vec<u8>> {
        self.output.take()
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> SinusResult<()> {
        cfg.validate("gif sink")?;
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(SinusError::validation(format!(
                "gif frames are limited to 65535x65535, got {}x{}",
                cfg.width, cfg.height
            )));
        }

        let (frame_tx, frame_rx) = mpsc::sync_channel::<RgbaImage>(CHANNEL_DEPTH);
        let (progress_tx, progress_rx) = mpsc::channel::<u64>();
        let speed = self.opts.speed;
        let delay = Delay::from_numer_denom_ms(1000, cfg.fps);

        let worker = std::thread::Builder::new()
            .name("gif-encoder".into())
            .spawn(move || -> SinusResult<Vec<u8>> {
                let mut out = Vec::new();
                {
                    let mut encoder = GifEncoder::new_with_speed(&mut out, speed);
                    encoder
                        .set_repeat(Repeat::Infinite)
                        .map_err(|e| SinusError::export(format!("gif repeat: {e}")))?;
                    let mut encoded = 0u64;
                    for image in frame_rx {
                        encoder
                            .encode_frame(Frame::from_parts(image, 0, 0, delay))
                            .map_err(|e| SinusError::export(format!("gif encode: {e}")))?;
                        encoded += 1;
                        // The receiver may already be gone when no one watches progress.
                        let _ = progress_tx.send(encoded);
                    }
                }
                Ok(out)
            })
            .map_err(|e| SinusError::init(format!("spawn gif encoder thread: {e}")))?;

        self.order.start(cfg);
        self.frames = Some(frame_tx);
        self.progress = Some(progress_rx);
        self.worker = Some(worker);
        self.submitted = 0;
        self.output = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SinusResult<()> {
        let cfg = self.order.admit("gif sink", idx, frame)?;
        let image = RgbaImage::from_raw(cfg.width, cfg.height, frame.data.clone())
            .ok_or_else(|| SinusError::validation("frame.data size mismatch with width*height*4"))?;
        let tx = self
            .frames
            .as_ref()
            .ok_or_else(|| SinusError::export("gif sink is already finalized"))?;
        if tx.send(image).is_err() {
            // The worker stopped early; surface its error.
            drop(self.frames.take());
            return Err(match self.worker.take().map(JoinHandle::join) {
                Some(Ok(Err(e))) => e,
                _ => SinusError::export("gif encoder thread stopped unexpectedly"),
            });
        }
        self.submitted += 1;
        Ok(())
    }

    fn end(&mut self) -> SinusResult<()> {
        self.finish(|_| {})
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
