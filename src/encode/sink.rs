use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SinusError, SinusResult};
use crate::render::frame::FrameRGBA;

/// Geometry and playback rate announced to a [`FrameSink`] by `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Playback frames-per-second.
    pub fps: u32,
}

impl SinkConfig {
    pub(crate) fn validate(&self, sink: &str) -> SinusResult<()> {
        if self.fps == 0 {
            return Err(SinusError::validation(format!("{sink}: fps must be non-zero")));
        }
        if self.width == 0 || self.height == 0 {
            return Err(SinusError::validation(format!(
                "{sink}: width/height must be non-zero"
            )));
        }
        Ok(())
    }

    pub(crate) fn frame_len(&self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Destination of an animation export.
///
/// Exporters call `begin`, then `push_frame` with increasing indices, then `end`. A sink refuses
/// an index that does not move forward.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> SinusResult<()>;
    /// Consume the frame rendered for `idx`; the buffer may be reused once this returns.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SinusResult<()>;
    /// Flush whatever the sink buffered. No frames may follow.
    fn end(&mut self) -> SinusResult<()>;
}

/// Shared bookkeeping for sinks: started state, frame ordering and frame size.
#[derive(Debug, Default)]
pub(crate) struct FrameOrder {
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FrameOrder {
    pub(crate) fn start(&mut self, cfg: SinkConfig) {
        self.cfg = Some(cfg);
        self.last_idx = None;
    }

    /// Accept `idx` and `frame` or explain why not.
    pub(crate) fn admit(
        &mut self,
        sink: &str,
        idx: FrameIndex,
        frame: &FrameRGBA,
    ) -> SinusResult<SinkConfig> {
        let cfg = self
            .cfg
            .ok_or_else(|| SinusError::export(format!("{sink} not started")))?;
        match self.last_idx {
            Some(prev) if idx <= prev => {
                return Err(SinusError::export(format!(
                    "{sink}: out-of-order frame {} (previous {})",
                    idx.0, prev.0
                )));
            }
            _ => {}
        }
        if (frame.width, frame.height) != (cfg.width, cfg.height) {
            return Err(SinusError::validation(format!(
                "{sink}: expected {}x{} frames, got {}x{}",
                cfg.width, cfg.height, frame.width, frame.height
            )));
        }
        if frame.data.len() != cfg.frame_len() {
            return Err(SinusError::validation(format!(
                "{sink}: frame buffer holds {} bytes, expected {}",
                frame.data.len(),
                cfg.frame_len()
            )));
        }
        self.last_idx = Some(idx);
        Ok(cfg)
    }

    pub(crate) fn finish(&mut self, sink: &str) -> SinusResult<SinkConfig> {
        self.last_idx = None;
        self.cfg
            .take()
            .ok_or_else(|| SinusError::export(format!("{sink} not started")))
    }
}

/// Keeps every pushed frame; handy for inspecting an export without encoding it.
#[derive(Debug, Default)]
pub struct InMemorySink {
    order: FrameOrder,
    cfg: Option<SinkConfig>,
    pub(crate) frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration of the current or last export.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames, oldest first.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// `true` once `end` completed.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SinusResult<()> {
        cfg.validate("in-memory sink")?;
        self.order.start(cfg);
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SinusResult<()> {
        self.order.admit("in-memory sink", idx, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> SinusResult<()> {
        self.order.finish("in-memory sink")?;
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
