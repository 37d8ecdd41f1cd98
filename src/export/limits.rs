use crate::foundation::error::{SinusError, SinusResult};

/// Highest frame rate an animation export renders at.
pub const MAX_ANIMATION_FPS: u32 = 240;
/// Highest playback rate a GIF is encoded for.
pub const GIF_MAX_FPS: u32 = 100;

pub const MAX_GIF_DURATION_SECONDS: f64 = 10.0;
pub const MAX_GIF_FRAMES: u64 = 2400;
pub const MAX_VIDEO_DURATION_SECONDS: f64 = 20.0;
pub const MAX_VIDEO_FRAMES: u64 = 4800;

pub const DEFAULT_DURATION_SECONDS: f64 = 4.0;
pub const DEFAULT_FPS: u32 = 90;
const MIN_DURATION_SECONDS: f64 = 0.5;

/// Supersampling factor of still exports.
pub const STILL_QUALITY_FACTOR: f32 = 4.0;
/// Supersampling factor of GIF exports.
pub const GIF_QUALITY_FACTOR: f32 = 3.0;
/// Supersampling factor of video exports.
pub const VIDEO_QUALITY_FACTOR: f32 = 3.5;

/// Duration and frame caps of one export kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportLimits {
    pub max_duration_seconds: f64,
    pub max_frames: u64,
}

impl ExportLimits {
    pub const GIF: Self = Self {
        max_duration_seconds: MAX_GIF_DURATION_SECONDS,
        max_frames: MAX_GIF_FRAMES,
    };
    pub const VIDEO: Self = Self {
        max_duration_seconds: MAX_VIDEO_DURATION_SECONDS,
        max_frames: MAX_VIDEO_FRAMES,
    };
}

/// Timing of an animation export.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationRequest {
    pub duration_seconds: f64,
    pub fps: u32,
    pub total_frames: u64,
    /// Clock value of frame 0; `None` starts at the scene's current time.
    pub start_time: Option<f64>,
}

impl AnimationRequest {
    /// Clamp the requested duration and rate and count frames.
    ///
    /// Missing or non-finite durations fall back to 4 s and are clamped into
    /// `[0.5, limits.max_duration_seconds]`; missing rates fall back to 90 and are clamped into
    /// `[1, 240]`.
    pub fn resolve(
        duration_seconds: Option<f64>,
        fps: Option<u32>,
        limits: ExportLimits,
    ) -> SinusResult<Self> {
        let duration_seconds = duration_seconds
            .filter(|d| d.is_finite())
            .unwrap_or(DEFAULT_DURATION_SECONDS)
            .max(MIN_DURATION_SECONDS)
            .min(limits.max_duration_seconds);
        let fps = fps.unwrap_or(DEFAULT_FPS).clamp(1, MAX_ANIMATION_FPS);
        let total_frames = (duration_seconds * f64::from(fps)).round() as u64;
        check_frame_budget(total_frames, limits.max_frames).map_err(|_| {
            SinusError::validation(format!(
                "duration ({duration_seconds:.2}s) at {fps} fps exceeds the limit of {} frames",
                limits.max_frames
            ))
        })?;
        Ok(Self {
            duration_seconds,
            fps,
            total_frames,
            start_time: None,
        })
    }

    /// Same request starting at `time`.
    pub fn starting_at(self, time: f64) -> Self {
        Self {
            start_time: Some(time),
            ..self
        }
    }

    /// Clock value of frame `index` given the scene's current time.
    pub fn frame_time(&self, scene_time: f64, index: u64) -> f64 {
        self.start_time.unwrap_or(scene_time) + index as f64 / f64::from(self.fps)
    }

    pub(crate) fn validate(&self, limits: ExportLimits) -> SinusResult<()> {
        if self.fps == 0 {
            return Err(SinusError::validation("fps must be non-zero"));
        }
        if self.total_frames == 0 {
            return Err(SinusError::validation("an animation needs at least one frame"));
        }
        check_frame_budget(self.total_frames, limits.max_frames)
    }
}

/// Accept `total_frames` up to and including `max_frames`.
pub fn check_frame_budget(total_frames: u64, max_frames: u64) -> SinusResult<()> {
    if total_frames > max_frames {
        return Err(SinusError::validation(format!(
            "{total_frames} frames exceed the limit of {max_frames}"
        )));
    }
    Ok(())
}

/// Frames between cooperative yields: `max(1, floor(240 / fps))`.
pub(crate) fn yield_interval(fps: u32) -> u64 {
    u64::from(MAX_ANIMATION_FPS / fps.max(1)).max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/export/limits.rs"]
mod tests;
