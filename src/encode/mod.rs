//! Encoding sinks.
//!
//! Sinks consume rendered frames in timeline order and are driven by the exporters.

/// Video sink streaming through the system `ffmpeg`.
pub mod ffmpeg;
/// Looping GIF sink backed by a worker thread.
pub mod gif;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
/// One-time probe of the available `ffmpeg` encoders.
pub mod toolchain;
