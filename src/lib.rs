//! Sinus is a renderer for animated, wave-deformed text and images.
//!
//! Content is rasterized into a source surface, then every output pixel is mapped back onto one
//! of `num_curves` horizontal lines displaced by a periodic waveform, optionally blurred, recolored
//! and grained. The same pipeline drives:
//!
//! - an interactive [`LiveRenderLoop`] advancing with wall-clock time
//! - a [`FrameExporter`] rendering explicit timestamps at a supersampled resolution, used by the
//!   [`StillExporter`] (PNG), [`GifExporter`] and [`VideoExporter`] (`ffmpeg`)
#![forbid(unsafe_code)]

mod assets;
mod foundation;

/// Encoding sinks.
pub mod encode;
pub(crate) mod export;
pub(crate) mod layout;
pub(crate) mod live;
pub(crate) mod raster;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod shader;
pub(crate) mod text;
pub(crate) mod wave;

pub use crate::assets::decode::{load_image_file, load_image_source};
pub use crate::foundation::core::{Canvas, FrameIndex, Rgb, normalize_hex};
pub use crate::foundation::error::{SinusError, SinusResult};

pub use crate::encode::ffmpeg::{
    Container, VIDEO_CODEC_PREFERENCES, VideoCodec, VideoSink, VideoSinkOpts, negotiate_codec,
    video_bitrate,
};
pub use crate::encode::gif::{GifSink, GifSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::encode::toolchain::{EncoderList, EncoderToolchain};
pub use crate::export::artifact::{ARTIFACT_PREFIX, Artifact, ExportPhase, artifact_file_name};
pub use crate::export::frame::{FrameExporter, RenderCache};
pub use crate::export::gif::GifExporter;
pub use crate::export::limits::{
    AnimationRequest, DEFAULT_DURATION_SECONDS, DEFAULT_FPS, ExportLimits, GIF_MAX_FPS,
    GIF_QUALITY_FACTOR, MAX_ANIMATION_FPS, MAX_GIF_DURATION_SECONDS, MAX_GIF_FRAMES,
    MAX_VIDEO_DURATION_SECONDS, MAX_VIDEO_FRAMES, STILL_QUALITY_FACTOR, VIDEO_QUALITY_FACTOR,
    check_frame_budget,
};
pub use crate::export::still::StillExporter;
pub use crate::export::video::VideoExporter;
pub use crate::layout::cache::{EntryMetrics, LayoutEntry, TextLayoutCache, build_entry};
pub use crate::live::{FALLBACK_DELTA_SECONDS, LiveRenderLoop, RASTER_INTERVAL_MS};
pub use crate::raster::rasterizer::{RasterContent, Rasterizer};
pub use crate::raster::surface::SourceSurface;
pub use crate::render::frame::FrameRGBA;
pub use crate::scene::content::{DEFAULT_ENTRY, ImageSource, MAX_TEXT_VARIANTS, TextContent};
pub use crate::scene::model::Scene;
pub use crate::scene::params::{MAX_CURVES, ParameterSet};
pub use crate::shader::compositor::{DeformCompositor, FrameUniforms};
pub use crate::shader::deform::{DeformParams, deform_uv, displaced_band};
pub use crate::text::font::ParleyShaper;
pub use crate::text::library::FontLibrary;
pub use crate::text::shaper::{
    BlockShaper, ShapedLine, TextShaper, shaper_for, shaper_from_library,
};
pub use crate::wave::{WaveType, wave};
