//! Offline exporters.
//!
//! Every exporter renders through its own [`frame::FrameExporter`], so exports never touch the
//! live loop's surfaces or the scene's clock.

pub(crate) mod artifact;
pub(crate) mod frame;
pub(crate) mod gif;
pub(crate) mod limits;
pub(crate) mod still;
pub(crate) mod video;
