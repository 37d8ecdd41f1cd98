use crate::export::artifact::Artifact;
use crate::export::frame::FrameExporter;
use crate::export::limits::STILL_QUALITY_FACTOR;
use crate::foundation::error::SinusResult;
use crate::scene::model::Scene;

/// Single supersampled PNG of the scene at its current clock value.
#[derive(Clone, Copy, Debug)]
pub struct StillExporter {
    pub quality_factor: f32,
}

impl Default for StillExporter {
    fn default() -> Self {
        Self {
            quality_factor: STILL_QUALITY_FACTOR,
        }
    }
}

impl StillExporter {
    #[tracing::instrument(skip(self, scene), fields(qf = self.quality_factor))]
    pub fn export(&self, scene: &Scene) -> SinusResult<Artifact> {
        scene.validate()?;
        let mut exporter = FrameExporter::new(scene.canvas, self.quality_factor)?;
        let cache = exporter.create_render_cache(scene)?;
        let png = exporter
            .render_frame(scene, scene.params.time, &cache)?
            .encode_png()?;
        tracing::info!(
            width = exporter.width(),
            height = exporter.height(),
            bytes = png.len(),
            "still exported"
        );
        Ok(Artifact::new("png", "image/png", png))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/still.rs"]
mod tests;
