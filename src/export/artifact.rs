use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;

use crate::foundation::error::SinusResult;

/// Base name of every exported file.
pub const ARTIFACT_PREFIX: &str = "sinus-gradient";

/// `<name>-<unix millis>.<ext>`.
pub fn artifact_file_name(name: &str, ext: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("{name}-{millis}.{ext}")
}

/// An encoded export ready to be written out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub(crate) fn new(ext: &str, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: artifact_file_name(ARTIFACT_PREFIX, ext),
            mime: mime.into(),
            bytes,
        }
    }

    /// Write into `dir` under [`Artifact::file_name`] and return the full path.
    pub fn write_to(&self, dir: &Path) -> SinusResult<PathBuf> {
        let path = dir.join(&self.file_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("write '{}'", path.display()))?;
        Ok(path)
    }
}

/// Stage of a running animation export.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExportPhase {
    /// Frame `frame` of `total` rendered and handed to the encoder.
    Preparing { frame: u64, total: u64, fps: u32 },
    /// Encoder progress in percent.
    Encoding { percent: u8 },
    /// Collecting the encoded output.
    Finalizing,
}

impl fmt::Display for ExportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preparing { frame, total, fps } => write!(f, "Preparing {frame}/{total} ({fps}fps)"),
            Self::Encoding { percent } => write!(f, "Encoding {percent}%"),
            Self::Finalizing => f.write_str("Finalizing"),
        }
    }
}

pub(crate) fn percent(fraction: f32) -> u8 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/export/artifact.rs"]
mod tests;
