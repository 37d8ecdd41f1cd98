use std::collections::BTreeSet;
use std::ffi::OsString;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex, OnceLock};

use crate::foundation::error::{SinusError, SinusResult};

/// Video encoders reported by `ffmpeg -encoders`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncoderList {
    video: BTreeSet<String>,
}

impl EncoderList {
    /// Parse an `ffmpeg -encoders` listing.
    ///
    /// The legend above the `------` separator is skipped; each following line is
    /// `<flags> <name> <description>` and only video encoders (flags starting with `V`) are kept.
    pub fn parse(listing: &str) -> Self {
        let body = match listing.find("------") {
            Some(pos) => &listing[pos..],
            None => listing,
        };
        let video = body
            .lines()
            .skip(1)
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let flags = fields.next()?;
                let name = fields.next()?;
                flags.starts_with('V').then(|| name.to_owned())
            })
            .collect();
        Self { video }
    }

    /// Build a list from encoder names directly.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            video: names.into_iter().map(Into::into).collect(),
        }
    }

    /// `true` when `name` is an available video encoder.
    pub fn supports(&self, name: &str) -> bool {
        self.video.contains(name)
    }

    /// `true` when any available encoder name contains `fragment`.
    pub fn supports_any(&self, fragment: &str) -> bool {
        self.video.iter().any(|n| n.contains(fragment))
    }

    pub fn is_empty(&self) -> bool {
        self.video.is_empty()
    }

    pub fn len(&self) -> usize {
        self.video.len()
    }
}

/// Lazily probed `ffmpeg` installation.
///
/// The probe runs on the first [`EncoderToolchain::ensure`] and its result is kept only when it
/// succeeds; a failed probe is retried on the next call.
#[derive(Debug)]
pub struct EncoderToolchain {
    program: OsString,
    encoders: Mutex<Option<Arc<EncoderList>>>,
}

impl EncoderToolchain {
    /// Toolchain invoking `program` (a name on `PATH` or a path).
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            encoders: Mutex::new(None),
        }
    }

    /// Process-wide toolchain for the `ffmpeg` on `PATH`.
    pub fn system() -> &'static Self {
        static SYSTEM: OnceLock<EncoderToolchain> = OnceLock::new();
        SYSTEM.get_or_init(|| Self::new("ffmpeg"))
    }

    /// Program used for probing and encoding.
    pub fn program(&self) -> &OsString {
        &self.program
    }

    /// Available encoders, probing `ffmpeg` if no earlier probe succeeded.
    pub fn ensure(&self) -> SinusResult<Arc<EncoderList>> {
        let mut slot = self
            .encoders
            .lock()
            .map_err(|_| SinusError::export("encoder toolchain lock poisoned"))?;
        if let Some(list) = slot.as_ref() {
            return Ok(Arc::clone(list));
        }
        let list = Arc::new(self.probe()?);
        tracing::debug!(encoders = list.len(), "ffmpeg encoders probed");
        *slot = Some(Arc::clone(&list));
        Ok(list)
    }

    /// `true` once a probe has succeeded.
    pub fn is_ready(&self) -> bool {
        self.encoders.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    fn probe(&self) -> SinusResult<EncoderList> {
        let output = Command::new(&self.program)
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                SinusError::validation(format!(
                    "ffmpeg is required for video export, but '{}' could not be run: {e}",
                    self.program.to_string_lossy()
                ))
            })?;
        if !output.status.success() {
            return Err(SinusError::validation(format!(
                "'{} -encoders' exited with status {}",
                self.program.to_string_lossy(),
                output.status
            )));
        }
        let list = EncoderList::parse(&String::from_utf8_lossy(&output.stdout));
        if list.is_empty() {
            return Err(SinusError::validation(
                "ffmpeg reported no video encoders",
            ));
        }
        Ok(list)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/toolchain.rs"]
mod tests;
