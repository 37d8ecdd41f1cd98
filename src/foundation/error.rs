/// Convenience result type used across the crate.
pub type SinusResult<T> = Result<T, SinusError>;

/// Top-level error taxonomy used by render and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum SinusError {
    /// Rendering surfaces or contexts could not be set up.
    #[error("initialization error: {0}")]
    Init(String),

    /// Invalid scene data or an unmet export precondition.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure while an export job was running.
    #[error("export error: {0}")]
    Export(String),

    /// An input bitmap could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors when serializing or deserializing scene data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SinusError {
    /// Build a [`SinusError::Init`] value.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    /// Build a [`SinusError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SinusError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`SinusError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SinusError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors raised before an export job allocated anything.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
