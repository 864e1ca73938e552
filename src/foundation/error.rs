/// Convenience result type used across pixforge.
pub type PixForgeResult<T> = Result<T, PixForgeError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Geometric, filter and compositing operations prefer returning the empty
/// [`PixelBuffer`](crate::PixelBuffer) sentinel over raising; the variants here are reserved for
/// conditions that would otherwise corrupt a downstream guarantee.
#[derive(thiserror::Error, Debug)]
pub enum PixForgeError {
    /// A zero-area buffer reached an operation that cannot produce a meaningful result.
    #[error("empty buffer: {0}")]
    EmptyBuffer(String),

    /// A requested rectangle lies (partly) outside the source buffer.
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// An in-place operation was requested on a buffer that is not mutable.
    #[error("buffer is not mutable: {0}")]
    NotMutable(String),

    /// An external encoder failed or produced no bytes.
    #[error("encode failure: {0}")]
    EncodeFailure(String),

    /// A filter kernel weight array had an unsupported length.
    #[error("unsupported kernel size: {0} weights (expected 9 or 25)")]
    UnsupportedKernelSize(usize),

    /// Invalid caller-provided argument or malformed input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PixForgeError {
    /// Build a [`PixForgeError::EmptyBuffer`] value.
    pub fn empty_buffer(msg: impl Into<String>) -> Self {
        Self::EmptyBuffer(msg.into())
    }

    /// Build a [`PixForgeError::InvalidRegion`] value.
    pub fn invalid_region(msg: impl Into<String>) -> Self {
        Self::InvalidRegion(msg.into())
    }

    /// Build a [`PixForgeError::NotMutable`] value.
    pub fn not_mutable(msg: impl Into<String>) -> Self {
        Self::NotMutable(msg.into())
    }

    /// Build a [`PixForgeError::EncodeFailure`] value.
    pub fn encode_failure(msg: impl Into<String>) -> Self {
        Self::EncodeFailure(msg.into())
    }

    /// Build a [`PixForgeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PixForgeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
