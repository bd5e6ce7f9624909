/// Convenience result type used across the crate.
pub type BorderResult<T> = Result<T, BorderError>;

/// Top-level error taxonomy used by the border pipeline.
#[derive(thiserror::Error, Debug)]
pub enum BorderError {
    /// Invalid configuration: recipes, worker counts, mask geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// A buffer is too large to be indexed by any supported search index width.
    #[error("index overflow: a buffer of {len} pixels cannot be indexed")]
    IndexOverflow {
        /// Pixel count of the rejected buffer.
        len: usize,
    },

    /// A call against the host resource failed.
    #[error("host error: {0}")]
    Host(String),

    /// A worker thread could not proceed.
    #[error("worker error: {0}")]
    Worker(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BorderError {
    /// Build a [`BorderError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BorderError::Host`] value.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Build a [`BorderError::Worker`] value.
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    /// Build a [`BorderError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors that must be reported before any worker starts.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::IndexOverflow { .. } | Self::Serde(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
