/// Convenience result type used across the crate.
pub type RegionResult<T> = Result<T, RegionError>;

/// Top-level error taxonomy used by region and scene APIs.
#[derive(thiserror::Error, Debug)]
pub enum RegionError {
    /// Invalid caller-provided data (selectors, config values, transform text).
    #[error("validation error: {0}")]
    Validation(String),

    /// The matrix has a (near-)zero determinant and cannot be inverted.
    #[error("non-invertible matrix (determinant {det})")]
    NonInvertibleMatrix {
        /// Determinant of the rejected matrix.
        det: f64,
    },

    /// An element id that is not (or no longer) part of the scene.
    #[error("unknown element: {0}")]
    UnknownElement(String),

    /// A closed view was offered where a live view is required.
    #[error("view {0} is closed")]
    ViewClosed(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RegionError {
    /// Build a [`RegionError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RegionError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`RegionError::UnknownElement`] value.
    pub fn unknown_element(id: impl std::fmt::Display) -> Self {
        Self::UnknownElement(id.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
