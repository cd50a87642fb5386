use thiserror::Error;

/// Top-level error type for geodesic buffering.
#[derive(Debug, Error)]
pub enum GeodesicError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric inputs and reference ellipsoids.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error(
        "invalid ellipsoid: semi-major axis {semi_major_axis}, eccentricity squared {eccentricity_squared}"
    )]
    InvalidEllipsoid {
        semi_major_axis: f64,
        eccentricity_squared: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(&'static str),
}

/// Errors related to buffer, length and densify operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation cancelled by the progress tracker")]
    Cancelled,

    #[error("internal error: {0}")]
    Internal(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

impl GeodesicError {
    /// Returns `true` if the error is a user cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Operation(OperationError::Cancelled))
    }
}

/// Convenience type alias for results using [`GeodesicError`].
pub type Result<T> = std::result::Result<T, GeodesicError>;
