use thiserror::Error;

/// Errors that can occur while building metrics or curvature tensors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Array shape or coordinate count does not match the chart dimension
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Component index outside of [0, dim)
    #[error("index {index:?} out of range for dimension {dim}")]
    IndexOutOfRange { index: Vec<usize>, dim: usize },

    /// Covariant metric has an identically vanishing determinant
    #[error("metric is singular: determinant is identically zero")]
    SingularMetric,

    /// g[row, col] and g[col, row] differ
    #[error("metric is not symmetric at ({row}, {col})")]
    AsymmetricMetric { row: usize, col: usize },

    /// The same coordinate symbol appears twice in a chart
    #[error("duplicate coordinate: {0}")]
    DuplicateCoordinate(String),

    /// A chart needs at least one coordinate
    #[error("coordinate chart is empty")]
    EmptyChart,

    /// Simplification exceeded the configured budget
    #[error("simplification exceeded its budget after {operations} operations ({limit})")]
    SimplificationTimeout { operations: u64, limit: String },

    /// An expression that is identically zero was inverted
    #[error("division by an expression that is identically zero")]
    DivisionByZero,

    /// Expression text could not be parsed
    #[error("parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Metric description file is malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// Array construction failed
    #[error("array shape error: {0}")]
    Shape(String),
}

/// Convert ndarray shape errors to Error
impl From<ndarray::ShapeError> for Error {
    fn from(err: ndarray::ShapeError) -> Self {
        Error::Shape(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type for symbolic and curvature operations
pub type Result<T> = std::result::Result<T, Error>;
