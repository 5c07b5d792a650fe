pub mod error;
pub mod metric;
pub mod product;
pub mod traits;

pub use error::{Error, Result};
pub use metric::{contravariant_metric, diagonal_matrix, Coordinates, Metric};
pub use product::ProductMetric;
pub use traits::MetricProvider;
