use ndarray::Array2;

use crate::core::error::Result;
use crate::core::metric::{Coordinates, Metric};
use crate::symbolic::{Expr, Symbol};

/// Core trait for a coordinate chart carrying a metric
/// All components are assumed to be smooth functions of the coordinates
#[must_use]
pub trait MetricProvider {
    /// Human-readable name, e.g. "2-sphere"
    fn name(&self) -> String;

    /// Coordinate symbols in index order
    fn coordinates(&self) -> Vec<Symbol>;

    /// Covariant metric components g_ab
    ///
    /// Must be square with side `self.dim()`.
    fn covariant(&self) -> Array2<Expr>;

    /// Number of coordinates
    fn dim(&self) -> usize {
        self.coordinates().len()
    }

    /// Validated metric with its exact inverse
    ///
    /// Checks the chart, the symmetry of g and that det g does not vanish
    /// identically before inverting.
    fn metric(&self) -> Result<Metric> {
        Metric::new(Coordinates::new(self.coordinates())?, self.covariant())
    }
}
