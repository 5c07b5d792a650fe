pub mod algorithms;
pub mod config;
pub mod core;
pub mod manifolds;
pub mod symbolic;

// Flat re-exports for convenience
pub use core::{Coordinates, Error, Metric, MetricProvider, ProductMetric, Result};

// Re-export preset metrics
pub use manifolds::{Euclidean, Sphere, StaticSpherical};

// Re-export curvature types
pub use algorithms::{
    CurvaturePipeline, CurvatureTensors, Execution, RaiseStrategy, RicciConvention,
};
pub use config::{MetricFile, PipelineOptions};
pub use symbolic::{parse, Expr, Symbol, SimplifyBudget};

/// Convenience re-exports for common use cases
pub mod prelude {
    pub use crate::algorithms::{
        CurvaturePipeline, CurvatureTensors, Execution, RaiseStrategy, RicciConvention,
    };
    pub use crate::core::{Coordinates, Error, Metric, MetricProvider, ProductMetric, Result};
    pub use crate::manifolds::{Euclidean, Sphere, StaticSpherical};
    pub use crate::symbolic::{Expr, SimplifyBudget, Symbol};
}
