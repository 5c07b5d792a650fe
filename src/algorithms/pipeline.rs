//! End-to-end curvature computation for one metric.

use std::time::Instant;

use ndarray::{Array2, Array3, Array4};
use tracing::{debug, info, info_span};

use super::connection::{christoffel_array, connection_derivatives};
use super::index::{lower_first_index, raise_last_three, RaiseStrategy};
use super::invariants::kretschmann_scalar;
use super::ricci::{ricci_array_from, RicciConvention};
use super::riemann::riemann_array_from;
use super::tensor::{simplify_array, Execution};
use crate::core::error::Result;
use crate::core::metric::{Coordinates, Metric};
use crate::core::traits::MetricProvider;
use crate::symbolic::{Expr, SimplifyBudget};

/// Every quantity produced by [`CurvaturePipeline::compute`]
///
/// Tensor arrays are unsimplified; the Kretschmann scalar is simplified.
#[derive(Debug, Clone)]
pub struct CurvatureTensors {
    pub metric: Metric,
    /// Γ[a,b,c] = Γ^a_bc
    pub christoffel: Array3<Expr>,
    pub ricci: Array2<Expr>,
    /// R[a,b,c,d] = R^a_bcd
    pub riemann: Array4<Expr>,
    /// R_abcd
    pub riemann_cov: Array4<Expr>,
    /// R^abcd
    pub riemann_cont: Array4<Expr>,
    pub kretschmann: Expr,
}

/// Configurable curvature pipeline
#[derive(Debug, Clone)]
pub struct CurvaturePipeline {
    /// Sequential or rayon-parallel component evaluation
    pub execution: Execution,
    /// How R^abcd is formed
    pub raise: RaiseStrategy,
    /// Sign of the reported Ricci tensor
    pub ricci: RicciConvention,
    /// Limit on each simplification stage
    pub budget: SimplifyBudget,
    /// Simplify Γ before differentiating it
    pub simplify_connection: bool,
}

impl Default for CurvaturePipeline {
    fn default() -> Self {
        Self {
            execution: Execution::default(),
            raise: RaiseStrategy::default(),
            ricci: RicciConvention::default(),
            budget: SimplifyBudget::default(),
            simplify_connection: false,
        }
    }
}

fn stage<T>(name: &'static str, run: impl FnOnce() -> Result<T>) -> Result<T> {
    let _span = info_span!("stage", stage = name).entered();
    let start = Instant::now();
    let result = run();
    debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        ok = result.is_ok(),
        "stage finished"
    );
    result
}

impl CurvaturePipeline {
    /// Create a pipeline with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Shorthand for `with_execution(Execution::Parallel)`
    pub fn parallel(self) -> Self {
        self.with_execution(Execution::Parallel)
    }

    pub fn with_raise_strategy(mut self, raise: RaiseStrategy) -> Self {
        self.raise = raise;
        self
    }

    pub fn with_ricci_convention(mut self, convention: RicciConvention) -> Self {
        self.ricci = convention;
        self
    }

    pub fn with_budget(mut self, budget: SimplifyBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_simplified_connection(mut self, enabled: bool) -> Self {
        self.simplify_connection = enabled;
        self
    }

    /// Validated metric for a provider, using this pipeline's budget
    pub fn metric_for<M: MetricProvider>(&self, provider: &M) -> Result<Metric> {
        stage("metric", || {
            Metric::with_budget(
                Coordinates::new(provider.coordinates())?,
                provider.covariant(),
                self.budget.clone(),
            )
        })
    }

    /// Christoffel symbols, simplified if `simplify_connection` is set
    pub fn connection(&self, metric: &Metric) -> Result<Array3<Expr>> {
        let gamma = stage("christoffel", || {
            christoffel_array(
                metric.covariant(),
                metric.contravariant(),
                metric.coordinates(),
                self.execution,
            )
        })?;
        if !self.simplify_connection {
            return Ok(gamma);
        }
        stage("simplify christoffel", || {
            simplify_array(&gamma, &self.budget, self.execution)
        })
    }

    /// Connection and Ricci tensor only
    pub fn ricci(&self, metric: &Metric) -> Result<(Array3<Expr>, Array2<Expr>)> {
        let gamma = self.connection(metric)?;
        let coordinates = metric.coordinates();
        let dgamma = stage("connection derivatives", || {
            connection_derivatives(&gamma, coordinates, self.execution)
        })?;
        let ricci = stage("ricci", || {
            ricci_array_from(&gamma, &dgamma, coordinates, self.ricci, self.execution)
        })?;
        Ok((gamma, ricci))
    }

    /// Run every stage for `metric`
    pub fn compute(&self, metric: &Metric) -> Result<CurvatureTensors> {
        let _span = info_span!("curvature", dim = metric.dim()).entered();
        let start = Instant::now();
        let coordinates = metric.coordinates();

        let christoffel = self.connection(metric)?;
        let dgamma = stage("connection derivatives", || {
            connection_derivatives(&christoffel, coordinates, self.execution)
        })?;
        let ricci = stage("ricci", || {
            ricci_array_from(&christoffel, &dgamma, coordinates, self.ricci, self.execution)
        })?;
        let riemann = stage("riemann", || {
            riemann_array_from(&christoffel, &dgamma, coordinates, self.execution)
        })?;
        let riemann_cov = stage("lower", || {
            lower_first_index(&riemann, metric.covariant(), self.execution)
        })?;
        let riemann_cont = stage("raise", || {
            raise_last_three(&riemann, metric.contravariant(), self.raise, self.execution)
        })?;
        let kretschmann = stage("kretschmann", || {
            kretschmann_scalar(&riemann_cov, &riemann_cont, &self.budget)
        })?;

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            kretschmann = %kretschmann,
            "curvature computed"
        );
        Ok(CurvatureTensors {
            metric: metric.clone(),
            christoffel,
            ricci,
            riemann,
            riemann_cov,
            riemann_cont,
            kretschmann,
        })
    }

    /// Validate the provider's metric and run every stage
    pub fn compute_for<M: MetricProvider>(&self, provider: &M) -> Result<CurvatureTensors> {
        let metric = self.metric_for(provider)?;
        self.compute(&metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::manifolds::{Euclidean, Sphere};
    use num_traits::Zero;

    #[test]
    fn test_flat_space_everything_vanishes() {
        let result = CurvaturePipeline::new()
            .compute_for(&Euclidean::new(3))
            .unwrap();
        assert!(result.christoffel.iter().all(|e| e.is_zero()));
        assert!(result.riemann.iter().all(|e| e.is_zero()));
        assert!(result.kretschmann.is_zero());
    }

    #[test]
    fn test_two_sphere_kretschmann() {
        let result = CurvaturePipeline::new().compute_for(&Sphere::new(2)).unwrap();
        let r = Expr::var("r");
        assert!(result
            .kretschmann
            .equivalent(&(Expr::integer(4) / r.powi(4)))
            .unwrap());
        assert_eq!(result.kretschmann.to_string(), "4/r^4");
    }

    #[test]
    fn test_options_do_not_change_results() {
        let sphere = Sphere::new(2);
        let baseline = CurvaturePipeline::new().compute_for(&sphere).unwrap();
        let tuned = CurvaturePipeline::new()
            .parallel()
            .with_raise_strategy(RaiseStrategy::Direct)
            .with_simplified_connection(true)
            .compute_for(&sphere)
            .unwrap();
        assert!(baseline.kretschmann.equivalent(&tuned.kretschmann).unwrap());
        for (x, y) in baseline.ricci.iter().zip(tuned.ricci.iter()) {
            assert!(x.equivalent(y).unwrap());
        }
    }

    #[test]
    fn test_ricci_only() {
        let metric = Sphere::new(2).metric().unwrap();
        let (gamma, ricci) = CurvaturePipeline::new()
            .with_ricci_convention(RicciConvention::Contracted)
            .ricci(&metric)
            .unwrap();
        assert_eq!(gamma.dim(), (2, 2, 2));
        assert!(ricci[[0, 0]].equivalent(&Expr::integer(1)).unwrap());
    }

    #[test]
    fn test_budget_exhaustion_is_reported() {
        let pipeline = CurvaturePipeline::new()
            .with_budget(SimplifyBudget::default().with_max_operations(5));
        let err = pipeline.compute_for(&Sphere::new(2)).unwrap_err();
        assert!(matches!(err, Error::SimplificationTimeout { .. }));
    }
}
