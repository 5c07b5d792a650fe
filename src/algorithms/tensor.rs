//! Generic construction of dense symbolic tensors.
//!
//! Every curvature array is built the same way: a pure per-component function
//! is evaluated over the full index space, in row-major order, either
//! sequentially or on the rayon pool. Components are independent, so the
//! parallel and sequential results are identical.

use ndarray::{Array, Dimension, IxDyn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};
use crate::symbolic::{Expr, Simplifier, SimplifyBudget};

/// How tensor components are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Execution {
    /// One component after another on the calling thread
    Sequential,
    /// Components spread over the rayon thread pool
    Parallel,
}

impl Default for Execution {
    fn default() -> Self {
        Execution::Sequential
    }
}

/// Row-major multi-index of `flat` in a tensor with `rank` axes of length `dim`.
fn unravel(mut flat: usize, dim: usize, rank: usize) -> Vec<usize> {
    let mut index = vec![0; rank];
    for slot in index.iter_mut().rev() {
        *slot = flat % dim;
        flat /= dim;
    }
    index
}

/// Builds a tensor with every axis of length `dim` from a component function.
///
/// The first error raised by `component` is returned and the array is not
/// built.
pub fn build_tensor<D, F>(dim: usize, execution: Execution, component: F) -> Result<Array<Expr, D>>
where
    D: Dimension,
    F: Fn(&[usize]) -> Result<Expr> + Sync,
{
    let rank = D::NDIM.ok_or_else(|| {
        Error::InvalidParameter("tensor rank must be known at compile time".to_string())
    })?;
    let total = u32::try_from(rank)
        .ok()
        .and_then(|r| dim.checked_pow(r))
        .ok_or_else(|| Error::InvalidParameter(format!("{dim}^{rank} components overflow")))?;

    let evaluate = |flat: usize| component(&unravel(flat, dim, rank));
    let data: Vec<Expr> = match execution {
        Execution::Sequential => (0..total).map(evaluate).collect::<Result<Vec<Expr>>>()?,
        Execution::Parallel => (0..total)
            .into_par_iter()
            .map(evaluate)
            .collect::<Result<Vec<Expr>>>()?,
    };

    let array = Array::from_shape_vec(IxDyn(&vec![dim; rank]), data)?;
    Ok(array.into_dimensionality::<D>()?)
}

/// Simplifies every component of `array`.
///
/// Sequential execution shares one simplifier (and its memo) across all
/// components; parallel execution gives each component its own, with the
/// budget applying per component.
pub fn simplify_array<D>(
    array: &Array<Expr, D>,
    budget: &SimplifyBudget,
    execution: Execution,
) -> Result<Array<Expr, D>>
where
    D: Dimension,
{
    let components: Vec<&Expr> = array.iter().collect();
    let data: Vec<Expr> = match execution {
        Execution::Sequential => {
            let mut simplifier = Simplifier::new(budget.clone());
            components
                .into_iter()
                .map(|e| simplifier.simplify(e))
                .collect::<Result<Vec<Expr>>>()?
        }
        Execution::Parallel => components
            .into_par_iter()
            .map(|e| Simplifier::new(budget.clone()).simplify(e))
            .collect::<Result<Vec<Expr>>>()?,
    };
    Ok(Array::from_shape_vec(array.raw_dim(), data)?)
}

/// Multi-indices and values of the components that are not structurally zero.
pub fn nonzero_components<D>(array: &Array<Expr, D>) -> Vec<(Vec<usize>, Expr)>
where
    D: Dimension,
{
    use num_traits::Zero;

    array
        .view()
        .into_dyn()
        .indexed_iter()
        .filter(|(_, value)| !value.is_zero())
        .map(|(index, value)| (index.slice().to_vec(), value.clone()))
        .collect()
}
