//! Raising and lowering Riemann tensor indices with the metric.

use ndarray::{Array2, Array4};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tensor::{build_tensor, Execution};
use crate::core::error::{Error, Result};
use crate::symbolic::Expr;

/// Strategy for raising the last three indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaiseStrategy {
    /// One triple sum per component: N⁴ components × N³ terms
    Direct,
    /// Three single-index contractions: 3 × N⁴ components × N terms
    Successive,
}

impl Default for RaiseStrategy {
    fn default() -> Self {
        // Same result, far fewer terms
        RaiseStrategy::Successive
    }
}

fn check_shapes(tensor: &Array4<Expr>, metric: &Array2<Expr>) -> Result<usize> {
    let dim = metric.nrows();
    if metric.ncols() != dim {
        return Err(Error::DimensionMismatch {
            expected: dim,
            got: metric.ncols(),
        });
    }
    if let Some(&got) = tensor.shape().iter().find(|&&len| len != dim) {
        return Err(Error::DimensionMismatch { expected: dim, got });
    }
    Ok(dim)
}

/// out[.., m, ..] = Σ_l metric[m, l] · tensor[.., l, ..] along `axis`.
fn contract_axis(
    tensor: &Array4<Expr>,
    metric: &Array2<Expr>,
    axis: usize,
    execution: Execution,
) -> Result<Array4<Expr>> {
    let dim = check_shapes(tensor, metric)?;
    build_tensor(dim, execution, |idx| {
        let mut at = [idx[0], idx[1], idx[2], idx[3]];
        let m = at[axis];
        let mut terms = Vec::new();
        for l in 0..dim {
            let g = &metric[[m, l]];
            if g.is_zero() {
                continue;
            }
            at[axis] = l;
            let t = &tensor[at];
            if !t.is_zero() {
                terms.push(g * t);
            }
        }
        Ok(Expr::add_all(terms))
    })
}

/// R_abcd = Σ_i g_ai R^i_bcd
pub fn lower_first_index(
    riemann: &Array4<Expr>,
    g_cov: &Array2<Expr>,
    execution: Execution,
) -> Result<Array4<Expr>> {
    let lowered = contract_axis(riemann, g_cov, 0, execution)?;
    debug!(dim = g_cov.nrows(), "lowered first index");
    Ok(lowered)
}

/// R^a^b^c^d = Σ_{i,j,k} g^bi g^cj g^dk R^a_ijk
pub fn raise_last_three(
    riemann: &Array4<Expr>,
    g_cont: &Array2<Expr>,
    strategy: RaiseStrategy,
    execution: Execution,
) -> Result<Array4<Expr>> {
    let raised = match strategy {
        RaiseStrategy::Successive => {
            let t = contract_axis(riemann, g_cont, 3, execution)?;
            let t = contract_axis(&t, g_cont, 2, execution)?;
            contract_axis(&t, g_cont, 1, execution)?
        }
        RaiseStrategy::Direct => {
            let dim = check_shapes(riemann, g_cont)?;
            build_tensor(dim, execution, |idx| {
                let [a, b, c, d] = [idx[0], idx[1], idx[2], idx[3]];
                let mut terms = Vec::new();
                for i in 0..dim {
                    for j in 0..dim {
                        for k in 0..dim {
                            let r = &riemann[[a, i, j, k]];
                            let factors = [&g_cont[[b, i]], &g_cont[[c, j]], &g_cont[[d, k]]];
                            if r.is_zero() || factors.iter().any(|g| g.is_zero()) {
                                continue;
                            }
                            terms.push(Expr::mul_all(
                                factors.into_iter().cloned().chain(std::iter::once(r.clone())),
                            ));
                        }
                    }
                }
                Ok(Expr::add_all(terms))
            })?
        }
    };
    debug!(?strategy, "raised last three indices");
    Ok(raised)
}
