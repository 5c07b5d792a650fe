//! TOML metric descriptions.
//!
//! ```toml
//! name = "static spherical"
//! coordinates = ["t", "r", "theta", "phi"]
//! diagonal = ["A(r)", "-B(r)", "-r^2", "-r^2*sin(theta)^2"]
//!
//! [options]
//! execution = "parallel"
//! raise = "successive"
//! ricci = "negated"
//! max_operations = 5000000
//! time_limit_ms = 60000
//! ```
//!
//! Full matrices go in `metric = [["1", "0"], ["0", "x^2"]]` instead of `diagonal`.

use std::path::Path;
use std::time::Duration;

use ndarray::Array2;
use serde::Deserialize;
use tracing::debug;

use crate::algorithms::{CurvaturePipeline, Execution, RaiseStrategy, RicciConvention};
use crate::core::error::{Error, Result};
use crate::core::metric::{diagonal_matrix, Coordinates, Metric};
use crate::symbolic::{parse, Expr, SimplifyBudget};

/// Pipeline settings from the `[options]` table; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineOptions {
    pub execution: Execution,
    pub raise: RaiseStrategy,
    pub ricci: RicciConvention,
    pub max_operations: Option<u64>,
    pub time_limit_ms: Option<u64>,
    pub simplify_connection: bool,
}

impl PipelineOptions {
    pub fn budget(&self) -> SimplifyBudget {
        let mut budget = SimplifyBudget::unlimited();
        if let Some(operations) = self.max_operations {
            budget = budget.with_max_operations(operations);
        }
        if let Some(ms) = self.time_limit_ms {
            budget = budget.with_time_limit(Duration::from_millis(ms));
        }
        budget
    }

    pub fn pipeline(&self) -> CurvaturePipeline {
        CurvaturePipeline::new()
            .with_execution(self.execution)
            .with_raise_strategy(self.raise)
            .with_ricci_convention(self.ricci)
            .with_budget(self.budget())
            .with_simplified_connection(self.simplify_connection)
    }
}

/// A metric described in a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricFile {
    #[serde(default)]
    pub name: Option<String>,
    pub coordinates: Vec<String>,
    #[serde(default)]
    pub diagonal: Option<Vec<String>>,
    #[serde(default)]
    pub metric: Option<Vec<Vec<String>>>,
    #[serde(default)]
    pub options: PipelineOptions,
}

fn parse_entry(text: &str, row: usize, col: usize) -> Result<Expr> {
    parse(text).map_err(|err| Error::Config(format!("metric entry ({row}, {col}) {text:?}: {err}")))
}

impl MetricFile {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: MetricFile = toml::from_str(text)?;
        match (&file.diagonal, &file.metric) {
            (Some(_), Some(_)) => Err(Error::Config(
                "`diagonal` and `metric` are mutually exclusive".to_string(),
            )),
            (None, None) => Err(Error::Config(
                "one of `diagonal` or `metric` is required".to_string(),
            )),
            _ => Ok(file),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let file = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), dim = file.coordinates.len(), "loaded metric file");
        Ok(file)
    }

    /// Display name, falling back to the coordinate list
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("metric over ({})", self.coordinates.join(", ")))
    }

    pub fn coordinates(&self) -> Result<Coordinates> {
        Coordinates::from_names(self.coordinates.as_slice())
    }

    /// Covariant metric with every entry parsed
    pub fn covariant(&self) -> Result<Array2<Expr>> {
        if let Some(entries) = &self.diagonal {
            let parsed = entries
                .iter()
                .enumerate()
                .map(|(i, text)| parse_entry(text, i, i))
                .collect::<Result<Vec<_>>>()?;
            return Ok(diagonal_matrix(parsed));
        }

        let rows = self.metric.as_deref().unwrap_or_default();
        let n = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != n) {
            return Err(Error::Config(format!(
                "metric must be square: {n} rows but a row has {} entries",
                row.len()
            )));
        }
        let parsed = rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, text)| (i, j, text)))
            .map(|(i, j, text)| parse_entry(text, i, j))
            .collect::<Result<Vec<_>>>()?;
        Ok(Array2::from_shape_vec((n, n), parsed)?)
    }

    /// Validated metric using the budget from `[options]`
    pub fn metric(&self) -> Result<Metric> {
        Metric::with_budget(self.coordinates()?, self.covariant()?, self.options.budget())
    }

    pub fn pipeline(&self) -> CurvaturePipeline {
        self.options.pipeline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_file() {
        let file = MetricFile::from_toml_str(
            r#"
            name = "sphere"
            coordinates = ["theta", "phi"]
            diagonal = ["r^2", "r^2*sin(theta)^2"]
            "#,
        )
        .unwrap();
        assert_eq!(file.display_name(), "sphere");
        assert_eq!(file.options, PipelineOptions::default());
        let metric = file.metric().unwrap();
        assert_eq!(metric.dim(), 2);
        let r = Expr::var("r");
        assert!(metric.contravariant()[[0, 0]]
            .equivalent(&r.powi(2).recip())
            .unwrap());
    }

    #[test]
    fn test_full_matrix_and_options() {
        let file = MetricFile::from_toml_str(
            r#"
            coordinates = ["u", "v"]
            metric = [["0", "1"], ["1", "0"]]

            [options]
            execution = "parallel"
            raise = "direct"
            ricci = "contracted"
            max_operations = 1000
            "#,
        )
        .unwrap();
        assert_eq!(file.display_name(), "metric over (u, v)");
        let pipeline = file.pipeline();
        assert_eq!(pipeline.execution, Execution::Parallel);
        assert_eq!(pipeline.raise, RaiseStrategy::Direct);
        assert_eq!(pipeline.ricci, RicciConvention::Contracted);
        assert_eq!(pipeline.budget.max_operations, Some(1000));
        assert!(file.metric().is_ok());
    }

    #[test]
    fn test_requires_exactly_one_metric_form() {
        let neither = MetricFile::from_toml_str(r#"coordinates = ["x"]"#);
        assert!(matches!(neither, Err(Error::Config(_))));
        let both = MetricFile::from_toml_str(
            r#"
            coordinates = ["x"]
            diagonal = ["1"]
            metric = [["1"]]
            "#,
        );
        assert!(matches!(both, Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = MetricFile::from_toml_str(
            r#"
            coordinates = ["x"]
            diagonal = ["1"]
            signature = "+"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_bad_entries() {
        let file = MetricFile::from_toml_str(
            r#"
            coordinates = ["x", "y"]
            diagonal = ["1", "x +"]
            "#,
        )
        .unwrap();
        let err = file.covariant().unwrap_err();
        assert!(err.to_string().contains("(1, 1)"));

        let ragged = MetricFile::from_toml_str(
            r#"
            coordinates = ["x", "y"]
            metric = [["1", "0"], ["0"]]
            "#,
        )
        .unwrap();
        assert!(matches!(ragged.covariant(), Err(Error::Config(_))));
    }
}
