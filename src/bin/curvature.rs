use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use curvature::algorithms::{nonzero_components, simplify_array};
use curvature::prelude::*;
use curvature::MetricFile;
use ndarray::{Array, Dimension};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Exact Christoffel, Ricci, Riemann and Kretschmann quantities of a metric"
)]
struct Cli {
    #[command(flatten)]
    options: Options,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Use a built-in metric
    Preset {
        #[arg(value_enum)]
        preset: Preset,

        /// Dimension for `flat` and `sphere`
        #[arg(long, default_value_t = 2)]
        dim: usize,
    },

    /// Read a TOML metric description
    File {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
}

#[derive(Args)]
struct Options {
    /// Evaluate components in parallel
    #[arg(long, global = true)]
    parallel: bool,

    /// How the fully contravariant Riemann tensor is formed
    #[arg(long, global = true, value_enum)]
    raise: Option<RaiseArg>,

    /// Sign convention of the reported Ricci tensor
    #[arg(long, global = true, value_enum)]
    ricci: Option<RicciArg>,

    /// Maximum simplification steps per stage
    #[arg(long, global = true)]
    max_operations: Option<u64>,

    /// Wall-clock limit per simplification stage, in milliseconds
    #[arg(long, global = true)]
    time_limit_ms: Option<u64>,

    /// Which quantities to print
    #[arg(long, global = true, value_enum, default_value_t = Quantity::All)]
    quantity: Quantity,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Flat,
    Sphere,
    StaticSpherical,
    Schwarzschild,
}

#[derive(Clone, Copy, ValueEnum)]
enum RaiseArg {
    Direct,
    Successive,
}

#[derive(Clone, Copy, ValueEnum)]
enum RicciArg {
    Negated,
    Contracted,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Quantity {
    Christoffel,
    Ricci,
    Riemann,
    Kretschmann,
    All,
}

impl Options {
    /// Command-line flags override the file's `[options]`
    fn apply(&self, mut pipeline: CurvaturePipeline) -> CurvaturePipeline {
        if self.parallel {
            pipeline = pipeline.parallel();
        }
        if let Some(raise) = self.raise {
            pipeline = pipeline.with_raise_strategy(match raise {
                RaiseArg::Direct => RaiseStrategy::Direct,
                RaiseArg::Successive => RaiseStrategy::Successive,
            });
        }
        if let Some(ricci) = self.ricci {
            pipeline = pipeline.with_ricci_convention(match ricci {
                RicciArg::Negated => RicciConvention::Negated,
                RicciArg::Contracted => RicciConvention::Contracted,
            });
        }
        if let Some(operations) = self.max_operations {
            pipeline.budget = pipeline.budget.with_max_operations(operations);
        }
        if let Some(ms) = self.time_limit_ms {
            pipeline.budget = pipeline.budget.with_time_limit(Duration::from_millis(ms));
        }
        pipeline
    }
}

fn preset_metric(
    preset: Preset,
    dim: usize,
    pipeline: &CurvaturePipeline,
) -> Result<(String, Metric)> {
    fn build<M: MetricProvider>(
        provider: M,
        pipeline: &CurvaturePipeline,
    ) -> Result<(String, Metric)> {
        let metric = pipeline
            .metric_for(&provider)
            .with_context(|| format!("building {}", provider.name()))?;
        Ok((provider.name(), metric))
    }

    match preset {
        Preset::Flat => build(Euclidean::new(dim), pipeline),
        Preset::Sphere => build(Sphere::new(dim), pipeline),
        Preset::StaticSpherical => build(StaticSpherical::general(), pipeline),
        Preset::Schwarzschild => build(StaticSpherical::schwarzschild(Expr::var("M")), pipeline),
    }
}

fn label(symbol: &str, index: &[usize], coordinates: &Coordinates) -> String {
    let names: Vec<&str> = index.iter().map(|&i| coordinates[i].name()).collect();
    format!("{symbol}[{}]", names.join(", "))
}

/// Prints simplified non-zero components labelled by coordinate names.
struct Report<'a> {
    coordinates: &'a Coordinates,
    pipeline: &'a CurvaturePipeline,
}

impl Report<'_> {
    fn components<D: Dimension>(
        &self,
        title: &str,
        symbol: &str,
        array: &Array<Expr, D>,
    ) -> Result<Array<Expr, D>> {
        let simplified = simplify_array(array, &self.pipeline.budget, self.pipeline.execution)
            .with_context(|| format!("simplifying {title}"))?;
        let components = nonzero_components(&simplified);
        println!("\n{title} ({} non-zero)", components.len());
        for (index, value) in components {
            println!("  {} = {value}", label(symbol, &index, self.coordinates));
        }
        Ok(simplified)
    }

    fn ricci(&self, ricci: &Array<Expr, ndarray::Ix2>) -> Result<()> {
        let ricci = self.components("Ricci tensor", "Ric", ricci)?;
        println!("\nRicci diagonal");
        for (i, symbol) in self.coordinates.iter().enumerate() {
            println!("  Ric[{0}, {0}] = {1}", symbol.name(), ricci[[i, i]]);
        }
        Ok(())
    }
}

fn run(cli: Cli) -> Result<()> {
    let (name, metric, pipeline) = match &cli.command {
        Command::Preset { preset, dim } => {
            let pipeline = cli.options.apply(CurvaturePipeline::new());
            let (name, metric) = preset_metric(*preset, *dim, &pipeline)?;
            (name, metric, pipeline)
        }
        Command::File { path } => {
            let file = MetricFile::load(path)
                .with_context(|| format!("reading metric file {}", path.display()))?;
            let pipeline = cli.options.apply(file.pipeline());
            let metric = Metric::with_budget(
                file.coordinates()?,
                file.covariant()?,
                pipeline.budget.clone(),
            )
            .with_context(|| format!("validating metric in {}", path.display()))?;
            (file.display_name(), metric, pipeline)
        }
    };

    let parameters: Vec<String> = metric.parameters().iter().map(|s| s.to_string()).collect();
    info!(%name, dim = metric.dim(), ?parameters, "metric ready");

    println!("{name}");
    if !parameters.is_empty() {
        println!("Parameters: {}", parameters.join(", "));
    }
    let report = Report {
        coordinates: metric.coordinates(),
        pipeline: &pipeline,
    };
    report.components("Metric", "g", metric.covariant())?;

    let quantity = cli.options.quantity;
    match quantity {
        Quantity::Christoffel => {
            let gamma = pipeline.connection(&metric)?;
            report.components("Christoffel symbols", "Gamma", &gamma)?;
        }
        Quantity::Ricci => {
            let (_, ricci) = pipeline.ricci(&metric)?;
            report.ricci(&ricci)?;
        }
        Quantity::Riemann | Quantity::Kretschmann | Quantity::All => {
            let tensors = pipeline.compute(&metric)?;
            if quantity == Quantity::All {
                report.components("Christoffel symbols", "Gamma", &tensors.christoffel)?;
                report.ricci(&tensors.ricci)?;
            }
            if quantity != Quantity::Kretschmann {
                report.components("Riemann tensor", "R", &tensors.riemann)?;
            }
            println!("\nKretschmann scalar\n  K = {}", tensors.kretschmann);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}
