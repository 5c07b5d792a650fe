use curvature::prelude::*;

fn main() -> Result<()> {
    println!("=== Static Spherically Symmetric Spacetime ===\n");

    // ds² = A(r) dt² − B(r) dr² − r² dθ² − r² sin²θ dφ²
    let spacetime = StaticSpherical::general();
    let pipeline = CurvaturePipeline::new().parallel();
    let metric = pipeline.metric_for(&spacetime)?;

    println!("Coordinates: {:?}", metric.coordinates().symbols());
    println!("Metric diagonal:");
    for i in 0..metric.dim() {
        println!("  g[{i}, {i}] = {}", metric.covariant()[[i, i]]);
    }

    let result = pipeline.compute(&metric)?;

    println!("\nRicci diagonal:");
    for i in 0..metric.dim() {
        println!("  Ric[{i}, {i}] = {}", result.ricci[[i, i]].simplify()?);
    }

    println!("\nKretschmann scalar:");
    println!("  K = {}", result.kretschmann);

    println!("\n=== Schwarzschild Specialisation ===\n");
    let schwarzschild = StaticSpherical::schwarzschild(Expr::var("M"));
    let result = pipeline.compute_for(&schwarzschild)?;
    let vacuum = result
        .ricci
        .iter()
        .map(|component| component.is_identically_zero())
        .collect::<Result<Vec<bool>>>()?
        .into_iter()
        .all(|zero| zero);
    println!("Ricci-flat: {vacuum}");
    println!("K = {}", result.kretschmann);

    Ok(())
}
