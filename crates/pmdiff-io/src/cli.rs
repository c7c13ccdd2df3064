use crate::config::{OdeConfig, SmoothConfig};
use crate::{format_parameter_report, write_sweep_with_manifest, write_trajectories_with_manifest, RunManifest};
use pmdiff_core::{integrate_scalar, Diffusivity, ScalarRhs, Scheme, TimeGrid, Trajectory};
use pmdiff_models::{ClosedForm, DecayingForcing, ExponentialDecay, LogisticGrowth, NoiseGenerator};
use pmdiff_sweep::{all_diffusivities, Sweep, SweepCase, SweepSpec};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pmdiff")]
#[command(about = "pmdiff - time integrators for Perona-Malik anisotropic diffusion")]
#[command(long_about = "Scalar ODE scheme comparison and edge-preserving smoothing of 2-D fields")]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); falls back to RUST_LOG
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Integrate a scalar test problem and compare against its closed form
    Ode(OdeArgs),
    /// Smooth a noisy synthetic field with one scheme and write it to Parquet
    Smooth(SmoothArgs),
}

#[derive(Args, Debug)]
pub struct OdeArgs {
    /// Test problem
    #[arg(long, value_enum, default_value = "forcing")]
    pub problem: ProblemType,

    /// Scheme (default: all four)
    #[arg(long, value_enum)]
    pub scheme: Option<SchemeType>,

    /// Step size
    #[arg(long)]
    pub step: Option<f64>,

    /// End of the time window
    #[arg(long)]
    pub t_end: Option<f64>,

    /// Initial value
    #[arg(long)]
    pub s0: Option<f64>,

    /// Problem parameters and time window (JSON)
    #[arg(long)]
    pub params: Option<String>,

    /// Output Parquet file
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SmoothArgs {
    /// Scheme
    #[arg(long, value_enum, default_value = "rk4")]
    pub scheme: SchemeType,

    /// Diffusivity (default: all five)
    #[arg(long, value_enum)]
    pub diffusivity: Option<DiffusivityType>,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub kappa: Option<f64>,

    #[arg(long)]
    pub alpha: Option<f64>,

    /// Time step size
    #[arg(long)]
    pub dt: Option<f64>,

    /// Number of time steps
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Noise seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output Parquet file
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProblemType {
    /// ds/dt = -lambda s
    #[value(name = "decay")]
    Decay,
    /// ds/dt = exp(-t)
    #[value(name = "forcing")]
    Forcing,
    /// ds/dt = r s (1 - s/K)
    #[value(name = "logistic")]
    Logistic,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SchemeType {
    #[value(name = "rk4")]
    Rk4,
    #[value(name = "ab4")]
    Ab4,
    #[value(name = "abm4")]
    Abm4,
    #[value(name = "sdirk3")]
    Sdirk3,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DiffusivityType {
    #[value(name = "perona-malik")]
    PeronaMalik,
    #[value(name = "charbonnier")]
    Charbonnier,
    #[value(name = "weickert")]
    Weickert,
    #[value(name = "generalized-perona-malik")]
    GeneralizedPeronaMalik,
    #[value(name = "yule-nielsen")]
    YuleNielsen,
}

impl From<SchemeType> for Scheme {
    fn from(scheme: SchemeType) -> Self {
        match scheme {
            SchemeType::Rk4 => Scheme::Rk4,
            SchemeType::Ab4 => Scheme::Ab4,
            SchemeType::Abm4 => Scheme::Abm4,
            SchemeType::Sdirk3 => Scheme::Sdirk3,
        }
    }
}

impl From<DiffusivityType> for Diffusivity {
    fn from(diffusivity: DiffusivityType) -> Self {
        match diffusivity {
            DiffusivityType::PeronaMalik => Diffusivity::PeronaMalik,
            DiffusivityType::Charbonnier => Diffusivity::Charbonnier,
            DiffusivityType::Weickert => Diffusivity::Weickert,
            DiffusivityType::GeneralizedPeronaMalik => Diffusivity::GeneralizedPeronaMalik,
            DiffusivityType::YuleNielsen => Diffusivity::YuleNielsen,
        }
    }
}

pub async fn run_ode_command(args: OdeArgs) -> anyhow::Result<()> {
    let params = match &args.params {
        Some(params_str) => serde_json::from_str(params_str)?,
        None => json!({}),
    };
    let mut window: OdeConfig = serde_json::from_value(params.clone())?;
    if let Some(step) = args.step {
        window.step = step;
    }
    if let Some(t_end) = args.t_end {
        window.t_end = t_end;
    }
    if let Some(s0) = args.s0 {
        window.s0 = s0;
    }
    let schemes: Vec<Scheme> = match args.scheme {
        Some(scheme) => vec![scheme.into()],
        None => Scheme::ALL.to_vec(),
    };
    let grid = TimeGrid::span(window.t0, window.t_end, window.step)?;

    println!("pmdiff ODE");
    println!("==========");
    println!("Problem: {:?}", args.problem);
    println!("Window: [{}, {}], h = {}", window.t0, window.t_end, window.step);
    println!("s0: {}", window.s0);

    let get = |key: &str, default: f64| params.get(key).and_then(|v| v.as_f64()).unwrap_or(default);
    match args.problem {
        ProblemType::Decay => {
            let problem = ExponentialDecay::new(get("lambda", 1.0));
            solve_and_report(&problem, &schemes, &grid, &window, &params, args.out)
        }
        ProblemType::Forcing => {
            solve_and_report(&DecayingForcing, &schemes, &grid, &window, &params, args.out)
        }
        ProblemType::Logistic => {
            let capacity = get("capacity", 10.0);
            anyhow::ensure!(capacity > 0.0, "capacity must be positive, got {}", capacity);
            let problem = LogisticGrowth::new(get("growth", 1.5), capacity);
            solve_and_report(&problem, &schemes, &grid, &window, &params, args.out)
        }
    }
}

fn solve_and_report<P: ScalarRhs + ClosedForm>(
    problem: &P,
    schemes: &[Scheme],
    grid: &TimeGrid,
    window: &OdeConfig,
    params: &serde_json::Value,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let exact = |t: f64| problem.exact(window.t0, window.s0, t);
    let runs = schemes
        .iter()
        .map(|&scheme| {
            let trajectory = integrate_scalar(scheme, problem, grid, window.s0)?;
            Ok::<_, anyhow::Error>((scheme, trajectory))
        })
        .collect::<anyhow::Result<Vec<(Scheme, Trajectory)>>>()?;

    println!();
    println!("{:<8} {:>14} {:>14} {:>12} {:>12}", "scheme", "final", "exact", "end error", "max error");
    for (scheme, trajectory) in &runs {
        let final_value = trajectory.final_value().unwrap_or(f64::NAN);
        let final_exact = trajectory.final_time().map(exact).unwrap_or(f64::NAN);
        println!(
            "{:<8} {:>14.8} {:>14.8} {:>12.3e} {:>12.3e}",
            scheme.name(),
            final_value,
            final_exact,
            (final_value - final_exact).abs(),
            trajectory.max_abs_error(exact)
        );
    }

    if let Some(out) = out {
        let manifest = RunManifest::new("ode", grid.step(), grid.len().saturating_sub(1), params.clone())
            .with_schemes(schemes);
        let exact_fn: &dyn Fn(f64) -> f64 = &exact;
        write_trajectories_with_manifest(&runs, Some(exact_fn), &manifest, &out)?;
    }
    Ok(())
}

pub async fn run_smooth_command(args: SmoothArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => SmoothConfig::load(path)?,
        None => SmoothConfig::default(),
    };
    if let Some(kappa) = args.kappa {
        config.kappa = kappa;
    }
    if let Some(alpha) = args.alpha {
        config.alpha = alpha;
    }
    if let Some(dt) = args.dt {
        config.dt = dt;
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let scheme = Scheme::from(args.scheme);
    let params = config.params()?;
    let run_spec = config.run_spec()?;
    let cases: Vec<SweepCase> = match args.diffusivity {
        Some(d) => vec![SweepCase {
            scheme,
            diffusivity: d.into(),
        }],
        None => all_diffusivities(scheme),
    };

    let clean = config.clean_field();
    let input = match config.noise {
        Some(kind) => NoiseGenerator::new(config.seed).apply(&clean, kind),
        None => clean.clone(),
    };
    log::info!(
        "smoothing a {}x{} {:?} field with {} ({} cases)",
        config.rows,
        config.cols,
        config.pattern,
        scheme,
        cases.len()
    );

    let spec = SweepSpec {
        dt: run_spec.dt,
        iterations: run_spec.iterations,
        params,
    };
    let sweep = Sweep::new(input.clone()).with_reference(clean.clone());
    let report = {
        let cases = cases.clone();
        tokio::task::spawn_blocking(move || sweep.run_cases(&cases, &spec)).await??
    };

    for result in &report.results {
        println!();
        println!(
            "{}",
            format_parameter_report(
                scheme,
                result.case.diffusivity.name(),
                &params,
                config.iterations,
                config.dt,
                result.rmse_to_input
            )
        );
        if let Some(clean_rmse) = result.rmse_to_reference {
            log::debug!("{}: RMSE to clean field {:.4}", result.case.diffusivity, clean_rmse);
        }
    }

    let stats = report.statistics();
    println!();
    println!("Mean total-variation reduction: {:.1}%", stats.mean_tv_reduction * 100.0);
    if let (Some(best), Some(rmse)) = (stats.best_case, stats.best_rmse) {
        println!("Closest to the clean field: {} (RMSE {:.4})", best.diffusivity, rmse);
    }

    if let Some(out) = args.out {
        let manifest = RunManifest::new(
            "smooth",
            config.dt,
            config.iterations,
            serde_json::to_value(&config)?,
        )
        .with_schemes(&[scheme])
        .with_diffusivities(cases.iter().map(|c| c.diffusivity.name().to_string()))
        .with_seed(config.seed);
        write_sweep_with_manifest(Some(&clean), &input, &report, &manifest, &out)?;
    }
    Ok(())
}
