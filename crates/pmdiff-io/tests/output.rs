use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pmdiff_core::{integrate_scalar, DiffusivityParams, Scheme, TimeGrid};
use pmdiff_io::{
    format_parameter_report, manifest_path, write_sweep_with_manifest,
    write_trajectories_with_manifest, RunManifest, SmoothConfig,
};
use pmdiff_models::{ClosedForm, DecayingForcing, NoiseGenerator};
use pmdiff_sweep::{all_diffusivities, Sweep, SweepSpec};
use serde_json::json;
use std::fs::File;
use std::path::Path;

fn count_rows(path: &Path) -> usize {
    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    reader.map(|batch| batch.unwrap().num_rows()).sum()
}

#[test]
fn trajectories_and_manifest_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("forcing.parquet");

    let grid = TimeGrid::span(0.0, 2.0, 0.1).unwrap();
    let runs: Vec<_> = Scheme::ALL
        .iter()
        .map(|&scheme| (scheme, integrate_scalar(scheme, &DecayingForcing, &grid, -1.0).unwrap()))
        .collect();
    let exact = |t: f64| DecayingForcing.exact(0.0, -1.0, t);
    let exact_fn: &dyn Fn(f64) -> f64 = &exact;

    let manifest = RunManifest::new("ode", 0.1, 20, json!({ "s0": -1.0 })).with_schemes(&Scheme::ALL);
    write_trajectories_with_manifest(&runs, Some(exact_fn), &manifest, &out).unwrap();

    assert_eq!(count_rows(&out), 4 * 21);

    let loaded = RunManifest::load_from_file(&manifest_path(&out)).unwrap();
    assert_eq!(loaded.run_id, manifest.run_id);
    assert_eq!(loaded.command, "ode");
    assert_eq!(loaded.n_records, 84);
    assert_eq!(loaded.schemes, vec!["rk4", "ab4", "abm4", "sdirk3"]);
}

#[test]
fn sweep_fields_are_written_long_format() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("smooth.parquet");

    let config = SmoothConfig {
        rows: 8,
        cols: 10,
        iterations: 4,
        dt: 0.1,
        kappa: 1.0,
        alpha: 0.5,
        ..SmoothConfig::default()
    };
    let clean = config.clean_field();
    let input = NoiseGenerator::new(config.seed).gaussian(&clean, 0.05);
    let spec = SweepSpec {
        dt: config.dt,
        iterations: config.iterations,
        params: config.params().unwrap(),
    };
    let report = Sweep::new(input.clone())
        .with_reference(clean.clone())
        .run_cases(&all_diffusivities(Scheme::Rk4), &spec)
        .unwrap();

    let manifest = RunManifest::new("smooth", config.dt, config.iterations, json!({})).with_seed(config.seed);
    write_sweep_with_manifest(Some(&clean), &input, &report, &manifest, &out).unwrap();

    // clean + input + five smoothed fields
    assert_eq!(count_rows(&out), 7 * 8 * 10);
    let loaded = RunManifest::load_from_file(&manifest_path(&out)).unwrap();
    assert_eq!(loaded.seed, Some(42));
    assert_eq!(loaded.n_records, 560);
}

#[test]
fn parameter_report_matches_printout() {
    let params = DiffusivityParams::new(0.1, 0.1).unwrap();
    let report = format_parameter_report(Scheme::Abm4, "Charbonnier", &params, 10, 0.3, 0.012345);
    assert_eq!(
        report,
        "Method Used: Adams Moulton\n\
         Diffusion Coefficient: Charbonnier\n\
         Parameter Settings: Kappa=0.1, Alpha=0.1, Iterations=10, Time=0.3\n\
         RMSE: 0.0123"
    );
}
