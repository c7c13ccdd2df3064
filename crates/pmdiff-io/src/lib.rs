use arrow::array::{Array, Float64Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field as ArrowField, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use pmdiff_core::{DiffusivityParams, Field, Scheme, Trajectory};
use pmdiff_sweep::SweepReport;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

pub mod cli;
pub mod config;
pub mod logging;

pub use cli::*;
pub use config::{OdeConfig, Pattern, SmoothConfig};
pub use logging::init_logging;

/// Run manifest for complete reproducibility
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub timestamp: String,
    pub command: String, // "ode" | "smooth"
    pub schemes: Vec<String>,
    pub diffusivities: Vec<String>,
    pub dt: f64,
    pub n_steps: usize,
    pub total_time: f64,
    pub params: serde_json::Value,
    pub seed: Option<u64>,
    pub n_records: usize,
    pub commit_hash: Option<String>,
    pub rust_version: String,
}

impl RunManifest {
    pub fn new(command: &str, dt: f64, n_steps: usize, params: serde_json::Value) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            command: command.to_string(),
            schemes: Vec::new(),
            diffusivities: Vec::new(),
            dt,
            n_steps,
            total_time: dt * n_steps as f64,
            params,
            seed: None,
            n_records: 0, // set when writing
            commit_hash: get_git_commit(),
            rust_version: get_rust_version(),
        }
    }

    pub fn with_schemes(mut self, schemes: &[Scheme]) -> Self {
        self.schemes = schemes.iter().map(|s| s.name().to_string()).collect();
        self
    }

    pub fn with_diffusivities(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.diffusivities = names.into_iter().collect();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let manifest = serde_json::from_str(&json)?;
        Ok(manifest)
    }
}

/// Parquet table of scalar trajectories: (run_id, scheme, step, time, value, exact).
pub struct TrajectoryWriter {
    writer: ArrowWriter<File>,
    schema: Arc<Schema>,
    rows: usize,
}

impl TrajectoryWriter {
    pub fn new(file_path: &Path) -> anyhow::Result<Self> {
        let file = File::create(file_path)?;
        let schema = Arc::new(Schema::new(vec![
            ArrowField::new("run_id", DataType::Utf8, false),
            ArrowField::new("scheme", DataType::Utf8, false),
            ArrowField::new("step", DataType::UInt32, false),
            ArrowField::new("time", DataType::Float64, false),
            ArrowField::new("value", DataType::Float64, false),
            ArrowField::new("exact", DataType::Float64, true), // no closed form
        ]));
        let writer = ArrowWriter::try_new(file, schema.clone(), None)?;
        Ok(Self {
            writer,
            schema,
            rows: 0,
        })
    }

    /// Appends one trajectory, with the closed-form value at each time when known.
    pub fn write_trajectory(
        &mut self,
        run_id: &str,
        scheme: Scheme,
        trajectory: &Trajectory,
        exact: Option<&dyn Fn(f64) -> f64>,
    ) -> anyhow::Result<()> {
        let n = trajectory.len();
        if n == 0 {
            return Ok(());
        }
        let exact_values: Vec<Option<f64>> = trajectory
            .times
            .iter()
            .map(|t| exact.map(|f| f(*t)))
            .collect();

        let arrays: Vec<Arc<dyn Array>> = vec![
            Arc::new(StringArray::from(vec![run_id.to_string(); n])),
            Arc::new(StringArray::from(vec![scheme.name().to_string(); n])),
            Arc::new(UInt32Array::from((0..n as u32).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(trajectory.times.clone())),
            Arc::new(Float64Array::from(trajectory.values.clone())),
            Arc::new(Float64Array::from(exact_values)),
        ];
        let batch = RecordBatch::try_new(self.schema.clone(), arrays)?;
        self.writer.write(&batch)?;
        self.rows += n;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn close(self) -> anyhow::Result<()> {
        self.writer.close()?;
        Ok(())
    }
}

/// Parquet table of fields in long format: (run_id, case, row, col, value).
pub struct FieldWriter {
    writer: ArrowWriter<File>,
    schema: Arc<Schema>,
    rows: usize,
}

impl FieldWriter {
    pub fn new(file_path: &Path) -> anyhow::Result<Self> {
        let file = File::create(file_path)?;
        let schema = Arc::new(Schema::new(vec![
            ArrowField::new("run_id", DataType::Utf8, false),
            ArrowField::new("case", DataType::Utf8, false),
            ArrowField::new("row", DataType::UInt32, false),
            ArrowField::new("col", DataType::UInt32, false),
            ArrowField::new("value", DataType::Float64, false),
        ]));
        let writer = ArrowWriter::try_new(file, schema.clone(), None)?;
        Ok(Self {
            writer,
            schema,
            rows: 0,
        })
    }

    /// Appends every cell of `field` under the label `case`, row-major.
    pub fn write_field(&mut self, run_id: &str, case: &str, field: &Field) -> anyhow::Result<()> {
        let (n_rows, n_cols) = field.shape();
        let n = n_rows * n_cols;
        if n == 0 {
            return Ok(());
        }
        let mut rows = Vec::with_capacity(n);
        let mut cols = Vec::with_capacity(n);
        let mut values = Vec::with_capacity(n);
        for i in 0..n_rows {
            for j in 0..n_cols {
                rows.push(i as u32);
                cols.push(j as u32);
                values.push(field[(i, j)]);
            }
        }

        let arrays: Vec<Arc<dyn Array>> = vec![
            Arc::new(StringArray::from(vec![run_id.to_string(); n])),
            Arc::new(StringArray::from(vec![case.to_string(); n])),
            Arc::new(UInt32Array::from(rows)),
            Arc::new(UInt32Array::from(cols)),
            Arc::new(Float64Array::from(values)),
        ];
        let batch = RecordBatch::try_new(self.schema.clone(), arrays)?;
        self.writer.write(&batch)?;
        self.rows += n;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn close(self) -> anyhow::Result<()> {
        self.writer.close()?;
        Ok(())
    }
}

/// Where the manifest of a Parquet output goes: `out.parquet` -> `out.manifest.json`.
pub fn manifest_path(parquet_path: &Path) -> std::path::PathBuf {
    parquet_path.with_extension("manifest.json")
}

/// Write scalar trajectories to Parquet with manifest
pub fn write_trajectories_with_manifest(
    runs: &[(Scheme, Trajectory)],
    exact: Option<&dyn Fn(f64) -> f64>,
    manifest: &RunManifest,
    parquet_path: &Path,
) -> anyhow::Result<()> {
    let mut writer = TrajectoryWriter::new(parquet_path)?;
    for (scheme, trajectory) in runs {
        writer.write_trajectory(&manifest.run_id, *scheme, trajectory, exact)?;
    }
    let rows = writer.rows();
    writer.close()?;

    let mut manifest = manifest.clone();
    manifest.n_records = rows;
    let manifest_file = manifest_path(parquet_path);
    manifest.save_to_file(&manifest_file)?;

    log::info!("Wrote {} trajectory rows to {}", rows, parquet_path.display());
    log::info!("Wrote manifest to {}", manifest_file.display());
    Ok(())
}

/// Write the input fields and every smoothed field of a sweep with manifest.
///
/// The clean field (when present) is stored as case `clean`, the noisy input as
/// `input`, and each result as `<scheme>/<diffusivity>`.
pub fn write_sweep_with_manifest(
    clean: Option<&Field>,
    input: &Field,
    report: &SweepReport,
    manifest: &RunManifest,
    parquet_path: &Path,
) -> anyhow::Result<()> {
    let mut writer = FieldWriter::new(parquet_path)?;
    if let Some(clean) = clean {
        writer.write_field(&manifest.run_id, "clean", clean)?;
    }
    writer.write_field(&manifest.run_id, "input", input)?;
    for result in &report.results {
        let case = format!("{}/{}", result.case.scheme.name(), result.case.diffusivity.name());
        writer.write_field(&manifest.run_id, &case, &result.final_field)?;
    }
    let rows = writer.rows();
    writer.close()?;

    let mut manifest = manifest.clone();
    manifest.n_records = rows;
    let manifest_file = manifest_path(parquet_path);
    manifest.save_to_file(&manifest_file)?;

    log::info!(
        "Wrote {} fields ({} rows) to {}",
        report.n_cases(),
        rows,
        parquet_path.display()
    );
    log::info!("Wrote manifest to {}", manifest_file.display());
    Ok(())
}

/// The per-diffusivity summary printed after a smoothing run.
pub fn format_parameter_report(
    scheme: Scheme,
    diffusivity: &str,
    params: &DiffusivityParams,
    iterations: usize,
    dt: f64,
    rmse: f64,
) -> String {
    format!(
        "Method Used: {}\nDiffusion Coefficient: {}\nParameter Settings: Kappa={}, Alpha={}, Iterations={}, Time={}\nRMSE: {:.4}",
        scheme.description(),
        diffusivity,
        params.kappa,
        params.alpha,
        iterations,
        dt,
        rmse
    )
}

/// Get git commit hash for reproducibility
fn get_git_commit() -> Option<String> {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout).ok()
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
}

fn get_rust_version() -> String {
    std::process::Command::new("rustc")
        .arg("--version")
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout).ok()
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
