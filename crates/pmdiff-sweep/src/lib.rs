use pmdiff_core::{
    rmse, run_scheme, total_variation, DiffusionRhs, Diffusivity, DiffusivityParams, Field,
    FieldRunSpec, Result, Scheme,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One scheme/diffusivity combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SweepCase {
    pub scheme: Scheme,
    pub diffusivity: Diffusivity,
}

/// Parameters shared by every case of a sweep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    pub dt: f64,
    pub iterations: usize,
    pub params: DiffusivityParams,
}

/// Outcome of a single case.
#[derive(Clone, Debug)]
pub struct CaseResult {
    pub case: SweepCase,
    pub final_field: Field,
    /// RMSE between the input and the smoothed field.
    pub rmse_to_input: f64,
    /// RMSE against the clean field, when one was supplied.
    pub rmse_to_reference: Option<f64>,
    pub tv_initial: f64,
    pub tv_final: f64,
    pub stored_fields: usize,
}

/// All cases of a sweep, in the order they were requested.
#[derive(Clone, Debug)]
pub struct SweepReport {
    pub spec: SweepSpec,
    pub results: Vec<CaseResult>,
}

/// Statistical summary of a sweep
#[derive(Clone, Debug, PartialEq)]
pub struct SweepStats {
    pub n_cases: usize,
    pub mean_tv_reduction: f64,
    pub best_case: Option<SweepCase>,
    pub best_rmse: Option<f64>,
}

/// Runs field integrations of one input for many cases.
pub struct Sweep {
    pub input: Field,
    pub reference: Option<Field>,
}

impl Sweep {
    pub fn new(input: Field) -> Self {
        Self {
            input,
            reference: None,
        }
    }

    /// Scores results against a clean field as well as the input.
    pub fn with_reference(mut self, reference: Field) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Run all cases in parallel; results keep the order of `cases`.
    pub fn run_cases(&self, cases: &[SweepCase], spec: &SweepSpec) -> Result<SweepReport> {
        log::info!(
            "sweeping {} cases on a {:?} field ({} threads)",
            cases.len(),
            self.input.shape(),
            rayon::current_num_threads()
        );
        let results = cases
            .par_iter()
            .map(|case| self.run_case(*case, spec))
            .collect::<Result<Vec<_>>>()?;
        Ok(SweepReport {
            spec: *spec,
            results,
        })
    }

    /// Same as [`run_cases`](Self::run_cases) on the calling thread.
    pub fn run_cases_sequential(
        &self,
        cases: &[SweepCase],
        spec: &SweepSpec,
    ) -> Result<SweepReport> {
        let results = cases
            .iter()
            .map(|case| self.run_case(*case, spec))
            .collect::<Result<Vec<_>>>()?;
        Ok(SweepReport {
            spec: *spec,
            results,
        })
    }

    /// Run a single case (called by run_cases)
    pub fn run_case(&self, case: SweepCase, spec: &SweepSpec) -> Result<CaseResult> {
        let rhs = DiffusionRhs::new(case.diffusivity, spec.params)?;
        let run_spec = FieldRunSpec::new(spec.dt, spec.iterations)?;
        let run = run_scheme(case.scheme, &rhs, &self.input, &run_spec)?;
        let stored_fields = run.history.len();
        let final_field = run.into_final_field();

        let rmse_to_reference = match &self.reference {
            Some(reference) => Some(rmse(reference, &final_field)?),
            None => None,
        };
        let result = CaseResult {
            case,
            rmse_to_input: rmse(&self.input, &final_field)?,
            rmse_to_reference,
            tv_initial: total_variation(&self.input),
            tv_final: total_variation(&final_field),
            stored_fields,
            final_field,
        };
        log::debug!(
            "{}/{}: rmse {:.4}, tv {:.3} -> {:.3}",
            case.scheme,
            case.diffusivity,
            result.rmse_to_input,
            result.tv_initial,
            result.tv_final
        );
        Ok(result)
    }
}

/// One case per diffusivity family, all with `scheme`.
pub fn all_diffusivities(scheme: Scheme) -> Vec<SweepCase> {
    Diffusivity::ALL
        .iter()
        .map(|&diffusivity| SweepCase {
            scheme,
            diffusivity,
        })
        .collect()
}

/// Every scheme crossed with every diffusivity.
pub fn full_grid() -> Vec<SweepCase> {
    Scheme::ALL
        .iter()
        .flat_map(|&scheme| all_diffusivities(scheme))
        .collect()
}

impl CaseResult {
    pub fn tv_reduction(&self) -> f64 {
        if self.tv_initial > 0.0 {
            1.0 - self.tv_final / self.tv_initial
        } else {
            0.0
        }
    }
}

impl SweepReport {
    pub fn n_cases(&self) -> usize {
        self.results.len()
    }

    pub fn get(&self, case: SweepCase) -> Option<&CaseResult> {
        self.results.iter().find(|r| r.case == case)
    }

    pub fn statistics(&self) -> SweepStats {
        if self.results.is_empty() {
            return SweepStats::empty();
        }
        let mean_tv_reduction = self.results.iter().map(CaseResult::tv_reduction).sum::<f64>()
            / self.results.len() as f64;

        let best = self
            .results
            .iter()
            .filter_map(|r| r.rmse_to_reference.map(|e| (r.case, e)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        SweepStats {
            n_cases: self.results.len(),
            mean_tv_reduction,
            best_case: best.map(|(case, _)| case),
            best_rmse: best.map(|(_, e)| e),
        }
    }
}

impl SweepStats {
    fn empty() -> Self {
        Self {
            n_cases: 0,
            mean_tv_reduction: 0.0,
            best_case: None,
            best_rmse: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmdiff_models::{step_edge, NoiseGenerator};

    fn spec(iterations: usize) -> SweepSpec {
        SweepSpec {
            dt: 0.1,
            iterations,
            params: DiffusivityParams::new(1.0, 1.0).unwrap(),
        }
    }

    #[test]
    fn test_case_lists() {
        assert_eq!(all_diffusivities(Scheme::Rk4).len(), 5);
        assert_eq!(full_grid().len(), 20);
    }

    #[test]
    fn test_report_keeps_case_order() {
        let clean = step_edge(10, 10, 0.0, 1.0);
        let noisy = NoiseGenerator::new(42).gaussian(&clean, 0.05);
        let sweep = Sweep::new(noisy).with_reference(clean);
        let cases = all_diffusivities(Scheme::Abm4);

        let report = sweep.run_cases(&cases, &spec(6)).unwrap();

        assert_eq!(report.n_cases(), 5);
        for (result, case) in report.results.iter().zip(cases.iter()) {
            assert_eq!(result.case, *case);
            assert_eq!(result.stored_fields, 7);
            assert!(result.rmse_to_reference.is_some());
            assert!(result.tv_final < result.tv_initial);
        }
        let stats = report.statistics();
        assert_eq!(stats.n_cases, 5);
        assert!(stats.best_case.is_some());
        assert!(stats.mean_tv_reduction > 0.0);
    }

    #[test]
    fn test_errors_surface_from_any_case() {
        let sweep = Sweep::new(step_edge(6, 6, 0.0, 1.0));
        let err = sweep.run_cases(&all_diffusivities(Scheme::Ab4), &spec(2)).unwrap_err();
        assert!(matches!(err, pmdiff_core::Error::InsufficientHistory { .. }));
    }
}
