//! Time integration of scalar ODEs and of Perona-Malik style anisotropic
//! diffusion on 2-D fields.

pub mod diffusion;
pub mod diffusivity;
pub mod error;
pub mod field_integrators;
pub mod integrators;
pub mod measure;
pub mod operator;
pub mod path;
pub mod rhs;
pub mod solver;
pub mod state;

// Core types
pub use error::{Error, Result};
pub use path::{TimeGrid, Trajectory};
pub use state::{Field, FieldHistory, Time};

// Right-hand sides
pub use diffusion::DiffusionRhs;
pub use diffusivity::{diffusivity_function, Diffusivity, DiffusivityParams};
pub use rhs::ScalarRhs;

// Scalar integrators
pub use integrators::{
    integrate_scalar, AdamsBashforth4, AdamsMoulton4, RungeKutta4, ScalarIntegrator, Scheme,
    Sdirk3,
};
pub use solver::{FixedPointSolver, ImplicitStageSolver, NewtonSolver, SolverConfig};

// Field integrators
pub use field_integrators::{
    integrate_field, run_scheme, FieldAb4, FieldAbm4, FieldIntegrator, FieldRk4, FieldRun,
    FieldRunSpec, FieldSdirk3, FieldStageSolver, FixedPointStageSolver, NewtonKrylovStageSolver,
};

// Diagnostics
pub use measure::{rmse, total_variation};
