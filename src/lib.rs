// Domain layer: backend-facing problem models and the solver contract
pub mod domain;

// Model layer: variables, expressions and constraints compiled into rows
pub mod model;

// Backend layer: the directive interface a model drives
pub mod backend;

// Persistence: native JSON and free MPS model files
pub mod persist;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use backend::{Backend, BackendError, ServiceBackend};
pub use domain::{
    BackendStatus, OptimizationProblem, Solution, SolutionStatus, SolverBackend, SolverConfig,
    SolverError, SolverService,
};
pub use model::domain_policy::Domain;
pub use model::error::ModelError;
pub use model::ids::ColumnId;
pub use model::registry::Variable;
pub use model::{Model, ModelSnapshot, SolveState};
pub use solver::SolverFactory;
