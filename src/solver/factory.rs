use crate::domain::{
    models::OptimizationProblem,
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
use std::sync::Arc;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create the solver named by the problem's configuration
    pub fn create_solver(problem: &OptimizationProblem) -> Result<Arc<dyn SolverService>> {
        Self::create_from_backend(problem.solver_config.backend)
    }

    /// Create a solver for a specific backend
    ///
    /// Backends whose cargo feature is disabled yield
    /// [`SolverError::SolverNotAvailable`].
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        let solver: Option<Arc<dyn SolverService>> = match backend {
            SolverBackend::Auto => Self::auto(),
            SolverBackend::Highs => Self::highs(),
            SolverBackend::CoinCbc => Self::coin_cbc(),
            SolverBackend::MicroLp => Self::microlp(),
        };
        let solver = solver.ok_or_else(|| {
            SolverError::SolverNotAvailable(format!(
                "{} support was not compiled into this build",
                backend
            ))
        })?;
        tracing::debug!(
            component = "solver",
            requested = %backend,
            solver = solver.name(),
            "Selected solver"
        );
        Ok(solver)
    }

    /// Get the default solver
    pub fn default_solver() -> Result<Arc<dyn SolverService>> {
        Self::create_from_backend(SolverBackend::Auto)
    }

    fn auto() -> Option<Arc<dyn SolverService>> {
        Self::highs()
            .or_else(Self::coin_cbc)
            .or_else(Self::microlp)
    }

    fn highs() -> Option<Arc<dyn SolverService>> {
        #[cfg(feature = "highs")]
        return Some(Arc::new(super::HighsSolver::new()));
        #[cfg(not(feature = "highs"))]
        return None;
    }

    fn coin_cbc() -> Option<Arc<dyn SolverService>> {
        #[cfg(feature = "coin_cbc")]
        return Some(Arc::new(super::CoinCbcSolver::new()));
        #[cfg(not(feature = "coin_cbc"))]
        return None;
    }

    fn microlp() -> Option<Arc<dyn SolverService>> {
        #[cfg(feature = "microlp")]
        return Some(Arc::new(super::MicroLpSolver::new()));
        #[cfg(not(feature = "microlp"))]
        return None;
    }
}
