// Domain service interface for solving buffered optimization problems
// Every solver adapter implements this contract, so backends can be swapped
// without touching the model compiler.

use super::models::{OptimizationProblem, Solution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for optimization solvers
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    ///
    /// Statuses the solver cannot classify are reported inside the returned
    /// [`Solution`], not as an error.
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();
        let num_vars = problem.num_variables();

        for &(column, coeff) in &problem.objective.terms {
            if column >= num_vars {
                errors.push(format!("Objective references unknown column {}", column));
            }
            if !coeff.is_finite() {
                errors.push(format!("Objective coefficient {} is not finite", coeff));
            }
        }

        for (i, constraint) in problem.constraints.iter().enumerate() {
            for &(column, coeff) in &constraint.terms {
                if column >= num_vars {
                    errors.push(format!(
                        "Constraint {} references column {} but problem has {} variables",
                        i, column, num_vars
                    ));
                }
                if !coeff.is_finite() {
                    errors.push(format!(
                        "Constraint {} has non-finite coefficient {}",
                        i, coeff
                    ));
                }
            }
            if constraint.bound.is_nan() {
                errors.push(format!("Constraint {} has a NaN right-hand side", i));
            }
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if var.lower().is_nan() || var.upper().is_nan() || var.lower() > var.upper() {
                errors.push(format!(
                    "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                    i,
                    var.name,
                    var.lower(),
                    var.upper()
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}
