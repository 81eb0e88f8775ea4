// HiGHS Solver Adapter
// Translates a buffered problem into a HiGHS RowProblem (columns first, then rows).

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverService},
    value_objects::{BackendStatus, OptimizationType, RowSense},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;
        let start_time = Instant::now();
        let config = &problem.solver_config;

        let mut pb = RowProblem::default();
        let cols: Vec<_> = problem
            .variables
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let cost = problem.objective.coefficient(i);
                let bounds = column.lower()..=column.upper();
                if column.is_integer() {
                    pb.add_integer_column(cost, bounds)
                } else {
                    pb.add_column(cost, bounds)
                }
            })
            .collect();

        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .terms
                .iter()
                .filter(|(_, coeff)| *coeff != 0.0)
                .map(|&(i, coeff)| (cols[i], coeff))
                .collect();
            let bound = constraint.bound;
            match constraint.constraint_type {
                RowSense::LessThanOrEqual => pb.add_row(..=bound, &terms),
                RowSense::Equal => pb.add_row(bound..=bound, &terms),
                RowSense::GreaterThanOrEqual => pb.add_row(bound.., &terms),
            }
        }

        let sense = match problem.objective.optimization_type {
            OptimizationType::Maximize => Sense::Maximise,
            OptimizationType::Minimize => Sense::Minimise,
        };
        let mut model = pb.optimise(sense);
        if !config.verbose {
            model.make_quiet();
        }
        if let Some(seconds) = config.time_limit {
            model.set_option("time_limit", seconds);
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_option("mip_rel_gap", gap);
        }

        let solved = model.solve();
        let statistics =
            SolverStatistics::for_problem(problem, start_time.elapsed().as_secs_f64() * 1000.0);

        let native = solved.status();
        let solution = match backend_status(&native) {
            BackendStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                let objective = problem.objective_value(&variable_values);
                let mut solution = DomainSolution::optimal(objective, variable_values);
                solution.message = format!("Optimal solution found for '{}'", problem.name);
                solution
            }
            BackendStatus::Infeasible => DomainSolution::new(
                BackendStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            ),
            BackendStatus::Unbounded => DomainSolution::new(
                BackendStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            ),
            BackendStatus::TimeLimit => {
                DomainSolution::new(BackendStatus::TimeLimit, "HiGHS reached its time limit")
            }
            BackendStatus::IterationLimit => DomainSolution::new(
                BackendStatus::IterationLimit,
                "HiGHS reached its iteration limit",
            ),
            status => {
                tracing::warn!(
                    component = "solver",
                    solver = self.name(),
                    native_status = ?native,
                    "Solver stopped with an unclassified result"
                );
                DomainSolution::new(
                    status,
                    format!("HiGHS solver returned status: {:?}", native),
                )
            }
        };
        Ok(solution.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

/// Native model status to backend status.
///
/// `UnboundedOrInfeasible` is not a definite answer and maps to `Error`.
fn backend_status(status: &HighsModelStatus) -> BackendStatus {
    match status {
        HighsModelStatus::Optimal => BackendStatus::Optimal,
        HighsModelStatus::Infeasible => BackendStatus::Infeasible,
        HighsModelStatus::Unbounded => BackendStatus::Unbounded,
        HighsModelStatus::ReachedTimeLimit => BackendStatus::TimeLimit,
        HighsModelStatus::ReachedIterationLimit => BackendStatus::IterationLimit,
        _ => BackendStatus::Error,
    }
}
