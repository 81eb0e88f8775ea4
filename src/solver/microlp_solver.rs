// microlp Solver Adapter
// Pure-Rust engine reached through good_lp; needs no native library.

use super::good_lp_common::{into_solution, translate, with_constraints};
use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution},
    solver_service::{Result, SolverService},
};
use good_lp::{solvers::microlp::microlp, SolverModel};
use std::time::Instant;

pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicroLpSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;
        let start_time = Instant::now();

        if problem.solver_config.time_limit.is_some() || problem.solver_config.gap_tolerance.is_some()
        {
            tracing::debug!(
                component = "solver",
                solver = self.name(),
                "Ignoring time limit and gap tolerance; microlp has no such parameters"
            );
        }

        let translated = translate(problem);
        let model = with_constraints(
            translated.problem.using(microlp),
            problem,
            &translated.columns,
        );
        into_solution(
            self.name(),
            problem,
            &translated.columns,
            model.solve(),
            start_time,
        )
    }

    fn name(&self) -> &str {
        "microlp"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
