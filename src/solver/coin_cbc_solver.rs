// COIN-OR CBC Solver Adapter
// good_lp front end over the native CBC library.

use super::good_lp_common::{into_solution, translate, with_constraints};
use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution},
    solver_service::{Result, SolverService},
};
use good_lp::{solvers::coin_cbc::coin_cbc, SolverModel};
use std::time::Instant;

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;
        let start_time = Instant::now();
        let config = &problem.solver_config;

        let translated = translate(problem);
        let mut model = translated.problem.using(coin_cbc);
        if let Some(seconds) = config.time_limit {
            model.set_parameter("seconds", &seconds.to_string());
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_parameter("ratioGap", &gap.to_string());
        }
        model.set_parameter("log", if config.verbose { "1" } else { "0" });

        let model = with_constraints(model, problem, &translated.columns);
        into_solution(
            self.name(),
            problem,
            &translated.columns,
            model.solve(),
            start_time,
        )
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
