// Translation of a buffered problem into good_lp's expression API
// Shared by every good_lp-backed adapter; each adapter only picks the engine
// and applies its own parameters.

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::Result,
    value_objects::{BackendStatus, OptimizationType, RowSense, VariableType},
};
use good_lp::variable::UnsolvedProblem;
use good_lp::{
    variable, Expression, ProblemVariables, ResolutionError, Solution as GoodLpSolution,
    SolverModel, Variable as GoodLpVariable,
};
use std::time::Instant;

pub(crate) struct Translated {
    pub problem: UnsolvedProblem,
    pub columns: Vec<GoodLpVariable>,
}

/// Declare every column and the objective.
pub(crate) fn translate(problem: &OptimizationProblem) -> Translated {
    let mut vars = ProblemVariables::new();
    let columns: Vec<GoodLpVariable> = problem
        .variables
        .iter()
        .map(|column| {
            let mut definition = match column.variable_type {
                VariableType::Binary => variable().binary(),
                VariableType::Integer => variable().integer(),
                VariableType::Continuous => variable(),
            };
            if let Some(lower) = column.lower_bound {
                definition = definition.min(lower);
            }
            if let Some(upper) = column.upper_bound {
                definition = definition.max(upper);
            }
            vars.add(definition.name(column.name.clone()))
        })
        .collect();

    let objective = linear(&problem.objective.terms, &columns);
    let problem = match problem.objective.optimization_type {
        OptimizationType::Maximize => vars.maximise(objective),
        OptimizationType::Minimize => vars.minimise(objective),
    };
    Translated { problem, columns }
}

/// Add every buffered row to an engine-specific model.
pub(crate) fn with_constraints<M: SolverModel>(
    mut model: M,
    problem: &OptimizationProblem,
    columns: &[GoodLpVariable],
) -> M {
    for constraint in &problem.constraints {
        let lhs = linear(&constraint.terms, columns);
        model = match constraint.constraint_type {
            RowSense::LessThanOrEqual => model.with(lhs.leq(constraint.bound)),
            RowSense::Equal => model.with(lhs.eq(constraint.bound)),
            RowSense::GreaterThanOrEqual => model.with(lhs.geq(constraint.bound)),
        };
    }
    model
}

fn linear(terms: &[(usize, f64)], columns: &[GoodLpVariable]) -> Expression {
    let mut expr = Expression::with_capacity(terms.len());
    for &(column, coeff) in terms {
        if coeff != 0.0 {
            expr.add_mul(coeff, columns[column]);
        }
    }
    expr
}

/// Turn a good_lp resolution into a domain solution.
///
/// Resolution failures other than infeasibility and unboundedness are
/// reported as an `Error` status, not as a failed call.
pub(crate) fn into_solution<S: GoodLpSolution>(
    engine: &str,
    problem: &OptimizationProblem,
    columns: &[GoodLpVariable],
    result: std::result::Result<S, ResolutionError>,
    start_time: Instant,
) -> Result<DomainSolution> {
    let statistics =
        SolverStatistics::for_problem(problem, start_time.elapsed().as_secs_f64() * 1000.0);

    let solution = match result {
        Ok(sol) => {
            let variable_values: Vec<f64> = columns.iter().map(|&var| sol.value(var)).collect();
            let objective = problem.objective_value(&variable_values);
            let mut solution = DomainSolution::optimal(objective, variable_values);
            solution.message = format!("Optimal solution found for '{}'", problem.name);
            solution
        }
        Err(ResolutionError::Infeasible) => DomainSolution::new(
            BackendStatus::Infeasible,
            "Problem is infeasible: no solution satisfies all constraints",
        ),
        Err(ResolutionError::Unbounded) => DomainSolution::new(
            BackendStatus::Unbounded,
            "Problem is unbounded: objective can be improved infinitely",
        ),
        Err(e) => {
            tracing::warn!(
                component = "solver",
                solver = engine,
                error = %e,
                "Solver stopped with an unclassified result"
            );
            DomainSolution::new(BackendStatus::Error, format!("{} failed: {}", engine, e))
        }
    };
    Ok(solution.with_statistics(statistics))
}
