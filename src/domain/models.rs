use serde::{Deserialize, Serialize};

use super::value_objects::{BackendStatus, OptimizationType, RowSense, SolverBackend, VariableType};

/// Decision column in a buffered optimization problem
///
/// Missing bounds stand for infinity, which keeps the model representable
/// in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub variable_type: VariableType,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Column {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Continuous,
            lower_bound: Some(0.0),
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Integer,
            lower_bound: Some(0.0),
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: Some(0.0),
            upper_bound: Some(1.0),
            name: name.into(),
        }
    }

    /// Set both bounds; infinite values are stored as absent.
    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.set_bounds(lower, upper);
        self
    }

    pub fn set_bounds(&mut self, lower: f64, upper: f64) {
        self.lower_bound = (lower != f64::NEG_INFINITY).then_some(lower);
        self.upper_bound = (upper != f64::INFINITY).then_some(upper);
    }

    pub fn lower(&self) -> f64 {
        self.lower_bound.unwrap_or(f64::NEG_INFINITY)
    }

    pub fn upper(&self) -> f64 {
        self.upper_bound.unwrap_or(f64::INFINITY)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.variable_type,
            VariableType::Integer | VariableType::Binary
        )
    }
}

/// Objective row and its direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    /// Sparse `(column index, coefficient)` terms, 0-based
    pub terms: Vec<(usize, f64)>,
}

impl Default for ObjectiveFunction {
    fn default() -> Self {
        Self {
            optimization_type: OptimizationType::Minimize,
            terms: Vec::new(),
        }
    }
}

impl ObjectiveFunction {
    pub fn coefficient(&self, column: usize) -> f64 {
        self.terms
            .iter()
            .filter(|(c, _)| *c == column)
            .map(|(_, coeff)| coeff)
            .sum()
    }
}

/// Linear constraint over sparse terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub constraint_type: RowSense,
    /// Sparse `(column index, coefficient)` terms, 0-based
    pub terms: Vec<(usize, f64)>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: RowSense, terms: Vec<(usize, f64)>, bound: f64) -> Self {
        Self {
            constraint_type,
            terms,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Configuration for the solver invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Wall-clock limit in seconds, enforced by the solver itself
    pub time_limit: Option<f64>,
    /// Relative MIP gap at which the solver may stop
    pub gap_tolerance: Option<f64>,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            gap_tolerance: None,
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn new(backend: SolverBackend) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_gap_tolerance(mut self, gap: f64) -> Self {
        self.gap_tolerance = Some(gap);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Complete buffered optimization problem
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationProblem {
    pub name: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Column>,
    pub solver_config: SolverConfig,
}

impl OptimizationProblem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_integer_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integer()).count()
    }

    pub fn num_binary_variables(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.variable_type == VariableType::Binary)
            .count()
    }

    pub fn is_mixed_integer(&self) -> bool {
        self.num_integer_variables() > 0
    }

    /// Objective value of a dense assignment of column values.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .terms
            .iter()
            .map(|&(column, coeff)| coeff * values.get(column).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_integer_vars: u32,
    pub num_binary_vars: u32,
}

impl SolverStatistics {
    pub fn for_problem(problem: &OptimizationProblem, solve_time_ms: f64) -> Self {
        Self {
            solve_time_ms,
            num_variables: problem.num_variables() as u32,
            num_constraints: problem.num_constraints() as u32,
            num_integer_vars: (problem.num_integer_variables() - problem.num_binary_variables())
                as u32,
            num_binary_vars: problem.num_binary_variables() as u32,
        }
    }
}

/// Solution to an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: BackendStatus,
    pub optimal_value: Option<f64>,
    /// Column values in column order; empty when the solver produced none
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl Solution {
    pub fn new(status: BackendStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            optimal_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: BackendStatus::Optimal,
            optimal_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == BackendStatus::Optimal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_bounds_are_stored_as_absent() {
        let column = Column::continuous("x").with_bounds(f64::NEG_INFINITY, f64::INFINITY);
        assert_eq!(column.lower_bound, None);
        assert_eq!(column.upper_bound, None);
        assert_eq!(column.lower(), f64::NEG_INFINITY);
        assert_eq!(column.upper(), f64::INFINITY);
    }

    #[test]
    fn statistics_split_integer_and_binary_counts() {
        let mut problem = OptimizationProblem::new("counts");
        problem.variables = vec![
            Column::integer("a"),
            Column::binary("b"),
            Column::continuous("c"),
        ];
        let stats = SolverStatistics::for_problem(&problem, 1.5);
        assert_eq!(stats.num_variables, 3);
        assert_eq!(stats.num_integer_vars, 1);
        assert_eq!(stats.num_binary_vars, 1);
        assert!(problem.is_mixed_integer());
    }

    #[test]
    fn objective_value_uses_sparse_terms() {
        let mut problem = OptimizationProblem::new("obj");
        problem.variables = vec![Column::continuous("x"), Column::continuous("y")];
        problem.objective.terms = vec![(0, 2.0), (1, -1.0)];
        assert_eq!(problem.objective_value(&[3.0, 4.0]), 2.0);
    }

    #[test]
    fn problem_survives_json_roundtrip_with_unbounded_columns() {
        let mut problem = OptimizationProblem::new("json");
        problem.variables = vec![Column::integer("x").with_bounds(f64::NEG_INFINITY, 4.0)];
        problem
            .constraints
            .push(Constraint::new(RowSense::Equal, vec![(0, 1.0)], 2.0).with_name("R1"));
        let text = serde_json::to_string(&problem).expect("serialize");
        let back: OptimizationProblem = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, problem);
    }
}
