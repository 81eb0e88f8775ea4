use std::path::Path;
use std::sync::Arc;

use super::{Backend, BackendError, BackendResult};
use crate::domain::{
    BackendStatus, Column, Constraint, OptimizationProblem, OptimizationType, RowSense, Solution,
    SolverConfig, SolverError, SolverService, VariableType,
};
use crate::model::ids::{ColumnId, RowId};
use crate::persist;
use crate::solver::SolverFactory;

/// Backend that buffers every directive into an [`OptimizationProblem`]
/// and hands the finished problem to a [`SolverService`] on `solve()`.
pub struct ServiceBackend {
    problem: OptimizationProblem,
    service: Arc<dyn SolverService>,
    solution: Option<Solution>,
}

impl ServiceBackend {
    pub fn new(service: Arc<dyn SolverService>) -> Self {
        Self {
            problem: OptimizationProblem::default(),
            service,
            solution: None,
        }
    }

    /// Build a backend around the solver selected by `config.backend`.
    pub fn from_config(config: SolverConfig) -> Result<Self, SolverError> {
        let service = SolverFactory::create_from_backend(config.backend)?;
        let mut backend = Self::new(service);
        backend.problem.solver_config = config;
        Ok(backend)
    }

    pub fn problem(&self) -> &OptimizationProblem {
        &self.problem
    }

    /// Result of the last `solve()`, if any.
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    fn column_mut(&mut self, column: ColumnId) -> BackendResult<&mut Column> {
        if column.inner() == 0 {
            return Err(BackendError::UnknownColumn(column));
        }
        self.problem
            .variables
            .get_mut(column.offset())
            .ok_or(BackendError::UnknownColumn(column))
    }

    fn to_offsets(&self, terms: &[(ColumnId, f64)]) -> BackendResult<Vec<(usize, f64)>> {
        let columns = self.problem.num_variables();
        terms
            .iter()
            .map(|&(column, coeff)| {
                if column.inner() == 0 || column.offset() >= columns {
                    Err(BackendError::UnknownColumn(column))
                } else {
                    Ok((column.offset(), coeff))
                }
            })
            .collect()
    }
}

impl Backend for ServiceBackend {
    fn add_column(&mut self) -> BackendResult<()> {
        let id = ColumnId::from_offset(self.problem.num_variables());
        self.problem.variables.push(Column::continuous(id.to_string()));
        Ok(())
    }

    fn set_column_name(&mut self, column: ColumnId, name: &str) -> BackendResult<()> {
        if name.is_empty() {
            return Err(BackendError::Rejected(format!(
                "empty name for column {}",
                column
            )));
        }
        self.column_mut(column)?.name = name.to_string();
        Ok(())
    }

    fn set_integer(&mut self, column: ColumnId, is_integer: bool) -> BackendResult<()> {
        let col = self.column_mut(column)?;
        col.variable_type = if is_integer {
            VariableType::Integer
        } else {
            VariableType::Continuous
        };
        Ok(())
    }

    fn set_binary(&mut self, column: ColumnId) -> BackendResult<()> {
        let col = self.column_mut(column)?;
        col.variable_type = VariableType::Binary;
        col.set_bounds(0.0, 1.0);
        Ok(())
    }

    fn set_bounds(&mut self, column: ColumnId, lower: f64, upper: f64) -> BackendResult<()> {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(BackendError::Rejected(format!(
                "invalid bounds [{}, {}] for column {}",
                lower, upper, column
            )));
        }
        self.column_mut(column)?.set_bounds(lower, upper);
        Ok(())
    }

    fn add_row(
        &mut self,
        terms: &[(ColumnId, f64)],
        sense: RowSense,
        rhs: f64,
    ) -> BackendResult<()> {
        let terms = self.to_offsets(terms)?;
        let id = RowId::new(self.problem.num_constraints() as u32 + 1);
        self.problem
            .constraints
            .push(Constraint::new(sense, terms, rhs).with_name(id.to_string()));
        Ok(())
    }

    fn set_objective(&mut self, terms: &[(ColumnId, f64)]) -> BackendResult<()> {
        self.problem.objective.terms = self.to_offsets(terms)?;
        Ok(())
    }

    fn objective_terms(&self) -> Vec<(ColumnId, f64)> {
        self.problem
            .objective
            .terms
            .iter()
            .map(|&(offset, coeff)| (ColumnId::from_offset(offset), coeff))
            .collect()
    }

    fn set_maximize(&mut self) {
        self.problem.objective.optimization_type = OptimizationType::Maximize;
    }

    fn solve(&mut self) -> BackendResult<BackendStatus> {
        if self.problem.is_mixed_integer() && !self.service.supports_mip() {
            return Err(BackendError::Rejected(format!(
                "{} cannot solve problems with integer columns",
                self.service.name()
            )));
        }
        let solution = self.service.solve(&self.problem)?;
        let status = solution.status;
        self.solution = Some(solution);
        Ok(status)
    }

    fn solution_values(&self) -> BackendResult<Vec<f64>> {
        self.solution
            .as_ref()
            .map(|s| s.variable_values.clone())
            .ok_or_else(|| BackendError::Rejected("no solution available".to_string()))
    }

    fn column_count(&self) -> usize {
        self.problem.num_variables()
    }

    fn row_count(&self) -> usize {
        self.problem.num_constraints()
    }

    fn column(&self, column: ColumnId) -> BackendResult<Column> {
        if column.inner() == 0 {
            return Err(BackendError::UnknownColumn(column));
        }
        self.problem
            .variables
            .get(column.offset())
            .cloned()
            .ok_or(BackendError::UnknownColumn(column))
    }

    fn save_model(&self, path: &Path) -> BackendResult<()> {
        persist::save(&self.problem, path)
    }

    fn load_model(&mut self, path: &Path) -> BackendResult<()> {
        let config = self.problem.solver_config.clone();
        self.problem = persist::load(path)?;
        self.problem.solver_config = config;
        self.solution = None;
        Ok(())
    }
}
