//! Expression-to-constraint compiler.
//!
//! A [`Model`] owns one [`Backend`] and grows it one column or row at a time:
//! every variable becomes a column, every arithmetic result becomes an
//! anonymous column pinned by an equality row, and every relation becomes a
//! row. The model never shrinks; it is solved once and then only read.

mod compiler;
mod constraints;
pub mod domain_policy;
pub mod error;
pub mod ids;
mod objective;
pub mod registry;
pub mod row;
mod solve;

#[cfg(test)]
mod testing;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::{Backend, BackendResult, ServiceBackend};
use crate::domain::{RowSense, Solution, SolutionStatus, SolverConfig, SolverError};
use domain_policy::Domain;
use error::{ModelError, Result};
use ids::{ColumnId, ModelId, RowId};
use registry::{Registry, Value, Variable, VariableInfo};
use row::LinearRow;

/// Solve lifecycle of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveState {
    Unsolved,
    Solving,
    Solved(SolutionStatus),
}

/// Bookkeeping counters, enough to resume after restoring a backend's own
/// serialized state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub rows: usize,
    pub columns: usize,
}

pub struct Model<B: Backend> {
    backend: B,
    registry: Registry,
    rows: usize,
    columns: usize,
    objective: Option<LinearRow>,
    state: SolveState,
    poisoned: bool,
}

impl Model<ServiceBackend> {
    /// Model backed by the solver that `config` selects.
    pub fn with_config(config: SolverConfig) -> std::result::Result<Self, SolverError> {
        Ok(Self::new(ServiceBackend::from_config(config)?))
    }

    /// Full solver result of the last solve, including statistics.
    pub fn solution(&self) -> Option<&Solution> {
        self.backend.solution()
    }
}

impl<B: Backend> Model<B> {
    pub fn new(backend: B) -> Self {
        let id = ModelId::next();
        tracing::debug!(component = "model", operation = "new", model = id.inner(), "Created model");
        Self {
            backend,
            registry: Registry::new(id),
            rows: 0,
            columns: 0,
            objective: None,
            state: SolveState::Unsolved,
            poisoned: false,
        }
    }

    pub fn id(&self) -> ModelId {
        self.registry.model()
    }

    /// Number of columns created so far.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of constraint rows emitted so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn state(&self) -> SolveState {
        self.state
    }

    /// Terminal status, once solved.
    pub fn status(&self) -> Option<SolutionStatus> {
        match self.state {
            SolveState::Solved(status) => Some(status),
            _ => None,
        }
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Installed objective row, if any.
    pub fn objective(&self) -> Option<&LinearRow> {
        self.objective.as_ref()
    }

    pub fn info(&self, variable: Variable) -> Result<&VariableInfo> {
        self.registry.info(variable)
    }

    pub fn name(&self, variable: Variable) -> Result<&str> {
        Ok(&self.registry.info(variable)?.name)
    }

    pub fn domain(&self, variable: Variable) -> Result<Domain> {
        Ok(self.registry.info(variable)?.domain)
    }

    pub fn constant_value(&self, variable: Variable) -> Result<Option<f64>> {
        Ok(self.registry.info(variable)?.value.constant())
    }

    pub fn variable_by_name(&self, name: &str) -> Option<Variable> {
        self.registry.by_name(name)
    }

    /// All variables in column order.
    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.registry.handles()
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            rows: self.rows,
            columns: self.columns,
        }
    }

    /// Check that the backend holds exactly what `snapshot` records.
    pub fn verify_snapshot(&self, snapshot: ModelSnapshot) -> Result<()> {
        let (rows, columns) = (self.backend.row_count(), self.backend.column_count());
        if snapshot.rows != rows || snapshot.columns != columns {
            return Err(ModelError::SnapshotMismatch {
                expected_rows: snapshot.rows,
                expected_columns: snapshot.columns,
                rows,
                columns,
            });
        }
        Ok(())
    }

    pub fn save_model(&self, path: impl AsRef<Path>) -> Result<()> {
        if self.poisoned {
            return Err(ModelError::Poisoned);
        }
        self.backend
            .save_model(path.as_ref())
            .map_err(|source| ModelError::Backend {
                operation: "save_model",
                source,
            })
    }

    /// Replace this model with one read from `path`.
    ///
    /// The registry and objective are rebuilt from the backend; handles
    /// issued before the load become stale.
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> Result<ModelSnapshot> {
        if self.poisoned {
            return Err(ModelError::Poisoned);
        }
        let path = path.as_ref();
        self.backend_call("load_model", |backend| backend.load_model(path))?;

        let columns = self.backend.column_count();
        let entries = (1..=columns as u32)
            .map(|id| {
                let column = self.backend.column(ColumnId::new(id))?;
                Ok(VariableInfo {
                    domain: Domain::infer(&column),
                    name: column.name,
                    value: Value::Free,
                    expression: None,
                })
            })
            .collect::<BackendResult<Vec<_>>>();
        let entries = match entries {
            Ok(entries) => entries,
            Err(source) => return Err(self.poison("load_model", source)),
        };

        let terms = self.backend.objective_terms();
        self.registry.reset(entries);
        self.columns = columns;
        self.rows = self.backend.row_count();
        self.objective = (!terms.is_empty()).then(|| {
            terms
                .into_iter()
                .fold(LinearRow::new(), |row, (column, coeff)| row.with(column, coeff))
        });
        self.state = SolveState::Unsolved;
        tracing::info!(
            component = "model",
            operation = "load_model",
            path = %path.display(),
            columns = self.columns,
            rows = self.rows,
            "Loaded model"
        );
        Ok(self.snapshot())
    }

    /// Fail unless the model can still grow.
    fn ensure_buildable(&self) -> Result<()> {
        if self.poisoned {
            return Err(ModelError::Poisoned);
        }
        match self.state {
            SolveState::Unsolved => Ok(()),
            _ => Err(ModelError::AlreadySolved),
        }
    }

    fn resolve(&self, variable: Variable) -> Result<ColumnId> {
        self.registry.resolve(variable)
    }

    /// Run a backend directive; a rejection leaves the model unusable.
    fn backend_call<T>(
        &mut self,
        operation: &'static str,
        call: impl FnOnce(&mut B) -> BackendResult<T>,
    ) -> Result<T> {
        call(&mut self.backend).map_err(|source| self.poison(operation, source))
    }

    fn poison(&mut self, operation: &'static str, source: crate::backend::BackendError) -> ModelError {
        self.poisoned = true;
        tracing::warn!(
            component = "model",
            operation,
            error = %source,
            "Backend rejected directive; model is no longer usable"
        );
        ModelError::Backend { operation, source }
    }

    fn emit_row(&mut self, row: &LinearRow, sense: RowSense, rhs: f64) -> Result<RowId> {
        let terms = row.terms();
        self.backend_call("add_row", |backend| backend.add_row(&terms, sense, rhs))?;
        self.rows += 1;
        let id = RowId::new(self.rows as u32);
        tracing::trace!(
            component = "model",
            operation = "add_row",
            row = %id,
            terms = terms.len(),
            sense = %sense,
            rhs,
            "Emitted row"
        );
        Ok(id)
    }
}
