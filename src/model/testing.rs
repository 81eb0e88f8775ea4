//! Recording backend double for model tests.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::backend::{Backend, BackendError, BackendResult};
use crate::domain::{BackendStatus, Column, RowSense, VariableType};
use crate::model::ids::ColumnId;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddColumn,
    SetName(u32, String),
    SetInteger(u32, bool),
    SetBinary(u32),
    SetBounds(u32, f64, f64),
    AddRow(Vec<(u32, f64)>, RowSense, f64),
    SetObjective(Vec<(u32, f64)>),
    SetMaximize,
    Solve,
}

#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn rows(&self) -> Vec<(Vec<(u32, f64)>, RowSense, f64)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::AddRow(terms, sense, rhs) => Some((terms, sense, rhs)),
                _ => None,
            })
            .collect()
    }

    pub fn last_row(&self) -> Option<(Vec<(u32, f64)>, RowSense, f64)> {
        self.rows().pop()
    }

    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    fn count(&self, operation: &str) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|call| operation_name(call) == operation)
            .count()
    }
}

fn operation_name(call: &Call) -> &'static str {
    match call {
        Call::AddColumn => "add_column",
        Call::SetName(..) => "set_column_name",
        Call::SetInteger(..) => "set_integer",
        Call::SetBinary(_) => "set_binary",
        Call::SetBounds(..) => "set_bounds",
        Call::AddRow(..) => "add_row",
        Call::SetObjective(_) => "set_objective",
        Call::SetMaximize => "set_maximize",
        Call::Solve => "solve",
    }
}

/// Logs every directive and answers `solve()` with a scripted outcome.
pub struct RecordingBackend {
    log: CallLog,
    columns: Vec<Column>,
    rows: usize,
    objective: Vec<(ColumnId, f64)>,
    reject: Option<(&'static str, usize)>,
    status: BackendStatus,
    values: Option<Vec<f64>>,
    solved: bool,
}

impl RecordingBackend {
    pub fn new() -> (Self, CallLog) {
        let log = CallLog::default();
        let backend = Self {
            log: log.clone(),
            columns: Vec::new(),
            rows: 0,
            objective: Vec::new(),
            reject: None,
            status: BackendStatus::Optimal,
            values: None,
            solved: false,
        };
        (backend, log)
    }

    /// Reject the `nth` (1-based) call of `operation`.
    pub fn reject_at(mut self, operation: &'static str, nth: usize) -> Self {
        self.reject = Some((operation, nth));
        self
    }

    pub fn solving_to(mut self, status: BackendStatus, values: Vec<f64>) -> Self {
        self.status = status;
        self.values = Some(values);
        self
    }

    fn record(&mut self, call: Call) -> BackendResult<()> {
        let operation = operation_name(&call);
        self.log.push(call);
        match self.reject {
            Some((rejected, nth)) if rejected == operation && self.log.count(operation) == nth => {
                Err(BackendError::Rejected(format!("{} #{}", operation, nth)))
            }
            _ => Ok(()),
        }
    }

    fn column_mut(&mut self, column: ColumnId) -> BackendResult<&mut Column> {
        self.columns
            .get_mut(column.offset())
            .ok_or(BackendError::UnknownColumn(column))
    }
}

fn raw(terms: &[(ColumnId, f64)]) -> Vec<(u32, f64)> {
    terms.iter().map(|(c, v)| (c.inner(), *v)).collect()
}

impl Backend for RecordingBackend {
    fn add_column(&mut self) -> BackendResult<()> {
        self.record(Call::AddColumn)?;
        let id = ColumnId::from_offset(self.columns.len());
        self.columns.push(Column::continuous(id.to_string()));
        Ok(())
    }

    fn set_column_name(&mut self, column: ColumnId, name: &str) -> BackendResult<()> {
        self.record(Call::SetName(column.inner(), name.to_string()))?;
        self.column_mut(column)?.name = name.to_string();
        Ok(())
    }

    fn set_integer(&mut self, column: ColumnId, is_integer: bool) -> BackendResult<()> {
        self.record(Call::SetInteger(column.inner(), is_integer))?;
        if is_integer {
            self.column_mut(column)?.variable_type = VariableType::Integer;
        }
        Ok(())
    }

    fn set_binary(&mut self, column: ColumnId) -> BackendResult<()> {
        self.record(Call::SetBinary(column.inner()))?;
        let col = self.column_mut(column)?;
        col.variable_type = VariableType::Binary;
        col.set_bounds(0.0, 1.0);
        Ok(())
    }

    fn set_bounds(&mut self, column: ColumnId, lower: f64, upper: f64) -> BackendResult<()> {
        self.record(Call::SetBounds(column.inner(), lower, upper))?;
        self.column_mut(column)?.set_bounds(lower, upper);
        Ok(())
    }

    fn add_row(
        &mut self,
        terms: &[(ColumnId, f64)],
        sense: RowSense,
        rhs: f64,
    ) -> BackendResult<()> {
        self.record(Call::AddRow(raw(terms), sense, rhs))?;
        self.rows += 1;
        Ok(())
    }

    fn set_objective(&mut self, terms: &[(ColumnId, f64)]) -> BackendResult<()> {
        self.record(Call::SetObjective(raw(terms)))?;
        self.objective = terms.to_vec();
        Ok(())
    }

    fn objective_terms(&self) -> Vec<(ColumnId, f64)> {
        self.objective.clone()
    }

    fn set_maximize(&mut self) {
        self.log.push(Call::SetMaximize);
    }

    fn solve(&mut self) -> BackendResult<BackendStatus> {
        self.record(Call::Solve)?;
        self.solved = true;
        Ok(self.status)
    }

    fn solution_values(&self) -> BackendResult<Vec<f64>> {
        match (&self.values, self.solved) {
            (Some(values), true) => Ok(values.clone()),
            _ => Err(BackendError::Rejected("no solution".to_string())),
        }
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn row_count(&self) -> usize {
        self.rows
    }

    fn column(&self, column: ColumnId) -> BackendResult<Column> {
        self.columns
            .get(column.offset())
            .cloned()
            .ok_or(BackendError::UnknownColumn(column))
    }

    fn save_model(&self, _path: &Path) -> BackendResult<()> {
        Ok(())
    }

    fn load_model(&mut self, _path: &Path) -> BackendResult<()> {
        Err(BackendError::Rejected("recording backend cannot load".to_string()))
    }
}
