//! Column/row primitives the model compiler drives.
//!
//! A [`Backend`] is the only place a model's problem data lives. The model
//! keeps its own counters and variable registry, and issues one directive per
//! primitive in a fixed order; a backend only has to accept or reject each.

mod service;

pub use service::ServiceBackend;

use std::path::Path;

use crate::domain::{BackendStatus, Column, RowSense, SolverError};
use crate::model::ids::ColumnId;

/// Failure reported by a backend directive.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend rejected directive: {0}")]
    Rejected(String),

    #[error("backend has no column {0}")]
    UnknownColumn(ColumnId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model file at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("JSON model error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Optimization backend exposing column/row primitives.
///
/// Column ids are 1-based and assigned by the caller in append order: the
/// `n`-th successful [`add_column`](Backend::add_column) creates column `n`.
pub trait Backend {
    /// Append a continuous column with lower bound 0 and no upper bound.
    fn add_column(&mut self) -> BackendResult<()>;

    fn set_column_name(&mut self, column: ColumnId, name: &str) -> BackendResult<()>;

    fn set_integer(&mut self, column: ColumnId, is_integer: bool) -> BackendResult<()>;

    /// Mark a column binary: integer with bounds `[0, 1]`.
    fn set_binary(&mut self, column: ColumnId) -> BackendResult<()>;

    /// Install both bounds; infinities stand for "no bound".
    fn set_bounds(&mut self, column: ColumnId, lower: f64, upper: f64) -> BackendResult<()>;

    fn add_row(&mut self, terms: &[(ColumnId, f64)], sense: RowSense, rhs: f64)
        -> BackendResult<()>;

    /// Replace the objective row.
    fn set_objective(&mut self, terms: &[(ColumnId, f64)]) -> BackendResult<()>;

    /// Installed objective row, in column order.
    fn objective_terms(&self) -> Vec<(ColumnId, f64)>;

    fn set_maximize(&mut self);

    /// Run the solver to completion.
    fn solve(&mut self) -> BackendResult<BackendStatus>;

    /// Dense solution buffer; offset `i` holds the value of column `i + 1`.
    fn solution_values(&self) -> BackendResult<Vec<f64>>;

    fn column_count(&self) -> usize;

    fn row_count(&self) -> usize;

    /// Metadata of an existing column.
    fn column(&self, column: ColumnId) -> BackendResult<Column>;

    fn save_model(&self, path: &Path) -> BackendResult<()>;

    /// Replace the backend's whole state with the model stored at `path`.
    fn load_model(&mut self, path: &Path) -> BackendResult<()>;
}
