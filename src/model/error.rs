//! Model construction and solve errors.

use super::domain_policy::Domain;
use super::ids::ColumnId;
use crate::backend::BackendError;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("backend failed during {operation}: {source}")]
    Backend {
        operation: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("domain {0} is not supported")]
    UnsupportedDomain(Domain),

    #[error("unknown domain name '{0}'")]
    UnknownDomain(String),

    #[error("variable belongs to another model")]
    ForeignVariable,

    #[error("variable {0} predates a model reload")]
    StaleVariable(ColumnId),

    #[error("division by a zero constant")]
    DivisionByZero,

    #[error("constant factor {0} is not finite")]
    NonFiniteConstant(f64),

    #[error("operand '{0}' is not a known constant")]
    NonConstantOperand(String),

    #[error("constant {value} lies outside domain {domain}")]
    ConstantOutsideDomain { value: f64, domain: Domain },

    #[error("a variable named '{0}' already exists")]
    DuplicateName(String),

    #[error("no variable named '{0}'")]
    UnknownName(String),

    #[error("model has already been solved")]
    AlreadySolved,

    #[error("model has not been solved")]
    NotSolved,

    #[error("solution holds no value for variable {0}")]
    SolutionUnavailable(ColumnId),

    #[error("model is unusable after an earlier backend failure")]
    Poisoned,

    #[error(
        "snapshot records {expected_rows} rows and {expected_columns} columns, backend holds {rows} and {columns}"
    )]
    SnapshotMismatch {
        expected_rows: usize,
        expected_columns: usize,
        rows: usize,
        columns: usize,
    },
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::Backend { .. } => "BACKEND_REJECTED",
            ModelError::UnsupportedDomain(_) => "DOMAIN_UNSUPPORTED",
            ModelError::UnknownDomain(_) => "DOMAIN_UNKNOWN",
            ModelError::ForeignVariable => "VARIABLE_FOREIGN",
            ModelError::StaleVariable(_) => "VARIABLE_STALE",
            ModelError::DivisionByZero => "EXPR_DIVISION_BY_ZERO",
            ModelError::NonFiniteConstant(_) => "EXPR_NON_FINITE",
            ModelError::NonConstantOperand(_) => "EXPR_NON_CONSTANT",
            ModelError::ConstantOutsideDomain { .. } => "CONSTANT_OUTSIDE_DOMAIN",
            ModelError::DuplicateName(_) => "VARIABLE_DUPLICATE_NAME",
            ModelError::UnknownName(_) => "VARIABLE_UNKNOWN_NAME",
            ModelError::AlreadySolved => "MODEL_ALREADY_SOLVED",
            ModelError::NotSolved => "MODEL_NOT_SOLVED",
            ModelError::SolutionUnavailable(_) => "SOLUTION_UNAVAILABLE",
            ModelError::Poisoned => "MODEL_POISONED",
            ModelError::SnapshotMismatch { .. } => "SNAPSHOT_MISMATCH",
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
