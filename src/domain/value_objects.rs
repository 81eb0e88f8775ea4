// Domain value objects shared by the model compiler and the solver adapters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of a backend column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableType {
    /// Continuous real number (x ∈ ℝ)
    Continuous,
    /// Integer number (x ∈ ℤ)
    Integer,
    /// Binary variable (x ∈ {0, 1})
    Binary,
}

/// Relational operator of a constraint row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowSense {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

impl fmt::Display for RowSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowSense::LessThanOrEqual => write!(f, "<="),
            RowSense::Equal => write!(f, "="),
            RowSense::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationType {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

/// Raw status reported by a solver backend.
///
/// Backends grow new outcomes over time, so this vocabulary is open:
/// callers classify it through [`SolutionStatus::from`] rather than
/// matching exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BackendStatus {
    /// Found optimal solution
    Optimal,
    /// Found feasible solution (may not be optimal)
    Feasible,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
    /// Time limit reached
    TimeLimit,
    /// Iteration limit reached
    IterationLimit,
    /// Node limit reached (MIP)
    NodeLimit,
    /// Solver error occurred
    Error,
    /// Solve interrupted by user
    Interrupted,
    /// Native result code without a named counterpart
    Code(i32),
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStatus::Optimal => write!(f, "Optimal"),
            BackendStatus::Feasible => write!(f, "Feasible"),
            BackendStatus::Infeasible => write!(f, "Infeasible"),
            BackendStatus::Unbounded => write!(f, "Unbounded"),
            BackendStatus::TimeLimit => write!(f, "Time Limit Reached"),
            BackendStatus::IterationLimit => write!(f, "Iteration Limit Reached"),
            BackendStatus::NodeLimit => write!(f, "Node Limit Reached"),
            BackendStatus::Error => write!(f, "Error"),
            BackendStatus::Interrupted => write!(f, "Interrupted"),
            BackendStatus::Code(code) => write!(f, "Code {}", code),
        }
    }
}

/// Portable terminal status of a solved model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolutionStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Unknown,
}

impl From<BackendStatus> for SolutionStatus {
    fn from(status: BackendStatus) -> Self {
        match status {
            BackendStatus::Optimal => SolutionStatus::Optimal,
            BackendStatus::Infeasible => SolutionStatus::Infeasible,
            BackendStatus::Unbounded => SolutionStatus::Unbounded,
            _ => SolutionStatus::Unknown,
        }
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unbounded => write!(f, "Unbounded"),
            SolutionStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolverBackend {
    /// Automatically select best solver
    #[default]
    Auto,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
    /// Pure-Rust microlp solver
    MicroLp,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
            SolverBackend::MicroLp => write!(f, "microlp"),
        }
    }
}

impl FromStr for SolverBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SolverBackend::Auto),
            "cbc" | "coin_cbc" | "coin-cbc" => Ok(SolverBackend::CoinCbc),
            "highs" => Ok(SolverBackend::Highs),
            "microlp" => Ok(SolverBackend::MicroLp),
            other => Err(format!("unknown solver backend '{}'", other)),
        }
    }
}
