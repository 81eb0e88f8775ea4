//! Model files.
//!
//! The file extension picks the format: `.json` is the native format and
//! round-trips everything, including the solver configuration. Any other
//! extension is written as free MPS, which other solvers can read.

mod mps;

use std::fs;
use std::path::Path;

use crate::backend::BackendResult;
use crate::domain::OptimizationProblem;

pub use mps::{read_mps, write_mps};

/// Extension of the native model format.
pub const NATIVE_EXTENSION: &str = "json";

/// Model file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Json,
    FreeMps,
}

impl ModelFormat {
    pub fn for_path(path: &Path) -> Self {
        let native = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.trim_matches('.').eq_ignore_ascii_case(NATIVE_EXTENSION))
            .unwrap_or(false);
        if native {
            ModelFormat::Json
        } else {
            ModelFormat::FreeMps
        }
    }
}

pub fn save(problem: &OptimizationProblem, path: &Path) -> BackendResult<()> {
    let text = match ModelFormat::for_path(path) {
        ModelFormat::Json => serde_json::to_string_pretty(problem)?,
        ModelFormat::FreeMps => write_mps(problem)?,
    };
    fs::write(path, text)?;
    tracing::debug!(
        component = "persist",
        operation = "save",
        path = %path.display(),
        columns = problem.num_variables(),
        rows = problem.num_constraints(),
        "Saved model"
    );
    Ok(())
}

pub fn load(path: &Path) -> BackendResult<OptimizationProblem> {
    let text = fs::read_to_string(path)?;
    let problem = match ModelFormat::for_path(path) {
        ModelFormat::Json => serde_json::from_str(&text)?,
        ModelFormat::FreeMps => read_mps(&text)?,
    };
    tracing::debug!(
        component = "persist",
        operation = "load",
        path = %path.display(),
        columns = problem.num_variables(),
        rows = problem.num_constraints(),
        "Loaded model"
    );
    Ok(problem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ModelFormat::for_path(Path::new("m.json")), ModelFormat::Json);
        assert_eq!(ModelFormat::for_path(Path::new("m.JSON")), ModelFormat::Json);
        assert_eq!(ModelFormat::for_path(Path::new("m.mps")), ModelFormat::FreeMps);
        assert_eq!(ModelFormat::for_path(Path::new("model")), ModelFormat::FreeMps);
    }
}
