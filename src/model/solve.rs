use std::time::Instant;

use super::error::{ModelError, Result};
use super::registry::Variable;
use super::{Model, SolveState};
use crate::backend::Backend;
use crate::domain::SolutionStatus;

impl<B: Backend> Model<B> {
    /// Run the backend once and record the terminal status.
    ///
    /// Backend statuses other than optimal, infeasible and unbounded are
    /// reported as [`SolutionStatus::Unknown`].
    pub fn solve(&mut self) -> Result<SolutionStatus> {
        self.ensure_buildable()?;
        self.state = SolveState::Solving;
        tracing::info!(
            component = "model",
            operation = "solve",
            columns = self.columns,
            rows = self.rows,
            "Solving model"
        );

        let start = Instant::now();
        let raw = self.backend_call("solve", |backend| backend.solve())?;
        let status = SolutionStatus::from(raw);
        self.state = SolveState::Solved(status);

        let elapsed_ms = start.elapsed().as_millis() as u64;
        if status == SolutionStatus::Unknown {
            tracing::warn!(
                component = "model",
                operation = "solve",
                backend_status = %raw,
                elapsed_ms,
                "Solver stopped without a definite answer"
            );
        } else {
            tracing::info!(
                component = "model",
                operation = "solve",
                status = ?status,
                elapsed_ms,
                "Solve finished"
            );
        }
        Ok(status)
    }

    /// Value of `variable` in the backend's solution buffer.
    pub fn value(&self, variable: Variable) -> Result<f64> {
        if self.poisoned {
            return Err(ModelError::Poisoned);
        }
        if !matches!(self.state, SolveState::Solved(_)) {
            return Err(ModelError::NotSolved);
        }
        let column = self.resolve(variable)?;
        let values = self
            .backend
            .solution_values()
            .map_err(|source| ModelError::Backend {
                operation: "solution_values",
                source,
            })?;
        values
            .get(column.offset())
            .copied()
            .ok_or(ModelError::SolutionUnavailable(column))
    }

    pub fn value_by_name(&self, name: &str) -> Result<f64> {
        let variable = self
            .variable_by_name(name)
            .ok_or_else(|| ModelError::UnknownName(name.to_string()))?;
        self.value(variable)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{BackendStatus, SolutionStatus};
    use crate::model::domain_policy::Domain;
    use crate::model::error::ModelError;
    use crate::model::testing::{Call, RecordingBackend};
    use crate::model::{Model, SolveState};

    #[test]
    fn solve_maps_backend_status() {
        let cases = [
            (BackendStatus::Optimal, SolutionStatus::Optimal),
            (BackendStatus::Infeasible, SolutionStatus::Infeasible),
            (BackendStatus::Unbounded, SolutionStatus::Unbounded),
            (BackendStatus::TimeLimit, SolutionStatus::Unknown),
            (BackendStatus::Feasible, SolutionStatus::Unknown),
            (BackendStatus::Code(42), SolutionStatus::Unknown),
        ];
        for (raw, expected) in cases {
            let (backend, _log) = RecordingBackend::new();
            let mut model = Model::new(backend.solving_to(raw, Vec::new()));
            model.create("x", Domain::ANY_REAL).unwrap();
            assert_eq!(model.solve().unwrap(), expected);
            assert_eq!(model.state(), SolveState::Solved(expected));
            assert_eq!(model.status(), Some(expected));
        }
    }

    #[test]
    fn values_are_read_by_column_offset() {
        let (backend, _log) = RecordingBackend::new();
        let mut model =
            Model::new(backend.solving_to(BackendStatus::Optimal, vec![4.0, 6.0, 10.0]));
        let x = model.create("x", Domain::NON_NEGATIVE_INTEGER).unwrap();
        let y = model.create("y", Domain::NON_NEGATIVE_INTEGER).unwrap();
        let z = model.sum(x, y, Domain::ANY_INTEGER).unwrap();
        model.maximize(z).unwrap();
        model.solve().unwrap();
        assert_eq!(model.value(x).unwrap(), 4.0);
        assert_eq!(model.value(y).unwrap(), 6.0);
        assert_eq!(model.value(z).unwrap(), 10.0);
        assert_eq!(model.value_by_name("y").unwrap(), 6.0);
    }

    #[test]
    fn value_before_solve_fails() {
        let (backend, _log) = RecordingBackend::new();
        let mut model = Model::new(backend.solving_to(BackendStatus::Optimal, vec![1.0]));
        let x = model.create("x", Domain::ANY_REAL).unwrap();
        assert!(matches!(model.value(x), Err(ModelError::NotSolved)));
    }

    #[test]
    fn short_solution_buffer_is_reported() {
        let (backend, _log) = RecordingBackend::new();
        let mut model = Model::new(backend.solving_to(BackendStatus::Optimal, vec![1.0]));
        model.create("x", Domain::ANY_REAL).unwrap();
        let y = model.create("y", Domain::ANY_REAL).unwrap();
        model.solve().unwrap();
        let err = model.value(y).unwrap_err();
        assert!(matches!(err, ModelError::SolutionUnavailable(c) if c == y.id()));
        assert!(matches!(
            model.value_by_name("nope"),
            Err(ModelError::UnknownName(_))
        ));
    }

    #[test]
    fn solved_model_refuses_growth_and_second_solve() {
        let (backend, log) = RecordingBackend::new();
        let mut model = Model::new(backend.solving_to(BackendStatus::Optimal, vec![0.0]));
        let x = model.create("x", Domain::ANY_REAL).unwrap();
        model.solve().unwrap();
        let calls = log.calls().len();
        assert!(matches!(model.solve(), Err(ModelError::AlreadySolved)));
        assert!(matches!(
            model.create("y", Domain::ANY_REAL),
            Err(ModelError::AlreadySolved)
        ));
        assert!(matches!(
            model.negate(x, Domain::ANY_REAL),
            Err(ModelError::AlreadySolved)
        ));
        assert_eq!(log.calls().len(), calls);
        assert_eq!(log.calls().iter().filter(|c| **c == Call::Solve).count(), 1);
    }

    #[test]
    fn failed_solve_poisons_model() {
        let (backend, _log) = RecordingBackend::new();
        let mut model = Model::new(backend.reject_at("solve", 1));
        let x = model.create("x", Domain::ANY_REAL).unwrap();
        let err = model.solve().unwrap_err();
        assert_eq!(err.code(), "BACKEND_REJECTED");
        assert!(model.is_poisoned());
        assert!(matches!(model.value(x), Err(ModelError::Poisoned)));
    }
}
