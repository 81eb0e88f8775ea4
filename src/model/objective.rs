use super::error::Result;
use super::registry::Variable;
use super::row::LinearRow;
use super::Model;
use crate::backend::Backend;

impl<B: Backend> Model<B> {
    /// Maximize `goal`, replacing any previous objective.
    pub fn maximize(&mut self, goal: Variable) -> Result<()> {
        self.maximize_sum(&[goal])
    }

    /// Maximize the plain sum of `terms`, replacing any previous objective.
    pub fn maximize_sum(&mut self, terms: &[Variable]) -> Result<()> {
        self.ensure_buildable()?;
        let mut row = LinearRow::new();
        for &term in terms {
            row.add(self.resolve(term)?, 1.0);
        }
        let installed = row.terms();
        self.backend_call("set_objective", |backend| {
            backend.set_maximize();
            backend.set_objective(&installed)
        })?;
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            sense = "maximize",
            terms = installed.len(),
            "Set objective function"
        );
        self.objective = Some(row);
        Ok(())
    }
}
