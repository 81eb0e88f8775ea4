//! Relational constraints between variables, and pinned constants.

use super::domain_policy::Domain;
use super::error::{ModelError, Result};
use super::registry::{Value, Variable};
use super::row::LinearRow;
use super::Model;
use crate::backend::Backend;
use crate::domain::RowSense;

impl<B: Backend> Model<B> {
    /// `variable <= bound`
    pub fn set_less_or_equal(&mut self, variable: Variable, bound: Variable) -> Result<()> {
        self.relate(variable, bound, RowSense::LessThanOrEqual)
    }

    /// `variable >= bound`
    pub fn set_greater_or_equal(&mut self, variable: Variable, bound: Variable) -> Result<()> {
        self.relate(variable, bound, RowSense::GreaterThanOrEqual)
    }

    /// `variable = bound`
    pub fn set_equal(&mut self, variable: Variable, bound: Variable) -> Result<()> {
        self.relate(variable, bound, RowSense::Equal)
    }

    /// Anonymous variable fixed to `value` by an equality row.
    pub fn from_constant(&mut self, value: impl Into<f64>, domain: Domain) -> Result<Variable> {
        let value = value.into();
        self.ensure_buildable()?;
        self.check_constant(value, domain)?;
        let variable = self.allocate_anonymous(domain, Value::Constant(value), Some(value.to_string()))?;
        self.pin(variable, value)?;
        Ok(variable)
    }

    /// Named variable fixed to `value` by an equality row.
    pub fn named_constant(
        &mut self,
        name: impl Into<String>,
        value: impl Into<f64>,
        domain: Domain,
    ) -> Result<Variable> {
        let (name, value) = (name.into(), value.into());
        self.ensure_buildable()?;
        self.check_constant(value, domain)?;
        self.registry.check_name(&name)?;
        let variable = self.allocate(name, domain, Value::Constant(value), Some(value.to_string()))?;
        self.pin(variable, value)?;
        Ok(variable)
    }

    fn check_constant(&self, value: f64, domain: Domain) -> Result<()> {
        domain.check()?;
        if !domain.admits(value) {
            return Err(ModelError::ConstantOutsideDomain { value, domain });
        }
        Ok(())
    }

    fn pin(&mut self, variable: Variable, value: f64) -> Result<()> {
        let column = self.resolve(variable)?;
        self.emit_row(&LinearRow::new().with(column, 1.0), RowSense::Equal, value)?;
        Ok(())
    }

    fn relate(&mut self, variable: Variable, bound: Variable, sense: RowSense) -> Result<()> {
        self.ensure_buildable()?;
        let (cv, cb) = (self.resolve(variable)?, self.resolve(bound)?);
        let row = LinearRow::new().with(cv, 1.0).with(cb, -1.0);
        self.emit_row(&row, sense, 0.0)?;
        tracing::debug!(
            component = "model",
            operation = "relate",
            variable = %cv,
            bound = %cb,
            sense = %sense,
            "Added constraint"
        );
        Ok(())
    }
}
