//! Variable identities and the columns behind them.

use std::collections::HashMap;

use super::domain_policy::Domain;
use super::error::{ModelError, Result};
use super::ids::{ColumnId, ModelId};
use super::Model;
use crate::backend::Backend;

/// Opaque handle to a model variable.
///
/// Only the model that issued a handle can resolve it to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable {
    model: ModelId,
    generation: u32,
    column: ColumnId,
}

impl Variable {
    /// 1-based column id, assigned in creation order.
    pub fn id(self) -> ColumnId {
        self.column
    }
}

/// Whether a variable's value is known before solving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Free,
    Constant(f64),
}

impl Value {
    pub fn constant(self) -> Option<f64> {
        match self {
            Value::Free => None,
            Value::Constant(value) => Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    pub name: String,
    pub domain: Domain,
    pub value: Value,
    /// How the variable was derived, for diagnostics.
    pub expression: Option<String>,
}

pub(crate) struct Registry {
    model: ModelId,
    generation: u32,
    entries: Vec<VariableInfo>,
    names: HashMap<String, ColumnId>,
    anonymous: u32,
}

impl Registry {
    pub(crate) fn new(model: ModelId) -> Self {
        Self {
            model,
            generation: 0,
            entries: Vec::new(),
            names: HashMap::new(),
            anonymous: 0,
        }
    }

    pub(crate) fn model(&self) -> ModelId {
        self.model
    }

    pub(crate) fn next_column(&self) -> ColumnId {
        ColumnId::from_offset(self.entries.len())
    }

    pub(crate) fn check_name(&self, name: &str) -> Result<()> {
        if self.names.contains_key(name) {
            return Err(ModelError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Next `_t<n>` name not taken by any variable.
    pub(crate) fn anonymous_name(&mut self) -> String {
        loop {
            self.anonymous += 1;
            let name = format!("_t{}", self.anonymous);
            if !self.names.contains_key(&name) {
                return name;
            }
        }
    }

    pub(crate) fn insert(&mut self, info: VariableInfo) -> Variable {
        let column = self.next_column();
        self.names.insert(info.name.clone(), column);
        self.entries.push(info);
        self.handle(column)
    }

    fn handle(&self, column: ColumnId) -> Variable {
        Variable {
            model: self.model,
            generation: self.generation,
            column,
        }
    }

    pub(crate) fn resolve(&self, variable: Variable) -> Result<ColumnId> {
        if variable.model != self.model {
            return Err(ModelError::ForeignVariable);
        }
        if variable.generation != self.generation
            || variable.column.inner() == 0
            || variable.column.offset() >= self.entries.len()
        {
            return Err(ModelError::StaleVariable(variable.column));
        }
        Ok(variable.column)
    }

    pub(crate) fn info(&self, variable: Variable) -> Result<&VariableInfo> {
        let column = self.resolve(variable)?;
        Ok(&self.entries[column.offset()])
    }

    pub(crate) fn by_name(&self, name: &str) -> Option<Variable> {
        self.names.get(name).map(|&column| self.handle(column))
    }

    pub(crate) fn handles(&self) -> impl Iterator<Item = Variable> + '_ {
        (0..self.entries.len()).map(|offset| self.handle(ColumnId::from_offset(offset)))
    }

    /// Replace every entry; existing handles stop resolving.
    pub(crate) fn reset(&mut self, entries: Vec<VariableInfo>) {
        self.generation += 1;
        self.names = entries
            .iter()
            .enumerate()
            .map(|(offset, info)| (info.name.clone(), ColumnId::from_offset(offset)))
            .collect();
        self.entries = entries;
        self.anonymous = 0;
    }
}

impl<B: Backend> Model<B> {
    /// Create a named variable.
    pub fn create(&mut self, name: impl Into<String>, domain: Domain) -> Result<Variable> {
        let name = name.into();
        self.ensure_buildable()?;
        domain.check()?;
        self.registry.check_name(&name)?;
        self.allocate(name, domain, Value::Free, None)
    }

    /// Create a variable with a generated name.
    pub fn create_anonymous(&mut self, domain: Domain) -> Result<Variable> {
        self.ensure_buildable()?;
        domain.check()?;
        self.allocate_anonymous(domain, Value::Free, None)
    }

    pub(super) fn allocate_anonymous(
        &mut self,
        domain: Domain,
        value: Value,
        expression: Option<String>,
    ) -> Result<Variable> {
        let name = self.registry.anonymous_name();
        self.allocate(name, domain, value, expression)
    }

    /// Add the column and install its name, integrality and bounds.
    pub(super) fn allocate(
        &mut self,
        name: String,
        domain: Domain,
        value: Value,
        expression: Option<String>,
    ) -> Result<Variable> {
        let column = self.registry.next_column();
        self.backend_call("add_column", |backend| backend.add_column())?;
        self.columns += 1;
        self.backend_call("set_column_name", |backend| {
            backend.set_column_name(column, &name)
        })?;
        match domain.apply(&mut self.backend, column) {
            Ok(()) => {}
            Err(ModelError::Backend { operation, source }) => {
                return Err(self.poison(operation, source))
            }
            Err(err) => return Err(err),
        }

        tracing::debug!(
            component = "model",
            operation = "create",
            column = %column,
            name = %name,
            domain = %domain,
            "Created variable"
        );
        Ok(self.registry.insert(VariableInfo {
            name,
            domain,
            value,
            expression,
        }))
    }
}
