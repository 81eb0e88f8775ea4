//! Arithmetic over variables, compiled into auxiliary columns.
//!
//! Each operation allocates one anonymous result column and one equality
//! row (rhs 0) pinning it to the operation's value:
//!
//! | operation      | row                     |
//! |----------------|-------------------------|
//! | `sum(a, b)`    | `a + b - result = 0`    |
//! | `negate(a)`    | `-a - result = 0`       |
//! | `scale(a, k)`  | `k·a - result = 0`      |
//! | `divide(a, k)` | `(1/k)·a - result = 0`  |
//!
//! Products of two free variables are not linear and are refused.

use super::domain_policy::Domain;
use super::error::{ModelError, Result};
use super::ids::ColumnId;
use super::registry::{Value, Variable};
use super::row::LinearRow;
use super::Model;
use crate::backend::Backend;
use crate::domain::RowSense;

impl<B: Backend> Model<B> {
    /// `a + b`
    pub fn sum(&mut self, a: Variable, b: Variable, domain: Domain) -> Result<Variable> {
        self.ensure_buildable()?;
        let (ca, cb) = (self.resolve(a)?, self.resolve(b)?);
        let value = match (self.value_of(a)?, self.value_of(b)?) {
            (Value::Constant(x), Value::Constant(y)) => Value::Constant(x + y),
            _ => Value::Free,
        };
        let label = format!("{} + {}", self.name(a)?, self.name(b)?);
        self.define(domain, value, label, |result| {
            LinearRow::new().with(ca, 1.0).with(cb, 1.0).with(result, -1.0)
        })
    }

    /// `-a`
    pub fn negate(&mut self, a: Variable, domain: Domain) -> Result<Variable> {
        self.ensure_buildable()?;
        let ca = self.resolve(a)?;
        let value = match self.value_of(a)? {
            Value::Constant(x) => Value::Constant(-x),
            Value::Free => Value::Free,
        };
        let label = format!("-{}", self.name(a)?);
        self.define(domain, value, label, |result| {
            LinearRow::new().with(ca, -1.0).with(result, -1.0)
        })
    }

    /// `k·a` for a known, finite factor `k`.
    pub fn scale(&mut self, a: Variable, k: f64, domain: Domain) -> Result<Variable> {
        self.ensure_buildable()?;
        finite(k)?;
        let ca = self.resolve(a)?;
        let value = match self.value_of(a)? {
            Value::Constant(x) => Value::Constant(k * x),
            Value::Free => Value::Free,
        };
        let label = format!("{} * {}", k, self.name(a)?);
        self.define(domain, value, label, |result| {
            LinearRow::new().with(ca, k).with(result, -1.0)
        })
    }

    /// `a / k` for a known, finite, non-zero divisor `k`.
    pub fn divide(&mut self, a: Variable, k: f64, domain: Domain) -> Result<Variable> {
        self.ensure_buildable()?;
        finite(k)?;
        if k == 0.0 {
            return Err(ModelError::DivisionByZero);
        }
        let ca = self.resolve(a)?;
        let value = match self.value_of(a)? {
            Value::Constant(x) => Value::Constant(x / k),
            Value::Free => Value::Free,
        };
        let label = format!("{} / {}", self.name(a)?, k);
        self.define(domain, value, label, |result| {
            LinearRow::new().with(ca, 1.0 / k).with(result, -1.0)
        })
    }

    /// `a·b` where at least one side is a known constant.
    pub fn multiply(&mut self, a: Variable, b: Variable, domain: Domain) -> Result<Variable> {
        self.ensure_buildable()?;
        match (self.value_of(a)?, self.value_of(b)?) {
            (_, Value::Constant(k)) => self.scale(a, k, domain),
            (Value::Constant(k), Value::Free) => self.scale(b, k, domain),
            (Value::Free, Value::Free) => {
                Err(ModelError::NonConstantOperand(self.name(b)?.to_string()))
            }
        }
    }

    /// `a / b` where `b` is a known constant.
    pub fn divide_by(&mut self, a: Variable, b: Variable, domain: Domain) -> Result<Variable> {
        self.ensure_buildable()?;
        self.resolve(a)?;
        match self.value_of(b)? {
            Value::Constant(k) => self.divide(a, k, domain),
            Value::Free => Err(ModelError::NonConstantOperand(self.name(b)?.to_string())),
        }
    }

    fn value_of(&self, variable: Variable) -> Result<Value> {
        Ok(self.info(variable)?.value)
    }

    /// Allocate the result column, then pin it with `row(result) = 0`.
    fn define(
        &mut self,
        domain: Domain,
        value: Value,
        label: String,
        row: impl FnOnce(ColumnId) -> LinearRow,
    ) -> Result<Variable> {
        domain.check()?;
        let result = self.allocate_anonymous(domain, value, Some(label))?;
        let column = self.resolve(result)?;
        self.emit_row(&row(column), RowSense::Equal, 0.0)?;
        Ok(result)
    }
}

fn finite(k: f64) -> Result<()> {
    if !k.is_finite() {
        return Err(ModelError::NonFiniteConstant(k));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::domain::RowSense;
    use crate::model::domain_policy::Domain;
    use crate::model::error::ModelError;
    use crate::model::testing::RecordingBackend;
    use crate::model::Model;

    fn model() -> (Model<RecordingBackend>, crate::model::testing::CallLog) {
        let (backend, log) = RecordingBackend::new();
        (Model::new(backend), log)
    }

    #[test]
    fn sum_pins_result_with_equality_row() {
        let (mut model, log) = model();
        let a = model.create("a", Domain::NON_NEGATIVE_INTEGER).unwrap();
        let b = model.create("b", Domain::NON_NEGATIVE_INTEGER).unwrap();
        let s = model.sum(a, b, Domain::ANY_INTEGER).unwrap();
        assert_eq!(s.id().inner(), 3);
        assert_eq!(
            log.last_row(),
            Some((vec![(1, 1.0), (2, 1.0), (3, -1.0)], RowSense::Equal, 0.0))
        );
        assert_eq!(model.rows(), 1);
        assert_eq!(model.info(s).unwrap().expression.as_deref(), Some("a + b"));
    }

    #[test]
    fn sum_of_same_variable_doubles_coefficient() {
        let (mut model, log) = model();
        let a = model.create("a", Domain::ANY_REAL).unwrap();
        model.sum(a, a, Domain::ANY_REAL).unwrap();
        assert_eq!(
            log.last_row(),
            Some((vec![(1, 2.0), (2, -1.0)], RowSense::Equal, 0.0))
        );
    }

    #[test]
    fn negate_row() {
        let (mut model, log) = model();
        let a = model.create("a", Domain::ANY_REAL).unwrap();
        model.negate(a, Domain::ANY_REAL).unwrap();
        assert_eq!(
            log.last_row(),
            Some((vec![(1, -1.0), (2, -1.0)], RowSense::Equal, 0.0))
        );
    }

    #[test]
    fn scale_and_divide_rows() {
        let (mut model, log) = model();
        let a = model.create("a", Domain::ANY_REAL).unwrap();
        model.scale(a, 3.0, Domain::ANY_REAL).unwrap();
        assert_eq!(
            log.last_row(),
            Some((vec![(1, 3.0), (2, -1.0)], RowSense::Equal, 0.0))
        );
        model.divide(a, 4.0, Domain::ANY_REAL).unwrap();
        assert_eq!(
            log.last_row(),
            Some((vec![(1, 0.25), (3, -1.0)], RowSense::Equal, 0.0))
        );
        assert_eq!(model.rows(), 2);
        assert_eq!(model.columns(), 3);
    }

    #[test]
    fn divide_by_zero_fails_before_any_mutation() {
        let (mut model, log) = model();
        let a = model.from_constant(6, Domain::NON_NEGATIVE_INTEGER).unwrap();
        let _b = model.from_constant(3, Domain::NON_NEGATIVE_INTEGER).unwrap();
        let zero = model.from_constant(0, Domain::NON_NEGATIVE_INTEGER).unwrap();
        let (rows, columns, calls) = (model.rows(), model.columns(), log.calls().len());

        let err = model.divide_by(a, zero, Domain::ANY_REAL).unwrap_err();
        assert!(matches!(err, ModelError::DivisionByZero));
        assert_eq!(model.rows(), rows);
        assert_eq!(model.columns(), columns);
        assert_eq!(log.calls().len(), calls);

        let err = model.divide(a, 0.0, Domain::ANY_REAL).unwrap_err();
        assert!(matches!(err, ModelError::DivisionByZero));
        assert_eq!(log.calls().len(), calls);
        assert!(!model.is_poisoned());
    }

    #[test]
    fn non_finite_factors_fail_before_any_mutation() {
        let (mut model, log) = model();
        let a = model.create("a", Domain::ANY_REAL).unwrap();
        let calls = log.calls().len();
        for k in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = model.scale(a, k, Domain::ANY_REAL).unwrap_err();
            assert_eq!(err.code(), "EXPR_NON_FINITE");
            let err = model.divide(a, k, Domain::ANY_REAL).unwrap_err();
            assert!(matches!(err, ModelError::NonFiniteConstant(_)));
        }
        assert_eq!(log.calls().len(), calls);
        assert_eq!((model.rows(), model.columns()), (0, 1));
        assert!(!model.is_poisoned());
    }

    #[test]
    fn product_of_free_variables_is_refused() {
        let (mut model, log) = model();
        let a = model.create("a", Domain::ANY_REAL).unwrap();
        let b = model.create("b", Domain::ANY_REAL).unwrap();
        let calls = log.calls().len();
        let err = model.multiply(a, b, Domain::ANY_REAL).unwrap_err();
        assert!(matches!(err, ModelError::NonConstantOperand(ref name) if name == "b"));
        assert_eq!(log.calls().len(), calls);
        let err = model.divide_by(a, b, Domain::ANY_REAL).unwrap_err();
        assert_eq!(err.code(), "EXPR_NON_CONSTANT");
    }

    #[test]
    fn multiply_accepts_constant_on_either_side() {
        let (mut model, log) = model();
        let x = model.create("x", Domain::ANY_REAL).unwrap();
        let k = model.from_constant(5, Domain::ANY_CONSTANT_INTEGER).unwrap();
        model.multiply(k, x, Domain::ANY_REAL).unwrap();
        assert_eq!(
            log.last_row(),
            Some((vec![(1, 5.0), (3, -1.0)], RowSense::Equal, 0.0))
        );
    }

    #[test]
    fn constants_propagate_through_arithmetic() {
        let (mut model, _log) = model();
        let a = model.from_constant(6, Domain::NON_NEGATIVE_INTEGER).unwrap();
        let b = model.from_constant(3, Domain::NON_NEGATIVE_INTEGER).unwrap();
        let s = model.sum(a, b, Domain::ANY_INTEGER).unwrap();
        let n = model.negate(s, Domain::ANY_INTEGER).unwrap();
        let q = model.divide_by(n, b, Domain::ANY_INTEGER).unwrap();
        let x = model.create("x", Domain::ANY_REAL).unwrap();
        let free = model.sum(x, a, Domain::ANY_REAL).unwrap();
        assert_eq!(model.constant_value(s).unwrap(), Some(9.0));
        assert_eq!(model.constant_value(n).unwrap(), Some(-9.0));
        assert_eq!(model.constant_value(q).unwrap(), Some(-3.0));
        assert_eq!(model.constant_value(free).unwrap(), None);
    }

    #[test]
    fn each_operation_adds_one_column_and_one_row() {
        let (mut model, _log) = model();
        let x = model.create("x", Domain::ANY_REAL).unwrap();
        let y = model.create("y", Domain::ANY_REAL).unwrap();
        let (rows, columns) = (model.rows(), model.columns());
        let s = model.sum(x, y, Domain::ANY_REAL).unwrap();
        let n = model.negate(s, Domain::ANY_REAL).unwrap();
        let m = model.scale(n, 2.0, Domain::ANY_REAL).unwrap();
        model.divide(m, 2.0, Domain::ANY_REAL).unwrap();
        assert_eq!(model.rows(), rows + 4);
        assert_eq!(model.columns(), columns + 4);
    }

    #[test]
    fn rejected_row_poisons_model() {
        let (backend, _log) = RecordingBackend::new();
        let mut model = Model::new(backend.reject_at("add_row", 1));
        let x = model.create("x", Domain::ANY_REAL).unwrap();
        let err = model.negate(x, Domain::ANY_REAL).unwrap_err();
        assert!(matches!(err, ModelError::Backend { operation: "add_row", .. }));
        assert_eq!(model.rows(), 0);
        assert!(matches!(
            model.negate(x, Domain::ANY_REAL),
            Err(ModelError::Poisoned)
        ));
    }
}
