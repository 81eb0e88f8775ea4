//! Variable domains and the backend directives they translate to.

use std::fmt;
use std::str::FromStr;

use super::error::{ModelError, Result};
use super::ids::ColumnId;
use crate::backend::Backend;
use crate::domain::{Column, VariableType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    Integer,
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    Unconstrained,
    NonNegative,
    Binary,
}

/// Numeric kind, range and constancy of a variable.
///
/// Constancy never changes the installed bounds; it only records that the
/// variable is expected to carry a known value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Domain {
    pub kind: NumericKind,
    pub range: RangeKind,
    pub constant: bool,
}

impl Domain {
    pub const ANY_INTEGER: Domain = Domain::new(NumericKind::Integer, RangeKind::Unconstrained);
    pub const ANY_REAL: Domain = Domain::new(NumericKind::Real, RangeKind::Unconstrained);
    pub const NON_NEGATIVE_INTEGER: Domain =
        Domain::new(NumericKind::Integer, RangeKind::NonNegative);
    pub const NON_NEGATIVE_REAL: Domain = Domain::new(NumericKind::Real, RangeKind::NonNegative);
    pub const BINARY_INTEGER: Domain = Domain::new(NumericKind::Integer, RangeKind::Binary);

    pub const ANY_CONSTANT_INTEGER: Domain = Domain::ANY_INTEGER.as_constant();
    pub const ANY_CONSTANT_REAL: Domain = Domain::ANY_REAL.as_constant();
    pub const NON_NEGATIVE_CONSTANT_INTEGER: Domain = Domain::NON_NEGATIVE_INTEGER.as_constant();
    pub const NON_NEGATIVE_CONSTANT_REAL: Domain = Domain::NON_NEGATIVE_REAL.as_constant();
    pub const BINARY_CONSTANT_INTEGER: Domain = Domain::BINARY_INTEGER.as_constant();

    pub const fn new(kind: NumericKind, range: RangeKind) -> Self {
        Self {
            kind,
            range,
            constant: false,
        }
    }

    pub const fn as_constant(self) -> Self {
        Self {
            constant: true,
            ..self
        }
    }

    pub fn is_integer(self) -> bool {
        self.kind == NumericKind::Integer
    }

    pub fn is_binary(self) -> bool {
        self.range == RangeKind::Binary
    }

    /// Binary ranges only exist over integers.
    pub fn check(self) -> Result<Self> {
        match (self.kind, self.range) {
            (NumericKind::Real, RangeKind::Binary) => Err(ModelError::UnsupportedDomain(self)),
            _ => Ok(self),
        }
    }

    /// Whether `value` is a legal fixed value for this domain.
    pub fn admits(self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let integral = !self.is_integer() || value.fract() == 0.0;
        let in_range = match self.range {
            RangeKind::Unconstrained => true,
            RangeKind::NonNegative => value >= 0.0,
            RangeKind::Binary => value == 0.0 || value == 1.0,
        };
        integral && in_range
    }

    /// Closest domain for a column whose directives were not issued by this
    /// crate, e.g. one read back from a model file.
    pub fn infer(column: &Column) -> Self {
        let kind = match column.variable_type {
            VariableType::Binary => return Domain::BINARY_INTEGER,
            VariableType::Integer => NumericKind::Integer,
            VariableType::Continuous => NumericKind::Real,
        };
        let range = match column.lower_bound {
            None => RangeKind::Unconstrained,
            Some(_) => RangeKind::NonNegative,
        };
        Domain::new(kind, range)
    }

    /// Issue the bound and integrality directives for a freshly added column.
    pub(crate) fn apply<B: Backend + ?Sized>(self, backend: &mut B, column: ColumnId) -> Result<()> {
        self.check()?;
        if self.is_integer() {
            backend
                .set_integer(column, true)
                .map_err(|source| ModelError::Backend {
                    operation: "set_integer",
                    source,
                })?;
        }
        let (operation, installed) = match self.range {
            RangeKind::Binary => ("set_binary", backend.set_binary(column)),
            RangeKind::Unconstrained => (
                "set_bounds",
                backend.set_bounds(column, f64::NEG_INFINITY, f64::INFINITY),
            ),
            RangeKind::NonNegative => ("set_bounds", backend.set_bounds(column, 0.0, f64::INFINITY)),
        };
        installed.map_err(|source| ModelError::Backend { operation, source })
    }
}

const NAMED: [(&str, Domain); 10] = [
    ("AnyInteger", Domain::ANY_INTEGER),
    ("AnyReal", Domain::ANY_REAL),
    ("AnyConstantInteger", Domain::ANY_CONSTANT_INTEGER),
    ("AnyConstantReal", Domain::ANY_CONSTANT_REAL),
    ("NonNegativeInteger", Domain::NON_NEGATIVE_INTEGER),
    ("NonNegativeReal", Domain::NON_NEGATIVE_REAL),
    ("NonNegativeConstantInteger", Domain::NON_NEGATIVE_CONSTANT_INTEGER),
    ("NonNegativeConstantReal", Domain::NON_NEGATIVE_CONSTANT_REAL),
    ("BinaryInteger", Domain::BINARY_INTEGER),
    ("BinaryConstantInteger", Domain::BINARY_CONSTANT_INTEGER),
];

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = match self.range {
            RangeKind::Unconstrained => "Any",
            RangeKind::NonNegative => "NonNegative",
            RangeKind::Binary => "Binary",
        };
        let constant = if self.constant { "Constant" } else { "" };
        let kind = match self.kind {
            NumericKind::Integer => "Integer",
            NumericKind::Real => "Real",
        };
        write!(f, "{}{}{}", range, constant, kind)
    }
}

impl FromStr for Domain {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        NAMED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, domain)| *domain)
            .ok_or_else(|| ModelError::UnknownDomain(s.to_string()))
    }
}
