use std::collections::BTreeMap;

use super::ids::ColumnId;

/// Sparse linear form Σ coefficient·column.
///
/// Coefficients on the same column accumulate, so `x + x` becomes `2·x`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearRow {
    coefficients: BTreeMap<ColumnId, f64>,
}

impl LinearRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: ColumnId, coefficient: f64) -> Self {
        self.add(column, coefficient);
        self
    }

    pub fn add(&mut self, column: ColumnId, coefficient: f64) {
        *self.coefficients.entry(column).or_insert(0.0) += coefficient;
    }

    pub fn coefficient(&self, column: ColumnId) -> f64 {
        self.coefficients.get(&column).copied().unwrap_or(0.0)
    }

    /// Terms in column order, with cancelled coefficients dropped.
    pub fn terms(&self) -> Vec<(ColumnId, f64)> {
        self.coefficients
            .iter()
            .filter(|(_, coeff)| **coeff != 0.0)
            .map(|(column, coeff)| (*column, *coeff))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_columns_accumulate() {
        let x = ColumnId::new(1);
        let row = LinearRow::new().with(x, 1.0).with(x, 1.0);
        assert_eq!(row.coefficient(x), 2.0);
    }

    #[test]
    fn cancelled_terms_are_dropped() {
        let x = ColumnId::new(2);
        let y = ColumnId::new(1);
        let row = LinearRow::new().with(x, 1.0).with(y, 3.0).with(x, -1.0);
        assert_eq!(row.terms(), vec![(y, 3.0)]);
    }
}
