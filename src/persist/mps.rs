//! Free-format MPS reader and writer.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::backend::{BackendError, BackendResult};
use crate::domain::{
    Column, Constraint, OptimizationProblem, OptimizationType, RowSense, VariableType,
};

const OBJECTIVE_ROW: &str = "OBJ";

/// Magnitudes at or above this are read as infinite, as most MPS writers do.
const MPS_INFINITY: f64 = 1e30;

pub fn write_mps(problem: &OptimizationProblem) -> BackendResult<String> {
    for column in &problem.variables {
        if column.name.is_empty() || column.name.contains(char::is_whitespace) {
            return Err(BackendError::Rejected(format!(
                "column name '{}' cannot be written as MPS",
                column.name
            )));
        }
    }

    // Per column: row slot (0 = objective, i + 1 = constraint i) -> coefficient.
    let mut entries: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); problem.num_variables()];
    let terms = problem
        .objective
        .terms
        .iter()
        .map(|term| (0, term))
        .chain(problem.constraints.iter().enumerate().flat_map(|(i, constraint)| {
            constraint.terms.iter().map(move |term| (i + 1, term))
        }));
    for (slot, &(column, coeff)) in terms {
        let rows = entries.get_mut(column).ok_or_else(|| {
            BackendError::Rejected(format!("row {} references unknown column {}", slot, column))
        })?;
        *rows.entry(slot).or_insert(0.0) += coeff;
    }
    let row_name = |slot: usize| {
        if slot == 0 {
            OBJECTIVE_ROW.to_string()
        } else {
            format!("R{}", slot)
        }
    };

    let name = problem.name.split_whitespace().collect::<Vec<_>>().join("_");
    let mut out = String::new();
    out.push_str(&format!(
        "NAME {}\n",
        if name.is_empty() { "MODEL" } else { name.as_str() }
    ));
    out.push_str("OBJSENSE\n");
    out.push_str(match problem.objective.optimization_type {
        OptimizationType::Maximize => "    MAX\n",
        OptimizationType::Minimize => "    MIN\n",
    });

    out.push_str("ROWS\n");
    out.push_str(&format!(" N  {}\n", OBJECTIVE_ROW));
    for (i, constraint) in problem.constraints.iter().enumerate() {
        let kind = match constraint.constraint_type {
            RowSense::LessThanOrEqual => "L",
            RowSense::Equal => "E",
            RowSense::GreaterThanOrEqual => "G",
        };
        out.push_str(&format!(" {}  {}\n", kind, row_name(i + 1)));
    }

    out.push_str("COLUMNS\n");
    let mut integer_block = false;
    for (column, rows) in problem.variables.iter().zip(&entries) {
        if column.is_integer() != integer_block {
            let marker = if integer_block { "INTEND" } else { "INTORG" };
            out.push_str(&format!("    MARKER  'MARKER'  '{}'\n", marker));
            integer_block = !integer_block;
        }
        if rows.is_empty() {
            out.push_str(&format!("    {}  {}  0\n", column.name, OBJECTIVE_ROW));
        }
        for (&slot, &coeff) in rows {
            out.push_str(&format!("    {}  {}  {}\n", column.name, row_name(slot), coeff));
        }
    }
    if integer_block {
        out.push_str("    MARKER  'MARKER'  'INTEND'\n");
    }

    out.push_str("RHS\n");
    for (i, constraint) in problem.constraints.iter().enumerate() {
        if constraint.bound != 0.0 {
            out.push_str(&format!("    RHS  {}  {}\n", row_name(i + 1), constraint.bound));
        }
    }

    out.push_str("BOUNDS\n");
    for column in &problem.variables {
        let name = &column.name;
        if column.variable_type == VariableType::Binary {
            out.push_str(&format!(" BV BND  {}\n", name));
            continue;
        }
        match (column.lower_bound, column.upper_bound) {
            (None, None) => out.push_str(&format!(" FR BND  {}\n", name)),
            (None, Some(upper)) => {
                out.push_str(&format!(" MI BND  {}\n", name));
                out.push_str(&format!(" UP BND  {}  {}\n", name, upper));
            }
            (Some(lower), None) => out.push_str(&format!(" LO BND  {}  {}\n", name, lower)),
            (Some(lower), Some(upper)) if lower == upper => {
                out.push_str(&format!(" FX BND  {}  {}\n", name, lower))
            }
            (Some(lower), Some(upper)) => {
                out.push_str(&format!(" LO BND  {}  {}\n", name, lower));
                out.push_str(&format!(" UP BND  {}  {}\n", name, upper));
            }
        }
    }
    out.push_str("ENDATA\n");
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Start,
    Name,
    ObjSense,
    Rows,
    Columns,
    Rhs,
    Ranges,
    Bounds,
}

fn malformed(line: usize, message: impl Into<String>) -> BackendError {
    BackendError::Format {
        line,
        message: message.into(),
    }
}

fn number(token: &str, line: usize) -> BackendResult<f64> {
    let value: f64 = token
        .parse()
        .map_err(|_| malformed(line, format!("'{}' is not a number", token)))?;
    if value >= MPS_INFINITY {
        Ok(f64::INFINITY)
    } else if value <= -MPS_INFINITY {
        Ok(f64::NEG_INFINITY)
    } else {
        Ok(value)
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn sense_keyword(token: &str, line: usize) -> BackendResult<OptimizationType> {
    match token.to_ascii_uppercase().as_str() {
        "MAX" | "MAXIMIZE" => Ok(OptimizationType::Maximize),
        "MIN" | "MINIMIZE" => Ok(OptimizationType::Minimize),
        other => Err(malformed(line, format!("unknown objective sense '{}'", other))),
    }
}

#[derive(Default)]
struct Reader {
    problem: OptimizationProblem,
    objective_row: Option<String>,
    ignored_rows: HashSet<String>,
    rows: HashMap<String, usize>,
    columns: HashMap<String, usize>,
    integer_block: bool,
}

impl Reader {
    fn row(&mut self, tokens: &[&str], line: usize) -> BackendResult<()> {
        let [kind, name] = tokens else {
            return Err(malformed(line, "expected row type and row name"));
        };
        let sense = match kind.to_ascii_uppercase().as_str() {
            "N" => {
                if self.objective_row.is_none() {
                    self.objective_row = Some(name.to_string());
                } else {
                    self.ignored_rows.insert(name.to_string());
                }
                return Ok(());
            }
            "L" => RowSense::LessThanOrEqual,
            "E" => RowSense::Equal,
            "G" => RowSense::GreaterThanOrEqual,
            other => return Err(malformed(line, format!("unknown row type '{}'", other))),
        };
        if self
            .rows
            .insert(name.to_string(), self.problem.constraints.len())
            .is_some()
        {
            return Err(malformed(line, format!("duplicate row '{}'", name)));
        }
        self.problem
            .constraints
            .push(Constraint::new(sense, Vec::new(), 0.0).with_name(*name));
        Ok(())
    }

    fn column(&mut self, tokens: &[&str], line: usize) -> BackendResult<()> {
        if tokens.len() >= 3 && tokens[1].trim_matches('\'').eq_ignore_ascii_case("MARKER") {
            match tokens[2].trim_matches('\'').to_ascii_uppercase().as_str() {
                "INTORG" => self.integer_block = true,
                "INTEND" => self.integer_block = false,
                other => return Err(malformed(line, format!("unknown marker '{}'", other))),
            }
            return Ok(());
        }
        if tokens.len() < 3 || tokens.len() % 2 == 0 {
            return Err(malformed(
                line,
                "expected a column name followed by row/value pairs",
            ));
        }

        let name = tokens[0];
        let index = match self.columns.get(name) {
            Some(&index) => index,
            None => {
                let column = if self.integer_block {
                    Column::integer(name)
                } else {
                    Column::continuous(name)
                };
                self.problem.variables.push(column);
                let index = self.problem.variables.len() - 1;
                self.columns.insert(name.to_string(), index);
                index
            }
        };

        for pair in tokens[1..].chunks(2) {
            let value = number(pair[1], line)?;
            // Zero entries only declare the column.
            self.entry(pair[0], line, |problem, row| match row {
                _ if value == 0.0 => {}
                None => problem.objective.terms.push((index, value)),
                Some(row) => problem.constraints[row].terms.push((index, value)),
            })?;
        }
        Ok(())
    }

    fn rhs(&mut self, tokens: &[&str], line: usize) -> BackendResult<()> {
        // The RHS set name is optional in free MPS.
        let pairs = if tokens.len() % 2 == 1 {
            &tokens[1..]
        } else {
            tokens
        };
        if pairs.is_empty() {
            return Err(malformed(line, "expected row/value pairs"));
        }
        for pair in pairs.chunks(2) {
            let value = number(pair[1], line)?;
            self.entry(pair[0], line, |problem, row| {
                if let Some(row) = row {
                    problem.constraints[row].bound = value;
                }
            })?;
        }
        Ok(())
    }

    fn entry(
        &mut self,
        row: &str,
        line: usize,
        apply: impl FnOnce(&mut OptimizationProblem, Option<usize>),
    ) -> BackendResult<()> {
        if self.objective_row.as_deref() == Some(row) {
            apply(&mut self.problem, None);
        } else if let Some(&index) = self.rows.get(row) {
            apply(&mut self.problem, Some(index));
        } else if !self.ignored_rows.contains(row) {
            return Err(malformed(line, format!("unknown row '{}'", row)));
        }
        Ok(())
    }

    fn bound(&mut self, tokens: &[&str], line: usize) -> BackendResult<()> {
        let kind = tokens
            .first()
            .map(|k| k.to_ascii_uppercase())
            .unwrap_or_default();
        let needs_value = !matches!(kind.as_str(), "FR" | "MI" | "PL" | "BV");
        let (name, value) = match (needs_value, tokens.len()) {
            (true, 4) => (tokens[2], number(tokens[3], line)?),
            (true, 3) => (tokens[1], number(tokens[2], line)?),
            (false, 3) | (false, 4) => (tokens[2], 0.0),
            (false, 2) => (tokens[1], 0.0),
            _ => return Err(malformed(line, "malformed bound entry")),
        };
        let index = *self
            .columns
            .get(name)
            .ok_or_else(|| malformed(line, format!("unknown column '{}'", name)))?;
        let column = &mut self.problem.variables[index];
        match kind.as_str() {
            "UP" => column.upper_bound = finite(value),
            "LO" => column.lower_bound = finite(value),
            "FX" => {
                column.lower_bound = Some(value);
                column.upper_bound = Some(value);
            }
            "FR" => {
                column.lower_bound = None;
                column.upper_bound = None;
            }
            "MI" => column.lower_bound = None,
            "PL" => column.upper_bound = None,
            "BV" => {
                column.variable_type = VariableType::Binary;
                column.set_bounds(0.0, 1.0);
            }
            "LI" | "UI" => {
                if column.variable_type == VariableType::Continuous {
                    column.variable_type = VariableType::Integer;
                }
                if kind == "LI" {
                    column.lower_bound = finite(value);
                } else {
                    column.upper_bound = finite(value);
                }
            }
            other => return Err(malformed(line, format!("unknown bound type '{}'", other))),
        }
        Ok(())
    }
}

pub fn read_mps(text: &str) -> BackendResult<OptimizationProblem> {
    let mut reader = Reader::default();
    let mut section = Section::Start;

    for (n, raw) in text.lines().enumerate() {
        let line = n + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('*') {
            continue;
        }
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        if !raw.starts_with(char::is_whitespace) {
            section = match tokens[0].to_ascii_uppercase().as_str() {
                "NAME" => {
                    reader.problem.name = tokens[1..].join(" ");
                    Section::Name
                }
                "OBJSENSE" => {
                    if let Some(sense) = tokens.get(1) {
                        reader.problem.objective.optimization_type = sense_keyword(sense, line)?;
                    }
                    Section::ObjSense
                }
                "ROWS" => Section::Rows,
                "COLUMNS" => Section::Columns,
                "RHS" => Section::Rhs,
                "RANGES" => Section::Ranges,
                "BOUNDS" => Section::Bounds,
                "ENDATA" => return Ok(reader.problem),
                other => return Err(malformed(line, format!("unknown section '{}'", other))),
            };
            continue;
        }

        match section {
            Section::ObjSense => {
                reader.problem.objective.optimization_type = sense_keyword(tokens[0], line)?
            }
            Section::Rows => reader.row(&tokens, line)?,
            Section::Columns => reader.column(&tokens, line)?,
            Section::Rhs => reader.rhs(&tokens, line)?,
            Section::Bounds => reader.bound(&tokens, line)?,
            Section::Ranges => {
                return Err(malformed(line, "RANGES section is not supported"));
            }
            Section::Start | Section::Name => {
                return Err(malformed(line, "data line outside of a section"));
            }
        }
    }

    Err(malformed(text.lines().count(), "missing ENDATA"))
}
