//! Row-filter expression tree.
//!
//! A [`Filter`] selects the event rows that feed one regressor. It is a
//! small typed expression language (comparisons, set membership, boolean
//! connectives) evaluated against an [`EventTable`] into a boolean mask.
//!
//! # Comparison semantics
//!
//! Cells are compared after classification into number, text or missing:
//!
//! - numbers compare numerically, text compares as strings
//! - a missing categorical cell equals the label `"n/a"`
//! - any other comparison involving a missing cell is false, except `!=`
//!   which is true
//! - a number compared with text that parses as a number compares
//!   numerically; otherwise the two are simply unequal
//!
//! # Example
//!
//! ```
//! use taskglm_events::filter::Filter;
//!
//! let accurate_go = Filter::columns_eq("key_press", "correct_response")
//!     .and(Filter::ge("response_time", 0.2))
//!     .and(Filter::eq("trial_type", "go"));
//! assert_eq!(
//!     accurate_go.to_string(),
//!     "key_press == correct_response and response_time >= 0.2 and trial_type == 'go'"
//! );
//! ```

use std::{cmp::Ordering, collections::BTreeSet, fmt};

use serde::Serialize;

use crate::table::{Column, EventTable};

/// Label that a missing categorical cell compares equal to.
pub const MISSING_LABEL: &str = "n/a";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum FilterError {
    #[display("filter references unknown column '{column}'")]
    UnknownColumn { column: String },
}

/// Literal operand of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "'{s}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum CompareOp {
    #[display("==")]
    Eq,
    #[display("!=")]
    Ne,
    #[display("<")]
    Lt,
    #[display("<=")]
    Le,
    #[display(">")]
    Gt,
    #[display(">=")]
    Ge,
}

impl CompareOp {
    fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (CompareOp::Ne, None) => true,
            (_, None) => false,
            (CompareOp::Eq, Some(o)) => o == Ordering::Equal,
            (CompareOp::Ne, Some(o)) => o != Ordering::Equal,
            (CompareOp::Lt, Some(o)) => o == Ordering::Less,
            (CompareOp::Le, Some(o)) => o != Ordering::Greater,
            (CompareOp::Gt, Some(o)) => o == Ordering::Greater,
            (CompareOp::Ge, Some(o)) => o != Ordering::Less,
        }
    }
}

/// Right-hand side of a comparison: a literal or another column.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::Display)]
pub enum Operand {
    Value(Value),
    Column(String),
}

/// Boolean row predicate over an event table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Filter {
    /// Every row.
    All,
    Compare {
        column: String,
        op: CompareOp,
        operand: Operand,
    },
    In {
        column: String,
        values: Vec<Value>,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn compare<C, V>(column: C, op: CompareOp, value: V) -> Self
    where
        C: Into<String>,
        V: Into<Value>,
    {
        Filter::Compare {
            column: column.into(),
            op,
            operand: Operand::Value(value.into()),
        }
    }

    pub fn eq<C: Into<String>, V: Into<Value>>(column: C, value: V) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn ne<C: Into<String>, V: Into<Value>>(column: C, value: V) -> Self {
        Self::compare(column, CompareOp::Ne, value)
    }

    pub fn lt<C: Into<String>, V: Into<Value>>(column: C, value: V) -> Self {
        Self::compare(column, CompareOp::Lt, value)
    }

    pub fn ge<C: Into<String>, V: Into<Value>>(column: C, value: V) -> Self {
        Self::compare(column, CompareOp::Ge, value)
    }

    /// Row-wise equality of two columns.
    pub fn columns_eq<A, B>(left: A, right: B) -> Self
    where
        A: Into<String>,
        B: Into<String>,
    {
        Filter::Compare {
            column: left.into(),
            op: CompareOp::Eq,
            operand: Operand::Column(right.into()),
        }
    }

    pub fn is_in<C, I, V>(column: C, values: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Filter::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Conjunction, flattening nested `And`s.
    #[must_use]
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, other) => other,
            (this, Filter::All) => this,
            (Filter::And(mut lhs), Filter::And(rhs)) => {
                lhs.extend(rhs);
                Filter::And(lhs)
            }
            (Filter::And(mut lhs), rhs) => {
                lhs.push(rhs);
                Filter::And(lhs)
            }
            (lhs, rhs) => Filter::And(vec![lhs, rhs]),
        }
    }

    /// Disjunction, flattening nested `Or`s.
    #[must_use]
    pub fn or(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::Or(mut lhs), Filter::Or(rhs)) => {
                lhs.extend(rhs);
                Filter::Or(lhs)
            }
            (Filter::Or(mut lhs), rhs) => {
                lhs.push(rhs);
                Filter::Or(lhs)
            }
            (lhs, rhs) => Filter::Or(vec![lhs, rhs]),
        }
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(self) -> Self {
        Filter::Not(Box::new(self))
    }

    /// Every column name the filter reads.
    #[must_use]
    pub fn referenced_columns(&self) -> BTreeSet<&str> {
        let mut columns = BTreeSet::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns<'a>(&'a self, columns: &mut BTreeSet<&'a str>) {
        match self {
            Filter::All => {}
            Filter::Compare {
                column, operand, ..
            } => {
                columns.insert(column);
                if let Operand::Column(other) = operand {
                    columns.insert(other);
                }
            }
            Filter::In { column, .. } => {
                columns.insert(column);
            }
            Filter::And(filters) | Filter::Or(filters) => {
                for filter in filters {
                    filter.collect_columns(columns);
                }
            }
            Filter::Not(filter) => filter.collect_columns(columns),
        }
    }

    /// Evaluates the filter into a boolean mask with one entry per row.
    pub fn evaluate(&self, table: &EventTable) -> Result<Vec<bool>, FilterError> {
        let n_rows = table.n_rows();
        match self {
            Filter::All => Ok(vec![true; n_rows]),
            Filter::Compare {
                column,
                op,
                operand,
            } => {
                let lhs = lookup(table, column)?;
                match operand {
                    Operand::Value(value) => {
                        let rhs = Cell::from_value(value);
                        Ok((0..n_rows)
                            .map(|row| op.holds(Cell::at(lhs, row).compare(&rhs)))
                            .collect())
                    }
                    Operand::Column(other) => {
                        let rhs = lookup(table, other)?;
                        Ok((0..n_rows)
                            .map(|row| op.holds(Cell::at(lhs, row).compare(&Cell::at(rhs, row))))
                            .collect())
                    }
                }
            }
            Filter::In { column, values } => {
                let lhs = lookup(table, column)?;
                let values = values.iter().map(Cell::from_value).collect::<Vec<_>>();
                Ok((0..n_rows)
                    .map(|row| {
                        let cell = Cell::at(lhs, row);
                        values
                            .iter()
                            .any(|value| CompareOp::Eq.holds(cell.compare(value)))
                    })
                    .collect())
            }
            Filter::And(filters) => filters.iter().try_fold(vec![true; n_rows], |acc, f| {
                let mask = f.evaluate(table)?;
                Ok(acc.iter().zip(mask).map(|(a, b)| *a && b).collect())
            }),
            Filter::Or(filters) => filters.iter().try_fold(vec![false; n_rows], |acc, f| {
                let mask = f.evaluate(table)?;
                Ok(acc.iter().zip(mask).map(|(a, b)| *a || b).collect())
            }),
            Filter::Not(filter) => Ok(filter.evaluate(table)?.into_iter().map(|b| !b).collect()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |f: &mut fmt::Formatter<'_>, filters: &[Filter], sep: &str| {
            for (i, filter) in filters.iter().enumerate() {
                if i > 0 {
                    write!(f, " {sep} ")?;
                }
                match filter {
                    Filter::And(_) | Filter::Or(_) => write!(f, "({filter})")?,
                    _ => write!(f, "{filter}")?,
                }
            }
            Ok(())
        };
        match self {
            Filter::All => write!(f, "all"),
            Filter::Compare {
                column,
                op,
                operand,
            } => write!(f, "{column} {op} {operand}"),
            Filter::In { column, values } => {
                write!(f, "{column} in [")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
            Filter::And(filters) => join(f, filters, "and"),
            Filter::Or(filters) => join(f, filters, "or"),
            Filter::Not(filter) => write!(f, "not ({filter})"),
        }
    }
}

fn lookup<'a>(table: &'a EventTable, column: &str) -> Result<&'a Column, FilterError> {
    table
        .column(column)
        .ok_or_else(|| FilterError::UnknownColumn {
            column: column.to_owned(),
        })
}

#[derive(Debug, Clone, Copy)]
enum Cell<'a> {
    Number(f64),
    Text(&'a str),
    Missing,
}

impl<'a> Cell<'a> {
    fn at(column: &'a Column, row: usize) -> Self {
        match column {
            Column::Numeric(values) if values[row].is_nan() => Cell::Missing,
            Column::Numeric(values) => Cell::Number(values[row]),
            Column::Text(values) => values[row].as_deref().map_or(Cell::Missing, Cell::Text),
        }
    }

    fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Number(n) if n.is_nan() => Cell::Missing,
            Value::Number(n) => Cell::Number(*n),
            Value::Text(s) => Cell::Text(s),
        }
    }

    fn compare(&self, other: &Cell<'_>) -> Option<Ordering> {
        match (*self, *other) {
            (Cell::Number(a), Cell::Number(b)) => a.partial_cmp(&b),
            (Cell::Text(a), Cell::Text(b)) => Some(a.cmp(b)),
            (Cell::Missing, Cell::Text(label)) | (Cell::Text(label), Cell::Missing) => {
                (label == MISSING_LABEL).then_some(Ordering::Equal)
            }
            (Cell::Number(a), Cell::Text(b)) => b.trim().parse::<f64>().ok()?.partial_cmp(&a).map(Ordering::reverse),
            (Cell::Text(a), Cell::Number(b)) => a.trim().parse::<f64>().ok()?.partial_cmp(&b),
            (Cell::Missing, _) | (_, Cell::Missing) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> EventTable {
        EventTable::from_columns([
            ("onset", Column::Numeric(vec![0.0, 2.0, 4.0, 6.0])),
            ("duration", Column::Numeric(vec![1.0; 4])),
            (
                "trial_id",
                Column::Text(vec![
                    Some("test_trial".into()),
                    Some("test_trial".into()),
                    Some("test_trial".into()),
                    Some("break_with_performance_feedback".into()),
                ]),
            ),
            (
                "trial_type",
                Column::Text(vec![
                    Some("go".into()),
                    Some("stop_failure".into()),
                    Some("go".into()),
                    None,
                ]),
            ),
            ("key_press", Column::Numeric(vec![37.0, 39.0, -1.0, f64::NAN])),
            ("correct_response", Column::Numeric(vec![37.0, 37.0, 37.0, f64::NAN])),
            ("response_time", Column::Numeric(vec![0.5, 0.15, f64::NAN, f64::NAN])),
            ("delay", Column::Text(vec![Some("1".into()), Some("2".into()), None, None])),
        ])
        .unwrap()
    }

    #[test]
    fn test_all_selects_every_row() {
        assert_eq!(Filter::All.evaluate(&table()).unwrap(), [true; 4]);
    }

    #[test]
    fn test_missing_label_matches_missing_text() {
        let t = table();
        assert_eq!(
            Filter::eq("trial_type", "n/a").evaluate(&t).unwrap(),
            [false, false, false, true]
        );
        assert_eq!(
            Filter::ne("trial_type", "n/a").evaluate(&t).unwrap(),
            [true, true, true, false]
        );
    }

    #[test]
    fn test_nan_comparisons_are_false_except_ne() {
        let t = table();
        assert_eq!(
            Filter::ge("response_time", 0.2).evaluate(&t).unwrap(),
            [true, false, false, false]
        );
        assert_eq!(
            Filter::lt("response_time", 0.2).evaluate(&t).unwrap(),
            [false, true, false, false]
        );
        assert_eq!(
            Filter::ne("response_time", 0.2).evaluate(&t).unwrap(),
            [true, true, true, true]
        );
    }

    #[test]
    fn test_column_to_column_comparison() {
        let t = table();
        assert_eq!(
            Filter::columns_eq("key_press", "correct_response")
                .evaluate(&t)
                .unwrap(),
            [true, false, false, false]
        );
    }

    #[test]
    fn test_numeric_literal_against_numeric_text() {
        let t = table();
        assert_eq!(
            Filter::eq("delay", 2).evaluate(&t).unwrap(),
            [false, true, false, false]
        );
    }

    #[test]
    fn test_connectives() {
        let t = table();
        let filter = Filter::eq("trial_id", "test_trial").and(
            Filter::eq("trial_type", "go")
                .and(Filter::ge("response_time", 0.2))
                .or(Filter::eq("trial_type", "stop_failure")),
        );
        assert_eq!(filter.evaluate(&t).unwrap(), [true, true, false, false]);
        assert_eq!(
            filter.clone().not().evaluate(&t).unwrap(),
            [false, false, true, true]
        );
        assert_eq!(
            Filter::is_in("trial_type", ["go", "stop_success"])
                .evaluate(&t)
                .unwrap(),
            [true, false, true, false]
        );
    }

    #[test]
    fn test_unknown_column_is_reported() {
        let err = Filter::eq("condition", "x").evaluate(&table()).unwrap_err();
        assert!(matches!(err, FilterError::UnknownColumn { ref column } if column == "condition"));
    }

    #[test]
    fn test_referenced_columns_and_display() {
        let filter = Filter::columns_eq("key_press", "correct_response")
            .and(Filter::eq("trial_type", "go").or(Filter::eq("trial_type", "stop_failure")));
        let columns = filter.referenced_columns();
        assert_eq!(
            columns.into_iter().collect::<Vec<_>>(),
            ["correct_response", "key_press", "trial_type"]
        );
        assert_eq!(
            filter.to_string(),
            "key_press == correct_response and (trial_type == 'go' or trial_type == 'stop_failure')"
        );
    }
}
