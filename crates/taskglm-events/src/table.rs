//! Columnar event table read from a tab-separated event file.
//!
//! Missing cells (`n/a`, empty, `NaN`) become `NaN` in numeric columns and
//! `None` in text columns. The required columns have fixed types; any other
//! column is numeric when every present cell parses as a number and text
//! otherwise.

use std::{io, path::Path};

use serde::Serialize;

/// Cell spellings treated as missing values.
pub const MISSING_MARKERS: [&str; 5] = ["n/a", "", "NaN", "nan", "NA"];

/// Columns that must be present and numeric.
pub const REQUIRED_NUMERIC_COLUMNS: [&str; 5] = [
    "onset",
    "duration",
    "key_press",
    "correct_response",
    "response_time",
];

/// Columns that must be present and categorical.
pub const REQUIRED_TEXT_COLUMNS: [&str; 2] = ["trial_id", "trial_type"];

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EventsError {
    #[display("failed to read event table: {_0}")]
    Csv(csv::Error),
    #[display("missing required event column '{column}'")]
    MissingColumn { column: String },
    #[display("column '{column}' row {row}: cannot parse '{value}' as a number")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },
    #[display("column '{column}' is categorical but a numeric column is required")]
    NotNumeric { column: String },
    #[display("column '{column}' already exists")]
    DuplicateColumn { column: String },
    #[display("column '{column}' has {actual} rows, table has {expected}")]
    RowCountMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

impl From<csv::Error> for EventsError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One column of an event table.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<Option<String>>),
}

impl Column {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a 0/1 numeric column from a boolean mask.
    #[must_use]
    pub fn indicator(mask: &[bool]) -> Self {
        Column::Numeric(mask.iter().map(|&b| f64::from(u8::from(b))).collect())
    }

    fn parse(name: &str, raw: Vec<String>, kind: ColumnKind) -> Result<Self, EventsError> {
        let is_missing = |cell: &str| MISSING_MARKERS.contains(&cell.trim());
        let kind = match kind {
            ColumnKind::Infer => {
                let all_numeric = raw
                    .iter()
                    .filter(|cell| !is_missing(cell))
                    .all(|cell| cell.trim().parse::<f64>().is_ok());
                if all_numeric {
                    ColumnKind::Numeric
                } else {
                    ColumnKind::Text
                }
            }
            kind => kind,
        };
        match kind {
            ColumnKind::Text => Ok(Column::Text(
                raw.into_iter()
                    .map(|cell| (!is_missing(&cell)).then_some(cell))
                    .collect(),
            )),
            _ => raw
                .iter()
                .enumerate()
                .map(|(row, cell)| {
                    if is_missing(cell) {
                        return Ok(f64::NAN);
                    }
                    cell.trim()
                        .parse::<f64>()
                        .map_err(|_| EventsError::InvalidNumber {
                            column: name.to_owned(),
                            row,
                            value: cell.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Column::Numeric),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ColumnKind {
    Numeric,
    Text,
    Infer,
}

impl ColumnKind {
    fn for_column(name: &str) -> Self {
        if REQUIRED_NUMERIC_COLUMNS.contains(&name) {
            ColumnKind::Numeric
        } else if REQUIRED_TEXT_COLUMNS.contains(&name) {
            ColumnKind::Text
        } else {
            ColumnKind::Infer
        }
    }
}

/// Event log of one (subject, session, task).
///
/// Columns can be appended but existing columns are never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventTable {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl EventTable {
    /// Reads an event file.
    pub fn from_tsv_path<P>(path: P) -> Result<Self, EventsError>
    where
        P: AsRef<Path>,
    {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_path(path.as_ref())?;
        Self::from_csv_reader(reader)
    }

    /// Reads tab-separated event data from any reader.
    pub fn from_tsv_reader<R>(reader: R) -> Result<Self, EventsError>
    where
        R: io::Read,
    {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(reader);
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R>(mut reader: csv::Reader<R>) -> Result<Self, EventsError>
    where
        R: io::Read,
    {
        let headers = reader
            .headers()?
            .iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        let mut raw = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (cells, cell) in raw.iter_mut().zip(record.iter()) {
                cells.push(cell.to_owned());
            }
        }
        let columns = headers
            .into_iter()
            .zip(raw)
            .map(|(name, cells)| {
                let column = Column::parse(&name, cells, ColumnKind::for_column(&name))?;
                Ok((name, column))
            })
            .collect::<Result<Vec<_>, EventsError>>()?;
        Self::from_columns(columns)
    }

    /// Builds a table from named columns and checks the required-column
    /// contract.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, EventsError>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut table = Self {
            names: Vec::new(),
            columns: Vec::new(),
            n_rows: 0,
        };
        for (i, (name, column)) in columns.into_iter().enumerate() {
            if i == 0 {
                table.n_rows = column.len();
            }
            table.push_column(name, column)?;
        }
        for column in REQUIRED_NUMERIC_COLUMNS {
            table.numeric(column)?;
        }
        for column in REQUIRED_TEXT_COLUMNS {
            if !table.has_column(column) {
                return Err(EventsError::MissingColumn {
                    column: column.to_owned(),
                });
            }
        }
        Ok(table)
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    /// Returns a numeric column, failing when it is missing or categorical.
    pub fn numeric(&self, name: &str) -> Result<&[f64], EventsError> {
        match self.column(name) {
            Some(Column::Numeric(values)) => Ok(values),
            Some(Column::Text(_)) => Err(EventsError::NotNumeric {
                column: name.to_owned(),
            }),
            None => Err(EventsError::MissingColumn {
                column: name.to_owned(),
            }),
        }
    }

    /// Appends a column.
    pub fn push_column<S>(&mut self, name: S, column: Column) -> Result<(), EventsError>
    where
        S: Into<String>,
    {
        let name = name.into();
        if self.has_column(&name) {
            return Err(EventsError::DuplicateColumn { column: name });
        }
        if column.len() != self.n_rows {
            return Err(EventsError::RowCountMismatch {
                column: name,
                expected: self.n_rows,
                actual: column.len(),
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "onset\tduration\ttrial_id\ttrial_type\tkey_press\tcorrect_response\tresponse_time";

    fn read(body: &str) -> Result<EventTable, EventsError> {
        EventTable::from_tsv_reader(format!("{HEADER}\n{body}").as_bytes())
    }

    #[test]
    fn test_missing_cells_become_nan_or_none() {
        let table = read("0.0\t1.0\ttest_trial\tn/a\t-1\t37\tn/a\n").unwrap();
        assert!(table.numeric("response_time").unwrap()[0].is_nan());
        assert_eq!(table.column("trial_type"), Some(&Column::Text(vec![None])));
    }

    #[test]
    fn test_auxiliary_columns_are_inferred() {
        let tsv = format!(
            "{HEADER}\tdelay\tcue\n\
             0.0\t1.0\ttest_trial\tmatch\t37\t37\t0.5\t1\tswitch\n\
             2.0\t1.0\ttest_trial\tmismatch\t37\t37\t0.5\tn/a\tstay\n"
        );
        let table = EventTable::from_tsv_reader(tsv.as_bytes()).unwrap();
        assert!(table.column("delay").unwrap().is_numeric());
        assert!(table.column("cue").unwrap().is_text());
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let tsv = "onset\tduration\ttrial_id\ttrial_type\tkey_press\tcorrect_response\n\
                   0.0\t1.0\ttest_trial\tgo\t-1\t37\n";
        let err = EventTable::from_tsv_reader(tsv.as_bytes()).unwrap_err();
        assert!(
            matches!(err, EventsError::MissingColumn { ref column } if column == "response_time")
        );
    }

    #[test]
    fn test_non_numeric_required_cell_is_rejected() {
        let err = read("0.0\t1.0\ttest_trial\tgo\tleft\t37\t0.4\n").unwrap_err();
        assert!(matches!(err, EventsError::InvalidNumber { row: 0, .. }));
    }

    #[test]
    fn test_push_column_checks_name_and_length() {
        let mut table = read("0.0\t1.0\ttest_trial\tgo\t37\t37\t0.4\n").unwrap();
        assert!(matches!(
            table.push_column("onset", Column::Numeric(vec![1.0])),
            Err(EventsError::DuplicateColumn { .. })
        ));
        assert!(matches!(
            table.push_column("extra", Column::Numeric(vec![1.0, 2.0])),
            Err(EventsError::RowCountMismatch { .. })
        ));
        table
            .push_column("extra", Column::indicator(&[true]))
            .unwrap();
        assert_eq!(table.numeric("extra").unwrap(), [1.0]);
    }
}
