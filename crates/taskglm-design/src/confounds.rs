//! Nuisance confound columns from the preprocessing confound table.

use std::{io, path::Path, sync::LazyLock};

use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// Motion parameters with their expansion terms, anchored at the end.
const MOTION_PATTERN: &str =
    r"(trans|rot)_[xyz](_derivative1)?(_power2)?$";

static ALL_COSINES: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(&format!("cosine|{MOTION_PATTERN}")));
static LEADING_COSINES: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(&format!("cosine0[0-4]|{MOTION_PATTERN}")));

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfoundError {
    #[display("failed to read confound table: {_0}")]
    Csv(csv::Error),
    #[display("confound '{column}' row {row}: cannot parse '{value}' as a number")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },
    #[display("invalid confound pattern: {_0}")]
    Pattern(regex::Error),
    #[display("confound table has {rows} rows but the run has {n_scans} scans")]
    ScanCountMismatch { rows: usize, n_scans: usize },
}

impl From<csv::Error> for ConfoundError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Which drift terms are kept alongside the motion parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ConfoundPolicy {
    /// Every `cosine*` column.
    #[default]
    AllCosines,
    /// Only `cosine00` to `cosine04`, for blocked designs whose task
    /// frequency would be absorbed by the higher cosines.
    LeadingCosines,
}

impl ConfoundPolicy {
    pub fn pattern(self) -> Result<&'static Regex, ConfoundError> {
        let pattern = match self {
            ConfoundPolicy::AllCosines => &*ALL_COSINES,
            ConfoundPolicy::LeadingCosines => &*LEADING_COSINES,
        };
        pattern.as_ref().map_err(|err| ConfoundError::Pattern(err.clone()))
    }

    /// Whether the column is selected. Matches anywhere in the name.
    pub fn selects(self, column: &str) -> Result<bool, ConfoundError> {
        Ok(self.pattern()?.is_match(column))
    }
}

/// Selected confound columns, in the order of the input file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfoundFrame {
    pub names: Vec<String>,
    pub columns: Vec<Vec<f64>>,
    pub n_rows: usize,
}

impl ConfoundFrame {
    pub fn from_tsv_path<P>(path: P, policy: ConfoundPolicy) -> Result<Self, ConfoundError>
    where
        P: AsRef<Path>,
    {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_path(path.as_ref())?;
        Self::from_csv_reader(reader, policy)
    }

    pub fn from_tsv_reader<R>(reader: R, policy: ConfoundPolicy) -> Result<Self, ConfoundError>
    where
        R: io::Read,
    {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(reader);
        Self::from_csv_reader(reader, policy)
    }

    fn from_csv_reader<R>(
        mut reader: csv::Reader<R>,
        policy: ConfoundPolicy,
    ) -> Result<Self, ConfoundError>
    where
        R: io::Read,
    {
        let pattern = policy.pattern()?;
        let selected = reader
            .headers()?
            .iter()
            .enumerate()
            .filter(|(_, name)| pattern.is_match(name))
            .map(|(i, name)| (i, name.to_owned()))
            .collect::<Vec<_>>();

        let mut columns = vec![Vec::new(); selected.len()];
        let mut n_rows = 0;
        for record in reader.records() {
            let record = record?;
            for ((index, name), column) in selected.iter().zip(&mut columns) {
                let cell = record.get(*index).unwrap_or("").trim();
                let value = if cell.is_empty() || cell == "n/a" {
                    0.0
                } else {
                    cell.parse::<f64>()
                        .map_err(|_| ConfoundError::InvalidNumber {
                            column: name.clone(),
                            row: n_rows,
                            value: cell.to_owned(),
                        })?
                };
                column.push(value);
            }
            n_rows += 1;
        }
        let names = selected.into_iter().map(|(_, name)| name).collect::<Vec<_>>();
        debug!(n_confounds = names.len(), n_rows, ?policy, "selected confounds");
        Ok(Self {
            names,
            columns,
            n_rows,
        })
    }

    pub fn ensure_rows(&self, n_scans: usize) -> Result<(), ConfoundError> {
        if self.n_rows == n_scans {
            Ok(())
        } else {
            Err(ConfoundError::ScanCountMismatch {
                rows: self.n_rows,
                n_scans,
            })
        }
    }
}
