//! Design matrix assembly.

use std::collections::HashSet;

use nalgebra::{DMatrix, DVectorView};

use crate::{confounds::ConfoundFrame, regressor::Regressor};

/// Name of the intercept column appended to every design.
pub const INTERCEPT: &str = "constant";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum DesignError {
    #[display("column '{column}' has {rows} rows but the run has {n_scans} scans")]
    RowMismatch {
        column: String,
        rows: usize,
        n_scans: usize,
    },
    #[display("design column '{column}' appears more than once")]
    DuplicateColumn { column: String },
}

/// Scans × columns design with named columns.
///
/// Column order is regressors (each followed by its derivative column),
/// then confounds, then [`INTERCEPT`].
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    names: Vec<String>,
    matrix: DMatrix<f64>,
}

impl DesignMatrix {
    pub fn assemble(
        regressors: &[Regressor],
        confounds: &ConfoundFrame,
        n_scans: usize,
    ) -> Result<Self, DesignError> {
        let regressor_columns = regressors
            .iter()
            .flat_map(|r| &r.columns)
            .map(|c| (c.name.clone(), c.values.clone()));
        let confound_columns = confounds.names.iter().cloned().zip(confounds.columns.iter().cloned());
        let intercept = std::iter::once((INTERCEPT.to_owned(), vec![1.0; n_scans]));
        Self::from_columns(
            regressor_columns.chain(confound_columns).chain(intercept),
            n_scans,
        )
    }

    /// Builds a design from named columns without adding an intercept.
    pub fn from_columns<I>(columns: I, n_scans: usize) -> Result<Self, DesignError>
    where
        I: IntoIterator<Item = (String, Vec<f64>)>,
    {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        let mut data = Vec::new();
        for (name, values) in columns {
            if values.len() != n_scans {
                return Err(DesignError::RowMismatch {
                    column: name,
                    rows: values.len(),
                    n_scans,
                });
            }
            if !seen.insert(name.clone()) {
                return Err(DesignError::DuplicateColumn { column: name });
            }
            names.push(name);
            data.extend(values);
        }
        let matrix = DMatrix::from_vec(n_scans, names.len(), data);
        Ok(Self { names, matrix })
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    #[must_use]
    pub fn n_scans(&self) -> usize {
        self.matrix.nrows()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<DVectorView<'_, f64>> {
        self.column_index(name).map(|i| self.matrix.column(i))
    }
}

#[cfg(test)]
mod tests {
    use arrayvec::ArrayVec;

    use super::*;
    use crate::regressor::RegressorColumn;

    fn regressor(name: &str, values: &[f64], derivative: bool) -> Regressor {
        let mut columns = ArrayVec::new();
        columns.push(RegressorColumn {
            name: name.to_owned(),
            values: values.to_vec(),
        });
        if derivative {
            columns.push(RegressorColumn {
                name: format!("{name}_derivative"),
                values: values.iter().map(|v| -v).collect(),
            });
        }
        Regressor {
            name: name.to_owned(),
            columns,
        }
    }

    fn confounds(n_rows: usize) -> ConfoundFrame {
        ConfoundFrame {
            names: vec!["trans_x".into()],
            columns: vec![vec![0.5; n_rows]],
            n_rows,
        }
    }

    #[test]
    fn test_column_order_and_intercept() {
        let regressors = [
            regressor("go", &[1.0, 2.0, 3.0], true),
            regressor("stop", &[0.0, 1.0, 0.0], false),
        ];
        let design = DesignMatrix::assemble(&regressors, &confounds(3), 3).unwrap();
        assert_eq!(
            design.names(),
            ["go", "go_derivative", "stop", "trans_x", "constant"]
        );
        assert_eq!(design.matrix().shape(), (3, 5));
        assert_eq!(design.column("go_derivative").unwrap()[2], -3.0);
        assert!(design.column(INTERCEPT).unwrap().iter().all(|v| *v == 1.0));
        assert_eq!(design.column_index("stop"), Some(2));
    }

    #[test]
    fn test_row_mismatch_is_rejected() {
        let regressors = [regressor("go", &[1.0, 2.0, 3.0], false)];
        assert!(matches!(
            DesignMatrix::assemble(&regressors, &confounds(4), 3),
            Err(DesignError::RowMismatch { ref column, rows: 4, n_scans: 3 }) if column == "trans_x"
        ));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let regressors = [regressor("trans_x", &[1.0, 2.0, 3.0], false)];
        assert!(matches!(
            DesignMatrix::assemble(&regressors, &confounds(3), 3),
            Err(DesignError::DuplicateColumn { .. })
        ));
    }
}
