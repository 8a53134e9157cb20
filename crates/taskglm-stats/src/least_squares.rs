//! Least-squares fitting through the SVD pseudo-inverse.
//!
//! Design matrices in this workspace are routinely rank deficient (a
//! condition that never occurred yields an all-zero column), so every fit
//! goes through a thresholded pseudo-inverse instead of the normal
//! equations. The threshold follows the usual convention
//! `max(σ) · max(rows, cols) · ε`.

use nalgebra::DMatrix;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LeastSquaresError {
    #[display("design has {design_rows} rows but response has {response_rows}")]
    ShapeMismatch {
        design_rows: usize,
        response_rows: usize,
    },
    #[display("singular value decomposition failed: {message}")]
    Decomposition { message: String },
}

/// Moore-Penrose pseudo-inverse together with the numerical rank.
#[derive(Debug, Clone)]
pub struct PseudoInverse {
    pub matrix: DMatrix<f64>,
    pub rank: usize,
}

impl PseudoInverse {
    pub fn new(matrix: &DMatrix<f64>) -> Result<Self, LeastSquaresError> {
        let (rows, cols) = matrix.shape();
        if rows == 0 || cols == 0 {
            return Ok(Self {
                matrix: DMatrix::zeros(cols, rows),
                rank: 0,
            });
        }
        let svd = matrix.clone().svd(true, true);
        let max_singular = svd.singular_values.max();
        #[expect(clippy::cast_precision_loss)]
        let tolerance = max_singular * rows.max(cols) as f64 * f64::EPSILON;
        let rank = svd
            .singular_values
            .iter()
            .filter(|&&s| s > tolerance)
            .count();
        let matrix = svd
            .pseudo_inverse(tolerance)
            .map_err(|message| LeastSquaresError::Decomposition {
                message: message.to_owned(),
            })?;
        Ok(Self { matrix, rank })
    }
}

/// Ordinary least-squares fit of one or more response columns.
///
/// `design` is `n × p`, `response` is `n × m`; every response column shares
/// the design and therefore the normalized covariance.
#[derive(Debug, Clone)]
pub struct LeastSquaresFit {
    /// `p × m` coefficients.
    pub coefficients: DMatrix<f64>,
    /// `n × m` residuals.
    pub residuals: DMatrix<f64>,
    /// `(X'X)⁺`, i.e. `X⁺ X⁺'`.
    pub normalized_covariance: DMatrix<f64>,
    /// Numerical rank of the design.
    pub rank: usize,
}

impl LeastSquaresFit {
    pub fn fit(design: &DMatrix<f64>, response: &DMatrix<f64>) -> Result<Self, LeastSquaresError> {
        if design.nrows() != response.nrows() {
            return Err(LeastSquaresError::ShapeMismatch {
                design_rows: design.nrows(),
                response_rows: response.nrows(),
            });
        }
        let pinv = PseudoInverse::new(design)?;
        let coefficients = &pinv.matrix * response;
        let residuals = response - design * &coefficients;
        let normalized_covariance = &pinv.matrix * pinv.matrix.transpose();
        Ok(Self {
            coefficients,
            residuals,
            normalized_covariance,
            rank: pinv.rank,
        })
    }

    /// Residual degrees of freedom, `n - rank`.
    #[must_use]
    pub fn residual_dof(&self) -> usize {
        self.residuals.nrows().saturating_sub(self.rank)
    }

    /// Residual sum of squares of every response column.
    #[must_use]
    pub fn residual_sum_of_squares(&self) -> Vec<f64> {
        self.residuals
            .column_iter()
            .map(|column| column.norm_squared())
            .collect()
    }
}
