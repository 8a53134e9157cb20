/// Precision-weighted (inverse-variance) combination of repeated estimates.
///
/// Each estimate `k` is weighted by `1 / variance_k`. Variances are floored
/// at [`PrecisionWeighted::VARIANCE_FLOOR`] so that a zero variance yields a
/// very large but finite weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecisionWeighted {
    pub effect: f64,
    pub variance: f64,
    pub z_score: f64,
}

impl PrecisionWeighted {
    pub const VARIANCE_FLOOR: f64 = 1.0e-16;

    /// Combines per-session effects and variances.
    ///
    /// Returns `None` when there is nothing to combine or when the two
    /// slices have different lengths.
    #[must_use]
    pub fn combine(effects: &[f64], variances: &[f64]) -> Option<Self> {
        if effects.is_empty() || effects.len() != variances.len() {
            return None;
        }
        let (weighted_sum, weight_total) = effects.iter().zip(variances).fold(
            (0.0, 0.0),
            |(weighted_sum, weight_total), (effect, variance)| {
                let weight = 1.0 / variance.max(Self::VARIANCE_FLOOR);
                (weighted_sum + effect * weight, weight_total + weight)
            },
        );
        let variance = 1.0 / weight_total;
        let effect = weighted_sum * variance;
        Some(Self {
            effect,
            variance,
            z_score: effect / variance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_equal_sessions_halve_variance() {
        let combined = PrecisionWeighted::combine(&[0.8, 0.8], &[2.0, 2.0]).unwrap();
        assert_relative_eq!(combined.effect, 0.8);
        assert_relative_eq!(combined.variance, 1.0);
        assert_relative_eq!(combined.z_score, 0.8);
    }

    #[test]
    fn test_precise_session_dominates() {
        let combined = PrecisionWeighted::combine(&[1.0, 3.0], &[1.0, 3.0]).unwrap();
        // weights 1 and 1/3
        assert_relative_eq!(combined.effect, (1.0 + 1.0) / (1.0 + 1.0 / 3.0));
        assert_relative_eq!(combined.variance, 0.75);
    }

    #[test]
    fn test_zero_variance_is_floored() {
        let combined = PrecisionWeighted::combine(&[0.0, 0.0], &[0.0, 0.0]).unwrap();
        assert!(combined.variance > 0.0);
        assert_eq!(combined.effect, 0.0);
    }

    #[test]
    fn test_empty_or_mismatched_input() {
        assert!(PrecisionWeighted::combine(&[], &[]).is_none());
        assert!(PrecisionWeighted::combine(&[1.0], &[1.0, 2.0]).is_none());
    }
}
