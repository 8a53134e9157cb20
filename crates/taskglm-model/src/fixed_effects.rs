//! Fixed-effects combination of per-session contrast maps.

use ndarray::{Array3, indices_of};
use taskglm_stats::fixed_effects::PrecisionWeighted;
use tracing::debug;

use crate::{
    contrast::StatMaps,
    volume::{GridMismatch, shape_of},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum FixedEffectsError {
    #[display(
        "found {effects} effect-size, {variances} variance and {z_scores} z-score maps"
    )]
    CountMismatch {
        effects: usize,
        variances: usize,
        z_scores: usize,
    },
    #[display("no sessions to combine")]
    NoSessions,
    #[display("{_0}")]
    Grid(GridMismatch),
}

impl From<GridMismatch> for FixedEffectsError {
    fn from(err: GridMismatch) -> Self {
        Self::Grid(err)
    }
}

/// Combines per-session maps voxel by voxel with inverse-variance weights.
///
/// The z-score maps only take part in the consistency checks; the combined
/// z score is recomputed from the combined effect and variance. Voxels
/// where every session variance is zero (outside every mask) stay zero.
pub fn combine(
    effects: &[Array3<f64>],
    variances: &[Array3<f64>],
    z_scores: &[Array3<f64>],
) -> Result<StatMaps, FixedEffectsError> {
    if effects.len() != variances.len() || effects.len() != z_scores.len() {
        return Err(FixedEffectsError::CountMismatch {
            effects: effects.len(),
            variances: variances.len(),
            z_scores: z_scores.len(),
        });
    }
    let Some(first) = effects.first() else {
        return Err(FixedEffectsError::NoSessions);
    };
    let shape = shape_of(first);
    for map in effects.iter().chain(variances).chain(z_scores) {
        GridMismatch::check(shape, shape_of(map))?;
    }

    let mut maps = StatMaps::zeros(shape);
    let mut session_effects = Vec::with_capacity(effects.len());
    let mut session_variances = Vec::with_capacity(effects.len());
    let mut n_combined = 0_usize;
    for index in indices_of(first) {
        session_variances.clear();
        session_variances.extend(variances.iter().map(|map| map[index]));
        if session_variances.iter().all(|v| *v == 0.0) {
            continue;
        }
        session_effects.clear();
        session_effects.extend(effects.iter().map(|map| map[index]));
        if let Some(combined) = PrecisionWeighted::combine(&session_effects, &session_variances) {
            maps.effect_size[index] = combined.effect;
            maps.variance[index] = combined.variance;
            maps.z_score[index] = combined.z_score;
            n_combined += 1;
        }
    }
    debug!(n_sessions = effects.len(), n_voxels = n_combined, "combined fixed effects");
    Ok(maps)
}
