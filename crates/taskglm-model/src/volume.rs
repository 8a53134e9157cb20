//! Voxel grids, brain masks and 4-D BOLD series.
//!
//! Volumes are indexed `[x, y, z]` and series `[x, y, z, t]`. Fitting works
//! on the in-mask voxels only, laid out as an `n_scans × n_voxels` matrix;
//! [`Mask::gather`] and [`Mask::scatter`] convert between the two layouts
//! and always visit voxels in the same order.

use nalgebra::DMatrix;
use ndarray::{Array3, Array4, Axis};

pub type Shape = [usize; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("voxel grid mismatch: expected {expected:?}, found {found:?}")]
pub struct GridMismatch {
    pub expected: Shape,
    pub found: Shape,
}

impl GridMismatch {
    pub fn check(expected: Shape, found: Shape) -> Result<(), Self> {
        if expected == found {
            Ok(())
        } else {
            Err(Self { expected, found })
        }
    }
}

#[must_use]
pub fn shape_of(volume: &Array3<f64>) -> Shape {
    let (x, y, z) = volume.dim();
    [x, y, z]
}

/// A 4-D functional series together with its voxel size in millimetres.
#[derive(Debug, Clone)]
pub struct BoldSeries {
    data: Array4<f64>,
    voxel_size: [f64; 3],
}

impl BoldSeries {
    #[must_use]
    pub fn new(data: Array4<f64>, voxel_size: [f64; 3]) -> Self {
        Self { data, voxel_size }
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        let (x, y, z, _) = self.data.dim();
        [x, y, z]
    }

    #[must_use]
    pub fn n_scans(&self) -> usize {
        self.data.len_of(Axis(3))
    }

    #[must_use]
    pub fn voxel_size(&self) -> [f64; 3] {
        self.voxel_size
    }

    #[must_use]
    pub fn data(&self) -> &Array4<f64> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array4<f64> {
        &mut self.data
    }
}

/// Binary brain mask. Any finite non-zero value is inside.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    voxels: Array3<bool>,
    indices: Vec<Shape>,
}

impl Mask {
    #[must_use]
    pub fn from_volume(volume: &Array3<f64>) -> Self {
        Self::from_voxels(volume.mapv(|v| v.is_finite() && v != 0.0))
    }

    #[must_use]
    pub fn from_voxels(voxels: Array3<bool>) -> Self {
        let indices = voxels
            .indexed_iter()
            .filter(|(_, inside)| **inside)
            .map(|((x, y, z), _)| [x, y, z])
            .collect();
        Self { voxels, indices }
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        let (x, y, z) = self.voxels.dim();
        [x, y, z]
    }

    #[must_use]
    pub fn n_voxels(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[must_use]
    pub fn contains(&self, index: Shape) -> bool {
        self.voxels[index]
    }

    /// In-mask time series as an `n_scans × n_voxels` matrix.
    pub fn gather(&self, bold: &BoldSeries) -> Result<DMatrix<f64>, GridMismatch> {
        GridMismatch::check(self.shape(), bold.shape())?;
        let data = bold.data();
        Ok(DMatrix::from_fn(bold.n_scans(), self.n_voxels(), |t, v| {
            let [x, y, z] = self.indices[v];
            data[[x, y, z, t]]
        }))
    }

    /// Places one value per in-mask voxel into a volume; outside is zero.
    #[must_use]
    pub fn scatter(&self, values: &[f64]) -> Array3<f64> {
        let mut volume = Array3::zeros(self.voxels.raw_dim());
        for (index, value) in self.indices.iter().zip(values) {
            volume[*index] = *value;
        }
        volume
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array;

    use super::*;

    fn cube_mask() -> Mask {
        let mut voxels = Array3::from_elem((2, 2, 2), false);
        voxels[[0, 1, 0]] = true;
        voxels[[1, 1, 1]] = true;
        Mask::from_voxels(voxels)
    }

    #[test]
    fn test_mask_from_volume_skips_zero_and_nan() {
        let volume = Array::from_shape_vec((1, 1, 3), vec![0.0, f64::NAN, 2.0]).unwrap();
        let mask = Mask::from_volume(&volume);
        assert_eq!(mask.n_voxels(), 1);
        assert!(mask.contains([0, 0, 2]));
    }

    #[test]
    fn test_gather_then_scatter_keeps_voxel_order() {
        let data = Array4::from_shape_fn((2, 2, 2, 3), |(x, y, z, t)| {
            (x * 100 + y * 10 + z) as f64 + t as f64 * 0.5
        });
        let bold = BoldSeries::new(data, [2.0; 3]);
        let mask = cube_mask();
        let matrix = mask.gather(&bold).unwrap();
        assert_eq!(matrix.shape(), (3, 2));
        assert_eq!(matrix[(0, 0)], 10.0);
        assert_eq!(matrix[(2, 1)], 112.0);

        let first_frame = matrix.row(0).iter().copied().collect::<Vec<_>>();
        let volume = mask.scatter(&first_frame);
        assert_eq!(volume[[0, 1, 0]], 10.0);
        assert_eq!(volume[[1, 1, 1]], 111.0);
        assert_eq!(volume.sum(), 121.0);
    }

    #[test]
    fn test_gather_rejects_other_grid() {
        let bold = BoldSeries::new(Array4::zeros((3, 2, 2, 4)), [2.0; 3]);
        let err = cube_mask().gather(&bold).unwrap_err();
        assert_eq!(err.expected, [2, 2, 2]);
        assert_eq!(err.found, [3, 2, 2]);
    }
}
