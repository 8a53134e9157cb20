//! NIfTI reading and writing for BOLD series, masks and statistic maps.

use std::path::Path;

use anyhow::{Context, bail};
use ndarray::{Array3, Axis, Ix3, Ix4};
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions, writer::WriterOptions};
use taskglm_model::volume::{BoldSeries, Mask};

/// Voxel edge lengths in millimetres.
///
/// Taken from the column norms of the sform affine when one is set, else
/// from `pixdim`.
pub fn voxel_size(header: &NiftiHeader) -> [f64; 3] {
    if header.sform_code > 0 {
        let rows = [header.srow_x, header.srow_y, header.srow_z];
        std::array::from_fn(|j| {
            rows.iter()
                .map(|row| f64::from(row[j]).powi(2))
                .sum::<f64>()
                .sqrt()
        })
    } else {
        std::array::from_fn(|j| f64::from(header.pixdim[j + 1]).abs())
    }
}

/// Number of volumes in a 4-D image, read from the header only.
pub fn scan_count(path: &Path) -> anyhow::Result<usize> {
    let header = NiftiHeader::from_file(path)
        .with_context(|| format!("Failed to read NIfTI header: {}", path.display()))?;
    if header.dim[0] < 4 {
        bail!("{} is not a 4-D image", path.display());
    }
    Ok(usize::from(header.dim[4]))
}

fn read_array(path: &Path) -> anyhow::Result<(ndarray::ArrayD<f64>, NiftiHeader)> {
    let object = ReaderOptions::new()
        .read_file(path)
        .with_context(|| format!("Failed to read NIfTI file: {}", path.display()))?;
    let header = object.header().clone();
    let data = object
        .into_volume()
        .into_ndarray::<f64>()
        .with_context(|| format!("Failed to decode NIfTI volume: {}", path.display()))?;
    Ok((data, header))
}

pub fn read_bold(path: &Path) -> anyhow::Result<BoldSeries> {
    let (data, header) = read_array(path)?;
    let data = data
        .into_dimensionality::<Ix4>()
        .with_context(|| format!("{} is not a 4-D image", path.display()))?;
    Ok(BoldSeries::new(data, voxel_size(&header)))
}

/// Reads a 3-D volume; a trailing singleton fourth axis is dropped.
pub fn read_volume(path: &Path) -> anyhow::Result<(Array3<f64>, NiftiHeader)> {
    let (mut data, header) = read_array(path)?;
    if data.ndim() == 4 && data.len_of(Axis(3)) == 1 {
        data = data.index_axis_move(Axis(3), 0);
    }
    let data = data
        .into_dimensionality::<Ix3>()
        .with_context(|| format!("{} is not a 3-D image", path.display()))?;
    Ok((data, header))
}

/// Reads a brain mask; the header is kept as the reference for output maps.
pub fn read_mask(path: &Path) -> anyhow::Result<(Mask, NiftiHeader)> {
    let (volume, header) = read_volume(path)?;
    let mask = Mask::from_volume(&volume);
    if mask.is_empty() {
        bail!("{} selects no voxels", path.display());
    }
    Ok((mask, header))
}

/// Writes `volume` with the geometry of `reference`.
pub fn write_volume(
    path: &Path,
    volume: &Array3<f64>,
    reference: &NiftiHeader,
) -> anyhow::Result<()> {
    WriterOptions::new(path)
        .reference_header(reference)
        .write_nifti(volume)
        .with_context(|| format!("Failed to write NIfTI file: {}", path.display()))
}
