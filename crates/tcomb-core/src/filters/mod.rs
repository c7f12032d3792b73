pub mod average;
pub mod blur;
pub mod envelope;

use ndarray::parallel::prelude::*;
use ndarray::{Array2, ArrayViewMut1, Axis};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Run `f(row_index, row)` over every row of `out`, in parallel for large planes.
pub(crate) fn fill_rows<F>(out: &mut Array2<u8>, f: F)
where
    F: Fn(usize, ArrayViewMut1<'_, u8>) + Send + Sync,
{
    if out.len() >= PARALLEL_PIXEL_THRESHOLD {
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, data)| f(row, data));
    } else {
        for (row, data) in out.axis_iter_mut(Axis(0)).enumerate() {
            f(row, data);
        }
    }
}

/// Build a plane of shape `dim` from a per-pixel function of `(row, col)`.
pub(crate) fn build_plane<F>(dim: (usize, usize), f: F) -> Array2<u8>
where
    F: Fn(usize, usize) -> u8 + Send + Sync,
{
    let mut out = Array2::<u8>::zeros(dim);
    fill_rows(&mut out, |row, mut data| {
        for (col, v) in data.iter_mut().enumerate() {
            *v = f(row, col);
        }
    });
    out
}
