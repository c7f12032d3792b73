use ndarray::Array2;

use super::build_plane;

/// Rounded per-pixel mean of two planes: `(a + b + 1) / 2`.
pub fn temporal_average(a: &Array2<u8>, b: &Array2<u8>) -> Array2<u8> {
    debug_assert_eq!(a.dim(), b.dim());
    build_plane(a.dim(), |row, col| {
        ((a[[row, col]] as u16 + b[[row, col]] as u16 + 1) / 2) as u8
    })
}
