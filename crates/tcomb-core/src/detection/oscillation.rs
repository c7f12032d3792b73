use ndarray::Array2;

use crate::consts::MASK_SET;
use crate::filters::build_plane;

/// Flag pixels whose value alternates with a two-step period across five
/// same-parity samples (`p2, p1, s1, n1, n2` in temporal order).
///
/// The outer triple `(p2, s1, n2)` must lie entirely above or entirely below
/// the inner pair `(p1, n1)` (a zero maximum on either side also counts), and
/// both groups must individually stay within `threshold`.
pub fn check_oscillation5(
    p2: &Array2<u8>,
    p1: &Array2<u8>,
    s1: &Array2<u8>,
    n1: &Array2<u8>,
    n2: &Array2<u8>,
    threshold: u8,
) -> Array2<u8> {
    build_plane(s1.dim(), |row, col| {
        let (a, b, c) = (p2[[row, col]], s1[[row, col]], n2[[row, col]]);
        let (x, y) = (p1[[row, col]], n1[[row, col]]);
        let min31 = a.min(b).min(c);
        let max31 = a.max(b).max(c);
        let min22 = x.min(y);
        let max22 = x.max(y);
        let separated = min31 > max22 || max22 == 0 || max31 < min22 || max31 == 0;
        if separated && max31 - min31 < threshold && max22 - min22 < threshold {
            MASK_SET
        } else {
            0
        }
    })
}

/// Drop oscillation candidates the temporal averages contradict.
///
/// A flagged pixel is cleared when the spread of the four averages reaches
/// `threshold`: genuine motion still moves the average, comb flicker does not.
pub fn clear_uncorrelated(
    mask: &Array2<u8>,
    averages: [&Array2<u8>; 4],
    threshold: u8,
) -> Array2<u8> {
    build_plane(mask.dim(), |row, col| {
        let m = mask[[row, col]];
        if m == 0 {
            return 0;
        }
        let values = averages.map(|a| a[[row, col]]);
        let lo = values.iter().copied().min().unwrap_or(0);
        let hi = values.iter().copied().max().unwrap_or(0);
        if hi - lo >= threshold {
            0
        } else {
            m
        }
    })
}
