use ndarray::{Array2, Zip};

use crate::consts::MASK_SET;

/// `a & b` per pixel.
pub fn and_masks(a: &Array2<u8>, b: &Array2<u8>) -> Array2<u8> {
    Zip::from(a).and(b).map_collect(|&x, &y| x & y)
}

/// `dst |= a & b` per pixel.
pub fn or_and_masks(dst: &mut Array2<u8>, a: &Array2<u8>, b: &Array2<u8>) {
    Zip::from(dst).and(a).and(b).for_each(|d, &x, &y| *d |= x & y);
}

/// `a | b | c` per pixel.
pub fn or3_masks(a: &Array2<u8>, b: &Array2<u8>, c: &Array2<u8>) -> Array2<u8> {
    Zip::from(a)
        .and(b)
        .and(c)
        .map_collect(|&x, &y, &z| x | y | z)
}

/// Keep a mask pixel only where the two endpoint samples are within
/// `threshold` of each other.
pub fn gate_by_difference(
    mask: &Array2<u8>,
    first: &Array2<u8>,
    last: &Array2<u8>,
    threshold: u8,
) -> Array2<u8> {
    Zip::from(mask)
        .and(first)
        .and(last)
        .map_collect(|&m, &a, &b| {
            if m != 0 && a.abs_diff(b) < threshold {
                MASK_SET
            } else {
                0
            }
        })
}
