use ndarray::{Array2, Zip};

use crate::consts::{MASK_SET, PYRAMID_LEVELS};
use crate::filters::blur::BlurPyramid;

/// Binary mask of luma pixels that every smoothing scale agrees are static.
///
/// The per-pixel difference is the minimum of `|cur - prev|` over the raw
/// plane and all six pyramid levels; a pixel is set (255) only when that
/// minimum is below `fine_threshold`.
pub fn build_motion_mask(
    cur: &Array2<u8>,
    prev: &Array2<u8>,
    cur_pyramid: &BlurPyramid,
    prev_pyramid: &BlurPyramid,
    fine_threshold: u8,
) -> Array2<u8> {
    let mut diff = abs_diff(cur, prev);
    for level in 0..PYRAMID_LEVELS - 1 {
        min_abs_diff(cur_pyramid.level(level), prev_pyramid.level(level), &mut diff);
    }

    let last = PYRAMID_LEVELS - 1;
    Zip::from(&mut diff)
        .and(cur_pyramid.level(last))
        .and(prev_pyramid.level(last))
        .for_each(|d, &a, &b| {
            let m = (*d).min(a.abs_diff(b));
            *d = if m < fine_threshold { MASK_SET } else { 0 };
        });
    diff
}

fn abs_diff(a: &Array2<u8>, b: &Array2<u8>) -> Array2<u8> {
    Zip::from(a).and(b).map_collect(|&x, &y| x.abs_diff(y))
}

/// Fold `|a - b|` into `acc`, keeping the per-pixel minimum.
fn min_abs_diff(a: &Array2<u8>, b: &Array2<u8>, acc: &mut Array2<u8>) {
    Zip::from(acc).and(a).and(b).for_each(|d, &x, &y| {
        let v = x.abs_diff(y);
        if v < *d {
            *d = v;
        }
    });
}
