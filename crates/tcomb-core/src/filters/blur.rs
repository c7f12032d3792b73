use ndarray::Array2;

use crate::consts::PYRAMID_LEVELS;

use super::build_plane;

/// Horizontal [1, 2, 1] / 4 blur with [1, 1] / 2 at the left and right edges.
///
/// Requires a plane at least 2 pixels wide.
pub fn horizontal_blur3(src: &Array2<u8>) -> Array2<u8> {
    let w = src.ncols();
    build_plane(src.dim(), |row, col| {
        let s = |x: usize| src[[row, x]] as u32;
        let v = if col == 0 {
            (s(0) + s(1) + 1) / 2
        } else if col == w - 1 {
            (s(w - 2) + s(w - 1) + 1) / 2
        } else {
            (s(col - 1) + s(col) * 2 + s(col + 1) + 2) / 4
        };
        v as u8
    })
}

/// Vertical [1, 2, 1] / 4 blur with [1, 1] / 2 at the top and bottom rows.
///
/// Requires a plane at least 2 pixels tall.
pub fn vertical_blur3(src: &Array2<u8>) -> Array2<u8> {
    let h = src.nrows();
    build_plane(src.dim(), |row, col| {
        let s = |y: usize| src[[y, col]] as u32;
        let v = if row == 0 {
            (s(0) + s(1) + 1) / 2
        } else if row == h - 1 {
            (s(h - 2) + s(h - 1) + 1) / 2
        } else {
            (s(row - 1) + s(row) * 2 + s(row + 1) + 2) / 4
        };
        v as u8
    })
}

/// Horizontal [1, 4, 6, 4, 1] / 16 blur. The two outermost columns on each
/// side fold the missing taps back onto the plane.
///
/// Requires a plane at least 4 pixels wide.
pub fn horizontal_blur6(src: &Array2<u8>) -> Array2<u8> {
    let w = src.ncols();
    build_plane(src.dim(), |row, col| {
        let s = |x: usize| src[[row, x]] as u32;
        let v = if col == 0 {
            (s(0) * 6 + s(1) * 8 + s(2) * 2 + 8) / 16
        } else if col == 1 {
            ((s(0) + s(2)) * 4 + s(1) * 6 + s(3) * 2 + 8) / 16
        } else if col == w - 2 {
            (s(w - 4) * 2 + (s(w - 3) + s(w - 1)) * 4 + s(w - 2) * 6 + 8) / 16
        } else if col == w - 1 {
            (s(w - 3) * 2 + s(w - 2) * 8 + s(w - 1) * 6 + 8) / 16
        } else {
            (s(col - 2) + (s(col - 1) + s(col + 1)) * 4 + s(col) * 6 + s(col + 2) + 8) / 16
        };
        v as u8
    })
}

/// Six smoothed variants of one plane, from finest to coarsest scale.
///
/// Order: H3, V3, H3(V3), H6, V3(V3), H6(V3(V3)). The motion mask walks the
/// levels in this order and thresholds on the last one.
#[derive(Clone, Debug, PartialEq)]
pub struct BlurPyramid {
    levels: [Array2<u8>; PYRAMID_LEVELS],
}

impl BlurPyramid {
    pub fn build(src: &Array2<u8>) -> Self {
        let h3 = horizontal_blur3(src);
        let v3 = vertical_blur3(src);
        let h3v3 = horizontal_blur3(&v3);
        let h6 = horizontal_blur6(src);
        let v3v3 = vertical_blur3(&v3);
        let h6v3v3 = horizontal_blur6(&v3v3);
        Self {
            levels: [h3, v3, h3v3, h6, v3v3, h6v3v3],
        }
    }

    pub fn level(&self, index: usize) -> &Array2<u8> {
        &self.levels[index]
    }

    pub fn levels(&self) -> &[Array2<u8>] {
        &self.levels
    }
}
