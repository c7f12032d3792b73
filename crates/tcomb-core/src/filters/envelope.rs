use ndarray::Array2;

use crate::consts::{CHROMA_ENVELOPE_SLACK, ENVELOPE_PAD, LUMA_ENVELOPE_SLACK};

use super::build_plane;

/// Per-pixel admissible range for a blended value.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    pub min: Array2<u8>,
    pub max: Array2<u8>,
}

impl Envelope {
    /// Bounds of the 3x3 neighborhood of every pixel, widened by `slack`
    /// and clamped to [0, 255].
    pub fn build(plane: &Array2<u8>, slack: u8) -> Self {
        let padded = pad_edges(plane, ENVELOPE_PAD);
        let window = |row: usize, col: usize| {
            let top = row + ENVELOPE_PAD - 1;
            let left = col + ENVELOPE_PAD - 1;
            padded.slice(ndarray::s![top..top + 3, left..left + 3])
        };

        let min = build_plane(plane.dim(), |row, col| {
            let lo = window(row, col).iter().copied().min().unwrap_or(0);
            lo.saturating_sub(slack)
        });
        let max = build_plane(plane.dim(), |row, col| {
            let hi = window(row, col).iter().copied().max().unwrap_or(u8::MAX);
            hi.saturating_add(slack)
        });

        Self { min, max }
    }

    /// Envelope with the slack used for `plane` (2 for luma, 8 for chroma).
    pub fn for_plane(plane_data: &Array2<u8>, plane: usize) -> Self {
        Self::build(plane_data, envelope_slack(plane))
    }

    /// Whether `value` lies in `[min, max]` at `(row, col)`.
    #[inline]
    pub fn admits(&self, row: usize, col: usize, value: u8) -> bool {
        value >= self.min[[row, col]] && value <= self.max[[row, col]]
    }
}

pub fn envelope_slack(plane: usize) -> u8 {
    if plane == 0 {
        LUMA_ENVELOPE_SLACK
    } else {
        CHROMA_ENVELOPE_SLACK
    }
}

/// Copy `plane` into a buffer `pad` pixels larger on every side, replicating
/// the nearest edge sample into the border (corners included).
pub fn pad_edges(plane: &Array2<u8>, pad: usize) -> Array2<u8> {
    let (h, w) = plane.dim();
    Array2::from_shape_fn((h + 2 * pad, w + 2 * pad), |(row, col)| {
        let src_row = row.saturating_sub(pad).min(h - 1);
        let src_col = col.saturating_sub(pad).min(w - 1);
        plane[[src_row, src_col]]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_edges_replicates_corners() {
        let plane = Array2::from_shape_vec((2, 2), vec![1u8, 2, 3, 4]).unwrap();
        let padded = pad_edges(&plane, 2);
        assert_eq!(padded.dim(), (6, 6));
        assert_eq!(padded[[0, 0]], 1);
        assert_eq!(padded[[0, 5]], 2);
        assert_eq!(padded[[5, 0]], 3);
        assert_eq!(padded[[5, 5]], 4);
        assert_eq!(padded[[2, 3]], 2);
    }

    #[test]
    fn test_admits_is_inclusive() {
        let plane = Array2::from_elem((3, 3), 50u8);
        let env = Envelope::build(&plane, 2);
        assert!(env.admits(1, 1, 48));
        assert!(env.admits(1, 1, 52));
        assert!(!env.admits(1, 1, 53));
    }
}
