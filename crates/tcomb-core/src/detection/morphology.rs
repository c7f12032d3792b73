use ndarray::Array2;

use crate::filters::build_plane;

/// Clear mask pixels with no set neighbor in the rows directly above and
/// below.
///
/// Each pixel is ANDed with the OR of the three pixels above it and the three
/// below it (clipped at the plane border). Neighbors are read from `mask`
/// itself, never from partially filtered output.
pub fn and_vertical_neighbors(mask: &Array2<u8>) -> Array2<u8> {
    let (h, w) = mask.dim();
    build_plane((h, w), |row, col| {
        let center = mask[[row, col]];
        if center == 0 {
            return 0;
        }
        let left = col.saturating_sub(1);
        let right = (col + 1).min(w - 1);
        let mut neighbors = 0u8;
        if row > 0 {
            for x in left..=right {
                neighbors |= mask[[row - 1, x]];
            }
        }
        if row + 1 < h {
            for x in left..=right {
                neighbors |= mask[[row + 1, x]];
            }
        }
        center & neighbors
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_pixel_removed() {
        let mut mask = Array2::zeros((5, 5));
        mask[[2, 2]] = 255u8;
        let out = and_vertical_neighbors(&mask);
        assert!(out.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_horizontal_neighbor_does_not_count() {
        let mut mask = Array2::zeros((5, 5));
        mask[[2, 2]] = 255u8;
        mask[[2, 3]] = 255u8;
        let out = and_vertical_neighbors(&mask);
        assert!(out.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_vertical_pair_survives() {
        let mut mask = Array2::zeros((5, 5));
        mask[[1, 2]] = 255u8;
        mask[[2, 3]] = 255u8;
        let out = and_vertical_neighbors(&mask);
        assert_eq!(out[[1, 2]], 255);
        assert_eq!(out[[2, 3]], 255);
        assert_eq!(out.iter().filter(|&&v| v != 0).count(), 2);
    }

    #[test]
    fn test_reads_unfiltered_input() {
        // Top and middle keep each other; the bottom row was never set.
        let mut mask = Array2::zeros((3, 1));
        mask[[0, 0]] = 255u8;
        mask[[1, 0]] = 255u8;
        let out = and_vertical_neighbors(&mask);
        assert_eq!(out[[0, 0]], 255);
        assert_eq!(out[[1, 0]], 255);
        assert_eq!(out[[2, 0]], 0);
    }
}
