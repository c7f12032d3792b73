use ndarray::Array2;

use crate::frame::{Frame, PlaneRasters};
use crate::pipeline::config::{PlaneSet, Thresholds};

use super::masks::{and_masks, gate_by_difference, or3_masks, or_and_masks};
use super::morphology::and_vertical_neighbors;

/// Everything the mask combiner reads for one target frame `n`.
pub struct CombineInputs<'a> {
    /// Scene-change flags at `n - 2` and `n`.
    pub scene_changes: [bool; 2],
    /// Oscillation masks at `n - 2, n, n + 2, n + 4, n + 6`.
    pub oscillation: [&'a PlaneRasters; 5],
    /// Luma motion masks at `n - 2` and `n`; required when luma is active.
    pub motion: Option<[&'a Array2<u8>; 2]>,
    /// Raw frame at `n - 4`.
    pub first: &'a Frame,
    /// Raw frame at `n`.
    pub last: &'a Frame,
}

/// Build the per-plane final correction mask for one frame.
///
/// A cut on either side of the pair clears the whole mask. Otherwise luma
/// requires oscillation in two consecutive masks, survives the vertical
/// neighbor filter, and may be re-admitted by two agreeing motion masks;
/// chroma only needs oscillation in one of the three central masks. Both are
/// finally gated on the `n - 4` / `n` endpoints being close.
pub fn combine_masks(
    inputs: &CombineInputs<'_>,
    planes: &PlaneSet,
    thresholds: &Thresholds,
) -> PlaneRasters {
    if inputs.scene_changes.iter().any(|&sc| sc) {
        return PlaneRasters::new(
            planes
                .iter()
                .map(|p| Array2::zeros(inputs.last.plane(p).dim()))
                .collect(),
        );
    }

    let rasters = planes
        .iter()
        .enumerate()
        .map(|(slot, plane)| {
            let temporal = if plane == 0 {
                luma_temporal_mask(&inputs.oscillation, slot, inputs.motion)
            } else {
                let o = &inputs.oscillation;
                or3_masks(o[1].slot(slot), o[2].slot(slot), o[3].slot(slot))
            };
            gate_by_difference(
                &temporal,
                inputs.first.plane(plane),
                inputs.last.plane(plane),
                thresholds.output(plane),
            )
        })
        .collect();
    PlaneRasters::new(rasters)
}

fn luma_temporal_mask(
    oscillation: &[&PlaneRasters; 5],
    slot: usize,
    motion: Option<[&Array2<u8>; 2]>,
) -> Array2<u8> {
    let mut acc = and_masks(oscillation[0].slot(slot), oscillation[1].slot(slot));
    for pair in oscillation[1..].windows(2) {
        or_and_masks(&mut acc, pair[0].slot(slot), pair[1].slot(slot));
    }
    let mut acc = and_vertical_neighbors(&acc);
    if let Some([before, current]) = motion {
        or_and_masks(&mut acc, before, current);
    }
    acc
}
