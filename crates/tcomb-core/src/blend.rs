use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array2;

use crate::consts::{MAP_BACKWARD, MAP_CENTER, MAP_FORWARD};
use crate::filters::envelope::Envelope;
use crate::filters::fill_rows;
use crate::frame::{Frame, PlaneRasters};
use crate::pipeline::config::PlaneSet;

/// Inputs of the final blend for one frame `n`.
pub struct BlendInputs<'a> {
    /// Raw frames at `n - 4, n - 2, n, n + 2, n + 4`.
    pub frames: [&'a Frame; 5],
    /// Final masks at `n - 2, n, n + 2`.
    pub masks: [&'a PlaneRasters; 3],
}

/// Result of blending one frame.
#[derive(Clone, Debug)]
pub struct BlendOutcome {
    pub frame: Frame,
    /// Pixels that took a blended value (or a map intensity).
    pub corrected: usize,
}

/// Which three-tap window produced an accepted value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Candidate {
    Center(u8),
    Backward(u8),
    Forward(u8),
}

impl Candidate {
    fn value(self) -> u8 {
        match self {
            Self::Center(v) | Self::Backward(v) | Self::Forward(v) => v,
        }
    }

    fn map_intensity(self) -> u8 {
        match self {
            Self::Center(_) => MAP_CENTER,
            Self::Backward(_) => MAP_BACKWARD,
            Self::Forward(_) => MAP_FORWARD,
        }
    }
}

/// Envelope-constrained temporal blend of the center frame.
///
/// Starts from a copy of the center frame (all zero in `map` mode) and, for
/// each active plane, replaces a pixel with the first legal candidate among
/// the centered, backward and forward `[1, 2, 1] / 4` blends.
pub fn blend_frame(inputs: &BlendInputs<'_>, planes: &PlaneSet, map: bool) -> BlendOutcome {
    let center = inputs.frames[2];
    let mut frame = if map {
        Frame {
            planes: center
                .planes
                .iter()
                .map(|p| Array2::zeros(p.dim()))
                .collect(),
            metadata: center.metadata.clone(),
        }
    } else {
        center.clone()
    };

    let mut corrected = 0;
    for (slot, plane) in planes.iter().enumerate() {
        let envelope = Envelope::for_plane(center.plane(plane), plane);
        let fields = inputs.frames.map(|f| f.plane(plane));
        let masks = inputs.masks.map(|m| m.slot(slot));
        corrected += blend_plane(
            &mut frame.planes[plane],
            fields,
            masks,
            &envelope,
            map,
        );
    }

    BlendOutcome { frame, corrected }
}

fn blend_plane(
    out: &mut Array2<u8>,
    fields: [&Array2<u8>; 5],
    masks: [&Array2<u8>; 3],
    envelope: &Envelope,
    map: bool,
) -> usize {
    let corrected = AtomicUsize::new(0);
    fill_rows(out, |row, mut data| {
        let mut count = 0;
        for (col, v) in data.iter_mut().enumerate() {
            let samples = fields.map(|f| f[[row, col]]);
            let set = masks.map(|m| m[[row, col]] != 0);
            if let Some(candidate) = select_candidate(samples, set, envelope, row, col) {
                *v = if map {
                    candidate.map_intensity()
                } else {
                    candidate.value()
                };
                count += 1;
            }
        }
        corrected.fetch_add(count, Ordering::Relaxed);
    });
    corrected.into_inner()
}

/// `samples` at offsets -4..+4, `set` masks at -2, 0, +2.
fn select_candidate(
    samples: [u8; 5],
    set: [bool; 3],
    envelope: &Envelope,
    row: usize,
    col: usize,
) -> Option<Candidate> {
    let [p2, p1, s, n1, n2] = samples;
    let tap = |a: u8, b: u8, c: u8| ((a as u16 + b as u16 * 2 + c as u16 + 2) / 4) as u8;

    if set[1] {
        let v = tap(p1, s, n1);
        if envelope.admits(row, col, v) {
            return Some(Candidate::Center(v));
        }
    }
    if set[0] {
        let v = tap(p2, p1, s);
        if envelope.admits(row, col, v) {
            return Some(Candidate::Backward(v));
        }
    }
    if set[2] {
        let v = tap(s, n1, n2);
        if envelope.admits(row, col, v) {
            return Some(Candidate::Forward(v));
        }
    }
    None
}
