use std::ops::Range;
use std::sync::Arc;

use crate::blend::{blend_frame, BlendInputs, BlendOutcome};
use crate::consts::{
    AVERAGE_WINDOW, BLEND_WINDOW, COMBINE_OSCILLATION_WINDOW, OSCILLATION_WINDOW,
};
use crate::detection::{
    build_motion_mask, check_oscillation5, clear_uncorrelated, combine_masks, CombineInputs,
    SceneChangeDetector,
};
use crate::error::Result;
use crate::filters::average::temporal_average;
use crate::filters::blur::BlurPyramid;
use crate::frame::{Frame, PlaneRasters};
use crate::source::FrameSource;

use super::config::{PlaneSet, Thresholds};
use super::store::{Attribute, AttributeKind, AttributeStore};

/// The five per-field transforms, in dependency order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Analysis,
    Motion,
    Oscillation,
    Combine,
    Blend,
}

impl Stage {
    /// Stages that publish attributes, producers first.
    pub const PRODUCERS: [Stage; 4] = [
        Self::Analysis,
        Self::Motion,
        Self::Oscillation,
        Self::Combine,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Analysis => write!(f, "Scene analysis"),
            Self::Motion => write!(f, "Motion masks"),
            Self::Oscillation => write!(f, "Oscillation masks"),
            Self::Combine => write!(f, "Mask combination"),
            Self::Blend => write!(f, "Blending"),
        }
    }
}

impl AttributeKind {
    pub fn producer(self) -> Stage {
        match self {
            Self::SceneChange | Self::BlurPyramid => Stage::Analysis,
            Self::MotionMask | Self::Average => Stage::Motion,
            Self::OscillationMask => Stage::Oscillation,
            Self::FinalMask => Stage::Combine,
        }
    }
}

/// One edge of the static dependency graph: `consumer` at `n` reads `kind`
/// at every index in `n + min_offset ..= n + max_offset` (clamped).
#[derive(Clone, Copy, Debug)]
pub struct Dependency {
    pub kind: AttributeKind,
    pub consumer: Stage,
    pub min_offset: isize,
    pub max_offset: isize,
}

pub const DEPENDENCIES: [Dependency; 6] = [
    Dependency {
        kind: AttributeKind::BlurPyramid,
        consumer: Stage::Motion,
        min_offset: -2,
        max_offset: 0,
    },
    Dependency {
        kind: AttributeKind::Average,
        consumer: Stage::Oscillation,
        min_offset: -6,
        max_offset: 0,
    },
    Dependency {
        kind: AttributeKind::SceneChange,
        consumer: Stage::Combine,
        min_offset: -2,
        max_offset: 0,
    },
    Dependency {
        kind: AttributeKind::MotionMask,
        consumer: Stage::Combine,
        min_offset: -2,
        max_offset: 0,
    },
    Dependency {
        kind: AttributeKind::OscillationMask,
        consumer: Stage::Combine,
        min_offset: -2,
        max_offset: 6,
    },
    Dependency {
        kind: AttributeKind::FinalMask,
        consumer: Stage::Blend,
        min_offset: -2,
        max_offset: 2,
    },
];

/// Clamp `index + offset` to `0..len`.
#[inline]
pub fn clamp_index(index: usize, offset: isize, len: usize) -> usize {
    let last = len.saturating_sub(1) as isize;
    (index as isize + offset).clamp(0, last) as usize
}

/// Index ranges each attribute kind must cover to blend `output`.
///
/// Walks the graph from the blender back to the first stage; a stage's range
/// is the hull of the ranges of every kind it produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequiredRanges {
    stages: [Range<usize>; 5],
    kinds: Vec<(AttributeKind, Range<usize>)>,
}

impl RequiredRanges {
    pub fn resolve(output: Range<usize>, len: usize) -> Self {
        let mut stages: [Range<usize>; 5] = Default::default();
        let mut kinds = Vec::with_capacity(DEPENDENCIES.len());
        stages[Stage::Blend.slot()] = output;

        for &producer in Stage::PRODUCERS.iter().rev() {
            let mut hull: Option<Range<usize>> = None;
            for dep in DEPENDENCIES.iter().filter(|d| d.kind.producer() == producer) {
                let consumer = &stages[dep.consumer.slot()];
                if consumer.is_empty() {
                    continue;
                }
                let lo = clamp_index(consumer.start, dep.min_offset, len);
                let hi = clamp_index(consumer.end - 1, dep.max_offset, len) + 1;
                kinds.push((dep.kind, lo..hi));
                hull = Some(match hull {
                    Some(h) => h.start.min(lo)..h.end.max(hi),
                    None => lo..hi,
                });
            }
            stages[producer.slot()] = hull.unwrap_or(0..0);
        }

        Self { stages, kinds }
    }

    pub fn stage(&self, stage: Stage) -> Range<usize> {
        self.stages[stage.slot()].clone()
    }

    pub fn kind(&self, kind: AttributeKind) -> Range<usize> {
        self.kinds
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, r)| r.clone())
            .unwrap_or(0..0)
    }
}

/// Per-kind lower bounds below which no output at `next` or later can read.
pub fn eviction_bounds(next: usize, len: usize) -> Vec<(AttributeKind, usize)> {
    let mut frontier = [usize::MAX; 5];
    frontier[Stage::Blend.slot()] = next;
    for &producer in Stage::PRODUCERS.iter().rev() {
        frontier[producer.slot()] = DEPENDENCIES
            .iter()
            .filter(|d| d.kind.producer() == producer)
            .map(|d| clamp_index(frontier[d.consumer.slot()], d.min_offset, len))
            .min()
            .unwrap_or(next);
    }

    DEPENDENCIES
        .iter()
        .map(|d| {
            let bound = clamp_index(frontier[d.consumer.slot()], d.min_offset, len);
            (d.kind, bound)
        })
        .collect()
}

/// Read-only state shared by all stage invocations of one filter.
pub struct StageContext<'a, S> {
    pub source: &'a S,
    pub store: &'a AttributeStore,
    pub planes: &'a PlaneSet,
    pub thresholds: &'a Thresholds,
    pub detector: &'a SceneChangeDetector,
    pub map: bool,
}

impl<S: FrameSource> StageContext<'_, S> {
    fn len(&self) -> usize {
        self.source.len()
    }

    fn field(&self, n: usize, offset: isize) -> Result<Arc<Frame>> {
        self.source.frame(clamp_index(n, offset, self.len()))
    }

    fn fields(&self, n: usize, offsets: &[isize]) -> Result<Vec<Arc<Frame>>> {
        offsets.iter().map(|&offset| self.field(n, offset)).collect()
    }

    fn at(&self, n: usize, offset: isize) -> usize {
        clamp_index(n, offset, self.len())
    }

    /// Attribute kinds `stage` publishes under the active plane set.
    pub fn outputs(&self, stage: Stage) -> &'static [AttributeKind] {
        let luma = self.planes.luma();
        match stage {
            Stage::Analysis if luma => &[AttributeKind::SceneChange, AttributeKind::BlurPyramid],
            Stage::Analysis => &[AttributeKind::SceneChange],
            Stage::Motion if luma => &[AttributeKind::Average, AttributeKind::MotionMask],
            Stage::Motion => &[AttributeKind::Average],
            Stage::Oscillation => &[AttributeKind::OscillationMask],
            Stage::Combine => &[AttributeKind::FinalMask],
            Stage::Blend => &[],
        }
    }

    /// Run producer `stage` for field `n`.
    pub fn run(&self, stage: Stage, n: usize) -> Result<Vec<Attribute>> {
        match stage {
            Stage::Analysis => self.analyze(n),
            Stage::Motion => self.motion(n),
            Stage::Oscillation => self.oscillation(n).map(|a| vec![a]),
            Stage::Combine => self.combine(n).map(|a| vec![a]),
            Stage::Blend => Ok(Vec::new()),
        }
    }

    fn analyze(&self, n: usize) -> Result<Vec<Attribute>> {
        let cur = self.field(n, 0)?;
        let prev = self.field(n, -2)?;
        let cut = self.detector.is_scene_change(cur.plane(0), prev.plane(0));
        let mut out = vec![Attribute::SceneChange(cut)];
        if self.planes.luma() {
            out.push(Attribute::BlurPyramid(Arc::new(BlurPyramid::build(
                cur.plane(0),
            ))));
        }
        Ok(out)
    }

    fn motion(&self, n: usize) -> Result<Vec<Attribute>> {
        let cur = self.field(n, 0)?;
        let prev = self.field(n, -2)?;
        let averages = self
            .planes
            .iter()
            .map(|p| temporal_average(cur.plane(p), prev.plane(p)))
            .collect();
        let mut out = vec![Attribute::Average(Arc::new(PlaneRasters::new(averages)))];
        if self.planes.luma() {
            let cur_pyr = self.store.blur_pyramid(n)?;
            let prev_pyr = self.store.blur_pyramid(self.at(n, -2))?;
            let mask = build_motion_mask(
                cur.plane(0),
                prev.plane(0),
                &cur_pyr,
                &prev_pyr,
                self.thresholds.fine_luma,
            );
            out.push(Attribute::MotionMask(Arc::new(mask)));
        }
        Ok(out)
    }

    fn oscillation(&self, n: usize) -> Result<Attribute> {
        let window = self.fields(n, &OSCILLATION_WINDOW)?;
        let averages = AVERAGE_WINDOW
            .iter()
            .map(|&offset| self.store.average(self.at(n, offset)))
            .collect::<Result<Vec<_>>>()?;

        let rasters = self
            .planes
            .iter()
            .enumerate()
            .map(|(slot, plane)| {
                let [p2, p1, s1, n1, n2] = [0, 1, 2, 3, 4].map(|i| window[i].plane(plane));
                let mask = check_oscillation5(p2, p1, s1, n1, n2, self.thresholds.output(plane));
                let avg = [0, 1, 2, 3].map(|i| averages[i].slot(slot));
                clear_uncorrelated(&mask, avg, self.thresholds.fine(plane))
            })
            .collect();
        Ok(Attribute::OscillationMask(Arc::new(PlaneRasters::new(
            rasters,
        ))))
    }

    fn combine(&self, n: usize) -> Result<Attribute> {
        let first = self.field(n, -4)?;
        let last = self.field(n, 0)?;
        let scene_changes = [
            self.store.scene_change(self.at(n, -2))?,
            self.store.scene_change(n)?,
        ];
        let oscillation = COMBINE_OSCILLATION_WINDOW
            .iter()
            .map(|&offset| self.store.oscillation_mask(self.at(n, offset)))
            .collect::<Result<Vec<_>>>()?;
        let motion = if self.planes.luma() {
            Some([
                self.store.motion_mask(self.at(n, -2))?,
                self.store.motion_mask(n)?,
            ])
        } else {
            None
        };

        let inputs = CombineInputs {
            scene_changes,
            oscillation: [0, 1, 2, 3, 4].map(|i| &*oscillation[i]),
            motion: motion.as_ref().map(|[a, b]| [&**a, &**b]),
            first: &first,
            last: &last,
        };
        let mask = combine_masks(&inputs, self.planes, self.thresholds);
        Ok(Attribute::FinalMask(Arc::new(mask)))
    }

    /// Produce output field `n`.
    pub fn blend(&self, n: usize) -> Result<BlendOutcome> {
        let window = self.fields(n, &BLEND_WINDOW)?;
        let masks = [
            self.store.final_mask(self.at(n, -2))?,
            self.store.final_mask(n)?,
            self.store.final_mask(self.at(n, 2))?,
        ];
        let inputs = BlendInputs {
            frames: [0, 1, 2, 3, 4].map(|i| &*window[i]),
            masks: masks.each_ref().map(|m| &**m),
        };
        Ok(blend_frame(&inputs, self.planes, self.map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_index_edges() {
        assert_eq!(clamp_index(0, -2, 10), 0);
        assert_eq!(clamp_index(9, 4, 10), 9);
        assert_eq!(clamp_index(5, -2, 10), 3);
    }

    #[test]
    fn test_required_ranges_for_interior_output() {
        let r = RequiredRanges::resolve(20..22, 100);
        assert_eq!(r.stage(Stage::Blend), 20..22);
        assert_eq!(r.stage(Stage::Combine), 18..24);
        assert_eq!(r.stage(Stage::Oscillation), 16..30);
        // Averages reach back 6 from oscillation, motion masks 2 from combine.
        assert_eq!(r.kind(AttributeKind::Average), 10..30);
        assert_eq!(r.kind(AttributeKind::MotionMask), 16..24);
        assert_eq!(r.stage(Stage::Motion), 10..30);
        assert_eq!(r.kind(AttributeKind::BlurPyramid), 8..30);
        assert_eq!(r.kind(AttributeKind::SceneChange), 16..24);
        assert_eq!(r.stage(Stage::Analysis), 8..30);
    }

    #[test]
    fn test_required_ranges_clamp_at_sequence_ends() {
        let r = RequiredRanges::resolve(0..3, 5);
        assert_eq!(r.stage(Stage::Combine), 0..5);
        assert_eq!(r.stage(Stage::Analysis), 0..5);
    }

    #[test]
    fn test_eviction_bounds_follow_frontiers() {
        let bounds = eviction_bounds(40, 100);
        let bound = |kind| bounds.iter().find(|(k, _)| *k == kind).map(|(_, b)| *b);
        assert_eq!(bound(AttributeKind::FinalMask), Some(38));
        assert_eq!(bound(AttributeKind::OscillationMask), Some(36));
        assert_eq!(bound(AttributeKind::MotionMask), Some(36));
        assert_eq!(bound(AttributeKind::SceneChange), Some(36));
        assert_eq!(bound(AttributeKind::Average), Some(30));
        assert_eq!(bound(AttributeKind::BlurPyramid), Some(28));
    }

    #[test]
    fn test_eviction_bounds_never_exceed_required_ranges() {
        let len = 64;
        for next in 0..len {
            let required = RequiredRanges::resolve(next..len, len);
            for (kind, bound) in eviction_bounds(next, len) {
                assert!(bound <= required.kind(kind).start, "{kind} at {next}");
            }
        }
    }
}
