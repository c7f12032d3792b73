use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::debug;

use crate::consts::{MIN_FIELD_HEIGHT, MIN_FIELD_WIDTH};
use crate::detection::SceneChangeDetector;
use crate::error::{Result, TcombError};
use crate::frame::Frame;
use crate::source::FrameSource;

use super::config::{FilterConfig, PlaneSet, Thresholds};
use super::stages::{eviction_bounds, RequiredRanges, Stage, StageContext};
use super::store::{Attribute, AttributeStore};

/// Running totals over everything a filter has produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Fields whose scene-change flag was set.
    pub scene_changes: usize,
    /// Pixels replaced by a blended value (or map intensity).
    pub corrected_pixels: usize,
}

/// Temporal comb filter over a random-access field sequence.
///
/// Output field `n` depends on fields `n - 12 ..= n + 8` through the stage
/// chain; attributes are computed on demand and kept in the store until
/// [`evict_before`](Self::evict_before) drops what later outputs cannot read.
pub struct TcombFilter<S> {
    source: S,
    thresholds: Thresholds,
    planes: PlaneSet,
    detector: SceneChangeDetector,
    store: AttributeStore,
    map: bool,
    scene_changes: AtomicUsize,
    corrected_pixels: AtomicUsize,
}

impl<S: FrameSource> TcombFilter<S> {
    pub fn new(source: S, config: &FilterConfig) -> Result<Self> {
        config.validate()?;
        if source.is_empty() {
            return Err(TcombError::EmptySequence);
        }
        let format = source.format();
        if format.width < MIN_FIELD_WIDTH || format.height < MIN_FIELD_HEIGHT {
            return Err(TcombError::InvalidDimensions {
                width: format.width,
                height: format.height,
            });
        }

        let thresholds = config.thresholds()?;
        let planes = PlaneSet::new(config.mode, format.plane_count())?;
        let detector = SceneChangeDetector::new(format.width, format.height, config.scene_threshold);
        debug!(
            fields = source.len(),
            width = format.width,
            height = format.height,
            mode = %config.mode,
            scene_detection = detector.is_enabled(),
            "Filter configured"
        );

        Ok(Self {
            source,
            thresholds,
            planes,
            detector,
            store: AttributeStore::new(),
            map: config.map,
            scene_changes: AtomicUsize::new(0),
            corrected_pixels: AtomicUsize::new(0),
        })
    }

    /// Number of fields (input and output).
    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn planes(&self) -> &PlaneSet {
        &self.planes
    }

    /// The attribute store, for inspection.
    pub fn attributes(&self) -> &AttributeStore {
        &self.store
    }

    pub fn stats(&self) -> FilterStats {
        FilterStats {
            scene_changes: self.scene_changes.load(Ordering::Relaxed),
            corrected_pixels: self.corrected_pixels.load(Ordering::Relaxed),
        }
    }

    fn context(&self) -> StageContext<'_, S> {
        StageContext {
            source: &self.source,
            store: &self.store,
            planes: &self.planes,
            thresholds: &self.thresholds,
            detector: &self.detector,
            map: self.map,
        }
    }

    /// Filtered fields for `range`, computing whatever attributes are missing.
    pub fn process_range(&self, range: Range<usize>) -> Result<Vec<Frame>> {
        let len = self.len();
        if range.end > len {
            return Err(TcombError::FrameIndexOutOfRange {
                index: range.end - 1,
                total: len,
            });
        }
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let required = RequiredRanges::resolve(range.clone(), len);
        let ctx = self.context();
        for stage in Stage::PRODUCERS {
            self.run_stage(&ctx, &required, stage)?;
        }

        let outcomes = range
            .into_par_iter()
            .map(|n| ctx.blend(n))
            .collect::<Result<Vec<_>>>()?;

        let corrected: usize = outcomes.iter().map(|o| o.corrected).sum();
        self.corrected_pixels.fetch_add(corrected, Ordering::Relaxed);
        Ok(outcomes.into_iter().map(|o| o.frame).collect())
    }

    /// Filtered field `n`.
    pub fn get_frame(&self, n: usize) -> Result<Frame> {
        let mut frames = self.process_range(n..n + 1)?;
        frames.pop().ok_or(TcombError::FrameIndexOutOfRange {
            index: n,
            total: self.len(),
        })
    }

    /// Run `stage` on every index where one of its required outputs is missing.
    fn run_stage(
        &self,
        ctx: &StageContext<'_, S>,
        required: &RequiredRanges,
        stage: Stage,
    ) -> Result<()> {
        let mut pending: Vec<usize> = ctx
            .outputs(stage)
            .iter()
            .flat_map(|&kind| {
                required
                    .kind(kind)
                    .filter(move |&n| !self.store.contains(n, kind))
            })
            .collect();
        pending.sort_unstable();
        pending.dedup();
        if pending.is_empty() {
            return Ok(());
        }
        debug!(%stage, count = pending.len(), first = pending[0], "Running stage");

        let results = pending
            .par_iter()
            .map(|&n| ctx.run(stage, n).map(|attrs| (n, attrs)))
            .collect::<Result<Vec<_>>>()?;

        for (n, attrs) in results {
            for attr in attrs {
                let cut = matches!(attr, Attribute::SceneChange(true));
                if self.store.publish(n, attr) && cut {
                    self.scene_changes.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
        Ok(())
    }

    /// Drop attributes that no output at index `next` or later can read.
    pub fn evict_before(&self, next: usize) -> usize {
        eviction_bounds(next, self.len())
            .into_iter()
            .map(|(kind, bound)| self.store.evict(kind, bound))
            .sum()
    }

    /// Stream every output field through `sink` in batches of `batch_size`,
    /// evicting after each batch. Returns the number of fields produced.
    pub fn process_all<F>(&self, batch_size: usize, mut sink: F) -> Result<usize>
    where
        F: FnMut(usize, Vec<Frame>) -> Result<()>,
    {
        if batch_size == 0 {
            return Err(TcombError::InvalidConfig(
                "batch_size must be at least 1".into(),
            ));
        }
        let len = self.len();
        let mut start = 0;
        while start < len {
            let end = (start + batch_size).min(len);
            let frames = self.process_range(start..end)?;
            sink(start, frames)?;
            let evicted = self.evict_before(end);
            debug!(start, end, evicted, retained = self.store.len(), "Batch complete");
            start = end;
        }
        Ok(len)
    }
}
