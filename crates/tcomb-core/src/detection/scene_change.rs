use ndarray::Array2;
use tracing::debug;

use crate::consts::{SCENE_CHANGE_COLUMN_ALIGN, SCENE_CHANGE_GROUP, SCENE_CHANGE_LUMA_RANGE};

/// Flags hard cuts between two luma planes of the same parity.
#[derive(Clone, Debug)]
pub struct SceneChangeDetector {
    /// `None` when detection is disabled.
    max_diff: Option<i64>,
    columns: usize,
}

impl SceneChangeDetector {
    /// Precompute the cut threshold for `width x height` luma planes.
    ///
    /// `threshold_percent < 0` disables detection.
    pub fn new(width: usize, height: usize, threshold_percent: f64) -> Self {
        let columns = (width / SCENE_CHANGE_COLUMN_ALIGN) * SCENE_CHANGE_COLUMN_ALIGN;
        let max_diff = if threshold_percent < 0.0 {
            None
        } else {
            let full_scale = columns as i64 * height as i64 * SCENE_CHANGE_LUMA_RANGE;
            Some((full_scale as f64 * threshold_percent / 100.0) as i64)
        };
        Self { max_diff, columns }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_diff.is_some()
    }

    /// Threshold the difference sum must exceed, if enabled.
    pub fn max_diff(&self) -> Option<i64> {
        self.max_diff
    }

    /// Sum of absolute differences over the aligned columns.
    pub fn difference(&self, cur: &Array2<u8>, prev: &Array2<u8>) -> i64 {
        debug_assert_eq!(cur.dim(), prev.dim());
        let mut diff = 0i64;
        for (cur_row, prev_row) in cur.rows().into_iter().zip(prev.rows()) {
            for x in (0..self.columns).step_by(SCENE_CHANGE_GROUP) {
                for k in x..x + SCENE_CHANGE_GROUP {
                    diff += (cur_row[k] as i64 - prev_row[k] as i64).abs();
                }
            }
        }
        diff
    }

    /// Whether `cur` starts a new scene relative to `prev`.
    pub fn is_scene_change(&self, cur: &Array2<u8>, prev: &Array2<u8>) -> bool {
        let Some(max_diff) = self.max_diff else {
            return false;
        };
        let diff = self.difference(cur, prev);
        if diff > max_diff {
            debug!(diff, max_diff, "Scene change detected");
            true
        } else {
            false
        }
    }
}
