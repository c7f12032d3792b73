use std::ops::Range;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BATCH_SIZE, DEFAULT_FINE_THRESHOLD_CHROMA, DEFAULT_FINE_THRESHOLD_LUMA,
    DEFAULT_OUTPUT_THRESHOLD_CHROMA, DEFAULT_OUTPUT_THRESHOLD_LUMA, DEFAULT_SCENE_THRESHOLD,
};
use crate::error::{Result, TcombError};
use crate::fields::FieldOrder;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub field_order: FieldOrder,
    /// Output fields computed per scheduler batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub filter: FilterConfig,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl PipelineConfig {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            field_order: FieldOrder::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            filter: FilterConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(TcombError::InvalidConfig(
                "batch_size must be at least 1".into(),
            ));
        }
        self.filter.validate()
    }
}

/// Which plane groups are filtered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    Luma,
    Chroma,
    #[default]
    Both,
}

impl std::fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Luma => write!(f, "Luma"),
            Self::Chroma => write!(f, "Chroma"),
            Self::Both => write!(f, "Luma + Chroma"),
        }
    }
}

/// User-facing filter parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub mode: ProcessingMode,
    /// Motion/average spread threshold for luma (1-255).
    pub fine_threshold_luma: u32,
    /// Average spread threshold for chroma (1-255).
    pub fine_threshold_chroma: u32,
    /// Oscillation spread and endpoint threshold for luma (1-255).
    pub output_threshold_luma: u32,
    /// Oscillation spread and endpoint threshold for chroma (1-255).
    pub output_threshold_chroma: u32,
    /// Scene-change sensitivity in percent (<= 100); negative disables.
    pub scene_threshold: f64,
    /// Emit a correction map instead of the filtered picture.
    pub map: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            mode: ProcessingMode::default(),
            fine_threshold_luma: DEFAULT_FINE_THRESHOLD_LUMA,
            fine_threshold_chroma: DEFAULT_FINE_THRESHOLD_CHROMA,
            output_threshold_luma: DEFAULT_OUTPUT_THRESHOLD_LUMA,
            output_threshold_chroma: DEFAULT_OUTPUT_THRESHOLD_CHROMA,
            scene_threshold: DEFAULT_SCENE_THRESHOLD,
            map: false,
        }
    }
}

impl FilterConfig {
    /// Reject out-of-range parameters before any pipeline is built.
    pub fn validate(&self) -> Result<()> {
        self.thresholds().map(|_| ())?;
        if self.scene_threshold.is_nan() {
            return Err(TcombError::InvalidConfig(
                "scene_threshold must be a number".into(),
            ));
        }
        if self.scene_threshold > 100.0 {
            return Err(TcombError::InvalidConfig(
                "scene_threshold must not be more than 100".into(),
            ));
        }
        Ok(())
    }

    /// Thresholds narrowed to sample range, or an error naming the first
    /// parameter outside 1-255.
    pub fn thresholds(&self) -> Result<Thresholds> {
        Ok(Thresholds {
            fine_luma: checked_threshold("fine_threshold_luma", self.fine_threshold_luma)?,
            fine_chroma: checked_threshold("fine_threshold_chroma", self.fine_threshold_chroma)?,
            output_luma: checked_threshold("output_threshold_luma", self.output_threshold_luma)?,
            output_chroma: checked_threshold(
                "output_threshold_chroma",
                self.output_threshold_chroma,
            )?,
        })
    }
}

fn checked_threshold(name: &str, value: u32) -> Result<u8> {
    match u8::try_from(value) {
        Ok(v) if v >= 1 => Ok(v),
        _ => Err(TcombError::InvalidConfig(format!(
            "{name} must be between 1 and 255 (inclusive), got {value}"
        ))),
    }
}

/// Validated per-plane thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    pub fine_luma: u8,
    pub fine_chroma: u8,
    pub output_luma: u8,
    pub output_chroma: u8,
}

impl Thresholds {
    pub fn fine(&self, plane: usize) -> u8 {
        if plane == 0 {
            self.fine_luma
        } else {
            self.fine_chroma
        }
    }

    pub fn output(&self, plane: usize) -> u8 {
        if plane == 0 {
            self.output_luma
        } else {
            self.output_chroma
        }
    }
}

/// The contiguous range of plane indices a run processes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaneSet {
    range: Range<usize>,
}

impl PlaneSet {
    /// Resolve `mode` against a source with `plane_count` planes.
    ///
    /// Chroma-only on a single-plane source is an error; luma + chroma
    /// degrades to luma only.
    pub fn new(mode: ProcessingMode, plane_count: usize) -> Result<Self> {
        let range = match (mode, plane_count) {
            (_, 0) => return Err(TcombError::UnsupportedFormat("frame has no planes".into())),
            (ProcessingMode::Luma, _) => 0..1,
            (ProcessingMode::Chroma, 1) => {
                return Err(TcombError::InvalidConfig(
                    "chroma mode requires a source with chroma planes".into(),
                ))
            }
            (ProcessingMode::Chroma, n) => 1..n,
            (ProcessingMode::Both, n) => 0..n,
        };
        Ok(Self { range })
    }

    pub fn luma(&self) -> bool {
        self.range.start == 0
    }

    pub fn chroma(&self) -> bool {
        self.range.end > 1
    }

    pub fn contains(&self, plane: usize) -> bool {
        self.range.contains(&plane)
    }

    /// Active plane indices in ascending order.
    pub fn iter(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}
