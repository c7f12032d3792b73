use std::collections::HashMap;
use std::sync::Arc;

use ndarray::Array2;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Result, TcombError};
use crate::filters::blur::BlurPyramid;
use crate::frame::PlaneRasters;

/// Kind of per-field attribute a stage publishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    SceneChange,
    BlurPyramid,
    MotionMask,
    Average,
    OscillationMask,
    FinalMask,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 6] = [
        Self::SceneChange,
        Self::BlurPyramid,
        Self::MotionMask,
        Self::Average,
        Self::OscillationMask,
        Self::FinalMask,
    ];
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SceneChange => write!(f, "scene change"),
            Self::BlurPyramid => write!(f, "blur pyramid"),
            Self::MotionMask => write!(f, "motion mask"),
            Self::Average => write!(f, "average"),
            Self::OscillationMask => write!(f, "oscillation mask"),
            Self::FinalMask => write!(f, "final mask"),
        }
    }
}

/// A computed attribute. Raster payloads are shared, so fetching is cheap.
#[derive(Clone, Debug)]
pub enum Attribute {
    SceneChange(bool),
    BlurPyramid(Arc<BlurPyramid>),
    MotionMask(Arc<Array2<u8>>),
    Average(Arc<PlaneRasters>),
    OscillationMask(Arc<PlaneRasters>),
    FinalMask(Arc<PlaneRasters>),
}

impl Attribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::SceneChange(_) => AttributeKind::SceneChange,
            Self::BlurPyramid(_) => AttributeKind::BlurPyramid,
            Self::MotionMask(_) => AttributeKind::MotionMask,
            Self::Average(_) => AttributeKind::Average,
            Self::OscillationMask(_) => AttributeKind::OscillationMask,
            Self::FinalMask(_) => AttributeKind::FinalMask,
        }
    }
}

/// `(field index, kind) -> attribute` map shared by all stages.
#[derive(Default)]
pub struct AttributeStore {
    entries: RwLock<HashMap<(usize, AttributeKind), Attribute>>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `attribute` for `index`. Returns `false` if an entry of the
    /// same kind was already present; the existing value is kept.
    pub fn publish(&self, index: usize, attribute: Attribute) -> bool {
        let key = (index, attribute.kind());
        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, attribute);
        true
    }

    pub fn contains(&self, index: usize, kind: AttributeKind) -> bool {
        self.entries.read().contains_key(&(index, kind))
    }

    pub fn fetch(&self, index: usize, kind: AttributeKind) -> Result<Attribute> {
        self.entries
            .read()
            .get(&(index, kind))
            .cloned()
            .ok_or(TcombError::AttributeNotReady { index, kind })
    }

    fn fetch_as<T>(
        &self,
        index: usize,
        kind: AttributeKind,
        extract: impl FnOnce(Attribute) -> Option<T>,
    ) -> Result<T> {
        extract(self.fetch(index, kind)?).ok_or(TcombError::AttributeNotReady { index, kind })
    }

    pub fn scene_change(&self, index: usize) -> Result<bool> {
        self.fetch_as(index, AttributeKind::SceneChange, |a| match a {
            Attribute::SceneChange(v) => Some(v),
            _ => None,
        })
    }

    pub fn blur_pyramid(&self, index: usize) -> Result<Arc<BlurPyramid>> {
        self.fetch_as(index, AttributeKind::BlurPyramid, |a| match a {
            Attribute::BlurPyramid(v) => Some(v),
            _ => None,
        })
    }

    pub fn motion_mask(&self, index: usize) -> Result<Arc<Array2<u8>>> {
        self.fetch_as(index, AttributeKind::MotionMask, |a| match a {
            Attribute::MotionMask(v) => Some(v),
            _ => None,
        })
    }

    pub fn average(&self, index: usize) -> Result<Arc<PlaneRasters>> {
        self.fetch_as(index, AttributeKind::Average, |a| match a {
            Attribute::Average(v) => Some(v),
            _ => None,
        })
    }

    pub fn oscillation_mask(&self, index: usize) -> Result<Arc<PlaneRasters>> {
        self.fetch_as(index, AttributeKind::OscillationMask, |a| match a {
            Attribute::OscillationMask(v) => Some(v),
            _ => None,
        })
    }

    pub fn final_mask(&self, index: usize) -> Result<Arc<PlaneRasters>> {
        self.fetch_as(index, AttributeKind::FinalMask, |a| match a {
            Attribute::FinalMask(v) => Some(v),
            _ => None,
        })
    }

    /// Drop every attribute of `kind` whose index is below `before`.
    /// Returns the number of entries removed.
    pub fn evict(&self, kind: AttributeKind, before: usize) -> usize {
        let mut entries = self.entries.write();
        let len = entries.len();
        entries.retain(|&(index, k), _| k != kind || index >= before);
        let removed = len - entries.len();
        if removed > 0 {
            debug!(%kind, before, removed, "Evicted attributes");
        }
        removed
    }

    /// Number of stored entries of `kind`.
    pub fn count(&self, kind: AttributeKind) -> usize {
        self.entries.read().keys().filter(|(_, k)| *k == kind).count()
    }

    /// Smallest stored index of `kind`, if any.
    pub fn first_index(&self, kind: AttributeKind) -> Option<usize> {
        self.entries
            .read()
            .keys()
            .filter(|(_, k)| *k == kind)
            .map(|(i, _)| *i)
            .min()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
