use std::sync::Arc;

use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TcombError};
use crate::frame::{FieldParity, Frame, VideoFormat};
use crate::source::FrameSource;

/// Temporal order of the two fields of an interlaced frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldOrder {
    /// Use the source's interlacing tag, top field first when untagged.
    #[default]
    Auto,
    TopFieldFirst,
    BottomFieldFirst,
}

impl FieldOrder {
    /// Parity of the temporally first field.
    pub fn first_parity(self, hint: Option<FieldOrder>) -> FieldParity {
        match self {
            Self::TopFieldFirst => FieldParity::Top,
            Self::BottomFieldFirst => FieldParity::Bottom,
            Self::Auto => match hint {
                Some(Self::BottomFieldFirst) => FieldParity::Bottom,
                _ => FieldParity::Top,
            },
        }
    }
}

impl std::fmt::Display for FieldOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "Auto"),
            Self::TopFieldFirst => write!(f, "Top field first"),
            Self::BottomFieldFirst => write!(f, "Bottom field first"),
        }
    }
}

impl FieldParity {
    fn row_offset(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Bottom => 1,
        }
    }

    fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// Format of one field of a `format` frame.
///
/// Every plane must have an even number of rows.
pub fn field_format(format: &VideoFormat) -> Result<VideoFormat> {
    for p in 0..format.plane_count() {
        let (h, w) = format.plane_dim(p);
        if h % 2 != 0 {
            return Err(TcombError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
    }
    Ok(VideoFormat::new(format.width, format.height / 2, format.sampling))
}

/// Rows of `frame` belonging to `parity`, as a new frame.
pub fn extract_field(frame: &Frame, parity: FieldParity) -> Frame {
    let start = parity.row_offset();
    let planes = frame
        .planes
        .iter()
        .map(|plane| plane.slice(s![start..;2, ..]).to_owned())
        .collect();
    let mut field = Frame::new(planes);
    field.metadata.frame_index = frame.metadata.frame_index;
    field.metadata.parity = Some(parity);
    field
}

/// Split a frame into its two fields, temporally first field first.
pub fn separate_fields(frame: &Frame, first: FieldParity) -> [Frame; 2] {
    [
        extract_field(frame, first),
        extract_field(frame, first.opposite()),
    ]
}

/// Interleave two fields back into a frame; inverse of [`separate_fields`].
pub fn weave_fields(first: &Frame, second: &Frame, first_parity: FieldParity) -> Result<Frame> {
    let (top, bottom) = match first_parity {
        FieldParity::Top => (first, second),
        FieldParity::Bottom => (second, first),
    };
    if top.plane_count() != bottom.plane_count() {
        return Err(TcombError::FormatMismatch(
            "fields have different plane counts".into(),
        ));
    }

    let mut planes = Vec::with_capacity(top.plane_count());
    for (t, b) in top.planes.iter().zip(&bottom.planes) {
        if t.dim() != b.dim() {
            return Err(TcombError::FormatMismatch(format!(
                "field planes differ: {:?} vs {:?}",
                t.dim(),
                b.dim()
            )));
        }
        let (h, w) = t.dim();
        planes.push(Array2::from_shape_fn((h * 2, w), |(row, col)| {
            if row % 2 == 0 {
                t[[row / 2, col]]
            } else {
                b[[row / 2, col]]
            }
        }));
    }

    let mut frame = Frame::new(planes);
    frame.metadata.frame_index = first.metadata.frame_index;
    Ok(frame)
}

/// Presents a frame source as the sequence of its fields in temporal order.
///
/// Field `2k` is the first field of frame `k`, field `2k + 1` the second, so
/// a step of two always lands on a field of the same parity.
pub struct FieldSource<S> {
    inner: S,
    first: FieldParity,
    format: VideoFormat,
}

impl<S: FrameSource> FieldSource<S> {
    pub fn new(inner: S, order: FieldOrder) -> Result<Self> {
        let format = field_format(&inner.format())?;
        let first = order.first_parity(inner.field_order_hint());
        Ok(Self {
            inner,
            first,
            format,
        })
    }

    /// Parity of the temporally first field of each frame.
    pub fn first_parity(&self) -> FieldParity {
        self.first
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: FrameSource> FrameSource for FieldSource<S> {
    fn format(&self) -> VideoFormat {
        self.format
    }

    fn len(&self) -> usize {
        self.inner.len() * 2
    }

    fn frame(&self, index: usize) -> Result<Arc<Frame>> {
        let frame = self.inner.frame(index / 2)?;
        let parity = if index % 2 == 0 {
            self.first
        } else {
            self.first.opposite()
        };
        let mut field = extract_field(&frame, parity);
        field.metadata.frame_index = index;
        Ok(Arc::new(field))
    }
}
