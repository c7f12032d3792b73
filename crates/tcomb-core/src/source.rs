use std::sync::Arc;

use crate::error::{Result, TcombError};
use crate::fields::FieldOrder;
use crate::frame::{ChromaSampling, Frame, VideoFormat};

/// Random-access supplier of frames for the filter.
///
/// The filter clamps every index to `0..len()` before calling [`frame`](Self::frame).
pub trait FrameSource: Send + Sync {
    fn format(&self) -> VideoFormat;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn frame(&self, index: usize) -> Result<Arc<Frame>>;

    /// Field order recorded by the container, if any.
    fn field_order_hint(&self) -> Option<FieldOrder> {
        None
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Arc<S> {
    fn format(&self) -> VideoFormat {
        (**self).format()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn frame(&self, index: usize) -> Result<Arc<Frame>> {
        (**self).frame(index)
    }

    fn field_order_hint(&self) -> Option<FieldOrder> {
        (**self).field_order_hint()
    }
}

/// Frames held in memory.
pub struct MemorySource {
    format: VideoFormat,
    frames: Vec<Arc<Frame>>,
}

impl MemorySource {
    /// Wrap `frames`, inferring the format from the first one.
    pub fn new(frames: Vec<Frame>) -> Result<Self> {
        let first = frames.first().ok_or(TcombError::EmptySequence)?;
        let format = infer_format(first)?;
        Self::with_format(format, frames)
    }

    pub fn with_format(format: VideoFormat, frames: Vec<Frame>) -> Result<Self> {
        if frames.is_empty() {
            return Err(TcombError::EmptySequence);
        }
        let frames = frames
            .into_iter()
            .enumerate()
            .map(|(i, mut frame)| {
                frame.metadata.frame_index = i;
                frame.check_format(&format)?;
                Ok(Arc::new(frame))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { format, frames })
    }
}

impl FrameSource for MemorySource {
    fn format(&self) -> VideoFormat {
        self.format
    }

    fn len(&self) -> usize {
        self.frames.len()
    }

    fn frame(&self, index: usize) -> Result<Arc<Frame>> {
        self.frames
            .get(index)
            .cloned()
            .ok_or(TcombError::FrameIndexOutOfRange {
                index,
                total: self.frames.len(),
            })
    }
}

/// Derive the chroma layout from the plane shapes of `frame`.
pub fn infer_format(frame: &Frame) -> Result<VideoFormat> {
    let (height, width) = frame.planes[0].dim();
    let sampling = match frame.plane_count() {
        1 => ChromaSampling::Mono,
        3 => [
            ChromaSampling::Cs444,
            ChromaSampling::Cs422,
            ChromaSampling::Cs420,
        ]
        .into_iter()
        .find(|&s| {
            let format = VideoFormat::new(width, height, s);
            (1..3).all(|p| frame.planes[p].dim() == format.plane_dim(p))
        })
        .ok_or_else(|| {
            TcombError::UnsupportedFormat(format!(
                "chroma planes {:?} do not match a known layout for {}x{}",
                frame.planes[1].dim(),
                width,
                height
            ))
        })?,
        n => {
            return Err(TcombError::UnsupportedFormat(format!(
                "{n} planes per frame"
            )))
        }
    };
    Ok(VideoFormat::new(width, height, sampling))
}
