use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TcombError};

/// Chroma layout of an 8-bit planar frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChromaSampling {
    Mono,
    Cs420,
    Cs422,
    Cs444,
}

impl ChromaSampling {
    /// Number of planes (1 for mono, 3 otherwise).
    pub fn plane_count(self) -> usize {
        match self {
            Self::Mono => 1,
            _ => 3,
        }
    }

    /// Horizontal and vertical chroma subsampling shifts.
    pub fn chroma_shift(self) -> (usize, usize) {
        match self {
            Self::Mono | Self::Cs444 => (0, 0),
            Self::Cs422 => (1, 0),
            Self::Cs420 => (1, 1),
        }
    }
}

impl std::fmt::Display for ChromaSampling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mono => write!(f, "mono"),
            Self::Cs420 => write!(f, "4:2:0"),
            Self::Cs422 => write!(f, "4:2:2"),
            Self::Cs444 => write!(f, "4:4:4"),
        }
    }
}

/// Luma dimensions plus chroma layout; fixes the shape of every plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoFormat {
    pub width: usize,
    pub height: usize,
    pub sampling: ChromaSampling,
}

impl VideoFormat {
    pub fn new(width: usize, height: usize, sampling: ChromaSampling) -> Self {
        Self {
            width,
            height,
            sampling,
        }
    }

    pub fn plane_count(&self) -> usize {
        self.sampling.plane_count()
    }

    /// Shape `(rows, cols)` of the given plane. Chroma sizes round up.
    pub fn plane_dim(&self, plane: usize) -> (usize, usize) {
        if plane == 0 {
            return (self.height, self.width);
        }
        let (sx, sy) = self.sampling.chroma_shift();
        (
            (self.height + (1 << sy) - 1) >> sy,
            (self.width + (1 << sx) - 1) >> sx,
        )
    }

    /// Bytes of one planar frame in this format.
    pub fn frame_byte_size(&self) -> usize {
        (0..self.plane_count())
            .map(|p| {
                let (h, w) = self.plane_dim(p);
                h * w
            })
            .sum()
    }
}

/// A single planar 8-bit frame (or field once separated).
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Planes in Y, U, V order, each shape = (height, width).
    pub planes: Vec<Array2<u8>>,
    pub metadata: FrameMetadata,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameMetadata {
    pub frame_index: usize,
    /// Set when this frame is one field of an interlaced frame.
    pub parity: Option<FieldParity>,
}

/// Which rows of the source frame a field holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldParity {
    /// Even rows (0, 2, 4, ...).
    Top,
    /// Odd rows (1, 3, 5, ...).
    Bottom,
}

impl Frame {
    pub fn new(planes: Vec<Array2<u8>>) -> Self {
        Self {
            planes,
            metadata: FrameMetadata::default(),
        }
    }

    /// A frame of the given format with every sample set to `value`.
    pub fn filled(format: &VideoFormat, value: u8) -> Self {
        let planes = (0..format.plane_count())
            .map(|p| Array2::from_elem(format.plane_dim(p), value))
            .collect();
        Self::new(planes)
    }

    /// Build a frame from tightly packed planar bytes.
    pub fn from_planar_bytes(format: &VideoFormat, bytes: &[u8]) -> Result<Self> {
        let expected = format.frame_byte_size();
        if bytes.len() < expected {
            return Err(TcombError::FormatMismatch(format!(
                "expected {} bytes of planar data, got {}",
                expected,
                bytes.len()
            )));
        }
        let mut offset = 0;
        let mut planes = Vec::with_capacity(format.plane_count());
        for p in 0..format.plane_count() {
            let (h, w) = format.plane_dim(p);
            let plane = Array2::from_shape_vec((h, w), bytes[offset..offset + h * w].to_vec())
                .map_err(|e| TcombError::FormatMismatch(e.to_string()))?;
            planes.push(plane);
            offset += h * w;
        }
        Ok(Self::new(planes))
    }

    /// Append the planes, row by row, to `out`.
    pub fn write_planar_bytes(&self, out: &mut Vec<u8>) {
        for plane in &self.planes {
            out.extend(plane.iter().copied());
        }
    }

    pub fn width(&self) -> usize {
        self.planes[0].ncols()
    }

    pub fn height(&self) -> usize {
        self.planes[0].nrows()
    }

    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    pub fn plane(&self, index: usize) -> &Array2<u8> {
        &self.planes[index]
    }

    /// Check that every plane has the shape `format` prescribes.
    pub fn check_format(&self, format: &VideoFormat) -> Result<()> {
        if self.plane_count() != format.plane_count() {
            return Err(TcombError::FormatMismatch(format!(
                "frame {} has {} planes, expected {}",
                self.metadata.frame_index,
                self.plane_count(),
                format.plane_count()
            )));
        }
        for (p, plane) in self.planes.iter().enumerate() {
            if plane.dim() != format.plane_dim(p) {
                return Err(TcombError::FormatMismatch(format!(
                    "frame {} plane {} is {:?}, expected {:?}",
                    self.metadata.frame_index,
                    p,
                    plane.dim(),
                    format.plane_dim(p)
                )));
            }
        }
        Ok(())
    }
}

/// Per-plane rasters for the active planes of one frame, stored in
/// [`PlaneSet::iter`](crate::pipeline::config::PlaneSet::iter) order.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneRasters {
    pub rasters: Vec<Array2<u8>>,
}

impl PlaneRasters {
    pub fn new(rasters: Vec<Array2<u8>>) -> Self {
        Self { rasters }
    }

    /// Raster for the `slot`-th active plane.
    pub fn slot(&self, slot: usize) -> &Array2<u8> {
        &self.rasters[slot]
    }

    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }
}
