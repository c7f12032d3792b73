use std::path::Path;

use ndarray::Array2;
use tcomb_core::frame::{ChromaSampling, Frame, VideoFormat};
use tcomb_core::io::y4m::Y4mHeader;
use tcomb_core::io::y4m_writer::Y4mWriter;
use tcomb_core::source::MemorySource;

pub fn format(width: usize, height: usize, sampling: ChromaSampling) -> VideoFormat {
    VideoFormat::new(width, height, sampling)
}

/// A `(h, w)` plane with every sample set to `value`.
pub fn flat_plane(h: usize, w: usize, value: u8) -> Array2<u8> {
    Array2::from_elem((h, w), value)
}

/// Build a frame from a per-sample function of `(plane, row, col)`.
pub fn frame_from_fn(format: &VideoFormat, f: impl Fn(usize, usize, usize) -> u8) -> Frame {
    let planes = (0..format.plane_count())
        .map(|p| Array2::from_shape_fn(format.plane_dim(p), |(r, c)| f(p, r, c)))
        .collect();
    Frame::new(planes)
}

/// `len` frames from a per-sample function of `(index, plane, row, col)`.
pub fn sequence(
    format: &VideoFormat,
    len: usize,
    f: impl Fn(usize, usize, usize, usize) -> u8,
) -> Vec<Frame> {
    (0..len)
        .map(|i| frame_from_fn(format, |p, r, c| f(i, p, r, c)))
        .collect()
}

pub fn memory_source(
    format: &VideoFormat,
    len: usize,
    f: impl Fn(usize, usize, usize, usize) -> u8,
) -> MemorySource {
    MemorySource::with_format(*format, sequence(format, len, f)).unwrap()
}

/// A single-plane frame holding `plane`.
pub fn mono_frame(plane: Array2<u8>) -> Frame {
    Frame::new(vec![plane])
}

/// Write `frames` as a Y4M file with the given header.
pub fn write_y4m(path: &Path, header: &Y4mHeader, frames: &[Frame]) {
    let mut writer = Y4mWriter::create(path, header).unwrap();
    for frame in frames {
        writer.write_frame(frame).unwrap();
    }
    writer.finalize().unwrap();
}

/// Deterministic texture that differs per plane, row and column.
pub fn texture(p: usize, r: usize, c: usize) -> u8 {
    ((p * 37 + r * 11 + c * 7) % 200 + 20) as u8
}
