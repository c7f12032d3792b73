use std::path::Path;

use image::{GrayImage, ImageFormat};

use crate::error::{Result, TcombError};
use crate::frame::Frame;

/// Save one plane of `frame` as 8-bit grayscale PNG.
pub fn save_plane_png(frame: &Frame, plane: usize, path: &Path) -> Result<()> {
    let data = frame.planes.get(plane).ok_or_else(|| {
        TcombError::InvalidConfig(format!(
            "plane {plane} out of range (frame has {})",
            frame.plane_count()
        ))
    })?;
    let (h, w) = data.dim();
    let pixels: Vec<u8> = data.iter().copied().collect();
    let img = GrayImage::from_raw(w as u32, h as u32, pixels)
        .ok_or(TcombError::InvalidDimensions { width: w, height: h })?;
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
