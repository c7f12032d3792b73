use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::frame::{Frame, VideoFormat};

use super::y4m::Y4mHeader;

/// Sequential YUV4MPEG2 writer.
pub struct Y4mWriter {
    writer: BufWriter<File>,
    format: VideoFormat,
    buffer: Vec<u8>,
    frames_written: usize,
}

impl Y4mWriter {
    /// Create the file and write the stream header.
    pub fn create(path: &Path, header: &Y4mHeader) -> Result<Self> {
        let format = header.format()?;
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", header.to_line())?;
        Ok(Self {
            writer,
            format,
            buffer: Vec::with_capacity(format.frame_byte_size()),
            frames_written: 0,
        })
    }

    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        frame.check_format(&self.format)?;
        self.buffer.clear();
        frame.write_planar_bytes(&mut self.buffer);
        self.writer.write_all(b"FRAME\n")?;
        self.writer.write_all(&self.buffer)?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Flush and close the file.
    pub fn finalize(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
