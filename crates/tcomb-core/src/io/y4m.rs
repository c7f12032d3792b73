use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;

use crate::error::{Result, TcombError};
use crate::fields::FieldOrder;
use crate::frame::{ChromaSampling, Frame, VideoFormat};
use crate::source::FrameSource;

pub(crate) const Y4M_MAGIC: &str = "YUV4MPEG2";
pub(crate) const FRAME_MAGIC: &[u8] = b"FRAME";

/// Parsed YUV4MPEG2 stream header.
///
/// Tags other than `W`, `H` and `C` are kept verbatim so a writer can
/// reproduce them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Y4mHeader {
    pub width: usize,
    pub height: usize,
    /// `F` tag as `numerator:denominator`.
    pub frame_rate: Option<(u32, u32)>,
    /// `I` tag character (`p`, `t`, `b` or `m`).
    pub interlacing: Option<char>,
    /// `A` tag as `numerator:denominator`.
    pub aspect: Option<(u32, u32)>,
    /// `C` tag as written; `None` means the 4:2:0 default.
    pub colorspace: Option<String>,
    /// `X` tags including the leading `X`.
    pub extensions: Vec<String>,
}

impl Y4mHeader {
    pub fn new(width: usize, height: usize, sampling: ChromaSampling) -> Self {
        let colorspace = match sampling {
            ChromaSampling::Cs420 => "420jpeg",
            ChromaSampling::Cs422 => "422",
            ChromaSampling::Cs444 => "444",
            ChromaSampling::Mono => "mono",
        };
        Self {
            width,
            height,
            frame_rate: None,
            interlacing: None,
            aspect: None,
            colorspace: Some(colorspace.to_string()),
            extensions: Vec::new(),
        }
    }

    pub fn sampling(&self) -> Result<ChromaSampling> {
        match self.colorspace.as_deref() {
            None | Some("420jpeg" | "420paldv" | "420mpeg2" | "420") => Ok(ChromaSampling::Cs420),
            Some("422") => Ok(ChromaSampling::Cs422),
            Some("444") => Ok(ChromaSampling::Cs444),
            Some("mono") => Ok(ChromaSampling::Mono),
            Some(other) => Err(TcombError::UnsupportedFormat(format!(
                "Y4M colorspace {other}"
            ))),
        }
    }

    pub fn format(&self) -> Result<VideoFormat> {
        Ok(VideoFormat::new(self.width, self.height, self.sampling()?))
    }

    /// Field order implied by the `I` tag.
    pub fn field_order(&self) -> Option<FieldOrder> {
        match self.interlacing {
            Some('t') => Some(FieldOrder::TopFieldFirst),
            Some('b') => Some(FieldOrder::BottomFieldFirst),
            _ => None,
        }
    }

    /// Header line without the trailing newline.
    pub fn to_line(&self) -> String {
        let mut line = format!("{Y4M_MAGIC} W{} H{}", self.width, self.height);
        if let Some((n, d)) = self.frame_rate {
            line.push_str(&format!(" F{n}:{d}"));
        }
        if let Some(i) = self.interlacing {
            line.push_str(&format!(" I{i}"));
        }
        if let Some((n, d)) = self.aspect {
            line.push_str(&format!(" A{n}:{d}"));
        }
        if let Some(c) = &self.colorspace {
            line.push_str(&format!(" C{c}"));
        }
        for x in &self.extensions {
            line.push(' ');
            line.push_str(x);
        }
        line
    }

    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens = line.split_ascii_whitespace();
        if tokens.next() != Some(Y4M_MAGIC) {
            return Err(TcombError::InvalidY4m("missing YUV4MPEG2 magic".into()));
        }

        let mut width = None;
        let mut height = None;
        let mut header = Self {
            width: 0,
            height: 0,
            frame_rate: None,
            interlacing: None,
            aspect: None,
            colorspace: None,
            extensions: Vec::new(),
        };

        for token in tokens {
            let Some(tag) = token.get(..1) else {
                return Err(TcombError::InvalidY4m(format!("bad header tag {token:?}")));
            };
            let value = &token[1..];
            match tag {
                "W" => width = Some(parse_number(tag, value)?),
                "H" => height = Some(parse_number(tag, value)?),
                "F" => header.frame_rate = Some(parse_ratio(tag, value)?),
                "A" => header.aspect = Some(parse_ratio(tag, value)?),
                "I" => header.interlacing = value.chars().next(),
                "C" => header.colorspace = Some(value.to_string()),
                "X" => header.extensions.push(token.to_string()),
                _ => {
                    return Err(TcombError::InvalidY4m(format!(
                        "unknown header tag {token}"
                    )))
                }
            }
        }

        header.width = width.ok_or_else(|| TcombError::InvalidY4m("missing W tag".into()))?;
        header.height = height.ok_or_else(|| TcombError::InvalidY4m("missing H tag".into()))?;
        if header.width == 0 || header.height == 0 {
            return Err(TcombError::InvalidDimensions {
                width: header.width,
                height: header.height,
            });
        }
        header.sampling()?;
        Ok(header)
    }
}

fn parse_number(tag: &str, value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| TcombError::InvalidY4m(format!("bad {tag} value {value:?}")))
}

fn parse_ratio(tag: &str, value: &str) -> Result<(u32, u32)> {
    let bad = || TcombError::InvalidY4m(format!("bad {tag} ratio {value:?}"));
    let (n, d) = value.split_once(':').ok_or_else(bad)?;
    Ok((n.parse().map_err(|_| bad())?, d.parse().map_err(|_| bad())?))
}

/// Memory-mapped YUV4MPEG2 reader with random frame access.
pub struct Y4mReader {
    mmap: Mmap,
    pub header: Y4mHeader,
    format: VideoFormat,
    /// Byte offset of each frame's planar data.
    offsets: Vec<usize>,
}

impl Y4mReader {
    /// Open a Y4M file, parse its header and index every frame.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        let header_end = find_newline(&mmap, 0)
            .ok_or_else(|| TcombError::InvalidY4m("header is not terminated".into()))?;
        let line = std::str::from_utf8(&mmap[..header_end])
            .map_err(|_| TcombError::InvalidY4m("header is not ASCII".into()))?;
        let header = Y4mHeader::parse(line)?;
        let format = header.format()?;
        let offsets = index_frames(&mmap, header_end + 1, format.frame_byte_size())?;

        Ok(Self {
            mmap,
            header,
            format,
            offsets,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.offsets.len()
    }

    /// Planar bytes of one frame (zero-copy from the mapping).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let offset = *self
            .offsets
            .get(index)
            .ok_or(TcombError::FrameIndexOutOfRange {
                index,
                total: self.frame_count(),
            })?;
        Ok(&self.mmap[offset..offset + self.format.frame_byte_size()])
    }

    pub fn read_frame(&self, index: usize) -> Result<Frame> {
        let mut frame = Frame::from_planar_bytes(&self.format, self.frame_raw(index)?)?;
        frame.metadata.frame_index = index;
        Ok(frame)
    }
}

impl FrameSource for Y4mReader {
    fn format(&self) -> VideoFormat {
        self.format
    }

    fn len(&self) -> usize {
        self.frame_count()
    }

    fn frame(&self, index: usize) -> Result<Arc<Frame>> {
        self.read_frame(index).map(Arc::new)
    }

    fn field_order_hint(&self) -> Option<FieldOrder> {
        self.header.field_order()
    }
}

fn find_newline(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .iter()
        .position(|&b| b == b'\n')
        .map(|p| from + p)
}

fn index_frames(buf: &[u8], mut pos: usize, frame_size: usize) -> Result<Vec<usize>> {
    let mut offsets = Vec::new();
    while pos < buf.len() {
        if !buf[pos..].starts_with(FRAME_MAGIC) {
            return Err(TcombError::InvalidY4m(format!(
                "expected FRAME marker at byte {pos}"
            )));
        }
        let line_end = find_newline(buf, pos).ok_or_else(|| {
            TcombError::InvalidY4m(format!("frame {} header is not terminated", offsets.len()))
        })?;
        let data = line_end + 1;
        if data + frame_size > buf.len() {
            return Err(TcombError::InvalidY4m(format!(
                "file truncated in frame {}: expected {} bytes, got {}",
                offsets.len(),
                frame_size,
                buf.len() - data
            )));
        }
        offsets.push(data);
        pos = data + frame_size;
    }
    Ok(offsets)
}
