use thiserror::Error;

use crate::pipeline::AttributeKind;

#[derive(Error, Debug)]
pub enum TcombError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid Y4M stream: {0}")]
    InvalidY4m(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Frame format mismatch: {0}")]
    FormatMismatch(String),

    #[error("Attribute {kind} for frame {index} requested before it was produced")]
    AttributeNotReady { index: usize, kind: AttributeKind },

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, TcombError>;
