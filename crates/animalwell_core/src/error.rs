use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SaveError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Io,
    OutOfRange,
    Range,
    UnknownName,
    SizeMismatch,
    DimensionMismatch,
    UnsupportedVersion,
    Image,
    InvalidInput,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("access of {len} bytes at 0x{offset:X} is outside the {store_len}-byte buffer")]
    OutOfRange {
        offset: usize,
        len: usize,
        store_len: usize,
    },

    #[error("{label}: value {value} does not fit (expected {min}..={max})")]
    Range {
        label: &'static str,
        value: i128,
        min: i128,
        max: i128,
    },

    #[error("{field}: unknown flag '{name}'")]
    UnknownFlag { field: &'static str, name: String },

    #[error("unknown {kind} '{name}'")]
    UnknownChoice { kind: &'static str, name: String },

    #[error("{what} must be exactly {expected} bytes, got {found}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("image is {found_width}x{found_height}, expected {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        found_width: u32,
        found_height: u32,
    },

    #[error("window x origin {x} is not byte aligned")]
    UnalignedWindow { x: u32 },

    #[error("unsupported savefile version {0}")]
    UnsupportedVersion(u32),

    #[error("invalid slot {index}, expected 0..{count}")]
    InvalidSlot { index: usize, count: usize },

    #[error("stamp list is full ({0} entries)")]
    StampsFull(usize),

    #[error("{what}: adding {needed} entries would overflow the {capacity}-entry list")]
    TileListFull {
        what: &'static str,
        needed: usize,
        capacity: usize,
    },

    #[error("stamp index {index} out of range (have {len})")]
    StampIndex { index: usize, len: usize },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("png encoding failed: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl SaveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::OutOfRange { .. } => ErrorCode::OutOfRange,
            Self::Range { .. } => ErrorCode::Range,
            Self::UnknownFlag { .. } | Self::UnknownChoice { .. } => ErrorCode::UnknownName,
            Self::SizeMismatch { .. } => ErrorCode::SizeMismatch,
            Self::DimensionMismatch { .. } => ErrorCode::DimensionMismatch,
            Self::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
            Self::InvalidSlot { .. }
            | Self::StampsFull(_)
            | Self::TileListFull { .. }
            | Self::StampIndex { .. }
            | Self::UnalignedWindow { .. } => ErrorCode::InvalidInput,
            Self::Image(_) | Self::PngEncode(_) => ErrorCode::Image,
            Self::Io(_) => ErrorCode::Io,
        }
    }
}
