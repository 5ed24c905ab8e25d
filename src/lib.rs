#[macro_use]
extern crate lazy_static;

mod types;
pub use crate::types::Image;
pub use crate::types::TimeStamp;

pub mod id3v1;
pub mod id3v2;

mod dispatch;
mod source;
pub mod tools;


pub use crate::dispatch::get_tag;
pub use crate::dispatch::get_tag_with;
pub use crate::id3v2::{
    Canonicalization, Frame, FrameBuilder, FrameKind, HashKey, LoadOptions, Scalar, Tag, Version,
};
pub use crate::source::{ByteSource, Source};

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IOError(#[from] io::Error),

    /// No ID3 signature where one was expected.
    #[error("ID3 tag not found: {0}")]
    NotFound(String),

    #[error("ID3v2.{0} is not supported")]
    UnsupportedVersion(u8),

    #[error("unexpected end of file: wanted {wanted} bytes, {available} available")]
    UnexpectedEndOfData { wanted: u64, available: u64 },

    #[error("invalid read: {0}")]
    InvalidArgument(&'static str),

    #[error("invalid sync-safe data at byte {0}")]
    SyncError(usize),

    #[error("insufficient data: field needs {needed} bytes, {available} left")]
    InsufficientData { needed: usize, available: usize },

    #[error("unknown text encoding {0:#04x}")]
    InvalidEncoding(u8),

    #[error("could not inflate frame: {0}")]
    Decompression(String),

    #[error("encrypted frames are not supported")]
    Encrypted,

    #[error("{0:?} is not numeric")]
    NotNumeric(String),
}
