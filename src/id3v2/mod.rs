use crate::source::ByteSource;
use crate::Error;

mod frame;
pub mod frames;
pub mod genre;
pub mod read;
mod regex;
pub mod specs;
pub mod structure;
mod tag;
pub mod tools;

pub use self::frame::{Field, Frame, FrameBuilder, HashKey};
pub use self::frames::{Category, FrameKind};
pub use self::read::{FrameReader, ReadFrame};
pub use self::specs::{FieldValue, SpecKind};
pub use self::structure::{ExtendedHeader, FrameHeader, Header, Version};
pub use self::tag::{canonicalize, Canonicalization, LoadOptions, Scalar, Tag, V22_TO_V23, V23_TO_V24};

/// Reads the ID3v2 tag at the start of `source`, without looking for ID3v1.
pub fn get<S: ByteSource>(source: &mut S) -> Result<Tag, Error> {
    let options = LoadOptions {
        id3v1_fallback: false,
        ..Default::default()
    };
    Tag::load(source, &options)
}

#[cfg(test)]
mod tests;
