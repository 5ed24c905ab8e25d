extern crate encoding;
use self::encoding::all::{ISO_8859_1, UTF_16BE, UTF_16LE, UTF_8};
use self::encoding::{DecoderTrap, EncoderTrap, Encoding};

use crate::Error;

/// The text encoding selector byte that leads most text-bearing frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    Latin1 = 0,
    /// UTF-16 with a leading byte order mark
    Utf16 = 1,
    Utf16Be = 2,
    Utf8 = 3,
}

impl Default for TextEncoding {
    fn default() -> TextEncoding {
        TextEncoding::Latin1
    }
}

impl TextEncoding {
    pub fn from_byte(b: u8) -> Result<TextEncoding, Error> {
        match b {
            0 => Ok(TextEncoding::Latin1),
            1 => Ok(TextEncoding::Utf16),
            2 => Ok(TextEncoding::Utf16Be),
            3 => Ok(TextEncoding::Utf8),
            _ => Err(Error::InvalidEncoding(b)),
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn terminator(self) -> &'static [u8] {
        match self {
            TextEncoding::Latin1 | TextEncoding::Utf8 => b"\x00",
            TextEncoding::Utf16 | TextEncoding::Utf16Be => b"\x00\x00",
        }
    }

    pub fn terminator_width(self) -> usize {
        self.terminator().len()
    }

    pub fn decode(self, input: &[u8]) -> String {
        match self {
            TextEncoding::Latin1 => decode_iso_8859_1(input),
            TextEncoding::Utf16 => decode_utf16(input),
            TextEncoding::Utf16Be => UTF_16BE
                .decode(input, DecoderTrap::Replace)
                .unwrap_or_default(),
            TextEncoding::Utf8 => decode_utf8(input),
        }
    }

    pub fn encode(self, input: &str) -> Vec<u8> {
        let encoded = match self {
            TextEncoding::Latin1 => ISO_8859_1.encode(input, EncoderTrap::Replace),
            TextEncoding::Utf16 => UTF_16LE.encode(input, EncoderTrap::Replace).map(|v| {
                let mut bom = vec![0xFF, 0xFE];
                bom.extend(v);
                bom
            }),
            TextEncoding::Utf16Be => UTF_16BE.encode(input, EncoderTrap::Replace),
            TextEncoding::Utf8 => UTF_8.encode(input, EncoderTrap::Replace),
        };
        encoded.unwrap_or_default()
    }
}

/// Position of the first terminator for `encoding`. Two-byte terminators only
/// match on even offsets, so a `00 00` straddling two UTF-16 code units is
/// not mistaken for the end of the string.
pub fn find_terminator(input: &[u8], encoding: TextEncoding) -> Option<usize> {
    let term = encoding.terminator();
    let step = term.len();
    let mut i = 0;
    while i + step <= input.len() {
        if &input[i..i + step] == term {
            return Some(i);
        }
        i += step;
    }
    None
}

/// Splits off one terminated string: (string bytes, bytes after the terminator).
/// Without a terminator the whole input is the string.
pub fn read_terminated(input: &[u8], encoding: TextEncoding) -> (&[u8], &[u8]) {
    match find_terminator(input, encoding) {
        Some(i) => (&input[..i], &input[i + encoding.terminator_width()..]),
        None => (input, &input[input.len()..]),
    }
}

pub fn decode_iso_8859_1(input: &[u8]) -> String {
    ISO_8859_1
        .decode(input, DecoderTrap::Replace)
        .unwrap_or_default()
}

pub fn decode_utf8(input: &[u8]) -> String {
    UTF_8.decode(input, DecoderTrap::Replace).unwrap_or_default()
}

pub fn decode_utf16(input: &[u8]) -> String {
    match input {
        [0xFF, 0xFE, rest @ ..] => UTF_16LE.decode(rest, DecoderTrap::Replace),
        [0xFE, 0xFF, rest @ ..] => UTF_16BE.decode(rest, DecoderTrap::Replace),
        // in case of no BOM, assume big endian
        _ => UTF_16BE.decode(input, DecoderTrap::Replace),
    }
    .unwrap_or_default()
}
