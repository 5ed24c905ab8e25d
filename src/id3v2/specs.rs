use std::fmt;

use crate::tools::encoding::{decode_iso_8859_1, read_terminated, TextEncoding};
use crate::Error;
use crate::TimeStamp;

extern crate crc;
use crc::crc32::checksum_ieee;

/// How one field of a frame payload is laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecKind {
    /// one raw byte
    Byte,
    /// the text encoding selector for every later field
    Encoding,
    /// a fixed number of Latin-1 bytes, such as a language code
    Fixed(usize),
    /// terminated text in the frame's encoding
    EncodedText,
    /// terminated text that is always Latin-1
    Latin1Text,
    /// terminated text holding an ID3 timestamp
    TimeStamp,
    /// everything left
    Binary,
    /// the inner spec repeated until the payload runs out
    Multi(&'static SpecKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: SpecKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: SpecKind) -> FieldSpec {
        FieldSpec { name, kind }
    }
    pub const fn encoding() -> FieldSpec {
        FieldSpec::new("encoding", SpecKind::Encoding)
    }
}

#[derive(Clone, PartialEq)]
pub enum FieldValue {
    Byte(u8),
    Text(String),
    TimeStamp(TimeStamp),
    Binary(Vec<u8>),
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Text form of a scalar value; lists and binary data have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::TimeStamp(ts) => Some(ts.text()),
            FieldValue::Byte(b) => Some(b.to_string()),
            FieldValue::Binary(_) | FieldValue::List(_) => None,
        }
    }

    /// The value a builder uses for a field nobody supplied.
    pub fn default_for(kind: SpecKind) -> FieldValue {
        match kind {
            SpecKind::Byte | SpecKind::Encoding => FieldValue::Byte(0),
            SpecKind::Fixed(_) | SpecKind::EncodedText | SpecKind::Latin1Text => {
                FieldValue::Text(String::new())
            }
            SpecKind::TimeStamp => FieldValue::TimeStamp(TimeStamp::default()),
            SpecKind::Binary => FieldValue::Binary(Vec::new()),
            SpecKind::Multi(_) => FieldValue::List(Vec::new()),
        }
    }

    /// Re-expresses a value in the shape `kind` decodes to, so frames can move
    /// between kinds whose layouts differ only in value types.
    pub fn coerce(self, kind: SpecKind) -> FieldValue {
        match (kind, self) {
            (SpecKind::Multi(inner), FieldValue::List(values)) => FieldValue::List(
                values.into_iter().map(|v| v.coerce(*inner)).collect(),
            ),
            (SpecKind::Multi(inner), v) => FieldValue::List(vec![v.coerce(*inner)]),
            (SpecKind::TimeStamp, FieldValue::Text(s)) => FieldValue::TimeStamp(TimeStamp::parse(&s)),
            (SpecKind::EncodedText, FieldValue::TimeStamp(ts))
            | (SpecKind::Latin1Text, FieldValue::TimeStamp(ts)) => FieldValue::Text(ts.text()),
            // a single-valued field keeps the first of several
            (kind, FieldValue::List(values)) => match values.into_iter().next() {
                Some(v) => v.coerce(kind),
                None => FieldValue::default_for(kind),
            },
            (_, v) => v,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldValue::Byte(b) => write!(f, "{}", b),
            FieldValue::Text(s) => write!(f, "{:?}", s),
            FieldValue::TimeStamp(ts) => write!(f, "TimeStamp({:?})", ts.text()),
            FieldValue::Binary(v) => write!(f, "0x{:X?} ({} bytes)", checksum_ieee(v), v.len()),
            FieldValue::List(l) => f.debug_list().entries(l).finish(),
        }
    }
}

/// Reads the encoding selector. A byte of 16 or more is not an encoding at
/// all: it is left in place and Latin-1 assumed.
pub fn read_encoding(data: &[u8]) -> Result<(TextEncoding, &[u8]), Error> {
    match data.first() {
        None => Err(Error::InsufficientData {
            needed: 1,
            available: 0,
        }),
        Some(&b) if b >= 16 => Ok((TextEncoding::Latin1, data)),
        Some(&b) => Ok((TextEncoding::from_byte(b)?, &data[1..])),
    }
}

impl SpecKind {
    /// Decodes one field off the front of `data`, returning it with the rest.
    pub fn read<'a>(
        &self,
        encoding: TextEncoding,
        data: &'a [u8],
    ) -> Result<(FieldValue, &'a [u8]), Error> {
        match *self {
            SpecKind::Byte => match data.split_first() {
                Some((b, rest)) => Ok((FieldValue::Byte(*b), rest)),
                None => Err(Error::InsufficientData {
                    needed: 1,
                    available: 0,
                }),
            },
            SpecKind::Encoding => {
                let (enc, rest) = read_encoding(data)?;
                Ok((FieldValue::Byte(enc.as_byte()), rest))
            }
            SpecKind::Fixed(width) => {
                if data.len() < width {
                    return Err(Error::InsufficientData {
                        needed: width,
                        available: data.len(),
                    });
                }
                Ok((
                    FieldValue::Text(decode_iso_8859_1(&data[..width])),
                    &data[width..],
                ))
            }
            SpecKind::EncodedText => {
                let (text, rest) = read_terminated(data, encoding);
                if text.len() < encoding.terminator_width() {
                    return Ok((FieldValue::Text(String::new()), rest));
                }
                Ok((FieldValue::Text(encoding.decode(text)), rest))
            }
            SpecKind::Latin1Text => {
                let (text, rest) = read_terminated(data, TextEncoding::Latin1);
                Ok((FieldValue::Text(decode_iso_8859_1(text)), rest))
            }
            SpecKind::TimeStamp => {
                let (value, rest) = SpecKind::EncodedText.read(encoding, data)?;
                let text = value.as_text().unwrap_or_default();
                Ok((FieldValue::TimeStamp(TimeStamp::parse(&text)), rest))
            }
            SpecKind::Binary => Ok((FieldValue::Binary(data.to_vec()), &data[data.len()..])),
            SpecKind::Multi(inner) => {
                let mut values = Vec::new();
                let mut data = data;
                while !data.is_empty() {
                    let (value, rest) = inner.read(encoding, data)?;
                    values.push(value);
                    data = rest;
                }
                Ok((FieldValue::List(values), data))
            }
        }
    }
}
