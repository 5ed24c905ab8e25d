use std::fmt;

use crate::tools::decode_int_be_u32;

extern crate crc;
use crc::crc32::checksum_ieee;

/// Picture data pulled out of an attached picture frame.
#[derive(PartialEq, Clone)]
pub enum Image {
    PNG(Vec<u8>),
    JPEG(Vec<u8>),
}

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

impl Image {
    /// Sniffs the payload rather than trusting the declared MIME type,
    /// which taggers routinely get wrong.
    pub fn from_data(data: Vec<u8>) -> Option<Image> {
        if data.starts_with(&PNG_MAGIC) {
            Some(Image::PNG(data))
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Image::JPEG(data))
        } else {
            None
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Image::PNG(_) => "image/png",
            Image::JPEG(_) => "image/jpeg",
        }
    }

    pub fn data(&self) -> &[u8] {
        match self {
            Image::PNG(v) | Image::JPEG(v) => v,
        }
    }

    pub fn into_data(self) -> Vec<u8> {
        match self {
            Image::PNG(v) | Image::JPEG(v) => v,
        }
    }

    pub fn crc32(&self) -> u32 {
        checksum_ieee(self.data())
    }

    //                                  w    h   bpp
    pub fn dimensions(&self) -> Option<(u32, u32, u8)> {
        match self {
            Image::JPEG(ref v) => {
                let mut pos = 2;

                while pos + 8 < v.len() {
                    // find SOFX
                    if v[pos] == 0xFF && v[pos + 1] & 0xF0 == 0xC0 {
                        // [FF CX] [XX XX] [XX] [XX XX] [XX XX]
                        // SOF id   size   bpp   height  width
                        return Some((
                            decode_int_be_u32(&v[pos + 7..pos + 9]),
                            decode_int_be_u32(&v[pos + 5..pos + 7]),
                            v[pos + 4],
                        ));
                    }
                    pos += 2 + decode_int_be_u32(&v[pos + 2..pos + 4]) as usize;
                }

                None
            }
            Image::PNG(ref v) => {
                if v.len() < 25 {
                    None
                } else {
                    Some((
                        decode_int_be_u32(&v[16..20]),
                        decode_int_be_u32(&v[20..24]),
                        v[24],
                    ))
                }
            }
        }
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let res = self.dimensions().unwrap_or((0, 0, 0));
        let kind = match self {
            Image::PNG(_) => "PNG",
            Image::JPEG(_) => "JPEG",
        };
        write!(
            f,
            "{} 0x{:X?} ({} bytes, {}x{}, {}bpp)",
            kind,
            self.crc32(),
            self.data().len(),
            res.0,
            res.1,
            res.2
        )
    }
}
