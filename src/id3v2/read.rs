use std::io::Read;

use flate2::read::ZlibDecoder;
use tracing::{debug, warn};

use crate::id3v2::frame::Frame;
use crate::id3v2::frames::{self, FrameKind};
use crate::id3v2::structure::*;
use crate::id3v2::tools::*;
use crate::source::ByteSource;
use crate::tools::decode_int_be_u32;
use crate::Error;

pub const HEADER_LEN: u64 = 10;

pub fn header<S: ByteSource>(source: &mut S) -> Result<Header, Error> {
    // ID3v2/file identifier      "ID3"
    // ID3v2 version              $0X 00
    // ID3v2 flags                %abcd0000
    // ID3v2 size             4 * %0xxxxxxx
    let arr = source.read_at(0, HEADER_LEN as usize)?;

    if &arr[0..3] != b"ID3" {
        return Err(Error::NotFound("ID3v2 header not found".to_string()));
    }

    let version = Version {
        major: 2,
        minor: arr[3],
        sub: arr[4],
    };
    if version.minor < 2 || version.minor > 4 {
        return Err(Error::UnsupportedVersion(version.minor));
    }

    let mut header = Header {
        version,
        flags: arr[5],
        size: decode_synch_int(&arr[6..10], 7) as u32,
        extended_header: None,
    };

    let known = match version.minor {
        2 => FLAG_UNSYNCH,
        3 => FLAG_UNSYNCH | FLAG_EXTENDED | FLAG_EXPERIMENTAL,
        _ => FLAG_UNSYNCH | FLAG_EXTENDED | FLAG_EXPERIMENTAL | FLAG_FOOTER,
    };
    if header.flags & !known != 0 {
        warn!(version = %version, flags = header.flags, "unsupported ID3v2 header flags");
    }

    if header.has_extended_header() && version >= Version::V23 {
        header.extended_header = Some(extended_header(source, &mut header)?);
    }

    Ok(header)
}

fn extended_header<S: ByteSource>(
    source: &mut S,
    header: &mut Header,
) -> Result<ExtendedHeader, Error> {
    let size_bytes = source.read_at(HEADER_LEN, 4)?;

    // some writers set the extended header flag without writing one,
    // so the "size" is really the first frame id
    if frames::is_known_id(&size_bytes) {
        debug!("extended header flag set, but a frame follows the header");
        header.flags &= !FLAG_EXTENDED;
        return Ok(ExtendedHeader {
            version: header.version,
            size: 0,
            data: Vec::new(),
        });
    }

    let size = if header.version >= Version::V24 {
        // v2.4 counts the size field itself
        (decode_synch_int(&size_bytes, 7) as u32).saturating_sub(4)
    } else {
        decode_int_be_u32(&size_bytes)
    };
    let data = source.read_at(HEADER_LEN + 4, size as usize)?;

    Ok(ExtendedHeader {
        version: header.version,
        size,
        data,
    })
}

/// Where the frames of a tag start, and how many bytes they may span.
pub fn body_range(header: &Header) -> (u64, usize) {
    let extended = match header.extended_header {
        Some(ref ext) if header.has_extended_header() => 4 + ext.data.len(),
        _ => 0,
    };
    let len = (header.size as usize).saturating_sub(extended);
    (HEADER_LEN + extended as u64, len)
}

fn inflate(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut vec = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut vec)
        .map_err(|e| Error::Decompression(e.to_string()))?;
    Ok(vec)
}

fn strip<'a>(data: &'a [u8], n: usize) -> Result<(&'a [u8], &'a [u8]), Error> {
    if data.len() < n {
        return Err(Error::InsufficientData {
            needed: n,
            available: data.len(),
        });
    }
    Ok(data.split_at(n))
}

/// Turns the payload of one frame into a decoded frame, undoing whatever the
/// frame flags say was done to it.
///
/// For v2.2 and v2.3 the tag-wide unsynchronization has already been undone
/// over the whole body, so `tag_flags` only matters for v2.4.
pub fn load_frame(
    kind: &'static FrameKind,
    version: Version,
    tag_flags: u8,
    frame_flags: u16,
    data: &[u8],
) -> Result<Frame, Error> {
    if version >= Version::V24 {
        let mut data = data;
        if frame_flags & FLAG24_GROUP != 0 {
            data = strip(data, 1)?.1;
        }
        let mut datalen: &[u8] = &[];
        if frame_flags & (FLAG24_COMPRESS | FLAG24_DATALEN) != 0 {
            let (d, rest) = strip(data, 4)?;
            datalen = d;
            data = rest;
        }
        let unsynched;
        if frame_flags & FLAG24_UNSYNCH != 0 || tag_flags & FLAG_UNSYNCH != 0 {
            unsynched = undo_unsynch(data)?;
            data = &unsynched;
        }
        if frame_flags & FLAG24_ENCRYPT != 0 {
            return Err(Error::Encrypted);
        }
        if frame_flags & FLAG24_COMPRESS != 0 {
            let inflated = match inflate(data) {
                Ok(v) => v,
                Err(_) => {
                    // early writers left the data length out of the
                    // compressed frames, so those four bytes are zlib data
                    debug!(frame = kind.id, "retrying inflate with the data length bytes");
                    let mut vec = datalen.to_vec();
                    vec.extend_from_slice(data);
                    inflate(&vec)?
                }
            };
            return Frame::decode(kind, &inflated);
        }
        Frame::decode(kind, data)
    } else if version >= Version::V23 {
        let mut data = data;
        if frame_flags & FLAG23_COMPRESS != 0 {
            // decompressed size, plain big endian
            data = strip(data, 4)?.1;
        }
        if frame_flags & FLAG23_ENCRYPT != 0 {
            return Err(Error::Encrypted);
        }
        if frame_flags & FLAG23_GROUP != 0 {
            data = strip(data, 1)?.1;
        }
        if frame_flags & FLAG23_COMPRESS != 0 {
            return Frame::decode(kind, &inflate(data)?);
        }
        Frame::decode(kind, data)
    } else {
        Frame::decode(kind, data)
    }
}

fn walk_sizes(data: &[u8], bits: u32) -> (usize, i64) {
    let mut pos = 0;
    let mut found = 0;
    while pos + 10 < data.len() {
        let part = &data[pos..pos + 10];
        if part.iter().all(|b| *b == 0) {
            return (found, -(((data.len() - pos) % 10) as i64));
        }
        pos += 10 + decode_synch_int(&part[4..8], bits) as usize;
        if frames::is_known_id(&part[0..4]) {
            found += 1;
        }
    }
    (found, pos as i64 - data.len() as i64)
}

/// Bits per byte of v2.4 frame sizes in `data`. iTunes wrote plain integers,
/// so both readings are tried and the one that finds more frames wins.
pub fn size_bits(data: &[u8]) -> u32 {
    let (as_synch, synch_off) = walk_sizes(data, 7);
    let (as_int, int_off) = walk_sizes(data, 8);
    if as_int > as_synch || (as_int == as_synch && synch_off >= 1 && int_off <= 1) {
        debug!("v2.4 frame sizes are not sync-safe");
        8
    } else {
        7
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReadFrame {
    Known(Frame),
    /// a whole frame record, header included, whose id no table knows
    Unknown(Vec<u8>),
}

/// Walks the frames of a tag body, one frame per call.
///
/// Frames that fail to decode are dropped and the walk goes on; it stops at
/// padding, or at a frame that claims more bytes than are left.
pub struct FrameReader<'a> {
    version: Version,
    tag_flags: u8,
    data: &'a [u8],
    pos: usize,
    bits: u32,
}

impl<'a> FrameReader<'a> {
    pub fn new(version: Version, tag_flags: u8, data: &'a [u8]) -> FrameReader<'a> {
        let bits = if version >= Version::V24 {
            size_bits(data)
        } else {
            8
        };
        FrameReader {
            version,
            tag_flags,
            data,
            pos: 0,
            bits,
        }
    }

    fn frame_header(&self, raw: &[u8]) -> FrameHeader {
        if self.version.minor == 2 {
            // 3: Frame ID  $xx xx xx
            // 3: Size      $xx xx xx
            return FrameHeader {
                name: raw[0..3].iter().map(|c| *c as char).collect(),
                size: decode_int_be_u32(&raw[3..6]),
                flags: 0,
            };
        }
        // 4: Frame ID      $xx xx xx xx
        // 4: Size      4 * %0xxxxxxx in 2.4 / $xx in 2.3
        // 2: Flags         $xx xx
        FrameHeader {
            name: raw[0..4].iter().map(|c| *c as char).collect(),
            size: decode_synch_int(&raw[4..8], self.bits) as u32,
            flags: u16::from(raw[8]) << 8 | u16::from(raw[9]),
        }
    }
}

impl<'a> Iterator for FrameReader<'a> {
    type Item = ReadFrame;

    fn next(&mut self) -> Option<ReadFrame> {
        let (id_len, header_len) = if self.version.minor == 2 { (3, 6) } else { (4, 10) };
        loop {
            let raw = &self.data[self.pos..];
            if raw.len() < header_len {
                return None;
            }
            let id = &raw[..id_len];
            if id.iter().all(|b| *b == 0) {
                // padding
                return None;
            }

            let frame_header = self.frame_header(raw);
            let size = frame_header.size as usize;
            if size > raw.len() - header_len {
                debug!(
                    frame = %frame_header.name,
                    size,
                    left = raw.len() - header_len,
                    "frame runs past the end of the tag"
                );
                return None;
            }
            let record = &raw[..header_len + size];
            self.pos += header_len + size;

            if size == 0 || !is_valid_frame_id(id) {
                continue;
            }

            let kind = match frames::lookup(self.version, &frame_header.name) {
                Some(k) => k,
                None => {
                    debug!(frame = %frame_header.name, "keeping unknown frame as raw data");
                    return Some(ReadFrame::Unknown(record.to_vec()));
                }
            };
            let payload = &record[header_len..];
            match load_frame(kind, self.version, self.tag_flags, frame_header.flags, payload) {
                Ok(frame) => return Some(ReadFrame::Known(frame)),
                Err(Error::Encrypted) => {
                    debug!(frame = kind.id, "keeping encrypted frame as raw data");
                    return Some(ReadFrame::Unknown(record.to_vec()));
                }
                Err(e) => {
                    debug!(frame = kind.id, error = %e, "dropping frame");
                }
            }
        }
    }
}
