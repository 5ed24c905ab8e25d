use std::fmt;

use crate::id3v2::tools::decode_synch_int;
use crate::tools::decode_int_be_u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub sub: u8,
}

impl Version {
    pub const V11: Version = Version::new(1, 1);
    pub const V22: Version = Version::new(2, 2);
    pub const V23: Version = Version::new(2, 3);
    pub const V24: Version = Version::new(2, 4);

    pub const fn new(major: u8, minor: u8) -> Version {
        Version {
            major,
            minor,
            sub: 0,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.sub)
    }
}

// tag header flags, %abcd0000
pub const FLAG_UNSYNCH: u8 = 0x80;
pub const FLAG_EXTENDED: u8 = 0x40;
pub const FLAG_EXPERIMENTAL: u8 = 0x20;
pub const FLAG_FOOTER: u8 = 0x10;

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    // footer is essentially the same as the header
    pub version: Version,
    pub flags: u8,
    /// bytes of tag data after the 10 byte header, extended header included
    pub size: u32,

    pub extended_header: Option<ExtendedHeader>,
}

impl Header {
    pub fn is_unsynchronized(&self) -> bool {
        self.flags & FLAG_UNSYNCH != 0
    }
    pub fn has_extended_header(&self) -> bool {
        self.flags & FLAG_EXTENDED != 0
    }
    pub fn is_experimental(&self) -> bool {
        self.flags & FLAG_EXPERIMENTAL != 0
    }
    pub fn has_footer(&self) -> bool {
        self.flags & FLAG_FOOTER != 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedHeader {
    pub version: Version,
    /// the data length, without the size field itself
    pub size: u32,
    pub data: Vec<u8>,
}

impl ExtendedHeader {
    // v2.4 flag bytes follow a count byte, each flag then carries
    // a length-prefixed payload in flag order
    fn v24_flag_data(&self, flag: u8) -> Option<&[u8]> {
        let flags = *self.data.get(1)?;
        if flags & flag == 0 {
            return None;
        }
        let mut pos = 1 + self.data.first().copied()? as usize;
        for f in &[0x40u8, 0x20, 0x10] {
            if flags & f == 0 {
                continue;
            }
            let len = *self.data.get(pos)? as usize;
            let payload = self.data.get(pos + 1..pos + 1 + len)?;
            if *f == flag {
                return Some(payload);
            }
            pos += 1 + len;
        }
        None
    }

    pub fn is_update(&self) -> bool {
        if self.version >= Version::V24 {
            self.v24_flag_data(0x40).is_some()
        } else {
            false
        }
    }

    pub fn crc32(&self) -> Option<u32> {
        if self.version >= Version::V24 {
            // 35 bits in 5 sync-safe bytes, only 32 of them used
            self.v24_flag_data(0x20)
                .map(|d| decode_synch_int(d, 7) as u32)
        } else {
            // %x0000000 00000000, padding size, then the CRC
            if self.data.first()? & 0x80 == 0 {
                return None;
            }
            self.data.get(6..10).map(decode_int_be_u32)
        }
    }

    pub fn restrictions(&self) -> Option<u8> {
        if self.version >= Version::V24 {
            self.v24_flag_data(0x10)?.first().copied()
        } else {
            None
        }
    }
}

// frame format flags; v2.3 and v2.4 disagree on every bit
pub const FLAG23_COMPRESS: u16 = 0x0080;
pub const FLAG23_ENCRYPT: u16 = 0x0040;
pub const FLAG23_GROUP: u16 = 0x0020;

pub const FLAG24_GROUP: u16 = 0x0040;
pub const FLAG24_COMPRESS: u16 = 0x0008;
pub const FLAG24_ENCRYPT: u16 = 0x0004;
pub const FLAG24_UNSYNCH: u16 = 0x0002;
pub const FLAG24_DATALEN: u16 = 0x0001;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameHeader {
    pub name: String,
    pub size: u32,
    pub flags: u16,
}
