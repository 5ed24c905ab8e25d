use crate::Error;

/// Decodes a bit-padded integer: every byte contributes its low `bits` bits,
/// most significant byte first. `bits = 7` is the ID3 sync-safe encoding,
/// `bits = 8` degenerates to plain big-endian, and wider values read as 8.
pub fn decode_synch_int(input: &[u8], bits: u32) -> u64 {
    let bits = bits.min(8);
    let mask = (0xFFu16 >> (8 - bits)) as u8;
    input
        .iter()
        .fold(0u64, |acc, b| acc.checked_shl(bits).unwrap_or(0) | (b & mask) as u64)
}

/// Inverse of [`decode_synch_int`], padded to `width` bytes.
pub fn encode_synch_int(input: u64, bits: u32, width: usize) -> Result<Vec<u8>, Error> {
    if bits == 0 || bits > 8 {
        return Err(Error::InvalidArgument("bits per byte must be 1 to 8"));
    }
    let mask = (1u64 << bits) - 1;
    if width < 8 && input >> (bits as usize * width) != 0 {
        return Err(Error::InvalidArgument("value too wide for bit-padded int"));
    }
    Ok((0..width)
        .rev()
        .map(|i| (input.checked_shr(bits * i as u32).unwrap_or(0) & mask) as u8)
        .collect())
}

/// Removes unsynchronization stuffing: the `00` after every `FF` is dropped.
/// `FF` followed by a byte with its top three bits set, or a trailing `FF`,
/// can never appear in unsynchronized data and is rejected.
pub fn undo_unsynch(input: &[u8]) -> Result<Vec<u8>, Error> {
    let mut vec = Vec::with_capacity(input.len());
    let mut safe = true;
    for (i, &b) in input.iter().enumerate() {
        if safe {
            vec.push(b);
            safe = b != 0xFF;
        } else {
            if b >= 0xE0 {
                return Err(Error::SyncError(i));
            }
            if b != 0x00 {
                vec.push(b);
            }
            safe = true;
        }
    }
    if !safe {
        return Err(Error::SyncError(input.len()));
    }
    Ok(vec)
}

/// Applies unsynchronization: a `00` goes after every `FF` that is followed by
/// `00` or a byte >= `E0`, and after a trailing `FF`.
pub fn apply_unsynch(input: &[u8]) -> Vec<u8> {
    let mut vec = Vec::with_capacity(input.len() + input.len() / 8);
    let mut safe = true;
    for &b in input {
        if !safe && (b == 0x00 || b >= 0xE0) {
            vec.push(0x00);
        }
        vec.push(b);
        safe = b != 0xFF;
    }
    if !safe {
        vec.push(0x00);
    }
    vec
}

pub fn is_valid_frame_id(input: &[u8]) -> bool {
    !input.is_empty()
        && input
            .iter()
            .all(|c| (*c >= b'A' && *c <= b'Z') || (*c >= b'0' && *c <= b'9'))
}
