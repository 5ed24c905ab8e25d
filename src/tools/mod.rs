pub mod encoding;

// plain big-endian ints of up to 4 bytes (v2.2 and v2.3 frame sizes)
pub fn decode_int_be_u32(input: &[u8]) -> u32 {
    input
        .iter()
        .take(4)
        .fold(0u32, |acc, b| (acc << 8) | *b as u32)
}
