//! Byte-order-mark recognition.
//!
//! Only the first four bytes of the very first chunk are ever inspected, and
//! only when that chunk is longer than three bytes.

/// Known byte-order marks, in match order.
///
/// Longer patterns precede the shorter patterns they extend, so `FF FE 00 00`
/// resolves to UTF-32LE before `FF FE` can claim UTF-16LE.
pub const BOM_TABLE: [(&[u8], &str); 7] = [
    (&[0xEF, 0xBB, 0xBF], "UTF-8"),
    // UCS-4, unusual octet order (3412)
    (&[0xFE, 0xFF, 0x00, 0x00], "X-ISO-10646-UCS-4-3412"),
    (&[0xFE, 0xFF], "UTF-16BE"),
    (&[0x00, 0x00, 0xFE, 0xFF], "UTF-32BE"),
    // UCS-4, unusual octet order (2143)
    (&[0x00, 0x00, 0xFF, 0xFE], "X-ISO-10646-UCS-4-2143"),
    (&[0xFF, 0xFE, 0x00, 0x00], "UTF-32LE"),
    (&[0xFF, 0xFE], "UTF-16LE"),
];

/// Minimum first-chunk length, exclusive, for the BOM check to run.
const MIN_CHUNK_LEN: usize = 3;

/// Match the start of the first chunk against the BOM table.
///
/// Returns `None` for chunks of three bytes or fewer, even if they carry a
/// complete two- or three-byte mark.
pub fn sniff_bom(chunk: &[u8]) -> Option<&'static str> {
    if chunk.len() <= MIN_CHUNK_LEN {
        return None;
    }

    BOM_TABLE
        .iter()
        .find(|(pattern, _)| chunk.starts_with(pattern))
        .map(|&(_, label)| label)
}
