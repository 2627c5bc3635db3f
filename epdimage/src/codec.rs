use crate::palette::{ColorIndex, Palette, Rgb};

/// Pixels packed into each byte of a frame buffer.
pub const PIXELS_PER_BYTE: usize = 4;

/// Bit offsets of the four 2-bit fields, most significant first.
const SHIFTS: [u32; PIXELS_PER_BYTE] = [6, 4, 2, 0];

/// Split one byte into its four color indices, high bits first.
#[inline]
pub fn unpack_byte(byte: u8) -> [ColorIndex; PIXELS_PER_BYTE] {
    SHIFTS.map(|shift| (byte >> shift) & 0b11)
}

/// Iterate the color indices of `bytes` in buffer order.
pub fn decode_iter(bytes: &[u8]) -> impl Iterator<Item = ColorIndex> + '_ {
    bytes.iter().flat_map(|&b| unpack_byte(b))
}

/// Unpack a frame buffer into a flat sequence of color indices.
///
/// The output always holds exactly `4 * bytes.len()` entries.
pub fn decode(bytes: &[u8]) -> Vec<ColorIndex> {
    let mut out = Vec::with_capacity(bytes.len() * PIXELS_PER_BYTE);
    out.extend(decode_iter(bytes));
    log::debug!("decoded {} bytes into {} indices", bytes.len(), out.len());
    out
}

/// Pack color indices back into frame buffer bytes.
///
/// Only the low two bits of each index are kept. A trailing partial byte is
/// filled with `pad` indices.
pub fn encode(indices: &[ColorIndex], pad: ColorIndex) -> Vec<u8> {
    indices
        .chunks(PIXELS_PER_BYTE)
        .map(|chunk| {
            SHIFTS.iter().enumerate().fold(0u8, |byte, (i, &shift)| {
                let idx = chunk.get(i).copied().unwrap_or(pad) & 0b11;
                byte | (idx << shift)
            })
        })
        .collect()
}

/// Map a sequence of indices through a palette.
pub fn to_rgb(indices: &[ColorIndex], palette: &Palette) -> Vec<Rgb> {
    indices.iter().map(|&i| palette.lookup(i)).collect()
}
