// Copyright 2025 Dustin McAfee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Quantization and bit-packing for Modes 0, 2, 4 and 8.
//!
//! All three grayscale depths share one convention: luminance is *inverted*
//! (`255 - L`) first, then quantized down to the mode's bit depth, so that
//! an all-zero packed byte renders as white on the device rather than black.
//! Inverting before quantizing (not after) matters once rounding is
//! involved — see [`pack_mode4`]. Rows are packed independently and MSB
//! first; a row whose pixel count isn't a multiple of the pixels-per-byte
//! is zero-padded in the low bits of its final byte.

use crate::palette::quantize_exact;

/// ITU-R BT.601 luma, the same coefficients PIL's `convert("L")` uses.
#[must_use]
pub fn luminance(pixel: (u8, u8, u8)) -> u8 {
    let (r, g, b) = pixel;
    let l = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    (l / 1000) as u8
}

/// Packs a row-major RGB raster into Mode 0 (1-bit, inverted, MSB-first).
///
/// Pixels at or above the mid-gray threshold (128) pack as `0`; darker
/// pixels pack as `1`. Each row occupies `ceil(width / 8)` bytes.
#[must_use]
pub fn pack_mode0(pixels: &[(u8, u8, u8)], width: usize) -> Vec<u8> {
    pack_rows(pixels, width, 1, |p| {
        u8::from(luminance(p) < 128)
    })
}

/// Packs a row-major RGB raster into Mode 2 (2-bit grayscale, inverted,
/// MSB-first). Each row occupies `ceil(width / 4)` bytes.
///
/// Inversion happens on the luminance value itself, before quantizing to a
/// 2-bit level — not the other way around. `floor` and complement-to-255
/// commute exactly here (`255 = 64*4 - 1`), but that's a coincidence of the
/// bit depth, not a general rule; see [`pack_mode4`], where they don't.
#[must_use]
pub fn pack_mode2(pixels: &[(u8, u8, u8)], width: usize) -> Vec<u8> {
    pack_rows(pixels, width, 2, |p| {
        let inverted = 255 - luminance(p);
        inverted >> 6
    })
}

/// Packs a row-major RGB raster into Mode 4 (4-bit grayscale, inverted,
/// MSB-first). Each row occupies `ceil(width / 2)` bytes.
///
/// Inversion happens on the luminance value itself, before rounding to a
/// 4-bit level. Rounding first and inverting the rounded level would give a
/// different (wrong) result near round-to-.5 boundaries. The rounding
/// itself is round-half-to-even (see [`rounded_div`]), not round-half-up.
#[must_use]
pub fn pack_mode4(pixels: &[(u8, u8, u8)], width: usize) -> Vec<u8> {
    pack_rows(pixels, width, 4, |p| {
        let inverted = 255 - luminance(p);
        rounded_div(u32::from(inverted), 16).min(15) as u8
    })
}

/// Packs a row-major RGB raster into Mode 8 (one palette byte per pixel, no
/// bit-packing). Misses against the palette map to
/// [`crate::palette::UNKNOWN_COLOR_INDEX`].
#[must_use]
pub fn pack_mode8(pixels: &[(u8, u8, u8)]) -> Vec<u8> {
    pixels.iter().copied().map(quantize_exact).collect()
}

/// Row stride, in bytes, a packed raster of the given `width` and
/// `bits`-per-pixel depth occupies.
#[must_use]
pub fn row_stride(width: usize, bits: u32) -> usize {
    let per_byte = 8 / bits as usize;
    width.div_ceil(per_byte)
}

/// Divides with round-half-to-even, matching Python's `round()` (the
/// reference converter's rounding rule), not round-half-up. The two only
/// differ at an exact `.5` remainder, where this rounds to whichever
/// neighbor is even.
fn rounded_div(numerator: u32, denominator: u32) -> u32 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    match (remainder * 2).cmp(&denominator) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient % 2 == 0 => quotient,
        std::cmp::Ordering::Equal => quotient + 1,
    }
}

fn pack_rows(
    pixels: &[(u8, u8, u8)],
    width: usize,
    bits: u32,
    quantize: impl Fn((u8, u8, u8)) -> u8,
) -> Vec<u8> {
    if width == 0 {
        return Vec::new();
    }
    let per_byte = 8 / bits as usize;
    let stride = row_stride(width, bits);
    let mut out = Vec::with_capacity(stride * pixels.len().div_ceil(width).max(1));

    for row in pixels.chunks(width) {
        let mut row_bytes = vec![0u8; stride];
        for (col, &pixel) in row.iter().enumerate() {
            let value = quantize(pixel);
            let byte_index = col / per_byte;
            let slot = col % per_byte;
            let shift = 8 - bits as usize * (slot + 1);
            row_bytes[byte_index] |= value << shift;
        }
        out.extend_from_slice(&row_bytes);
    }
    out
}
