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

//! Mode 9: the 2D lookback+RLE compressor for 8-bit paletted color.
//!
//! Each row is encoded left to right, alternating literal palette bytes
//! with control tokens. At every position the encoder compares four
//! candidate match lengths — a horizontal run of the current pixel, and
//! three lookbacks into the previous row at column offsets `-1`, `0`, `+1`
//! — and emits whichever compresses the most, breaking ties
//! `rle > lb(-1) > lb(0) > lb(+1)` (the first candidate reaching the
//! maximum wins, checked in that order). A raw run of exactly 2 is never
//! emitted as RLE: the smallest RLE opcode already covers a run of 3.

use bytes::{BufMut, BytesMut};

use crate::control_codes::ControlCode;
use crate::palette::PALETTE_LEN;

/// Compresses a full palette-indexed raster (row-major, one byte per
/// pixel) with Mode 9, given its width.
///
/// `pixels.len()` need not be an exact multiple of `width`; a short final
/// row is compressed like any other, just shorter.
#[must_use]
pub fn compress(pixels: &[u8], width: usize) -> Vec<u8> {
    if width == 0 || pixels.is_empty() {
        return Vec::new();
    }

    let mut out = BytesMut::with_capacity(pixels.len());
    let mut prev_row: Option<&[u8]> = None;

    for row in pixels.chunks(width) {
        compress_row(row, prev_row, &mut out);
        prev_row = Some(row);
    }

    out.to_vec()
}

/// Remaps a literal pixel value onto the palette alphabet. Values already
/// in `0..=230` pass through unchanged (this is an encoder-invariant
/// property of properly quantized input); anything else — which should
/// never occur once the upstream quantizer has run — falls back to `0`,
/// matching the reference encoder's defensive fallback.
fn as_literal(pixel: u8) -> u8 {
    if (pixel as usize) < PALETTE_LEN {
        pixel
    } else {
        0
    }
}

fn compress_row(row: &[u8], prev_row: Option<&[u8]>, out: &mut BytesMut) {
    let mut i = 0;
    while i < row.len() {
        // Runs of exactly 2 can't be represented: the smallest RLE opcode
        // (RLE_2) covers a run total of 3 (the literal plus 2 more). Treat
        // a raw match of 2 as no match at all rather than as an unemittable
        // candidate.
        let rle_len = match rle_match_len(row, i) {
            2 => 0,
            n => n,
        };
        let (la, lb, lc) = match prev_row {
            Some(prev) => (
                lookback_match_len(row, prev, i, -1),
                lookback_match_len(row, prev, i, 0),
                lookback_match_len_guarded(row, prev, i, 1),
            ),
            None => (0, 0, 0),
        };

        // Priority order on ties: rle > lb(-1) > lb(0) > lb(+1). Strict `>`
        // comparisons, checked in priority order, so the earliest candidate
        // keeps the win on a tie.
        let mut winner = "rle";
        let mut best_len = rle_len;
        if la > best_len {
            winner = "lb_-1";
            best_len = la;
        }
        if lb > best_len {
            winner = "lb_0";
            best_len = lb;
        }
        if lc > best_len {
            winner = "lb_1";
            best_len = lc;
        }

        if best_len == 0 {
            out.put_u8(as_literal(row[i]));
            i += 1;
            continue;
        }

        match winner {
            "rle" => {
                out.put_u8(as_literal(row[i]));
                emit_rle(out, rle_len);
                i += rle_len;
            }
            "lb_-1" => {
                emit_copy(out, la, -1);
                i += la;
            }
            "lb_0" => {
                emit_copy(out, lb, 0);
                i += lb;
            }
            _ => {
                emit_copy(out, lc, 1);
                i += lc;
            }
        }
    }
}

/// Emits an RLE token for a measured run of `run_total` pixels (the literal
/// already written, plus the repeats this token covers). `RLE_n` covers a
/// run total of `n + 1`, so the opcode parameter is `run_total - 1`, not
/// `run_total` itself — the run-length counter includes the literal's own
/// position, the opcode doesn't.
fn emit_rle(out: &mut BytesMut, run_total: usize) {
    let n = run_total - 1;
    if n <= 5 {
        out.put_u8(ControlCode::Rle(n as u8).to_byte());
    } else {
        out.put_u8(ControlCode::Rle(6).to_byte());
        out.put_u8((n - 6) as u8);
    }
}

fn emit_copy(out: &mut BytesMut, len: usize, offset: i8) {
    if len >= 6 {
        out.put_u8(ControlCode::Copy { len: 6, offset }.to_byte());
        out.put_u8((len - 6) as u8);
    } else {
        out.put_u8(
            ControlCode::Copy {
                len: len as u8,
                offset,
            }
            .to_byte(),
        );
    }
}

/// Length of the run of `row[i]` starting at `i`, or 0 if there's no run
/// (either `i` is the last column, or `row[i+1] != row[i]`).
fn rle_match_len(row: &[u8], i: usize) -> usize {
    if i + 1 >= row.len() || row[i + 1] != row[i] {
        return 0;
    }
    let pixel = row[i];
    let mut len = 0;
    while i + len < row.len() && row[i + len] == pixel {
        len += 1;
    }
    len
}

/// Longest prefix match between `row[i..]` and `prev[(i as isize + offset)..]`,
/// stopping at either sequence's end. `offset` is `-1` or `0`.
fn lookback_match_len(row: &[u8], prev: &[u8], i: usize, offset: isize) -> usize {
    let mut len = 0usize;
    loop {
        let cur_idx = i + len;
        if cur_idx >= row.len() {
            break;
        }
        let prev_idx = i as isize + offset + len as isize;
        if prev_idx < 0 || prev_idx as usize >= prev.len() {
            break;
        }
        if row[cur_idx] != prev[prev_idx as usize] {
            break;
        }
        len += 1;
    }
    len
}

/// Same as [`lookback_match_len`] for offset `+1`, with the one-sided guard
/// spec.md calls out: the scan stops as soon as `(i+1)+k` would exceed the
/// row, even though `prev` itself may still have data there.
fn lookback_match_len_guarded(row: &[u8], prev: &[u8], i: usize, offset: isize) -> usize {
    let mut len = 0usize;
    loop {
        let cur_idx = i + len;
        if cur_idx >= row.len() {
            break;
        }
        let prev_idx = i + 1 + len;
        if prev_idx >= row.len() || prev_idx >= prev.len() {
            break;
        }
        if row[cur_idx] != prev[prev_idx] {
            break;
        }
        len += 1;
    }
    let _ = offset;
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_rle_first_row_matches_spec_example() {
        // S5: [5,5,5,5,5,5,5,5] first row -> literal 5, RLE_6, 0x01
        let row = [5u8; 8];
        let encoded = compress(&row, 8);
        assert_eq!(
            encoded,
            vec![5, ControlCode::Rle(6).to_byte(), 1],
            "run of 7 extra after the literal encodes as RLE_6 + (7-6)"
        );
    }

    #[test]
    fn lookback_offset_zero_matches_spec_example() {
        // S6: prev [3,4,5,6,7], cur [3,4,5,6,7] -> COPY_5_OFFSET_0
        let mut pixels = Vec::new();
        pixels.extend_from_slice(&[3u8, 4, 5, 6, 7]);
        pixels.extend_from_slice(&[3u8, 4, 5, 6, 7]);
        let encoded = compress(&pixels, 5);
        // first row: all literals (no prior row, no internal repeats)
        assert_eq!(&encoded[0..5], &[3, 4, 5, 6, 7]);
        assert_eq!(
            encoded[5],
            ControlCode::Copy { len: 5, offset: 0 }.to_byte()
        );
        assert_eq!(encoded.len(), 6);
    }

    #[test]
    fn tie_break_prefers_rle_over_lookback_minus_one() {
        // At column 1 of the second row, the horizontal run of `7`
        // (length 4: cur[1..5] = [7,7,7,7]) and the offset-(-1) lookback
        // into the previous row (also length 4: cur[1..5] vs prev[0..4],
        // both [7,7,7,7]) tie. Per the documented priority, RLE must win.
        let prev = [7u8, 7, 7, 7, 2, 9];
        let cur = [0u8, 7, 7, 7, 7, 9];
        let mut pixels = Vec::new();
        pixels.extend_from_slice(&prev);
        pixels.extend_from_slice(&cur);
        let encoded = compress(&pixels, 6);

        // First row: literal 7, RLE covering the remaining 3 (run total 4,
        // n = 3), then two literals for the tail.
        let rle3 = ControlCode::Rle(3).to_byte();
        let first_row = vec![7u8, rle3, 2, 9];
        assert_eq!(&encoded[0..4], &first_row[..]);

        // Second row: literal 0, then the tie at column 1 resolved to RLE
        // (not COPY_4_OFFSET_-1), then a single COPY_1_OFFSET_0 for the
        // trailing `9`.
        let copy1_0 = ControlCode::Copy { len: 1, offset: 0 }.to_byte();
        let second_row = vec![0u8, 7, rle3, copy1_0];
        assert_eq!(&encoded[4..8], &second_row[..]);
        assert_eq!(encoded.len(), 8);
    }

    #[test]
    fn single_color_image_compresses_to_one_rle_token_per_row() {
        // W=8,H=3, all color 5. Every row's horizontal run (8) ties with
        // the vertical lookback (8) on rows 1 and 2; RLE wins every tie,
        // so every row encodes identically: literal + RLE_6 + len byte.
        let width = 8;
        let height = 3;
        let pixels = vec![5u8; width * height];
        let encoded = compress(&pixels, width);
        let row_token = [5u8, ControlCode::Rle(6).to_byte(), 1];
        assert_eq!(&encoded[0..3], &row_token);
        assert_eq!(&encoded[3..6], &row_token);
        assert_eq!(&encoded[6..9], &row_token);
        assert_eq!(encoded.len(), 9);
    }

    #[test]
    fn literal_out_of_palette_range_falls_back_to_zero() {
        assert_eq!(as_literal(250), 0);
        assert_eq!(as_literal(230), 230);
    }

    #[test]
    fn empty_and_zero_width_are_empty_output() {
        assert!(compress(&[], 4).is_empty());
        assert!(compress(&[1, 2, 3], 0).is_empty());
    }
}
