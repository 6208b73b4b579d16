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

//! Scanline: the row-delta compressor backing Modes 1, 3 and 5.
//!
//! Exploits vertical coherence in already bit-packed rasters. Each row is
//! split into aligned 8-byte groups; the first row is emitted verbatim
//! behind an all-ones flag byte per group, and every later row is emitted
//! as a per-group changed-byte bitmask (MSB first) followed by only the
//! bytes that changed relative to the same group in the previous row.
//!
//! This implements the documented wire format of the reference encoder,
//! not its flag-byte bug (see `DESIGN.md`): bit `i` of a flag byte (MSB =
//! bit 7) is 1 iff byte `i` of that group differs from the previous row.

use bytes::{BufMut, BytesMut};

use crate::error::EbdError;

/// Compresses `data` (already bit-packed rows) with Scanline, one row of
/// `row_stride` bytes at a time.
///
/// The final row may be shorter than `row_stride` if `data.len()` is not a
/// multiple of it; per the wire contract, only the positions within the
/// short row are compared against the (longer) previous row.
///
/// # Errors
///
/// Returns [`EbdError::InvalidParameter`] if `row_stride` is zero.
pub fn compress(data: &[u8], row_stride: usize) -> Result<Vec<u8>, EbdError> {
    if row_stride == 0 {
        return Err(EbdError::InvalidParameter {
            detail: "Scanline row_stride must be nonzero".to_string(),
        });
    }

    let mut out = BytesMut::with_capacity(data.len() + data.len() / 4 + 8);
    let mut prev_row: Option<&[u8]> = None;

    for row in data.chunks(row_stride) {
        match prev_row {
            None => compress_first_row(row, &mut out),
            Some(prev) => compress_row(row, prev, &mut out)?,
        }
        prev_row = Some(row);
    }

    Ok(out.to_vec())
}

/// Compresses a single row, given its predecessor (or `None` for the first
/// row of the raster). Exposed for callers that interleave Scanline with
/// other per-row work instead of handing over the whole raster at once.
pub fn compress_row_pair(row: &[u8], prev_row: Option<&[u8]>) -> Result<Vec<u8>, EbdError> {
    let mut out = BytesMut::new();
    match prev_row {
        None => compress_first_row(row, &mut out),
        Some(prev) => compress_row(row, prev, &mut out)?,
    }
    Ok(out.to_vec())
}

fn compress_first_row(row: &[u8], out: &mut BytesMut) {
    for group in row.chunks(8) {
        if group.len() == 8 {
            out.put_u8(0xFF);
        } else {
            out.put_u8((0xFFu8 << (8 - group.len())) & 0xFF);
        }
        out.put_slice(group);
    }
}

fn compress_row(row: &[u8], prev_row: &[u8], out: &mut BytesMut) -> Result<(), EbdError> {
    let mut offset = 0;
    while offset < row.len() {
        let group = &row[offset..(offset + 8).min(row.len())];
        let prev_group = &prev_row[offset..(offset + group.len()).min(prev_row.len())];

        let mut flags: u16 = 0;
        let mut changed = BytesMut::with_capacity(group.len());
        for (i, &byte) in group.iter().enumerate() {
            let prev_byte = prev_group.get(i).copied();
            if prev_byte != Some(byte) {
                // Bit position is always measured from the byte's MSB
                // (bit 7), even for a trailing short group — a k-byte
                // group's flags occupy the top k bits, matching the first
                // row's `0xFF << (8 - k)` convention.
                flags |= 1 << (7 - i);
                changed.put_u8(byte);
            }
        }

        if flags >= 0x100 {
            return Err(EbdError::InternalInvariant {
                detail: format!("Scanline flag byte {flags:#x} exceeds 0xFF"),
            });
        }

        out.put_u8(flags as u8);
        out.extend_from_slice(&changed);
        offset += group.len();
    }
    Ok(())
}
