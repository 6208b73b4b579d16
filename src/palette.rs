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

//! The fixed 231-entry color palette shared by Modes 8 and 9.
//!
//! Position in the table *is* the pixel code: `palette_entries()[i]` is the
//! RGB triple rendered by the device for code `i`. The exact RGB values of
//! the original device palette were not recoverable from the retrieved
//! reference material (see `DESIGN.md`); this is a deterministic stand-in
//! satisfying the wire contract (231 unique entries, index 230 doubling as
//! the "unknown color" sentinel). Quantizers are free to pick any such
//! table per the wire contract.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Number of entries in the palette.
pub const PALETTE_LEN: usize = 231;

/// Index of the reserved "unknown color" sentinel, `0xE6`.
///
/// This index is both a legitimate palette entry and the value a quantizer
/// falls back to when a pixel's RGB does not exactly match any palette
/// entry — the same overloading the reference encoder uses.
pub const UNKNOWN_COLOR_INDEX: u8 = 0xE6;

const CUBE_STEPS: [u8; 6] = [0, 51, 102, 153, 204, 255];
const GRAY_STEPS: [u8; 14] = [
    8, 25, 42, 59, 76, 93, 110, 127, 144, 161, 178, 195, 212, 229,
];
const SENTINEL: (u8, u8, u8) = (255, 0, 254);

fn build_palette() -> [(u8, u8, u8); PALETTE_LEN] {
    let mut entries = [(0u8, 0u8, 0u8); PALETTE_LEN];
    let mut i = 0;
    for &r in &CUBE_STEPS {
        for &g in &CUBE_STEPS {
            for &b in &CUBE_STEPS {
                entries[i] = (r, g, b);
                i += 1;
            }
        }
    }
    for &gray in &GRAY_STEPS {
        entries[i] = (gray, gray, gray);
        i += 1;
    }
    entries[i] = SENTINEL;
    i += 1;
    debug_assert_eq!(i, PALETTE_LEN);
    entries
}

static PALETTE: OnceLock<[(u8, u8, u8); PALETTE_LEN]> = OnceLock::new();

/// The 231-entry palette. Position is the pixel code.
#[must_use]
pub fn palette_entries() -> &'static [(u8, u8, u8); PALETTE_LEN] {
    PALETTE.get_or_init(build_palette)
}

static PALETTE_INDEX: OnceLock<HashMap<(u8, u8, u8), u8>> = OnceLock::new();

/// Exact-match palette lookup, built once from [`palette_entries`].
fn palette_index() -> &'static HashMap<(u8, u8, u8), u8> {
    PALETTE_INDEX.get_or_init(|| {
        palette_entries()
            .iter()
            .enumerate()
            .map(|(i, &rgb)| (rgb, i as u8))
            .collect()
    })
}

/// Maps an RGB pixel to its palette code.
///
/// Returns [`UNKNOWN_COLOR_INDEX`] if `pixel` is not an exact match for any
/// palette entry. This is the only quantization rule the wire format
/// requires; nearest-neighbor matching is deliberately not attempted here
/// because the reference encoder does not attempt it either (it relies on
/// the caller having already quantized the image onto this exact palette).
#[must_use]
pub fn quantize_exact(pixel: (u8, u8, u8)) -> u8 {
    palette_index()
        .get(&pixel)
        .copied()
        .unwrap_or(UNKNOWN_COLOR_INDEX)
}
