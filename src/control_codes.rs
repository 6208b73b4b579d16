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

//! Mode 9 control opcodes.
//!
//! Opcodes occupy `231..=253`, disjoint from the literal palette bytes
//! `0..=230` (see [`crate::palette::PALETTE_LEN`]). `RLE_6` and
//! `COPY_6_OFFSET_*` are followed by one trailing length byte encoding
//! `extra - 6`; the other opcodes are self-contained.

/// First opcode value in the reserved control-code subrange.
const FIRST_OPCODE: u8 = 231;

/// A single Mode 9 control token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCode {
    /// `RLE_n` for `n` in `2..=6`: the preceding literal repeats.
    /// `n == 6` means "6 or more"; the real extra count follows as a byte.
    Rle(u8),
    /// `COPY_n_OFFSET_d`: reuse `n` pixels from the previous row at column
    /// offset `d` (`-1`, `0`, or `1`). `n == 6` means "6 or more"; the real
    /// length follows as a byte.
    Copy {
        /// Run length, `1..=6`.
        len: u8,
        /// Horizontal offset into the previous row: `-1`, `0`, or `1`.
        offset: i8,
    },
}

impl ControlCode {
    /// Encodes this token as its single opcode byte.
    ///
    /// # Panics
    ///
    /// Panics if `len`/`n` is outside `1..=6` (`2..=6` for [`Self::Rle`]) or
    /// `offset` is outside `{-1, 0, 1}` — these are programmer errors in
    /// the compressor, never caller input.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        let index = match self {
            ControlCode::Rle(n) => {
                assert!((2..=6).contains(&n), "RLE length out of range: {n}");
                n - 2
            }
            ControlCode::Copy { len, offset } => {
                assert!((1..=6).contains(&len), "copy length out of range: {len}");
                let offset_slot = match offset {
                    -1 => 0,
                    0 => 1,
                    1 => 2,
                    other => panic!("copy offset out of range: {other}"),
                };
                5 + offset_slot * 6 + (len - 1)
            }
        };
        FIRST_OPCODE + index
    }

    /// Decodes an opcode byte back into a [`ControlCode`], if it names one.
    ///
    /// Used only by tests and by documentation examples; the encoder itself
    /// never needs to decode its own output.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        if !(FIRST_OPCODE..=LAST_OPCODE).contains(&byte) {
            return None;
        }
        let index = byte - FIRST_OPCODE;
        Some(if index < 5 {
            ControlCode::Rle(index + 2)
        } else {
            let rest = index - 5;
            let offset_slot = rest / 6;
            let len = rest % 6 + 1;
            let offset = match offset_slot {
                0 => -1,
                1 => 0,
                2 => 1,
                _ => unreachable!(),
            };
            ControlCode::Copy { len, offset }
        })
    }
}

/// Last opcode value in the reserved control-code subrange.
pub const LAST_OPCODE: u8 = 253;
