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

//! EBD ("Embedded Bitmap Data") image pipeline for a legacy-handheld web
//! proxy.
//!
//! This crate implements the image half of a proxy that lets an obsolete
//! handheld browser view the modern web: palette quantization, bit-packing
//! of black-and-white/grayscale rasters, and the two lossless compressors
//! — Scanline (row-delta) and Mode 9 (lookback+RLE) — that together define
//! a bit-exact wire format the target device decodes in ROM.
//!
//! The HTTP front-end, upstream fetching, and HTML rewriting that make up
//! the rest of the proxy are out of scope here; this crate consumes only a
//! decoded raster and a requested [`EbdMode`].

#![deny(missing_docs)]
#![warn(clippy::pedantic)]

mod bitpack;
mod control_codes;
mod encoder;
mod error;
mod image_ext;
mod mode9;
mod normalize;
mod palette;
mod scanline;

pub use control_codes::ControlCode;
pub use encoder::{EbdEncoder, EncodeOptions};
pub use error::EbdError;
pub use image_ext::EbdImage;
pub use palette::{palette_entries, PALETTE_LEN, UNKNOWN_COLOR_INDEX};

use std::fmt;

/// One of the eight EBD wire modes this crate can produce.
///
/// Each variant names its bit depth, color model and compression so callers
/// don't need to remember the numeric wire value; [`EbdMode::wire_value`]
/// and [`EbdMode::try_from_wire`] convert to and from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EbdMode {
    /// Mode 0: 1-bit black & white, uncompressed.
    Bw,
    /// Mode 1: 1-bit black & white, Scanline-compressed.
    BwCompressed,
    /// Mode 2: 2-bit grayscale, uncompressed.
    Gray2,
    /// Mode 3: 2-bit grayscale, Scanline-compressed.
    Gray2Compressed,
    /// Mode 4: 4-bit grayscale, uncompressed.
    Gray4,
    /// Mode 5: 4-bit grayscale, Scanline-compressed.
    Gray4Compressed,
    /// Mode 8: 8-bit, 231-color palette, uncompressed.
    Palette,
    /// Mode 9: 8-bit, 231-color palette, lookback+RLE compressed.
    PaletteCompressed,
}

impl EbdMode {
    /// The numeric wire value the device expects in `MODE="..."`.
    #[must_use]
    pub fn wire_value(self) -> u8 {
        match self {
            EbdMode::Bw => 0,
            EbdMode::BwCompressed => 1,
            EbdMode::Gray2 => 2,
            EbdMode::Gray2Compressed => 3,
            EbdMode::Gray4 => 4,
            EbdMode::Gray4Compressed => 5,
            EbdMode::Palette => 8,
            EbdMode::PaletteCompressed => 9,
        }
    }

    /// Recovers an [`EbdMode`] from its numeric wire value.
    ///
    /// # Errors
    ///
    /// Returns [`EbdError::InvalidParameter`] for any value outside
    /// `{0,1,2,3,4,5,8,9}`.
    pub fn try_from_wire(value: u8) -> Result<Self, EbdError> {
        match value {
            0 => Ok(EbdMode::Bw),
            1 => Ok(EbdMode::BwCompressed),
            2 => Ok(EbdMode::Gray2),
            3 => Ok(EbdMode::Gray2Compressed),
            4 => Ok(EbdMode::Gray4),
            5 => Ok(EbdMode::Gray4Compressed),
            8 => Ok(EbdMode::Palette),
            9 => Ok(EbdMode::PaletteCompressed),
            other => Err(EbdError::InvalidParameter {
                detail: format!("unsupported EBD mode {other}"),
            }),
        }
    }

    /// Whether this mode is Scanline/Mode-9 compressed.
    #[must_use]
    pub fn is_compressed(self) -> bool {
        matches!(
            self,
            EbdMode::BwCompressed
                | EbdMode::Gray2Compressed
                | EbdMode::Gray4Compressed
                | EbdMode::PaletteCompressed
        )
    }
}

impl fmt::Display for EbdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mode {}", self.wire_value())
    }
}
