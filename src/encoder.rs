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

//! The encoder façade: the one entry point the rest of the proxy calls.

use image::DynamicImage;

#[cfg(feature = "debug-logging")]
use log::debug;

use crate::bitpack::{pack_mode0, pack_mode2, pack_mode4, pack_mode8, row_stride};
use crate::error::EbdError;
use crate::image_ext::EbdImage;
use crate::mode9;
use crate::normalize::normalize;
use crate::scanline;
use crate::EbdMode;

/// Per-call options accepted by [`EbdEncoder::encode`].
///
/// Everything here is plain data — there is no environment or config-file
/// surface; callers that want different behavior construct a different
/// `EncodeOptions`.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Skip the width/height resize step and encode the source's actual
    /// (already-composited) dimensions.
    pub disable_resize: bool,
}

/// Stateless façade over normalization, quantization, bit-packing and
/// compression.
///
/// Holds no state of its own; it exists so callers have a named type to
/// construct and pass around rather than calling free functions, matching
/// how the reference encoders in this corpus are invoked.
#[derive(Debug, Clone, Copy, Default)]
pub struct EbdEncoder;

impl EbdEncoder {
    /// Builds a new encoder. There is nothing to configure at construction
    /// time; per-call behavior lives in [`EncodeOptions`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Encodes `image` in `mode`, producing the wire bytes plus the
    /// dimensions they describe.
    ///
    /// # Errors
    ///
    /// Returns [`EbdError::InvalidImage`] if normalization fails, or
    /// [`EbdError::InternalInvariant`] if a compressor detects a
    /// wire-format violation in its own output.
    pub fn encode(
        &self,
        image: &DynamicImage,
        mode: EbdMode,
        opts: &EncodeOptions,
    ) -> Result<EbdImage, EbdError> {
        let raster = normalize(image, opts.disable_resize)?;
        let (width, height) = (raster.width(), raster.height());

        #[cfg(feature = "debug-logging")]
        debug!("encoding {width}x{height} raster in {mode}");

        let pixels: Vec<(u8, u8, u8)> = raster.pixels().map(|p| (p[0], p[1], p[2])).collect();
        let width_usize = width as usize;

        let bytes = match mode {
            EbdMode::Bw => pack_mode0(&pixels, width_usize),
            EbdMode::BwCompressed => {
                let packed = pack_mode0(&pixels, width_usize);
                scanline::compress(&packed, row_stride(width_usize, 1))?
            }
            EbdMode::Gray2 => pack_mode2(&pixels, width_usize),
            EbdMode::Gray2Compressed => {
                let packed = pack_mode2(&pixels, width_usize);
                scanline::compress(&packed, width_usize.div_ceil(2))?
            }
            EbdMode::Gray4 => pack_mode4(&pixels, width_usize),
            EbdMode::Gray4Compressed => {
                let packed = pack_mode4(&pixels, width_usize);
                scanline::compress(&packed, width_usize.div_ceil(4))?
            }
            EbdMode::Palette => pack_mode8(&pixels),
            EbdMode::PaletteCompressed => {
                let indices = pack_mode8(&pixels);
                mode9::compress(&indices, width_usize)
            }
        };

        Ok(EbdImage::new(bytes, width, height, mode))
    }

    /// Encodes `image` as 1-bit black & white, compressed or not.
    ///
    /// # Errors
    ///
    /// See [`Self::encode`].
    pub fn encode_bw(
        &self,
        image: &DynamicImage,
        compressed: bool,
        opts: &EncodeOptions,
    ) -> Result<EbdImage, EbdError> {
        let mode = if compressed {
            EbdMode::BwCompressed
        } else {
            EbdMode::Bw
        };
        self.encode(image, mode, opts)
    }

    /// Encodes `image` as grayscale at the given bit depth (`2` or `4`),
    /// compressed or not.
    ///
    /// # Errors
    ///
    /// Returns [`EbdError::InvalidParameter`] if `depth` is not `2` or `4`;
    /// see [`Self::encode`] for the other error cases.
    pub fn encode_grayscale(
        &self,
        image: &DynamicImage,
        depth: u8,
        compressed: bool,
        opts: &EncodeOptions,
    ) -> Result<EbdImage, EbdError> {
        let mode = match (depth, compressed) {
            (2, false) => EbdMode::Gray2,
            (2, true) => EbdMode::Gray2Compressed,
            (4, false) => EbdMode::Gray4,
            (4, true) => EbdMode::Gray4Compressed,
            (other, _) => {
                return Err(EbdError::InvalidParameter {
                    detail: format!("unsupported grayscale depth {other}; expected 2 or 4"),
                })
            }
        };
        self.encode(image, mode, opts)
    }

    /// Encodes `image` as 8-bit 231-color palette, compressed or not.
    ///
    /// # Errors
    ///
    /// See [`Self::encode`].
    pub fn encode_color(
        &self,
        image: &DynamicImage,
        compressed: bool,
        opts: &EncodeOptions,
    ) -> Result<EbdImage, EbdError> {
        let mode = if compressed {
            EbdMode::PaletteCompressed
        } else {
            EbdMode::Palette
        };
        self.encode(image, mode, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid_image(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
        let mut rgba = RgbaImage::new(width, height);
        for pixel in rgba.pixels_mut() {
            *pixel = Rgba(color);
        }
        DynamicImage::ImageRgba8(rgba)
    }

    #[test]
    fn encode_bw_uncompressed_matches_manual_pack() {
        let image = solid_image(8, 1, [0, 0, 0, 255]);
        let opts = EncodeOptions {
            disable_resize: true,
        };
        let encoded = EbdEncoder::new().encode_bw(&image, false, &opts).unwrap();
        assert_eq!(encoded.bytes(), &[0xFF]);
        assert_eq!(encoded.mode(), EbdMode::Bw);
    }

    #[test]
    fn encode_color_compressed_runs_mode9() {
        let image = solid_image(8, 1, [255, 255, 255, 255]);
        let opts = EncodeOptions {
            disable_resize: true,
        };
        let encoded = EbdEncoder::new()
            .encode_color(&image, true, &opts)
            .unwrap();
        assert_eq!(encoded.mode(), EbdMode::PaletteCompressed);
        assert!(!encoded.bytes().is_empty());
    }

    #[test]
    fn encode_grayscale_rejects_bad_depth() {
        let image = solid_image(4, 4, [10, 10, 10, 255]);
        let opts = EncodeOptions::default();
        let err = EbdEncoder::new()
            .encode_grayscale(&image, 3, false, &opts)
            .unwrap_err();
        assert!(matches!(err, EbdError::InvalidParameter { .. }));
    }

    #[test]
    fn encode_rejects_zero_size_source() {
        let rgba = RgbaImage::new(0, 0);
        let image = DynamicImage::ImageRgba8(rgba);
        let opts = EncodeOptions::default();
        let err = EbdEncoder::new().encode(&image, EbdMode::Bw, &opts).unwrap_err();
        assert!(matches!(err, EbdError::InvalidImage { .. }));
    }

    #[test]
    fn encode_resizes_wide_image_by_default() {
        let image = solid_image(612, 400, [0, 0, 0, 255]);
        let opts = EncodeOptions::default();
        let encoded = EbdEncoder::new().encode(&image, EbdMode::Palette, &opts).unwrap();
        assert_eq!(encoded.width(), 153);
        assert_eq!(encoded.height(), 100);
    }
}
