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

//! Alpha compositing and resize, the first step of every encode.
//!
//! Source images arrive as whatever the upstream fetch layer decoded —
//! RGB, RGBA, grayscale, paletted — and may carry transparency the device
//! has no way to render. Normalization flattens that onto opaque white and,
//! unless the caller opts out, shrinks the image to the handheld's screen
//! budget before any quantization happens.

use image::{imageops, DynamicImage, Rgb, RgbImage};

use crate::error::EbdError;

/// Images wider than this are resized to exactly [`TARGET_WIDTH`]; narrower
/// images are simply halved.
const WIDE_THRESHOLD: u32 = 306;

/// Target width for images above [`WIDE_THRESHOLD`].
const TARGET_WIDTH: u32 = 153;

/// Composites `image` onto solid white and, unless `disable_resize` is set,
/// resizes it per the device's screen budget: images wider than 306px are
/// scaled to exactly 153px wide (aspect preserved); narrower images are
/// halved. Both branches round dimensions up.
///
/// # Errors
///
/// Returns [`EbdError::InvalidImage`] if the source has a zero dimension,
/// or if the computed resize target is too small to resize sensibly
/// (width after resize `<= 1`).
pub fn normalize(image: &DynamicImage, disable_resize: bool) -> Result<RgbImage, EbdError> {
    let (src_width, src_height) = (image.width(), image.height());
    if src_width == 0 || src_height == 0 {
        return Err(EbdError::InvalidImage {
            width: src_width,
            height: src_height,
            detail: "source image has a zero dimension".to_string(),
        });
    }

    let composited = composite_onto_white(image);

    if disable_resize {
        return Ok(composited);
    }

    let (target_width, target_height) = resize_target(src_width, src_height);
    if target_width <= 1 {
        return Err(EbdError::InvalidImage {
            width: target_width,
            height: target_height,
            detail: "image too small to resize sensibly (width after resize <= 1)".to_string(),
        });
    }

    Ok(imageops::resize(
        &composited,
        target_width,
        target_height,
        imageops::FilterType::Triangle,
    ))
}

/// The post-resize `(width, height)` for a source of the given dimensions.
fn resize_target(width: u32, height: u32) -> (u32, u32) {
    if width > WIDE_THRESHOLD {
        let scale = f64::from(TARGET_WIDTH) / f64::from(width);
        (TARGET_WIDTH, ceil_scale(height, scale))
    } else {
        (ceil_div2(width), ceil_div2(height))
    }
}

fn ceil_div2(value: u32) -> u32 {
    value.div_ceil(2)
}

fn ceil_scale(value: u32, scale: f64) -> u32 {
    (f64::from(value) * scale).ceil() as u32
}

fn composite_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = blend_over_white(r, g, b, a);
    }
    out
}

fn blend_over_white(r: u8, g: u8, b: u8, a: u8) -> Rgb<u8> {
    if a == 255 {
        return Rgb([r, g, b]);
    }
    let alpha = f64::from(a) / 255.0;
    let blend = |channel: u8| -> u8 {
        let fg = f64::from(channel) * alpha;
        let bg = 255.0 * (1.0 - alpha);
        (fg + bg).round() as u8
    };
    Rgb([blend(r), blend(g), blend(b)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn wide_image_resizes_to_153_wide() {
        let (w, h) = resize_target(612, 400);
        assert_eq!(w, 153);
        assert_eq!(h, 100);
    }

    #[test]
    fn narrow_image_is_halved_and_rounds_up() {
        let (w, h) = resize_target(101, 51);
        assert_eq!(w, 51);
        assert_eq!(h, 26);
    }

    #[test]
    fn fully_transparent_pixel_becomes_white() {
        let mut rgba = RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([10, 20, 30, 0]));
        let dynamic = DynamicImage::ImageRgba8(rgba);
        let normalized = normalize(&dynamic, true).unwrap();
        assert_eq!(*normalized.get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn opaque_pixel_passes_through_unchanged() {
        let mut rgba = RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([10, 20, 30, 255]));
        let dynamic = DynamicImage::ImageRgba8(rgba);
        let normalized = normalize(&dynamic, true).unwrap();
        assert_eq!(*normalized.get_pixel(0, 0), Rgb([10, 20, 30]));
    }

    #[test]
    fn zero_dimension_source_is_invalid_image() {
        let rgba = RgbaImage::new(0, 0);
        let dynamic = DynamicImage::ImageRgba8(rgba);
        let err = normalize(&dynamic, true).unwrap_err();
        assert!(matches!(err, EbdError::InvalidImage { .. }));
    }

    #[test]
    fn narrow_source_resizing_to_width_one_is_invalid_image() {
        // 2px wide halves to ceil(2/2) = 1, too small to resize sensibly.
        let rgba = RgbaImage::new(2, 40);
        let dynamic = DynamicImage::ImageRgba8(rgba);
        let err = normalize(&dynamic, false).unwrap_err();
        assert!(matches!(err, EbdError::InvalidImage { .. }));
    }

    #[test]
    fn disable_resize_keeps_source_dimensions() {
        let rgba = RgbaImage::new(400, 200);
        let dynamic = DynamicImage::ImageRgba8(rgba);
        let normalized = normalize(&dynamic, true).unwrap();
        assert_eq!((normalized.width(), normalized.height()), (400, 200));
    }
}
