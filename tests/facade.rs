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

//! End-to-end checks of the encoder façade against small synthetic images.

use image::{DynamicImage, Rgba, RgbaImage};
use xiino_ebd::{EbdEncoder, EbdMode, EncodeOptions};

fn checkerboard(width: u32, height: u32) -> DynamicImage {
    let mut rgba = RgbaImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels_mut() {
        *pixel = if (x + y) % 2 == 0 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        };
    }
    DynamicImage::ImageRgba8(rgba)
}

fn no_resize() -> EncodeOptions {
    EncodeOptions {
        disable_resize: true,
    }
}

#[test]
fn every_mode_round_trips_through_the_facade_without_error() {
    let image = checkerboard(16, 16);
    let encoder = EbdEncoder::new();
    let modes = [
        EbdMode::Bw,
        EbdMode::BwCompressed,
        EbdMode::Gray2,
        EbdMode::Gray2Compressed,
        EbdMode::Gray4,
        EbdMode::Gray4Compressed,
        EbdMode::Palette,
        EbdMode::PaletteCompressed,
    ];
    for mode in modes {
        let encoded = encoder.encode(&image, mode, &no_resize()).unwrap();
        assert!(!encoded.bytes().is_empty(), "{mode} produced no bytes");
        assert_eq!(encoded.mode(), mode);
        assert_eq!((encoded.width(), encoded.height()), (16, 16));
    }
}

#[test]
fn markup_round_trip_embeds_expected_dimensions_and_mode() {
    let image = checkerboard(8, 8);
    let encoded = EbdEncoder::new()
        .encode_color(&image, true, &no_resize())
        .unwrap();

    let ebdimage_tag = encoded.ebdimage_tag("photo1");
    assert!(ebdimage_tag.contains(r#"MODE="9""#));
    assert!(ebdimage_tag.contains(r#"NAME="photo1""#));

    let img_tag = encoded.img_tag("photo1", "a photo");
    assert!(img_tag.contains(r#"WIDTH="8""#));
    assert!(img_tag.contains(r#"HEIGHT="8""#));
    assert!(img_tag.contains(r#"EBD="photo1""#));
}

#[test]
fn wide_source_is_resized_to_device_screen_budget() {
    let image = checkerboard(900, 600);
    let encoded = EbdEncoder::new()
        .encode_bw(&image, false, &EncodeOptions::default())
        .unwrap();
    assert_eq!(encoded.width(), 153);
    assert_eq!(encoded.height(), 102);
}

#[test]
fn solid_color_image_compresses_smaller_with_mode9_than_raw_mode8() {
    let mut rgba = RgbaImage::new(32, 32);
    for pixel in rgba.pixels_mut() {
        *pixel = Rgba([0, 0, 0, 255]);
    }
    let image = DynamicImage::ImageRgba8(rgba);
    let encoder = EbdEncoder::new();

    let raw = encoder
        .encode(&image, EbdMode::Palette, &no_resize())
        .unwrap();
    let compressed = encoder
        .encode(&image, EbdMode::PaletteCompressed, &no_resize())
        .unwrap();

    assert!(compressed.bytes().len() < raw.bytes().len());
}

#[test]
fn unsupported_grayscale_depth_is_rejected() {
    let image = checkerboard(4, 4);
    let err = EbdEncoder::new()
        .encode_grayscale(&image, 6, false, &no_resize())
        .unwrap_err();
    assert!(err.to_string().contains("unsupported grayscale depth"));
}
