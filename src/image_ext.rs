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

//! [`EbdImage`], the encoded result handed back to the HTML rewriter.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::EbdMode;

/// An encoded EBD raster plus the metadata needed to embed it in a page.
///
/// Immutable once built: every encoder in this crate produces one in a
/// single pass and hands it back by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EbdImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    mode: EbdMode,
}

impl EbdImage {
    /// Builds an [`EbdImage`] from already-encoded wire bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>, width: u32, height: u32, mode: EbdMode) -> Self {
        Self {
            bytes,
            width,
            height,
            mode,
        }
    }

    /// The encoded wire bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Raster width in pixels, after normalization.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels, after normalization.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The wire mode this image was encoded in.
    #[must_use]
    pub fn mode(&self) -> EbdMode {
        self.mode
    }

    /// Renders the `<EBDIMAGE>` fragment carrying the base64 payload.
    ///
    /// `name` is the identifier the paired `<IMG EBD="...">` tag
    /// ([`Self::img_tag`]) must reference.
    #[must_use]
    pub fn ebdimage_tag(&self, name: &str) -> String {
        let payload = STANDARD.encode(&self.bytes);
        format!(
            r#"<EBDIMAGE MODE="{mode}" NAME="{name}"><!--{payload}--></EBDIMAGE>"#,
            mode = self.mode.wire_value(),
        )
    }

    /// Renders the `<IMG>` fragment referencing an `<EBDIMAGE>` by name.
    #[must_use]
    pub fn img_tag(&self, name: &str, alt: &str) -> String {
        format!(
            r#"<IMG ALT="{alt}" WIDTH="{width}" HEIGHT="{height}" EBDWIDTH="{width}" EBDHEIGHT="{height}" EBD="{name}">"#,
            width = self.width,
            height = self.height,
        )
    }
}
