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

//! Error taxonomy for the EBD encoding pipeline.

use thiserror::Error;

/// Errors the EBD pipeline can return.
///
/// Never raised for unknown pixel colors — those are remapped to the
/// "unknown color" sentinel or the nearest quantized grayscale level, not
/// treated as failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EbdError {
    /// An unsupported mode, an unsupported grayscale depth, or a
    /// non-positive source image dimension.
    #[error("invalid parameter: {detail}")]
    InvalidParameter {
        /// Human-readable description of what was invalid.
        detail: String,
    },

    /// The image could not be normalized: resizing collapsed a dimension
    /// to zero, or alpha compositing failed.
    #[error("invalid image ({width}x{height}): {detail}")]
    InvalidImage {
        /// Width after the failed normalization step.
        width: u32,
        /// Height after the failed normalization step.
        height: u32,
        /// Human-readable description of the failure.
        detail: String,
    },

    /// A packer produced output that violates a wire-format invariant.
    /// This indicates a bug in this crate, not bad input.
    #[error("internal invariant violated: {detail}")]
    InternalInvariant {
        /// Human-readable description of the violated invariant.
        detail: String,
    },
}
