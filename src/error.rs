// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong while carving.
//!
//! Three families of failure: invalid input (bad dimensions, inverted
//! or oversized masks, out-of-range coordinates), inconsistent state
//! (asking for history when recording is off), and structural
//! impossibility (shrinking a dimension below one pixel).  All of
//! them are raised synchronously at the point of violation; nothing
//! is retried, and partial progress already committed is not rolled
//! back.

use failure::Fail;

#[derive(Debug, Fail, PartialEq)]
pub enum CarveError {
    #[fail(display = "image must have nonzero dimensions")]
    EmptyImage,

    #[fail(
        display = "target dimensions {}x{} must both be at least 1",
        width, height
    )]
    InvalidDimensions { width: u32, height: u32 },

    #[fail(display = "coordinate ({}, {}) is outside the current image bounds", x, y)]
    OutOfBounds { x: u32, y: u32 },

    #[fail(display = "mask extends past the current image bounds")]
    MaskOutOfBounds,

    #[fail(display = "mask rectangle corners must be ordered upper-left before lower-right")]
    InvertedMask,

    #[fail(display = "mask image contains no near-white pixels")]
    EmptyMask,

    #[fail(display = "the border sentinel has no computable energy or cost")]
    BorderPixel,

    #[fail(display = "seam contains no pixels")]
    EmptySeam,

    #[fail(display = "seam batch contains no seams")]
    EmptySeamBatch,

    #[fail(display = "adjuster coordinate range must hold at least one slot")]
    EmptyAdjusterRange,

    #[fail(display = "coordinate {} is outside the adjuster range of {}", index, range)]
    AdjusterRange { index: usize, range: usize },

    #[fail(display = "image can't shrink below one pixel in either dimension")]
    BelowMinimumSize,

    #[fail(display = "recording was not enabled for this carver")]
    RecordingDisabled,
}
