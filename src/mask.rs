// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Region masks: sets of coordinates to protect from, or surrender
//! to, the carver.

use std::collections::HashSet;

use image::RgbImage;
use itertools::iproduct;

use crate::coordinate::Coordinate;
use crate::error::CarveError;

/// Channels at or above this value count as white when a mask is read
/// from a stencil image, leaving headroom for lossy encodings.
const WHITE_FLOOR: u8 = 250;

#[derive(Debug, Clone)]
pub struct Mask {
    coordinates: HashSet<Coordinate>,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl Mask {
    /// A solid rectangle from the upper-left corner to the lower-right
    /// corner, both inclusive.
    pub fn rectangle(ul_x: u32, ul_y: u32, lr_x: u32, lr_y: u32) -> Result<Self, CarveError> {
        if ul_x >= lr_x || ul_y >= lr_y {
            return Err(CarveError::InvertedMask);
        }
        let coordinates = iproduct!(ul_x..=lr_x, ul_y..=lr_y)
            .map(|(x, y)| Coordinate::new(x, y))
            .collect();
        Ok(Mask {
            coordinates,
            min_x: ul_x,
            min_y: ul_y,
            max_x: lr_x,
            max_y: lr_y,
        })
    }

    /// Reads a stencil image: every white-enough pixel is in the
    /// mask.  The stencil must be the same size as the image it will
    /// be applied to; that is checked at application time, not here.
    pub fn from_image(stencil: &RgbImage) -> Result<Self, CarveError> {
        let mut coordinates = HashSet::new();
        let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
        let (mut max_x, mut max_y) = (0, 0);
        for (x, y, color) in stencil.enumerate_pixels() {
            if color.0.iter().all(|&channel| channel >= WHITE_FLOOR) {
                coordinates.insert(Coordinate::new(x, y));
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
        if coordinates.is_empty() {
            return Err(CarveError::EmptyMask);
        }
        Ok(Mask {
            coordinates,
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.coordinates.contains(coordinate)
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn min_x(&self) -> u32 {
        self.min_x
    }

    pub fn min_y(&self) -> u32 {
        self.min_y
    }

    pub fn max_x(&self) -> u32 {
        self.max_x
    }

    pub fn max_y(&self) -> u32 {
        self.max_y
    }

    /// Width of the bounding box, inclusive of both edges.
    pub fn span_x(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn span_y(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}
