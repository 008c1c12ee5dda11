// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Coordinate drift tracking for batch seam insertion.
//!
//! Seams to insert are located against a throwaway copy of the mesh,
//! so their recorded coordinates go stale as soon as the first one is
//! actually spliced in: every insertion shifts the pixels after it by
//! one slot.  The adjuster keeps one running offset per lane of the
//! original grid; after each insertion the lanes past the insertion
//! point are shifted, and later seams have their coordinates
//! corrected before use.

use crate::coordinate::Coordinate;
use crate::error::CarveError;

#[derive(Debug)]
pub struct SeamAdjuster {
    offsets: Vec<u32>,
}

impl SeamAdjuster {
    /// One offset slot per lane of the grid the seams were located
    /// against.  For vertical seams `range` is the original width,
    /// for horizontal seams the original height.
    pub fn new(range: u32) -> Result<Self, CarveError> {
        if range == 0 {
            return Err(CarveError::EmptyAdjusterRange);
        }
        Ok(SeamAdjuster {
            offsets: vec![0; range as usize],
        })
    }

    fn offset_at(&self, index: u32) -> Result<u32, CarveError> {
        self.offsets
            .get(index as usize)
            .copied()
            .ok_or(CarveError::AdjusterRange {
                index: index as usize,
                range: self.offsets.len(),
            })
    }

    /// Bumps every lane at or after `index` by one.  An index one
    /// past the last lane is legal and shifts nothing: a seam can be
    /// spliced in beyond the final lane of the original grid.
    pub fn shift_from(&mut self, index: u32) {
        for offset in self.offsets.iter_mut().skip(index as usize) {
            *offset += 1;
        }
    }

    /// Corrects a located seam's x coordinates, then records a shift
    /// starting at the seam's own lane.  Inclusive is the removal
    /// flavor: taking out lane N displaces everything from N on.  The
    /// whole seam shares the offset of its first coordinate's
    /// pre-adjustment lane, keeping the path connected.
    pub fn adjust_x_inclusive(
        &mut self,
        coordinates: &[Coordinate],
    ) -> Result<Vec<Coordinate>, CarveError> {
        let adjusted = self.adjust_x(coordinates)?;
        if let Some(first) = coordinates.first() {
            self.shift_from(first.x);
        }
        Ok(adjusted)
    }

    /// Corrects x coordinates, then records a shift starting one
    /// lane past the seam's own.  Exclusive is the insertion flavor:
    /// a copy spliced in beside lane N displaces only the lanes after
    /// it.
    pub fn adjust_x_exclusive(
        &mut self,
        coordinates: &[Coordinate],
    ) -> Result<Vec<Coordinate>, CarveError> {
        let adjusted = self.adjust_x(coordinates)?;
        if let Some(first) = coordinates.first() {
            self.shift_from(first.x + 1);
        }
        Ok(adjusted)
    }

    pub fn adjust_y_inclusive(
        &mut self,
        coordinates: &[Coordinate],
    ) -> Result<Vec<Coordinate>, CarveError> {
        let adjusted = self.adjust_y(coordinates)?;
        if let Some(first) = coordinates.first() {
            self.shift_from(first.y);
        }
        Ok(adjusted)
    }

    pub fn adjust_y_exclusive(
        &mut self,
        coordinates: &[Coordinate],
    ) -> Result<Vec<Coordinate>, CarveError> {
        let adjusted = self.adjust_y(coordinates)?;
        if let Some(first) = coordinates.first() {
            self.shift_from(first.y + 1);
        }
        Ok(adjusted)
    }

    fn adjust_x(&self, coordinates: &[Coordinate]) -> Result<Vec<Coordinate>, CarveError> {
        let offset = match coordinates.first() {
            Some(first) => self.offset_at(first.x)?,
            None => return Ok(Vec::new()),
        };
        Ok(coordinates
            .iter()
            .map(|c| Coordinate::new(c.x + offset, c.y))
            .collect())
    }

    fn adjust_y(&self, coordinates: &[Coordinate]) -> Result<Vec<Coordinate>, CarveError> {
        let offset = match coordinates.first() {
            Some(first) => self.offset_at(first.y)?,
            None => return Ok(Vec::new()),
        };
        Ok(coordinates
            .iter()
            .map(|c| Coordinate::new(c.x, c.y + offset))
            .collect())
    }
}
