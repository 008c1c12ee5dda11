// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A seam: one connected minimum-cost path through the mesh.
//!
//! Backtracking discovers a seam from its far end, so the stored
//! pixel order runs bottom-to-top (vertical) or right-to-left
//! (horizontal).  Each pixel is recorded together with its grid
//! coordinate *at search time*; insertion bookkeeping needs those
//! positions long after other removals have shifted the live grid.
//!
//! Removal is the delicate part.  Splicing the flanking cross-axis
//! neighbors together closes the gap in the seam's own lane, but the
//! lane then has to be reattached to the next seam pixel's lane, and
//! which diagonal carries that attachment depends on whether the path
//! steps straight, leans left, or leans right.

use crate::coordinate::Coordinate;
use crate::cq;
use crate::error::CarveError;
use crate::mesh::{Mesh, PixelRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug)]
pub struct Seam {
    orientation: Orientation,
    pixels: Vec<(PixelRef, Coordinate)>,
    total_energy: f64,
}

impl Seam {
    pub fn new(orientation: Orientation) -> Self {
        Seam {
            orientation,
            pixels: Vec::new(),
            total_energy: 0.0,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Appends the next discovered pixel.  `cost` is the pixel's
    /// cost-matrix value, accumulated for the average-energy
    /// comparison between competing seams.
    pub fn push(&mut self, pixel: PixelRef, coordinate: Coordinate, cost: f64) {
        self.total_energy += cost;
        self.pixels.push((pixel, coordinate));
    }

    pub fn average_energy(&self) -> f64 {
        cq!(
            self.pixels.is_empty(),
            0.0,
            self.total_energy / self.pixels.len() as f64
        )
    }

    /// The recorded coordinates in start-of-axis order: top-down for
    /// a vertical seam, left-to-right for a horizontal one.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.pixels.iter().rev().map(|(_, c)| *c).collect()
    }

    /// Splices this seam out of the mesh and shortens the relevant
    /// dimension by one.  Pixels are processed in reverse discovery
    /// order; unlinked nodes keep their own outgoing links, which is
    /// what lets the origin hand-off below find its replacement.
    pub fn remove(&self, mesh: &mut Mesh) -> Result<(), CarveError> {
        if self.pixels.is_empty() {
            return Err(CarveError::EmptySeam);
        }
        let path: Vec<PixelRef> = self.pixels.iter().rev().map(|(p, _)| *p).collect();

        match self.orientation {
            Orientation::Vertical => {
                for (i, &current) in path.iter().enumerate() {
                    let left = mesh.left(current);
                    let right = mesh.right(current);
                    mesh.link_horizontal(left, right);
                    if current == mesh.origin() {
                        mesh.set_origin(right);
                    }
                    if let Some(&next) = path.get(i + 1) {
                        let below = mesh.below(current);
                        if next == mesh.lower_left(current) {
                            mesh.link_vertical(left, below);
                        } else if next == mesh.lower_right(current) {
                            mesh.link_vertical(right, below);
                        }
                    }
                }
                mesh.shrink_width();
            }
            Orientation::Horizontal => {
                for (i, &current) in path.iter().enumerate() {
                    let above = mesh.above(current);
                    let below = mesh.below(current);
                    mesh.link_vertical(above, below);
                    if current == mesh.origin() {
                        mesh.set_origin(below);
                    }
                    if let Some(&next) = path.get(i + 1) {
                        let right = mesh.right(current);
                        if next == mesh.upper_right(current) {
                            mesh.link_horizontal(above, right);
                        } else if next == mesh.lower_right(current) {
                            mesh.link_horizontal(below, right);
                        }
                    }
                }
                mesh.shrink_height();
            }
        }
        Ok(())
    }
}
