// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cost matrix propagation.
//!
//! A cost matrix holds, per pixel, the cheapest cumulative energy of
//! any seam ending there.  Two strategies are provided, following
//! [Avidan & Shamir (2007)]: the backward model pays only the energy
//! a seam consumes, while the forward model additionally charges each
//! candidate predecessor for the new discontinuity its removal would
//! expose.  Both come in a vertical and a horizontal orientation.
//!
//! Neither implementation bounds-checks: the border sentinel's cost
//! and energy are infinite, so off-grid candidates lose every minimum
//! on their own.  (The exception is the forward model on the first
//! and last columns, where the infinite gap washes the whole lane out
//! to infinity; seams simply never start there.)

use crate::cq;
use crate::error::CarveError;
use crate::mesh::{Mesh, PixelRef};

/// Propagates cumulative path cost onto one pixel from the pixels a
/// seam could have arrived from.  The caller is responsible for
/// visiting pixels in an order that has already costed every
/// predecessor, and for seeding the first row or column with the raw
/// energy map.
pub trait CostProcessor {
    /// Cost of the cheapest vertical seam ending at this pixel.
    fn vertical_cost(&self, mesh: &Mesh, pixel: PixelRef) -> Result<f64, CarveError>;

    /// Cost of the cheapest horizontal seam ending at this pixel.
    fn horizontal_cost(&self, mesh: &Mesh, pixel: PixelRef) -> Result<f64, CarveError>;
}

fn reject_border(pixel: PixelRef) -> Result<(), CarveError> {
    cq!(pixel.is_border(), Err(CarveError::BorderPixel), Ok(()))
}

/// The backward model: energy already paid, nothing more.
pub struct BackwardEnergy;

impl CostProcessor for BackwardEnergy {
    fn vertical_cost(&self, mesh: &Mesh, pixel: PixelRef) -> Result<f64, CarveError> {
        reject_border(pixel)?;

        let upper_left = mesh.cost(mesh.upper_left(pixel));
        let above = mesh.cost(mesh.above(pixel));
        let upper_right = mesh.cost(mesh.upper_right(pixel));

        Ok(mesh.energy(pixel) + upper_left.min(above).min(upper_right))
    }

    fn horizontal_cost(&self, mesh: &Mesh, pixel: PixelRef) -> Result<f64, CarveError> {
        reject_border(pixel)?;

        let upper_left = mesh.cost(mesh.upper_left(pixel));
        let left = mesh.cost(mesh.left(pixel));
        let lower_left = mesh.cost(mesh.lower_left(pixel));

        Ok(mesh.energy(pixel) + upper_left.min(left).min(lower_left))
    }
}

/// The forward model: each candidate predecessor is additionally
/// charged the absolute energy gaps that removing this pixel's path
/// would newly expose between its former neighbors.
pub struct ForwardEnergy;

impl CostProcessor for ForwardEnergy {
    fn vertical_cost(&self, mesh: &Mesh, pixel: PixelRef) -> Result<f64, CarveError> {
        reject_border(pixel)?;

        let upper_left = mesh.cost(mesh.upper_left(pixel));
        let above = mesh.cost(mesh.above(pixel));
        let upper_right = mesh.cost(mesh.upper_right(pixel));

        let left_energy = mesh.energy(mesh.left(pixel));
        let right_energy = mesh.energy(mesh.right(pixel));
        let above_energy = mesh.energy(mesh.above(pixel));

        // Removing this pixel always seats left against right; coming
        // in diagonally additionally seats the vertical neighbor
        // against the side the seam came from.
        let crosswise_gap = (left_energy - right_energy).abs();
        let from_upper_left = upper_left + crosswise_gap + (above_energy - left_energy).abs();
        let from_above = above + crosswise_gap;
        let from_upper_right = upper_right + crosswise_gap + (above_energy - right_energy).abs();

        Ok(mesh.energy(pixel) + from_upper_left.min(from_above).min(from_upper_right))
    }

    fn horizontal_cost(&self, mesh: &Mesh, pixel: PixelRef) -> Result<f64, CarveError> {
        reject_border(pixel)?;

        let upper_left = mesh.cost(mesh.upper_left(pixel));
        let left = mesh.cost(mesh.left(pixel));
        let lower_left = mesh.cost(mesh.lower_left(pixel));

        let above_energy = mesh.energy(mesh.above(pixel));
        let below_energy = mesh.energy(mesh.below(pixel));
        let left_energy = mesh.energy(mesh.left(pixel));

        let crosswise_gap = (above_energy - below_energy).abs();
        let from_upper_left = upper_left + crosswise_gap + (left_energy - above_energy).abs();
        let from_left = left + crosswise_gap;
        let from_lower_left = lower_left + crosswise_gap + (left_energy - below_energy).abs();

        Ok(mesh.energy(pixel) + from_upper_left.min(from_left).min(from_lower_left))
    }
}
