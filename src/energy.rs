// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of a pixel.
//!
//! The energy map measures local visual importance: the higher a
//! pixel's energy, the more a seam should avoid it.  The function is
//! a strategy trait so alternative gradients can be swapped in; the
//! default averages the color distance to all eight neighbors.

use crate::error::CarveError;
use crate::mesh::{Mesh, PixelRef};

/// Computes a single pixel's importance from its neighborhood.  The
/// result is pure; the caller decides where to store it.
pub trait EnergyFunction {
    fn compute(&self, mesh: &Mesh, pixel: PixelRef) -> Result<f64, CarveError>;
}

/// The default energy: the mean, over all eight neighbors, of the
/// per-channel absolute color difference averaged across channels.
/// Border neighbors read back black, so pixels on the image edge
/// pick up extra energy and seams drift toward the interior.
pub struct AverageGradient;

impl EnergyFunction for AverageGradient {
    fn compute(&self, mesh: &Mesh, pixel: PixelRef) -> Result<f64, CarveError> {
        if pixel.is_border() {
            return Err(CarveError::BorderPixel);
        }

        let center = mesh.color(pixel);
        let neighbors = [
            mesh.left(pixel),
            mesh.upper_left(pixel),
            mesh.above(pixel),
            mesh.upper_right(pixel),
            mesh.right(pixel),
            mesh.lower_right(pixel),
            mesh.below(pixel),
            mesh.lower_left(pixel),
        ];

        let mut cumulative = 0.0;
        for neighbor in neighbors.iter() {
            let color = mesh.color(*neighbor);
            let mut channel_gap = 0.0;
            for channel in 0..3 {
                channel_gap += (f64::from(color[channel]) - f64::from(center[channel])).abs();
            }
            cumulative += channel_gap / 3.0;
        }

        Ok(cumulative / neighbors.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn uniform(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
    }

    #[test]
    fn interior_of_a_uniform_image_has_zero_energy() {
        let mesh = Mesh::from_image(&uniform(3, 3, 100)).unwrap();
        let center = mesh.pixel_at(1, 1).unwrap();
        assert_eq!(AverageGradient.compute(&mesh, center).unwrap(), 0.0);
    }

    #[test]
    fn edges_pick_up_energy_from_the_black_border() {
        let mesh = Mesh::from_image(&uniform(3, 3, 100)).unwrap();
        // A corner sees five border neighbors, each a full 100 away
        // on every channel: 5 * 100 / 8.
        let corner = mesh.pixel_at(0, 0).unwrap();
        assert_eq!(AverageGradient.compute(&mesh, corner).unwrap(), 62.5);
        // An edge pixel sees three: 3 * 100 / 8.
        let edge = mesh.pixel_at(1, 0).unwrap();
        assert_eq!(AverageGradient.compute(&mesh, edge).unwrap(), 37.5);
    }

    #[test]
    fn channels_are_averaged_before_neighbors() {
        let mut image = uniform(3, 3, 0);
        image.put_pixel(1, 1, Rgb([30, 60, 90]));
        let mesh = Mesh::from_image(&image).unwrap();
        // Every one of the eight neighbors is black: (30+60+90)/3 = 60.
        let center = mesh.pixel_at(1, 1).unwrap();
        assert_eq!(AverageGradient.compute(&mesh, center).unwrap(), 60.0);
    }

    #[test]
    fn rejects_the_border_sentinel() {
        let mesh = Mesh::from_image(&uniform(2, 2, 0)).unwrap();
        assert_eq!(
            AverageGradient.compute(&mesh, crate::mesh::BORDER).unwrap_err(),
            CarveError::BorderPixel
        );
    }
}
